//! Identity store and request log implementations.

pub mod memory;
pub mod request_log;
pub mod user;

pub use memory::MemoryUserStore;
pub use request_log::RequestLogRepository;
pub use user::UserRepository;

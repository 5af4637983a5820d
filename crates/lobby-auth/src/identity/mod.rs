//! Credential → identity resolution shared by every authenticated entry point.

pub mod failure;
pub mod resolver;

pub use failure::AuthFailure;
pub use resolver::IdentityResolver;

//! Traits defined in `lobby-core` and implemented by other crates.

pub mod token;

pub use token::TokenValidator;

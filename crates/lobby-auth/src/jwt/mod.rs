//! JWT token encoding, decoding, and key handling.

pub mod claims;
pub mod decoder;
pub mod encoder;
mod keys;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;

//! Message validation rules.

use lobby_core::error::AppError;

/// Default maximum inbound message size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 65_536;

/// Reject inbound text that is oversized or blank before decoding it.
pub fn validate_inbound(raw: &str, max_bytes: usize) -> Result<(), AppError> {
    if raw.len() > max_bytes {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_bytes} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

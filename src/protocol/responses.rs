//! FTP reply codes
//!
//! Reply codes the client checks for explicitly.

pub const OK: u16 = 200;
pub const PASSIVE_MODE: u16 = 227;

/// Codes at or above this value are failures.
pub const FAILURE_THRESHOLD: u16 = 500;

/// Classify a status code. Preliminary (1xx) and intermediate (3xx)
/// replies count as success.
pub fn is_success(code: u16) -> bool {
    code < FAILURE_THRESHOLD
}

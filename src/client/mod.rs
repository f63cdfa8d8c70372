//! FTP client session
//!
//! Owns the control connection and the per-session settings.

pub mod session;
pub mod state;

pub use session::FtpClient;
pub use state::{ClientState, SessionState};

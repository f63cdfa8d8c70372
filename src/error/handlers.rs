//! Error handlers
//!
//! Reporting helpers used where an error ends a single command.

use crate::error::types::FtpClientError;
use log::error;

/// Handle an FTP client error
pub fn handle_error(err: &FtpClientError) {
    error!("FTP Client Error: {}", err);
}

/// Short message shown on the transcript when a command is aborted
pub fn error_to_user_message(err: &FtpClientError) -> String {
    match err {
        FtpClientError::Connect(e) => format!("ERROR: {}", e),
        FtpClientError::Protocol(_) => "ERROR: Server reply not understood".to_string(),
        FtpClientError::MalformedAddress(_) => {
            "ERROR: Could not parse passive mode address".to_string()
        }
        FtpClientError::NoLocalAddress(_) => {
            "Error: Local IP could not be found".to_string()
        }
        FtpClientError::Transfer(e) => format!("ERROR: {}", e),
        FtpClientError::Config(e) => format!("ERROR: {}", e),
        FtpClientError::IoError(e) => format!("ERROR: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConnectError, NoLocalAddressError};
    use std::net::Ipv4Addr;

    #[test]
    fn test_no_local_address_message() {
        let err: FtpClientError =
            NoLocalAddressError::LoopbackOnly(Ipv4Addr::LOCALHOST).into();
        assert_eq!(error_to_user_message(&err), "Error: Local IP could not be found");
    }

    #[test]
    fn test_connect_message_includes_cause() {
        let err: FtpClientError = ConnectError::NotConnected.into();
        assert_eq!(error_to_user_message(&err), "ERROR: Not connected");
    }
}

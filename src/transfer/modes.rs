//! FTP Transfer modes
//!
//! Active mode: the client listens and the server connects back (PORT).
//! Passive mode: the server listens and the client connects (PASV).

use serde::Deserialize;
use std::fmt;

/// FTP transfer modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    #[default]
    Active,
    Passive,
}

impl TransferMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            TransferMode::Active => TransferMode::Passive,
            TransferMode::Passive => TransferMode::Active,
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Active => write!(f, "Active"),
            TransferMode::Passive => write!(f, "Passive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_active() {
        assert_eq!(TransferMode::default(), TransferMode::Active);
    }

    #[test]
    fn test_toggle_twice_restores_mode() {
        for mode in [TransferMode::Active, TransferMode::Passive] {
            assert_ne!(mode.toggled(), mode);
            assert_eq!(mode.toggled().toggled(), mode);
        }
    }
}

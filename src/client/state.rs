//! Module `state`
//!
//! Session-scoped settings and the loosely tracked login state of the
//! control session.

use crate::protocol::commands::TransferType;
use crate::transfer::TransferMode;

/// Where the control session is in its lifecycle.
///
/// Tracked for reporting only; commands are not refused based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected,
    /// USER was accepted and a password is expected.
    Authenticating,
    Ready,
}

/// Represents the state of the FTP control session.
///
/// Holds the transfer mode, transfer type and debug flag that outlive any
/// single transfer, plus the current login state.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    state: SessionState,
    username: Option<String>,
    transfer_type: TransferType,
    mode: TransferMode,
    debug: bool,
}

impl ClientState {
    pub fn new(mode: TransferMode, debug: bool) -> Self {
        Self {
            mode,
            debug,
            ..Self::default()
        }
    }

    /// Forgets everything tied to the connection. Mode and debug flag are
    /// process settings and survive.
    pub fn disconnect(&mut self) {
        self.state = SessionState::Disconnected;
        self.username = None;
        self.transfer_type = TransferType::default();
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn transfer_type(&self) -> TransferType {
        self.transfer_type
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn set_transfer_type(&mut self, transfer_type: TransferType) {
        self.transfer_type = transfer_type;
    }

    /// Flips Active/Passive and returns the new mode.
    pub fn toggle_mode(&mut self) -> TransferMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Flips the debug flag and returns the new value.
    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_mode_twice_is_identity() {
        let mut state = ClientState::new(TransferMode::Active, false);
        assert_eq!(state.toggle_mode(), TransferMode::Passive);
        assert_eq!(state.toggle_mode(), TransferMode::Active);
    }

    #[test]
    fn test_toggle_debug() {
        let mut state = ClientState::default();
        assert!(state.toggle_debug());
        assert!(!state.toggle_debug());
    }

    #[test]
    fn test_disconnect_keeps_process_settings() {
        let mut state = ClientState::new(TransferMode::Passive, true);
        state.set_state(SessionState::Ready);
        state.set_username(Some("alice".into()));
        state.set_transfer_type(TransferType::Binary);

        state.disconnect();

        assert_eq!(state.state(), SessionState::Disconnected);
        assert_eq!(state.username(), None);
        assert_eq!(state.transfer_type(), TransferType::Ascii);
        assert_eq!(state.mode(), TransferMode::Passive);
        assert!(state.is_debug());
    }
}

//! FTP client session
//!
//! `FtpClient` is the one control session of a client run. It owns the
//! control channel, the process-wide transfer settings, and the transcript
//! that receives every server reply.

use log::{error, info, warn};
use std::path::Path;

use crate::client::state::{ClientState, SessionState};
use crate::config::ClientConfig;
use crate::control::ControlChannel;
use crate::control::channel::echo;
use crate::error::{ConnectError, FtpClientError};
use crate::protocol::commands::{self, TransferType, format_command};
use crate::transfer::{FileSink, LineSink, TransferMode, TransferOutcome, run_data_command};

pub struct FtpClient {
    host: String,
    config: ClientConfig,
    state: ClientState,
    channel: Option<ControlChannel>,
    transcript: Box<dyn LineSink>,
}

impl FtpClient {
    pub fn new(host: impl Into<String>, config: ClientConfig, transcript: Box<dyn LineSink>) -> Self {
        let state = ClientState::new(config.default_mode, config.debug);
        Self {
            host: host.into(),
            config,
            state,
            channel: None,
            transcript,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// Opens the control connection and prints the greeting.
    ///
    /// Returns whether the socket connected; a bad greeting is only logged.
    pub async fn open(&mut self) -> bool {
        let mut channel = match ControlChannel::connect(&self.host, self.config.control_port).await {
            Ok(channel) => channel,
            Err(e) => {
                error!("{}", e);
                echo(self.transcript.as_mut(), &e.to_string()).await;
                return false;
            }
        };
        channel.set_debug(self.state.is_debug());

        let greeted = channel.send_over_line(None, self.transcript.as_mut()).await;
        if !greeted {
            warn!("No valid greeting from {}", self.host);
        }
        if self.state.is_debug() {
            let msg = if greeted { "CONNECTED" } else { "NOT CONNECTED" };
            echo(self.transcript.as_mut(), &format!("DEBUG: Application is {}", msg)).await;
        }

        self.channel = Some(channel);
        self.state.set_state(SessionState::Connected);
        info!("Connected to {}:{}", self.host, self.config.control_port);
        true
    }

    /// Sends QUIT and drops the connection; best effort.
    pub async fn close(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.close(self.transcript.as_mut()).await;
        }
        self.state.disconnect();
    }

    /// The open control channel and the transcript, or `None` after
    /// reporting that there is no connection.
    async fn connected(
        &mut self,
        command: &str,
    ) -> Option<(&mut ControlChannel, &mut dyn LineSink)> {
        match self.channel.as_mut() {
            Some(channel) => {
                let transcript: &mut dyn LineSink = self.transcript.as_mut();
                Some((channel, transcript))
            }
            None => {
                warn!("'{}' issued while not connected", command);
                echo(self.transcript.as_mut(), "Not connected.").await;
                None
            }
        }
    }

    /// Returns true when the server expects a password next.
    pub async fn send_user(&mut self, name: &str) -> bool {
        let Some((channel, transcript)) = self.connected(commands::USER).await else {
            return false;
        };
        let accepted = channel.send_user(name, transcript).await;
        if accepted {
            self.state.set_username(Some(name.to_string()));
            self.state.set_state(SessionState::Authenticating);
        }
        accepted
    }

    pub async fn send_pass(&mut self, pass: &str) -> bool {
        let Some((channel, transcript)) = self.connected(commands::PASS).await else {
            return false;
        };
        let accepted = channel.send_pass(pass, transcript).await;
        if accepted {
            self.state.set_state(SessionState::Ready);
        }
        accepted
    }

    pub async fn set_encoding(&mut self, transfer_type: TransferType) -> bool {
        let Some((channel, transcript)) = self.connected(commands::TYPE).await else {
            return false;
        };
        let accepted = channel.set_encoding(transfer_type, transcript).await;
        if accepted {
            self.state.set_transfer_type(transfer_type);
        }
        accepted
    }

    pub async fn change_directory(&mut self, path: &str) -> bool {
        match self.connected(commands::CWD).await {
            Some((channel, transcript)) => channel.change_directory(path, transcript).await,
            None => false,
        }
    }

    pub async fn change_directory_up(&mut self) -> bool {
        self.change_directory("..").await
    }

    pub async fn print_working_directory(&mut self) -> bool {
        match self.connected(commands::PWD).await {
            Some((channel, transcript)) => channel.print_working_directory(transcript).await,
            None => false,
        }
    }

    /// Flips Active/Passive and announces the new mode.
    pub async fn toggle_mode(&mut self) -> TransferMode {
        let mode = self.state.toggle_mode();
        echo(self.transcript.as_mut(), &format!("Connection mode set to {}", mode)).await;
        mode
    }

    pub fn toggle_debug(&mut self) -> bool {
        let debug = self.state.toggle_debug();
        if let Some(channel) = self.channel.as_mut() {
            channel.set_debug(debug);
        }
        debug
    }

    /// Writes a line on the transcript.
    pub async fn report(&mut self, line: &str) {
        echo(self.transcript.as_mut(), line).await;
    }

    /// Runs LIST, writing the listing into `sink`.
    pub async fn list(&mut self, sink: &mut dyn LineSink) -> Result<TransferOutcome, FtpClientError> {
        self.run_data_command(commands::LIST, sink).await
    }

    /// Runs RETR for `remote`, writing the payload to the local file `local`.
    pub async fn get_file(
        &mut self,
        remote: &str,
        local: &Path,
    ) -> Result<TransferOutcome, FtpClientError> {
        if self.state.is_debug() {
            let line = format!("DEBUG: Writing '{}' to '{}'", remote, local.display());
            echo(self.transcript.as_mut(), &line).await;
        }
        let mut sink = FileSink::new(local);
        let command = format_command(commands::RETR, Some(remote));
        self.run_data_command(&command, &mut sink).await
    }

    async fn run_data_command(
        &mut self,
        command: &str,
        sink: &mut dyn LineSink,
    ) -> Result<TransferOutcome, FtpClientError> {
        let mode = self.state.mode();
        let active_address = self.config.active_ipv4();
        let Some((channel, transcript)) = self.connected(command).await else {
            return Err(ConnectError::NotConnected.into());
        };

        run_data_command(channel, transcript, mode, active_address, command, sink).await
    }
}

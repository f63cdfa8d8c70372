//! Module `channel`
//!
//! Owns the control connection: writes command lines, reads framed
//! responses, and echoes every response line to the transcript.

use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, lookup_host};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::error::{ConnectError, ProtocolError};
use crate::protocol::commands::{self, TransferType, format_command, redact_command};
use crate::protocol::{Response, read_response};
use crate::transfer::sink::LineSink;

pub struct ControlChannel {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    local_addr: SocketAddr,
    peer_addr: SocketAddr,
    debug: bool,
}

impl ControlChannel {
    /// Connects to `host:port`. The greeting is left unread.
    ///
    /// IPv4 addresses of `host` are tried first, so active mode has an IPv4
    /// local address to advertise in PORT.
    pub async fn connect(host: &str, port: u16) -> Result<Self, ConnectError> {
        let target = format!("{}:{}", host, port);
        let stream = connect_preferring_ipv4(host, port)
            .await
            .map_err(|e| ConnectError::Control(target.clone(), e))?;
        Self::from_stream(stream).map_err(|e| ConnectError::Control(target, e))
    }

    pub fn from_stream(stream: TcpStream) -> io::Result<Self> {
        let local_addr = stream.local_addr()?;
        let peer_addr = stream.peer_addr()?;
        let (read_half, write_half) = stream.into_split();
        info!("Control connection {} -> {}", local_addr, peer_addr);

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            local_addr,
            peer_addr,
            debug: false,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Writes one command line followed by CRLF and flushes it.
    pub async fn send_command(
        &mut self,
        line: &str,
        transcript: &mut dyn LineSink,
    ) -> Result<(), ProtocolError> {
        let shown = redact_command(line);
        debug!("Sending '{}' to {}", shown, self.peer_addr);
        if self.debug {
            echo(transcript, &format!("DEBUG: Sending '{}'", shown)).await;
        }

        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Reads one framed response without echoing it.
    pub async fn read_response(&mut self) -> Result<Response, ProtocolError> {
        read_response(&mut self.reader).await
    }

    /// Sends `command` (if any), reads one response and echoes its lines.
    pub async fn exchange(
        &mut self,
        command: Option<&str>,
        transcript: &mut dyn LineSink,
    ) -> Result<Response, ProtocolError> {
        if let Some(line) = command {
            self.send_command(line, transcript).await?;
        }

        let response = self.read_response().await?;
        for line in response.lines() {
            echo(transcript, line).await;
        }
        debug!("Reply {} from {}", response.code(), self.peer_addr);
        Ok(response)
    }

    /// Sends `command` (if any) and reports whether the reply code is below 500.
    ///
    /// Errors are reported on the transcript and count as failure.
    pub async fn send_over_line(
        &mut self,
        command: Option<&str>,
        transcript: &mut dyn LineSink,
    ) -> bool {
        match self.exchange(command, transcript).await {
            Ok(response) => response.is_success(),
            Err(e) => {
                error!("Control exchange with {} failed: {}", self.peer_addr, e);
                echo(transcript, &e.to_string()).await;
                false
            }
        }
    }

    pub async fn set_encoding(
        &mut self,
        transfer_type: TransferType,
        transcript: &mut dyn LineSink,
    ) -> bool {
        let line = format_command(commands::TYPE, Some(transfer_type.code()));
        self.send_over_line(Some(&line), transcript).await
    }

    pub async fn change_directory(&mut self, path: &str, transcript: &mut dyn LineSink) -> bool {
        let line = format_command(commands::CWD, Some(path));
        self.send_over_line(Some(&line), transcript).await
    }

    pub async fn print_working_directory(&mut self, transcript: &mut dyn LineSink) -> bool {
        self.send_over_line(Some(commands::PWD), transcript).await
    }

    /// Returns true when the server accepted the name and a password is expected.
    pub async fn send_user(&mut self, name: &str, transcript: &mut dyn LineSink) -> bool {
        let line = format_command(commands::USER, Some(name));
        self.send_over_line(Some(&line), transcript).await
    }

    pub async fn send_pass(&mut self, pass: &str, transcript: &mut dyn LineSink) -> bool {
        let line = format_command(commands::PASS, Some(pass));
        self.send_over_line(Some(&line), transcript).await
    }

    /// Sends QUIT and releases the connection; never fails.
    pub async fn close(mut self, transcript: &mut dyn LineSink) {
        if !self.send_over_line(Some(commands::QUIT), transcript).await {
            warn!("QUIT was not acknowledged by {}", self.peer_addr);
        }
        if let Err(e) = self.writer.shutdown().await {
            warn!("Error closing control connection to {}: {}", self.peer_addr, e);
        }
        info!("Control connection to {} closed", self.peer_addr);
    }
}

/// Resolves `host` and connects to the first reachable address, IPv4 first.
async fn connect_preferring_ipv4(host: &str, port: u16) -> io::Result<TcpStream> {
    let mut addrs: Vec<SocketAddr> = lookup_host((host, port)).await?.collect();
    addrs.sort_by_key(|addr| !addr.is_ipv4());

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!("Connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, format!("no addresses for {}", host))
    }))
}

/// Writes a transcript line; a failing transcript never breaks the protocol.
pub(crate) async fn echo(transcript: &mut dyn LineSink, line: &str) {
    if let Err(e) = transcript.write_line(line).await {
        warn!("Failed to write transcript line: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::sink::MemorySink;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt as _};
    use tokio::net::TcpListener;

    /// Serves a scripted list of (expected command, reply) pairs after a greeting.
    async fn scripted_server(script: Vec<(&'static str, &'static str)>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut reader = BufReader::new(read_half);
            write_half.write_all(b"220-Welcome\r\n220 Ready\r\n").await.unwrap();
            for (expected, reply) in script {
                let mut line = String::new();
                reader.read_line(&mut line).await.unwrap();
                assert_eq!(line, format!("{}\r\n", expected));
                write_half.write_all(reply.as_bytes()).await.unwrap();
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_greeting_and_commands() {
        let addr = scripted_server(vec![
            ("USER alice", "331 Password required\r\n"),
            ("PASS secret", "230 Logged in\r\n"),
            ("TYPE I", "200 Type set to I\r\n"),
            ("CWD /missing", "550 No such directory\r\n"),
            ("XPWD", "257 \"/\" is current directory\r\n"),
        ])
        .await;

        let mut channel = ControlChannel::connect("127.0.0.1", addr.port()).await.unwrap();
        let transcript = MemorySink::new();
        let mut out = transcript.clone();

        assert!(channel.send_over_line(None, &mut out).await);
        assert!(channel.send_user("alice", &mut out).await);
        assert!(channel.send_pass("secret", &mut out).await);
        assert!(channel.set_encoding(TransferType::Binary, &mut out).await);
        assert!(!channel.change_directory("/missing", &mut out).await);
        assert!(channel.print_working_directory(&mut out).await);

        let lines = transcript.lines();
        assert_eq!(lines[0], "220-Welcome");
        assert_eq!(lines[1], "220 Ready");
        assert!(lines.contains(&"550 No such directory".to_string()));
    }

    #[tokio::test]
    async fn test_debug_echo_masks_password() {
        let addr = scripted_server(vec![("PASS secret", "230 Logged in\r\n")]).await;
        let mut channel = ControlChannel::connect("127.0.0.1", addr.port()).await.unwrap();
        let transcript = MemorySink::new();
        let mut out = transcript.clone();

        channel.send_over_line(None, &mut out).await;
        channel.set_debug(true);
        channel.send_pass("secret", &mut out).await;

        let lines = transcript.lines();
        assert!(lines.contains(&"DEBUG: Sending 'PASS ****'".to_string()));
        assert!(!lines.iter().any(|l| l.contains("secret")));
    }

    #[tokio::test]
    async fn test_closed_stream_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"220-partial greeting\r\n").await.unwrap();
        });

        let mut channel = ControlChannel::connect("127.0.0.1", port).await.unwrap();
        let mut out = MemorySink::new();
        assert!(!channel.send_over_line(None, &mut out).await);
    }

    #[tokio::test]
    async fn test_close_sends_quit() {
        let addr = scripted_server(vec![("QUIT", "221 Goodbye\r\n")]).await;
        let mut channel = ControlChannel::connect("127.0.0.1", addr.port()).await.unwrap();
        let transcript = MemorySink::new();
        let mut out = transcript.clone();

        channel.send_over_line(None, &mut out).await;
        channel.close(&mut out).await;
        assert_eq!(transcript.lines().last().unwrap(), "221 Goodbye");
    }

    #[tokio::test]
    async fn test_connect_by_name_uses_ipv4() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move { listener.accept().await.unwrap() });

        let channel = ControlChannel::connect("localhost", port).await.unwrap();
        let _socket = server.await.unwrap();
        assert!(channel.local_addr().is_ipv4());
        assert_eq!(channel.peer_addr().port(), port);
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = ControlChannel::connect("127.0.0.1", port).await.err().unwrap();
        assert!(matches!(err, ConnectError::Control(_, _)));
    }
}

//! Data channel negotiation
//!
//! Establishes the data connection for one LIST/RETR according to the
//! current transfer mode. PASV and PORT are exchanged on the control
//! connection directly, since their replies are checked for one exact code
//! rather than classified as success/failure.
//!
//! Ordering matters. In passive mode the returned channel is already
//! connected, so the caller may send the transfer command right away. In
//! active mode PORT has been acknowledged but the server has not connected
//! yet: the caller must send the transfer command first and only then call
//! [`DataChannel::into_session`], which accepts the inbound connection.

use log::{error, info};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::net::{TcpListener, TcpStream};

use crate::control::ControlChannel;
use crate::error::{ConnectError, FtpClientError, ProtocolError, TransferError};
use crate::protocol::commands::{self, format_command};
use crate::protocol::responses;
use crate::protocol::{decode_passive, encode_port, extract_passive_params};
use crate::transfer::data_transfer::DataSession;
use crate::transfer::modes::TransferMode;
use crate::transfer::sink::LineSink;
use crate::utils::network::select_local_ipv4;

/// A negotiated, not yet consumed data channel.
#[derive(Debug)]
pub enum DataChannel {
    /// Connected to the endpoint the server offered in its 227 reply.
    Passive(TcpStream),
    /// Listening on the endpoint advertised with PORT.
    Active(TcpListener),
}

impl DataChannel {
    pub fn mode(&self) -> TransferMode {
        match self {
            DataChannel::Passive(_) => TransferMode::Passive,
            DataChannel::Active(_) => TransferMode::Active,
        }
    }

    /// Turns the channel into a live data session.
    ///
    /// For active mode this blocks in `accept` until the server connects, so
    /// it must only be called after the transfer command was sent.
    pub async fn into_session(self) -> Result<DataSession, TransferError> {
        match self {
            DataChannel::Passive(stream) => Ok(DataSession::new(stream, TransferMode::Passive)),
            DataChannel::Active(listener) => {
                let (stream, peer) = listener.accept().await.map_err(TransferError::AcceptFailed)?;
                info!("Data connection accepted from {}", peer);
                Ok(DataSession::new(stream, TransferMode::Active))
            }
        }
    }
}

/// Negotiates a data channel over a borrowed control connection.
pub struct DataChannelNegotiator<'a> {
    mode: TransferMode,
    control: &'a mut ControlChannel,
    transcript: &'a mut dyn LineSink,
    active_address: Option<Ipv4Addr>,
}

impl<'a> DataChannelNegotiator<'a> {
    pub fn new(
        mode: TransferMode,
        control: &'a mut ControlChannel,
        transcript: &'a mut dyn LineSink,
    ) -> Self {
        Self {
            mode,
            control,
            transcript,
            active_address: None,
        }
    }

    /// Address to advertise in PORT instead of the control connection's local address.
    pub fn with_active_address(mut self, address: Option<Ipv4Addr>) -> Self {
        self.active_address = address;
        self
    }

    pub async fn negotiate(self) -> Result<DataChannel, FtpClientError> {
        let mode = self.mode;
        let result = match mode {
            TransferMode::Passive => self.negotiate_passive().await,
            TransferMode::Active => self.negotiate_active().await,
        };
        if let Err(e) = &result {
            error!("{} mode data channel negotiation failed: {}", mode, e);
        }
        result
    }

    async fn negotiate_passive(self) -> Result<DataChannel, FtpClientError> {
        let response = self.control.exchange(Some(commands::PASV), self.transcript).await?;
        if response.code() != responses::PASSIVE_MODE {
            return Err(ProtocolError::UnexpectedReply {
                command: commands::PASV,
                expected: responses::PASSIVE_MODE,
                received: response.code(),
            }
            .into());
        }

        let endpoint = decode_passive(extract_passive_params(response.terminal_line())?)?;
        info!("Server offered passive endpoint {}", endpoint);

        let target = SocketAddr::V4(endpoint);
        let stream = TcpStream::connect(target)
            .await
            .map_err(|e| ConnectError::Data(target, e))?;
        Ok(DataChannel::Passive(stream))
    }

    async fn negotiate_active(self) -> Result<DataChannel, FtpClientError> {
        let local_ip = select_local_ipv4(
            self.control.local_addr(),
            self.control.peer_addr(),
            self.active_address,
        )?;

        let listener = TcpListener::bind(SocketAddrV4::new(local_ip, 0))
            .await
            .map_err(TransferError::ListenerFailed)?;
        let port = listener
            .local_addr()
            .map_err(TransferError::ListenerFailed)?
            .port();
        info!("Listening for active data connection on {}:{}", local_ip, port);

        let line = format_command(commands::PORT, Some(&encode_port(local_ip, port)));
        let response = self.control.exchange(Some(&line), self.transcript).await?;
        if response.code() != responses::OK {
            return Err(ProtocolError::UnexpectedReply {
                command: commands::PORT,
                expected: responses::OK,
                received: response.code(),
            }
            .into());
        }

        Ok(DataChannel::Active(listener))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::sink::MemorySink;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    /// Control server: greets, then answers one command with `reply`,
    /// handing the received line back through the join handle.
    async fn one_shot_server(reply: String) -> (u16, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = socket.into_split();
            let mut reader = BufReader::new(read_half);
            write_half.write_all(b"220 Ready\r\n").await.unwrap();
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            write_half.write_all(reply.as_bytes()).await.unwrap();
            line
        });
        (port, handle)
    }

    async fn connected(port: u16) -> ControlChannel {
        let mut channel = ControlChannel::connect("127.0.0.1", port).await.unwrap();
        assert!(channel.send_over_line(None, &mut MemorySink::new()).await);
        channel
    }

    #[tokio::test]
    async fn test_passive_connects_to_offered_endpoint() {
        let data_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let data_port = data_listener.local_addr().unwrap().port();
        let reply = format!(
            "227 Entering Passive Mode (127,0,0,1,{},{})\r\n",
            data_port / 256,
            data_port % 256
        );
        let (port, server) = one_shot_server(reply).await;

        let mut channel = connected(port).await;
        let mut transcript = MemorySink::new();
        let data = DataChannelNegotiator::new(TransferMode::Passive, &mut channel, &mut transcript)
            .negotiate()
            .await
            .unwrap();

        assert_eq!(data.mode(), TransferMode::Passive);
        assert_eq!(server.await.unwrap(), "PASV\r\n");
        let (_, peer) = data_listener.accept().await.unwrap();
        assert_eq!(peer.ip(), std::net::IpAddr::from(Ipv4Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_passive_rejects_non_227() {
        let (port, _server) = one_shot_server("502 PASV not implemented\r\n".into()).await;
        let mut channel = connected(port).await;
        let mut transcript = MemorySink::new();

        let err = DataChannelNegotiator::new(TransferMode::Passive, &mut channel, &mut transcript)
            .negotiate()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FtpClientError::Protocol(ProtocolError::UnexpectedReply { received: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_passive_malformed_parameters() {
        let (port, _server) = one_shot_server("227 Entering Passive Mode (127,0,0,1)\r\n".into()).await;
        let mut channel = connected(port).await;
        let mut transcript = MemorySink::new();

        let err = DataChannelNegotiator::new(TransferMode::Passive, &mut channel, &mut transcript)
            .negotiate()
            .await
            .unwrap_err();
        assert!(matches!(err, FtpClientError::MalformedAddress(_)));
    }

    #[tokio::test]
    async fn test_active_sends_port_for_listener() {
        let (port, server) = one_shot_server("200 PORT command successful\r\n".into()).await;
        let mut channel = connected(port).await;
        let mut transcript = MemorySink::new();

        let data = DataChannelNegotiator::new(TransferMode::Active, &mut channel, &mut transcript)
            .negotiate()
            .await
            .unwrap();
        let listen_port = match &data {
            DataChannel::Active(listener) => listener.local_addr().unwrap().port(),
            DataChannel::Passive(_) => panic!("expected active channel"),
        };

        let sent = server.await.unwrap();
        assert_eq!(
            sent,
            format!("PORT {}\r\n", encode_port(Ipv4Addr::LOCALHOST, listen_port))
        );

        let connector = tokio::spawn(async move {
            TcpStream::connect(("127.0.0.1", listen_port)).await.unwrap()
        });
        let session = data.into_session().await.unwrap();
        assert_eq!(session.mode(), TransferMode::Active);
        connector.await.unwrap();
    }

    #[tokio::test]
    async fn test_active_port_rejected() {
        let (port, _server) = one_shot_server("500 Illegal PORT command\r\n".into()).await;
        let mut channel = connected(port).await;
        let mut transcript = MemorySink::new();

        let err = DataChannelNegotiator::new(TransferMode::Active, &mut channel, &mut transcript)
            .negotiate()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FtpClientError::Protocol(ProtocolError::UnexpectedReply { command: "PORT", .. })
        ));
    }
}

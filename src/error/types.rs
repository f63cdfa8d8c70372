//! Error types
//!
//! Defines domain-specific error types for each part of the FTP client.

use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};

/// Control or data socket could not be established
#[derive(Debug)]
pub enum ConnectError {
    Control(String, io::Error),
    Data(SocketAddr, io::Error),
    NotConnected,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectError::Control(target, e) => {
                write!(f, "Failed to connect to {}: {}", target, e)
            }
            ConnectError::Data(addr, e) => {
                write!(f, "Failed to open data connection to {}: {}", addr, e)
            }
            ConnectError::NotConnected => write!(f, "Not connected"),
        }
    }
}

impl std::error::Error for ConnectError {}

/// Control channel protocol errors
#[derive(Debug)]
pub enum ProtocolError {
    /// The control stream closed before a terminal status line arrived.
    StreamClosed,
    InvalidStatusLine(String),
    UnexpectedReply {
        command: &'static str,
        expected: u16,
        received: u16,
    },
    Io(io::Error),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::StreamClosed => {
                write!(f, "Control connection closed before a complete response")
            }
            ProtocolError::InvalidStatusLine(line) => {
                write!(f, "Invalid status line: {}", line)
            }
            ProtocolError::UnexpectedReply {
                command,
                expected,
                received,
            } => write!(
                f,
                "Unexpected reply to {}: expected {}, got {}",
                command, expected, received
            ),
            ProtocolError::Io(e) => write!(f, "Control connection I/O error: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<io::Error> for ProtocolError {
    fn from(error: io::Error) -> Self {
        ProtocolError::Io(error)
    }
}

/// PASV/PORT parameter parsing errors
#[derive(Debug, PartialEq)]
pub enum MalformedAddressError {
    MissingParameters(String),
    WrongFieldCount(usize),
    InvalidField(String),
}

impl fmt::Display for MalformedAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedAddressError::MissingParameters(line) => {
                write!(f, "No address parameters in reply: {}", line)
            }
            MalformedAddressError::WrongFieldCount(n) => {
                write!(f, "Expected 6 address fields, found {}", n)
            }
            MalformedAddressError::InvalidField(s) => {
                write!(f, "Address field out of range or not a number: {}", s)
            }
        }
    }
}

impl std::error::Error for MalformedAddressError {}

/// Active mode could not find a usable local IPv4 address
#[derive(Debug, PartialEq)]
pub enum NoLocalAddressError {
    NotIpv4(SocketAddr),
    LoopbackOnly(Ipv4Addr),
    InvalidOverride(String),
}

impl fmt::Display for NoLocalAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoLocalAddressError::NotIpv4(addr) => {
                write!(f, "Local address {} is not IPv4", addr)
            }
            NoLocalAddressError::LoopbackOnly(ip) => {
                write!(f, "Only loopback address {} is available for a remote server", ip)
            }
            NoLocalAddressError::InvalidOverride(s) => {
                write!(f, "Configured active address is not IPv4: {}", s)
            }
        }
    }
}

impl std::error::Error for NoLocalAddressError {}

/// Data channel errors
#[derive(Debug)]
pub enum TransferError {
    ListenerFailed(io::Error),
    AcceptFailed(io::Error),
    ReadFailed(io::Error),
    SinkFailed(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::ListenerFailed(e) => {
                write!(f, "Failed to open data listener: {}", e)
            }
            TransferError::AcceptFailed(e) => {
                write!(f, "Failed to accept data connection: {}", e)
            }
            TransferError::ReadFailed(e) => write!(f, "Data read failed: {}", e),
            TransferError::SinkFailed(e) => write!(f, "Failed to write transferred data: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

/// General FTP client error that encompasses all error types
#[derive(Debug)]
pub enum FtpClientError {
    Connect(ConnectError),
    Protocol(ProtocolError),
    MalformedAddress(MalformedAddressError),
    NoLocalAddress(NoLocalAddressError),
    Transfer(TransferError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for FtpClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtpClientError::Connect(e) => write!(f, "Connect error: {}", e),
            FtpClientError::Protocol(e) => write!(f, "Protocol error: {}", e),
            FtpClientError::MalformedAddress(e) => write!(f, "Malformed address: {}", e),
            FtpClientError::NoLocalAddress(e) => write!(f, "No local address: {}", e),
            FtpClientError::Transfer(e) => write!(f, "Transfer error: {}", e),
            FtpClientError::Config(e) => write!(f, "Configuration error: {}", e),
            FtpClientError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FtpClientError {}

impl From<ConnectError> for FtpClientError {
    fn from(error: ConnectError) -> Self {
        FtpClientError::Connect(error)
    }
}

impl From<ProtocolError> for FtpClientError {
    fn from(error: ProtocolError) -> Self {
        FtpClientError::Protocol(error)
    }
}

impl From<MalformedAddressError> for FtpClientError {
    fn from(error: MalformedAddressError) -> Self {
        FtpClientError::MalformedAddress(error)
    }
}

impl From<NoLocalAddressError> for FtpClientError {
    fn from(error: NoLocalAddressError) -> Self {
        FtpClientError::NoLocalAddress(error)
    }
}

impl From<TransferError> for FtpClientError {
    fn from(error: TransferError) -> Self {
        FtpClientError::Transfer(error)
    }
}

impl From<config::ConfigError> for FtpClientError {
    fn from(error: config::ConfigError) -> Self {
        FtpClientError::Config(error)
    }
}

impl From<io::Error> for FtpClientError {
    fn from(error: io::Error) -> Self {
        FtpClientError::IoError(error)
    }
}

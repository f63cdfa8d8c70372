pub mod client;
pub mod config;
pub mod control;
pub mod error;
pub mod protocol;
pub mod shell;
pub mod transfer;
pub mod utils;

pub use client::FtpClient;
pub use config::ClientConfig;
pub use control::ControlChannel;
pub use error::FtpClientError;
pub use shell::Shell;
pub use transfer::{ConsoleSink, FileSink, LineSink, MemorySink, TransferMode};

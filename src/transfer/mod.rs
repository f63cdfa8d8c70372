//! Transfer module for the FTP client
//!
//! Handles data channel negotiation (PASV/PORT), line-oriented payload
//! streaming, and the sequencing of data commands.

pub mod data_transfer;
pub mod modes;
pub mod negotiator;
pub mod orchestrator;
pub mod sink;

// Re-export key types and functions
pub use data_transfer::{DataSession, read_data};
pub use modes::TransferMode;
pub use negotiator::{DataChannel, DataChannelNegotiator};
pub use orchestrator::{TransferOutcome, run_data_command};
pub use sink::{ConsoleSink, FileSink, LineSink, MemorySink};

//! FTP Protocol implementation
//!
//! Command formatting, response framing, reply codes and the PORT/PASV
//! address encoding.

pub mod address;
pub mod commands;
pub mod parser;
pub mod responses;

pub use address::{decode_passive, encode_port, extract_passive_params};
pub use parser::{Response, read_response};

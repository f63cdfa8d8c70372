//! Control connection
//!
//! The persistent command/response channel to the server.

pub mod channel;

pub use channel::ControlChannel;

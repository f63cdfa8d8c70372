//! Transfer orchestration
//!
//! Runs one data command (LIST or RETR) around the control connection:
//! negotiate the data channel, send the command, move the payload, then
//! read the server's completion reply.

use log::{info, warn};
use std::net::Ipv4Addr;

use crate::control::ControlChannel;
use crate::error::FtpClientError;
use crate::transfer::modes::TransferMode;
use crate::transfer::negotiator::DataChannelNegotiator;
use crate::transfer::sink::LineSink;

/// Outcome of a data command that got past negotiation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    /// The server accepted the transfer command itself.
    pub accepted: bool,
    /// Lines moved into the sink.
    pub lines: usize,
    /// The trailing completion reply classified as success.
    pub completed: bool,
}

/// Runs `command` with a data connection in `mode`, writing payload to `sink`.
///
/// A negotiation failure aborts before `command` is sent. A rejected command
/// drops the data channel without reading from it. A failed accept or copy
/// still reads the completion reply before the error is returned. In every
/// case the control connection stays usable.
pub async fn run_data_command(
    control: &mut ControlChannel,
    transcript: &mut dyn LineSink,
    mode: TransferMode,
    active_address: Option<Ipv4Addr>,
    command: &str,
    sink: &mut dyn LineSink,
) -> Result<TransferOutcome, FtpClientError> {
    let data_channel = DataChannelNegotiator::new(mode, control, transcript)
        .with_active_address(active_address)
        .negotiate()
        .await?;

    if !control.send_over_line(Some(command), transcript).await {
        warn!("Server rejected '{}', dropping {} data channel", command, mode);
        return Ok(TransferOutcome {
            accepted: false,
            lines: 0,
            completed: false,
        });
    }

    // Active mode accepts here, after the command went out.
    let transferred = match data_channel.into_session().await {
        Ok(session) => session.read_into(sink).await,
        Err(e) => Err(e),
    };

    // An accepted command is always answered, even after a local failure.
    let completed = control.send_over_line(None, transcript).await;
    let lines = match transferred {
        Ok(lines) => lines,
        Err(e) => {
            warn!("'{}' aborted: {}, completed={}", command, e, completed);
            return Err(e.into());
        }
    };
    info!("'{}' finished: {} lines, completed={}", command, lines, completed);

    Ok(TransferOutcome {
        accepted: true,
        lines,
        completed,
    })
}

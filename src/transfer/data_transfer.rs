//! Module `data_transfer`
//!
//! Streams a data connection into a line sink until the server closes it.
//! Payload is always read as lines, also for TYPE I, so binary files with
//! bare CR/LF bytes are not copied byte-exact.

use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::TransferError;
use crate::transfer::modes::TransferMode;
use crate::transfer::sink::LineSink;

/// A live data connection for exactly one LIST/RETR.
#[derive(Debug)]
pub struct DataSession {
    stream: TcpStream,
    mode: TransferMode,
}

impl DataSession {
    pub fn new(stream: TcpStream, mode: TransferMode) -> Self {
        Self { stream, mode }
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    /// Consumes the session, moving all payload into `sink`.
    pub async fn read_into(self, sink: &mut dyn LineSink) -> Result<usize, TransferError> {
        debug!("Reading {} mode data connection", self.mode);
        read_data(self.stream, sink).await
    }
}

/// Reads lines until end-of-stream, then closes the connection.
///
/// The connection is shut down whether or not the copy succeeded.
pub async fn read_data(stream: TcpStream, sink: &mut dyn LineSink) -> Result<usize, TransferError> {
    let peer = stream.peer_addr().ok();
    let mut reader = BufReader::new(stream);

    let result = copy_lines(&mut reader, sink).await;

    let mut stream = reader.into_inner();
    if let Err(e) = stream.shutdown().await {
        debug!("Data connection shutdown: {}", e);
    }

    match &result {
        Ok(count) => info!("Received {} lines from {:?}", count, peer),
        Err(e) => warn!("Data transfer from {:?} aborted: {}", peer, e),
    }
    result
}

/// Copies every line of `reader` into `sink`, terminators stripped.
pub async fn copy_lines<R>(reader: &mut R, sink: &mut dyn LineSink) -> Result<usize, TransferError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(512);
    let mut count = 0;

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(TransferError::ReadFailed)?;
        if n == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        sink.write_line(line.trim_end_matches(['\r', '\n']))
            .await
            .map_err(TransferError::SinkFailed)?;
        count += 1;
    }

    sink.finish().await.map_err(TransferError::SinkFailed)?;
    Ok(count)
}

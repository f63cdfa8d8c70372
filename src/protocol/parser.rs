//! FTP response framing
//!
//! Assembles raw control-connection lines into one logical response.
//! A response ends at the first line that starts with three digits followed
//! by a space; anything before it (for example `150-...` continuation lines)
//! belongs to the response body.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::ProtocolError;
use crate::protocol::responses;

/// One complete server response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    lines: Vec<String>,
    code: u16,
}

impl Response {
    /// Status code of the terminal line.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// All lines of the response, line terminators stripped.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The terminal line (the one carrying the status code).
    pub fn terminal_line(&self) -> &str {
        self.lines.last().map(String::as_str).unwrap_or("")
    }

    pub fn is_success(&self) -> bool {
        responses::is_success(self.code)
    }
}

/// Returns true if the line ends a (possibly multi-line) response.
pub fn is_terminal_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 4 && bytes[..3].iter().all(u8::is_ascii_digit) && bytes[3] == b' '
}

/// Reads lines until a terminal line is seen and returns the assembled response.
pub async fn read_response<R>(reader: &mut R) -> Result<Response, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = Vec::new();
    let mut buf = Vec::with_capacity(128);

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Err(ProtocolError::StreamClosed);
        }

        let line = String::from_utf8_lossy(&buf)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        let terminal = is_terminal_line(&line);
        lines.push(line);

        if terminal {
            break;
        }
    }

    let last = lines.last().map(String::as_str).unwrap_or("");
    let code = last
        .get(..3)
        .and_then(|c| c.parse::<u16>().ok())
        .ok_or_else(|| ProtocolError::InvalidStatusLine(last.to_string()))?;

    Ok(Response { lines, code })
}

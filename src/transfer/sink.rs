//! Line sinks
//!
//! Destinations for line-oriented output: the console, a local file, or an
//! in-memory buffer. The same trait receives data-connection payload and the
//! control-connection transcript.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

#[async_trait]
pub trait LineSink: Send {
    async fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Called once after the last line of a transfer.
    async fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Prints every line to standard output.
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl LineSink for ConsoleSink {
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        println!("{}", line);
        Ok(())
    }
}

/// Writes lines to a local file.
///
/// The file is created (or truncated) when the first line arrives or the
/// transfer finishes, so a command the server rejects leaves no file behind.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            let file = File::create(&self.path).await?;
            self.writer = Some(BufWriter::new(file));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::other("file sink not open"))
    }
}

#[async_trait]
impl LineSink for FileSink {
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        let writer = self.writer().await?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await
    }

    async fn finish(&mut self) -> io::Result<()> {
        self.writer().await?.flush().await
    }
}

/// Collects lines in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LineSink for MemorySink {
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::other("memory sink poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}

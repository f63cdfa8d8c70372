//! Interactive shell
//!
//! Reads user commands line by line and drives an [`FtpClient`]. Input and
//! prompt output are generic so the loop runs the same against a terminal
//! or a scripted buffer.

pub mod handlers;
pub mod parser;

use log::{debug, info};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::client::FtpClient;
use crate::transfer::LineSink;

pub use handlers::handle_command;
pub use parser::{CommandResult, UserCommand, parse_command};

pub struct Shell<R, W> {
    client: FtpClient,
    input: R,
    output: W,
    listing: Box<dyn LineSink>,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// `listing` receives the payload of `dir`.
    pub fn new(client: FtpClient, input: R, output: W, listing: Box<dyn LineSink>) -> Self {
        Self {
            client,
            input,
            output,
            listing,
        }
    }

    pub fn client(&self) -> &FtpClient {
        &self.client
    }

    pub fn into_client(self) -> FtpClient {
        self.client
    }

    /// Writes `text` and reads one line of input.
    ///
    /// Returns `None` once input is exhausted.
    pub async fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// USER then, if the server asks for it, PASS.
    ///
    /// `name` skips the username prompt.
    pub async fn sign_in(&mut self, name: Option<String>) -> io::Result<()> {
        let name = match name {
            Some(name) => name,
            None => match self.prompt("Username: ").await? {
                Some(name) => name,
                None => return Ok(()),
            },
        };

        if self.client.send_user(name.trim()).await {
            if let Some(password) = self.prompt("Password: ").await? {
                self.client.send_pass(&password).await;
            }
        }
        Ok(())
    }

    /// Connects, signs in, then serves commands until `quit` or end of input.
    pub async fn run(&mut self) -> io::Result<()> {
        if self.client.open().await {
            self.sign_in(None).await?;
        }

        let prompt = self.client.config().prompt.clone();
        loop {
            let Some(line) = self.prompt(&prompt).await? else {
                info!("End of input, closing session");
                self.client.close().await;
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = parse_command(&line);
            debug!("Parsed command: {:?}", command);
            if handle_command(self, command).await? == CommandResult::Quit {
                return Ok(());
            }
        }
    }
}

use log::info;
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::error::{ConnectError, FtpClientError};
use crate::error::handlers::{error_to_user_message, handle_error};
use crate::protocol::commands::TransferType;
use crate::shell::Shell;
use crate::shell::parser::{CommandResult, UserCommand};
use crate::transfer::TransferOutcome;

pub const HELP_MESSAGE: &[&str] = &[
    "FTP Client Commands:",
    "ascii      --> Set ASCII transfer type",
    "binary     --> Set binary transfer type",
    "cd <path>  --> Change the remote working directory",
    "cdup       --> Change the remote working directory to the parent directory (i.e., cd ..)",
    "debug      --> Toggle debug mode",
    "dir        --> List the contents of the remote directory",
    "get <path> --> Get a remote file",
    "help       --> Displays this text",
    "passive    --> Toggle passive/active mode",
    "pwd        --> Print the working directory on the server",
    "quit       --> Close the connection to the server and terminate",
    "user <name>--> Specify the user name (will prompt for password)",
];

// Handle a single user command against the shell's client
pub async fn handle_command<R, W>(
    shell: &mut Shell<R, W>,
    command: UserCommand,
) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match command {
        UserCommand::Ascii => handle_cmd_type(shell, TransferType::Ascii).await,
        UserCommand::Binary => handle_cmd_type(shell, TransferType::Binary).await,
        UserCommand::Cd(path) => handle_cmd_cd(shell, path).await,
        UserCommand::Cdup => handle_cmd_cdup(shell).await,
        UserCommand::Debug => handle_cmd_debug(shell).await,
        UserCommand::Dir => handle_cmd_dir(shell).await,
        UserCommand::Get(path) => handle_cmd_get(shell, path).await,
        UserCommand::Help => handle_cmd_help(shell).await,
        UserCommand::Passive => handle_cmd_passive(shell).await,
        UserCommand::Pwd => handle_cmd_pwd(shell).await,
        UserCommand::Quit => handle_cmd_quit(shell).await,
        UserCommand::User(name) => handle_cmd_user(shell, name).await,
        UserCommand::Unknown(cmd) => handle_cmd_unknown(shell, &cmd).await,
    }
}

// Command handler for ascii and binary
async fn handle_cmd_type<R, W>(
    shell: &mut Shell<R, W>,
    transfer_type: TransferType,
) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    shell.client.set_encoding(transfer_type).await;
    Ok(CommandResult::Continue)
}

// Command handler for cd, prompting when no path was given
async fn handle_cmd_cd<R, W>(
    shell: &mut Shell<R, W>,
    path: Option<String>,
) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(path) = argument_or_prompt(shell, path, "Remote Directory: ").await? else {
        return Ok(CommandResult::Continue);
    };
    shell.client.change_directory(&path).await;
    Ok(CommandResult::Continue)
}

async fn handle_cmd_cdup<R, W>(shell: &mut Shell<R, W>) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    shell.client.change_directory_up().await;
    Ok(CommandResult::Continue)
}

async fn handle_cmd_debug<R, W>(shell: &mut Shell<R, W>) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let on = shell.client.toggle_debug();
    let state = if on { "ON" } else { "OFF" };
    shell.client.report(&format!("Debugging is {}", state)).await;
    Ok(CommandResult::Continue)
}

// Command handler for dir
async fn handle_cmd_dir<R, W>(shell: &mut Shell<R, W>) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let result = shell.client.list(shell.listing.as_mut()).await;
    report_transfer(shell, "dir", result).await;
    Ok(CommandResult::Continue)
}

// Command handler for get, writing into the current local directory
async fn handle_cmd_get<R, W>(
    shell: &mut Shell<R, W>,
    path: Option<String>,
) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(remote) = argument_or_prompt(shell, path, "Remote file: ").await? else {
        return Ok(CommandResult::Continue);
    };
    let local = local_file_name(&remote);
    let result = shell.client.get_file(&remote, &local).await;
    report_transfer(shell, "get", result).await;
    Ok(CommandResult::Continue)
}

async fn handle_cmd_help<R, W>(shell: &mut Shell<R, W>) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    print_help(shell).await;
    Ok(CommandResult::Continue)
}

async fn handle_cmd_passive<R, W>(shell: &mut Shell<R, W>) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    shell.client.toggle_mode().await;
    Ok(CommandResult::Continue)
}

async fn handle_cmd_pwd<R, W>(shell: &mut Shell<R, W>) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    shell.client.print_working_directory().await;
    Ok(CommandResult::Continue)
}

// Command handler for quit
async fn handle_cmd_quit<R, W>(shell: &mut Shell<R, W>) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    shell.client.close().await;
    info!("Session closed by user");
    Ok(CommandResult::Quit)
}

async fn handle_cmd_user<R, W>(
    shell: &mut Shell<R, W>,
    name: Option<String>,
) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    shell.sign_in(name).await?;
    Ok(CommandResult::Continue)
}

async fn handle_cmd_unknown<R, W>(shell: &mut Shell<R, W>, cmd: &str) -> io::Result<CommandResult>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Unknown command: {}", cmd);
    shell.client.report("ERROR: Unknown Command").await;
    print_help(shell).await;
    Ok(CommandResult::Continue)
}

async fn print_help<R, W>(shell: &mut Shell<R, W>)
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for line in HELP_MESSAGE {
        shell.client.report(line).await;
    }
}

/// The command argument, or one read from the user when it was omitted.
async fn argument_or_prompt<R, W>(
    shell: &mut Shell<R, W>,
    argument: Option<String>,
    prompt: &str,
) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if let Some(argument) = argument {
        return Ok(Some(argument));
    }
    let answer = shell.prompt(prompt).await?;
    Ok(answer
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty()))
}

async fn report_transfer<R, W>(
    shell: &mut Shell<R, W>,
    name: &str,
    result: Result<TransferOutcome, FtpClientError>,
) where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match result {
        Ok(outcome) => info!("{} finished: {:?}", name, outcome),
        // The client already said "Not connected."
        Err(FtpClientError::Connect(ConnectError::NotConnected)) => {}
        Err(e) => {
            handle_error(&e);
            shell.client.report(&error_to_user_message(&e)).await;
        }
    }
}

/// Local file for a download: the last component of the remote path.
pub fn local_file_name(remote: &str) -> PathBuf {
    let name = remote
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(remote);
    PathBuf::from(name)
}

//! RAX FTP Client - Entry Point
//!
//! Interactive command-line FTP client for a single server.

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use tokio::io::BufReader;

use rax_ftp_client::utils::logging::setup_logging;
use rax_ftp_client::{ClientConfig, ConsoleSink, FtpClient, Shell, TransferMode};

#[derive(Parser, Debug)]
#[command(name = "rax-ftp-client", about = "Interactive FTP client")]
struct Args {
    /// Server host name or IPv4 address
    host: String,

    /// Control connection port
    #[arg(long)]
    port: Option<u16>,

    /// Start in passive mode
    #[arg(long)]
    passive: bool,

    /// Echo commands sent to the server
    #[arg(long)]
    debug: bool,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    setup_logging();
    let args = Args::parse();

    let mut config = match ClientConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(port) = args.port {
        config.control_port = port;
    }
    if args.passive {
        config.default_mode = TransferMode::Passive;
    }
    config.debug |= args.debug;
    if let Err(e) = config.validate() {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }

    info!("Starting FTP client for {}:{}", args.host, config.control_port);
    let client = FtpClient::new(args.host, config, Box::new(ConsoleSink));
    let mut shell = Shell::new(
        client,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        Box::new(ConsoleSink),
    );

    if let Err(e) = shell.run().await {
        error!("Shell terminated: {}", e);
        std::process::exit(1);
    }
}

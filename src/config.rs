//! Configuration management for the RAX FTP client
//!
//! Layers built-in defaults, an optional TOML file and `RAX_FTP_CLIENT_*`
//! environment variables. Command-line flags are applied on top by the
//! binary.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::Path;

use crate::transfer::TransferMode;
use crate::utils::network::parse_ipv4;

/// Default config file name, looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "ftp-client";

/// Well-known FTP control port
pub const FTP_CONTROL_PORT: u16 = 21;

/// Client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Port of the server's control connection
    /// Environment: RAX_FTP_CLIENT_CONTROL_PORT
    pub control_port: u16,

    /// Data connection mode used until the user toggles it
    pub default_mode: TransferMode,

    /// Start with diagnostic echo enabled
    pub debug: bool,

    /// IPv4 address advertised in PORT commands instead of the
    /// control connection's local address
    pub active_address: Option<String>,

    /// Interactive prompt
    pub prompt: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            control_port: FTP_CONTROL_PORT,
            default_mode: TransferMode::Active,
            debug: false,
            active_address: None,
            prompt: "FTP> ".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration, reading `path` if given or `ftp-client.toml` if present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("control_port", i64::from(defaults.control_port))?
            .set_default("default_mode", "active")?
            .set_default("debug", defaults.debug)?
            .set_default("prompt", defaults.prompt)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix("RAX_FTP_CLIENT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.control_port == 0 {
            return Err(config::ConfigError::Message(
                "Control port cannot be 0".into(),
            ));
        }

        if let Some(addr) = &self.active_address {
            parse_ipv4(addr).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        }

        Ok(())
    }

    /// Parsed active-mode address override
    pub fn active_ipv4(&self) -> Option<Ipv4Addr> {
        self.active_address
            .as_deref()
            .and_then(|addr| parse_ipv4(addr).ok())
    }
}

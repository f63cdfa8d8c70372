//! Module `commands`
//!
//! FTP command verbs sent on the control connection and the helper that
//! formats a command line.

pub const USER: &str = "USER";
pub const PASS: &str = "PASS";
pub const TYPE: &str = "TYPE";
pub const CWD: &str = "CWD";
pub const PWD: &str = "XPWD";
pub const LIST: &str = "LIST";
pub const RETR: &str = "RETR";
pub const PASV: &str = "PASV";
pub const PORT: &str = "PORT";
pub const QUIT: &str = "QUIT";

/// Representation type negotiated with `TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferType {
    #[default]
    Ascii,
    Binary,
}

impl TransferType {
    /// Argument of the `TYPE` command.
    pub fn code(self) -> &'static str {
        match self {
            TransferType::Ascii => "A",
            TransferType::Binary => "I",
        }
    }
}

/// Formats a command line without the line terminator.
pub fn format_command(verb: &str, arg: Option<&str>) -> String {
    match arg {
        Some(arg) => format!("{} {}", verb, arg),
        None => verb.to_string(),
    }
}

/// Text safe to echo in diagnostics; the password argument is masked.
pub fn redact_command(line: &str) -> String {
    let mut parts = line.splitn(2, ' ');
    let verb = parts.next().unwrap_or("");
    if verb.eq_ignore_ascii_case(PASS) && parts.next().is_some() {
        format!("{} ****", verb)
    } else {
        line.to_string()
    }
}

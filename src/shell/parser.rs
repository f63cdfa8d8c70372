// User command enum for the interactive shell
#[derive(Debug, PartialEq)]
pub enum UserCommand {
    Ascii,
    Binary,
    Cd(Option<String>),
    Cdup,
    Debug,
    Dir,
    Get(Option<String>),
    Help,
    Passive,
    Pwd,
    Quit,
    User(Option<String>),
    Unknown(String),
}

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Quit,
    Continue,
}

// Parse a raw input line into a UserCommand
pub fn parse_command(raw: &str) -> UserCommand {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_lowercase();
    let arg = parts
        .next()
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string);

    match cmd.as_str() {
        "ascii" => UserCommand::Ascii,
        "binary" => UserCommand::Binary,
        "cd" => UserCommand::Cd(arg),
        "cdup" => UserCommand::Cdup,
        "debug" => UserCommand::Debug,
        "dir" => UserCommand::Dir,
        "get" => UserCommand::Get(arg),
        "help" => UserCommand::Help,
        "passive" => UserCommand::Passive,
        "pwd" => UserCommand::Pwd,
        "quit" => UserCommand::Quit,
        "user" => UserCommand::User(arg),
        _ => UserCommand::Unknown(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_command("ascii"), UserCommand::Ascii);
        assert_eq!(parse_command("binary"), UserCommand::Binary);
        assert_eq!(parse_command("cdup"), UserCommand::Cdup);
        assert_eq!(parse_command("debug"), UserCommand::Debug);
        assert_eq!(parse_command("dir"), UserCommand::Dir);
        assert_eq!(parse_command("help"), UserCommand::Help);
        assert_eq!(parse_command("passive"), UserCommand::Passive);
        assert_eq!(parse_command("pwd"), UserCommand::Pwd);
        assert_eq!(parse_command("quit"), UserCommand::Quit);
    }

    #[test]
    fn test_parse_commands_with_args() {
        assert_eq!(
            parse_command("cd /pub/docs"),
            UserCommand::Cd(Some("/pub/docs".to_string()))
        );
        assert_eq!(
            parse_command("get readme.txt"),
            UserCommand::Get(Some("readme.txt".to_string()))
        );
        assert_eq!(
            parse_command("user anonymous"),
            UserCommand::User(Some("anonymous".to_string()))
        );
    }

    #[test]
    fn test_missing_args_are_none() {
        assert_eq!(parse_command("cd"), UserCommand::Cd(None));
        assert_eq!(parse_command("get   "), UserCommand::Get(None));
        assert_eq!(parse_command("user"), UserCommand::User(None));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_command("  QUIT  "), UserCommand::Quit);
        assert_eq!(parse_command("Dir"), UserCommand::Dir);
        assert_eq!(
            parse_command("GET  File.TXT  "),
            UserCommand::Get(Some("File.TXT".to_string()))
        );
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(
            parse_command("ls -la"),
            UserCommand::Unknown("ls -la".to_string())
        );
        assert_eq!(
            parse_command("RETR file"),
            UserCommand::Unknown("RETR file".to_string())
        );
        assert_eq!(parse_command(""), UserCommand::Unknown("".to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// Prompt after `/generate`, trimmed. May be empty.
    Generate(String),
    Unknown,
}

/// Parses a chat message. Accepts the `/cmd@botname` form Telegram uses in groups.
pub fn parse_command(text: &str) -> Command {
    let text = text.trim();
    let Some(rest) = text.strip_prefix('/') else {
        return Command::Unknown;
    };

    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or(head).to_lowercase();

    match name.as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "generate" => Command::Generate(args.to_string()),
        _ => Command::Unknown,
    }
}

pub const PREFIX: &str = "pt!";

/// A `pt!` command typed in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Rating(String),
    /// `pt!rating` without a ticker.
    RatingUsage,
    Unknown(String),
}

/// Parse `content` as a bot command. Returns `None` for ordinary chat.
pub fn parse(content: &str) -> Option<Command> {
    let rest = content.trim_start().strip_prefix(PREFIX)?;
    let mut args = rest.split_whitespace();
    let name = args.next().unwrap_or_default().to_lowercase();

    let command = match name.as_str() {
        "help" => Command::Help,
        "rating" => match args.next() {
            Some(ticker) => Command::Rating(ticker.to_uppercase()),
            None => Command::RatingUsage,
        },
        _ => Command::Unknown(name),
    };
    Some(command)
}

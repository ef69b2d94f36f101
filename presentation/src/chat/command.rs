//! Slash commands understood by the chat REPL

/// A parsed `/command` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// `/kind [name]`: switch kind, or show the current one
    Kind(Option<String>),
    /// `/birth [date]`: set the birth date, or show it
    Birth(Option<String>),
    /// `/clear`: forget the birth date
    Clear,
    /// `/kinds`: list available kinds
    Kinds,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`. Returns `None` for ordinary input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim().to_string()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };

        let command = match name {
            "kind" | "k" => ReplCommand::Kind(arg),
            "birth" | "b" => ReplCommand::Birth(arg),
            "clear" => ReplCommand::Clear,
            "kinds" => ReplCommand::Kinds,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        };
        Some(command)
    }
}

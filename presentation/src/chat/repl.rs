//! REPL (Read-Eval-Print Loop) for interactive readings

use super::command::ReplCommand;
use crate::{ConsoleFormatter, StreamPrinter};
use arcana_application::{RunDivinationError, RunDivinationUseCase};
use arcana_domain::{DivinationKind, DivinationRequest};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

const HISTORY_CAPACITY: usize = 500;

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: Arc<RunDivinationUseCase>,
    kind: DivinationKind,
    birth_date: Option<String>,
    show_spinner: bool,
}

impl ChatRepl {
    /// Create a new ChatRepl starting on `kind`
    pub fn new(use_case: Arc<RunDivinationUseCase>, kind: DivinationKind) -> Self {
        Self {
            use_case,
            kind,
            birth_date: None,
            show_spinner: true,
        }
    }

    /// Set whether to show the waiting spinner
    pub fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    /// Pre-set the birth date used for astrology readings
    pub fn with_birth_date(mut self, birth_date: Option<String>) -> Self {
        self.birth_date = birth_date.filter(|d| !d.trim().is_empty());
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("arcana").join("history.txt"));
        if let Some(history) = history_path.and_then(open_history) {
            editor = editor.with_history(Box::new(history));
        }

        self.print_welcome();

        loop {
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic(self.kind.as_str().to_string()),
                DefaultPromptSegment::Empty,
            );

            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command) {
                            break;
                        }
                        continue;
                    }

                    // An empty line still casts a chart once a birth date is known.
                    if line.is_empty() && !self.can_cast_without_question() {
                        continue;
                    }

                    self.process_question(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn can_cast_without_question(&self) -> bool {
        self.kind.accepts_birth_date() && self.birth_date.is_some()
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            Arcana - Chat Mode               │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Kind: {}", self.kind.display_name());
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /kind <name>     - Switch divination kind");
        println!("  /kinds           - List available kinds");
        println!("  /birth <date>    - Set birth date for astrology");
        println!("  /clear           - Forget the birth date");
        println!("  /help, /h, /?    - Show this help");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
            }
            ReplCommand::Kinds => {
                println!();
                print!("{}", ConsoleFormatter::kinds_list(Some(self.kind)));
                println!();
            }
            ReplCommand::Kind(None) => {
                println!("Current kind: {}", self.kind.display_name());
            }
            ReplCommand::Kind(Some(name)) => match name.parse::<DivinationKind>() {
                Ok(kind) => {
                    self.kind = kind;
                    println!("Switched to {}", kind.display_name().yellow());
                }
                Err(e) => println!("{}", ConsoleFormatter::validation_hint(&e)),
            },
            ReplCommand::Birth(None) => match &self.birth_date {
                Some(date) => println!("Birth date: {}", date),
                None => println!("No birth date set"),
            },
            ReplCommand::Birth(Some(date)) => {
                println!("Birth date set to {}", date);
                self.birth_date = Some(date);
            }
            ReplCommand::Clear => {
                self.birth_date = None;
                println!("Birth date cleared");
            }
            ReplCommand::Unknown(line) => {
                println!("Unknown command: {}", line);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_question(&self, question: &str) {
        println!();

        let request =
            match DivinationRequest::with_birth_date(self.kind, question, self.birth_date.as_deref())
            {
                Ok(request) => request,
                Err(e) => {
                    println!("{}", ConsoleFormatter::validation_hint(&e));
                    println!();
                    return;
                }
            };

        let printer = StreamPrinter::new().with_spinner(self.show_spinner);
        match self.use_case.execute_with_progress(request, &printer).await {
            Ok(stream) => {
                stream.drive(&printer).await;
            }
            Err(RunDivinationError::Invalid(e)) => {
                println!("{}", ConsoleFormatter::validation_hint(&e));
            }
            Err(e @ RunDivinationError::SessionActive) => {
                eprintln!("Error: {}", e);
            }
        }
        println!();
    }
}

/// Open the history file, creating its directory first. `None` disables history.
fn open_history(path: PathBuf) -> Option<FileBackedHistory> {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(
                "Could not create history directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }
    }
    match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
        Ok(history) => Some(history),
        Err(e) => {
            warn!("Could not open history file: {}", e);
            None
        }
    }
}

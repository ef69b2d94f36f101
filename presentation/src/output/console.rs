//! Console rendering for readings

use arcana_domain::{DivinationKind, DivinationRequest, DomainError, ResultText};
use colored::Colorize;

/// Formats the static parts of a reading for console display.
///
/// The reading body itself is streamed by [`crate::StreamPrinter`].
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Header printed before a reading starts.
    pub fn reading_header(request: &DivinationRequest) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(request.kind().display_name()));
        output.push('\n');
        output.push_str(&format!("{}\n\n", request.kind().description().dimmed()));

        if !request.user_text().trim().is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Question:".cyan().bold(),
                request.user_text()
            ));
        }

        if let Some(context) = request.context() {
            output.push_str(&format!("{} {}\n", "Context:".cyan().bold(), context));
        }

        output
    }

    /// Footer printed after the stream is exhausted.
    pub fn reading_footer(result: &ResultText) -> String {
        if result.is_interrupted() {
            format!("\n{}\n", "=".repeat(60).red())
        } else {
            format!("\n{}\n", "=".repeat(60).cyan())
        }
    }

    /// The menu of available kinds.
    pub fn kinds_list(current: Option<DivinationKind>) -> String {
        let mut output = String::new();
        for kind in DivinationKind::ALL {
            let marker = if Some(kind) == current { "*" } else { " " };
            output.push_str(&format!(
                "{} {:<10} {}  {}\n",
                marker,
                kind.as_str().yellow().bold(),
                kind.display_name(),
                kind.description().dimmed()
            ));
        }
        output
    }

    /// A user-facing hint for a rejected submission.
    pub fn validation_hint(error: &DomainError) -> String {
        let hint = match error {
            DomainError::EmptyQuestion => "Please enter a question.",
            DomainError::MissingBirthDate => {
                "Astrology needs a question or a birth date (--birth-date / /birth)."
            }
            DomainError::UnknownKind(_) => "Type /kinds (or see --help) for the available kinds.",
        };
        format!("{} {}\n{}", "Error:".red().bold(), error, hint.dimmed())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }
}

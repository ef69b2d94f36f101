//! CLI command definitions

use arcana_domain::{DivinationKind, DivinationRequest, DomainError, WireFormat};
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for arcana
#[derive(Parser, Debug)]
#[command(name = "arcana")]
#[command(author, version, about = "Streamed divination readings from an LLM proxy")]
#[command(long_about = r#"
Arcana asks an LLM proxy for a divination reading and prints it as it streams.

Available kinds:
  tarot       Tarot spread
  iching      I Ching hexagram
  astrology   Birth chart (requires --birth-date)
  runes       Elder Futhark runes

Configuration files are loaded from (in priority order):
1. ARCANA_* environment variables
2. --config <path>     Explicit config file
3. ./arcana.toml       Project-level config
4. ~/.config/arcana/config.toml   Global config

Example:
  arcana tarot "Will the new project go well?"
  arcana astrology --birth-date 1990-05-17
  arcana --chat runes
"#)]
pub struct Cli {
    /// Divination kind: tarot, iching, astrology or runes
    pub kind: Option<DivinationKind>,

    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Birth date for astrology readings
    #[arg(short, long, value_name = "DATE")]
    pub birth_date: Option<String>,

    /// Extra background information sent with the question
    #[arg(long, value_name = "TEXT")]
    pub context: Option<String>,

    /// Proxy base URL (overrides config)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Proxy request path (overrides config)
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Treat the response body as raw JSON fragments instead of plain text
    #[arg(long)]
    pub json_fragments: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the spinner and header
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_default_config: bool,
}

impl Cli {
    /// Wire format override requested on the command line, if any.
    pub fn wire_format(&self) -> Option<WireFormat> {
        self.json_fragments.then_some(WireFormat::JsonFragments)
    }

    /// Build the validated request for a single-shot reading.
    ///
    /// `--birth-date` wins over `--context` for kinds that take one.
    pub fn request(&self, kind: DivinationKind) -> Result<DivinationRequest, DomainError> {
        let text = self.question.as_deref().unwrap_or("");
        match self.birth_date.as_deref() {
            Some(date) if kind.accepts_birth_date() => {
                DivinationRequest::with_birth_date(kind, text, Some(date))
            }
            _ => DivinationRequest::try_new(kind, text, self.context.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_kind_and_question() {
        let cli = parse(&["arcana", "tarot", "Will it rain?"]);
        assert_eq!(cli.kind, Some(DivinationKind::Tarot));
        assert_eq!(cli.question.as_deref(), Some("Will it rain?"));
        assert!(!cli.chat);
    }

    #[test]
    fn test_parse_kind_case_insensitive() {
        let cli = parse(&["arcana", "I-Ching", "q"]);
        assert_eq!(cli.kind, Some(DivinationKind::IChing));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["arcana", "palmistry", "q"]).is_err());
    }

    #[test]
    fn test_verbose_count() {
        let cli = parse(&["arcana", "-vv", "runes", "q"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_json_fragments_flag() {
        assert_eq!(parse(&["arcana", "tarot", "q"]).wire_format(), None);
        assert_eq!(
            parse(&["arcana", "--json-fragments", "tarot", "q"]).wire_format(),
            Some(WireFormat::JsonFragments)
        );
    }

    #[test]
    fn test_request_astrology_birth_date() {
        let cli = parse(&["arcana", "astrology", "--birth-date", "1990-05-17"]);
        let request = cli.request(DivinationKind::Astrology).unwrap();
        assert_eq!(request.user_text(), "");
        assert_eq!(request.context(), Some("用户出生日期: 1990-05-17"));
    }

    #[test]
    fn test_request_astrology_without_birth_date_fails() {
        let cli = parse(&["arcana", "astrology"]);
        assert_eq!(
            cli.request(DivinationKind::Astrology).unwrap_err(),
            DomainError::MissingBirthDate
        );
    }

    #[test]
    fn test_request_birth_date_ignored_for_tarot() {
        let cli = parse(&["arcana", "tarot", "q", "--birth-date", "1990-05-17"]);
        let request = cli.request(DivinationKind::Tarot).unwrap();
        assert_eq!(request.context(), None);
    }

    #[test]
    fn test_request_context_passed_through() {
        let cli = parse(&["arcana", "runes", "q", "--context", "new job"]);
        let request = cli.request(DivinationKind::Runes).unwrap();
        assert_eq!(request.context(), Some("new job"));
    }

    #[test]
    fn test_request_empty_question_fails() {
        let cli = parse(&["arcana", "tarot"]);
        assert_eq!(
            cli.request(DivinationKind::Tarot).unwrap_err(),
            DomainError::EmptyQuestion
        );
    }
}

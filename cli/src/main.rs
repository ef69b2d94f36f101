//! CLI entrypoint for arcana
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use arcana_application::{RunDivinationError, RunDivinationUseCase};
use arcana_domain::{DivinationKind, DomainError};
use arcana_infrastructure::{ConfigLoader, FileConfig, HttpProxyTransport};
use arcana_presentation::{ChatRepl, Cli, ConsoleFormatter, StreamPrinter};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", ConfigLoader::default_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting arcana");

    // === Dependency Injection ===
    let transport = HttpProxyTransport::new(
        &config.endpoint.base_url,
        &config.endpoint.path,
        config.timeout(),
    )?;
    info!(endpoint = %transport.endpoint(), wire_format = %config.endpoint.wire_format, "Transport ready");

    let use_case = Arc::new(
        RunDivinationUseCase::new(Arc::new(transport), Arc::new(config.instruction_table()))
            .with_ingest_options(config.ingest_options()),
    );
    let show_spinner = config.output.show_spinner && !cli.quiet;

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case, cli.kind.unwrap_or(DivinationKind::Tarot))
            .with_spinner(show_spinner)
            .with_birth_date(cli.birth_date.clone());

        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single reading mode - kind is required
    let Some(kind) = cli.kind else {
        bail!("A divination kind is required. Use --chat for interactive mode.");
    };

    let request = match cli.request(kind) {
        Ok(request) => request,
        Err(e) => return Ok(validation_failure(&e)),
    };

    if !cli.quiet {
        println!();
        print!("{}", ConsoleFormatter::reading_header(&request));
        println!();
    }

    let printer = StreamPrinter::new().with_spinner(show_spinner);
    let stream = match use_case.execute_with_progress(request, &printer).await {
        Ok(stream) => stream,
        Err(RunDivinationError::Invalid(e)) => return Ok(validation_failure(&e)),
        Err(e) => bail!(e),
    };

    let result = stream.drive(&printer).await;

    if !cli.quiet {
        print!("{}", ConsoleFormatter::reading_footer(&result));
    }

    if result.is_interrupted() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Command-line flags win over every configuration source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.base_url = endpoint.clone();
    }
    if let Some(path) = &cli.path {
        config.endpoint.path = path.clone();
    }
    if let Some(wire_format) = cli.wire_format() {
        config.endpoint.wire_format = wire_format;
    }
}

fn validation_failure(error: &DomainError) -> ExitCode {
    eprintln!("{}", ConsoleFormatter::validation_hint(error));
    ExitCode::from(2)
}

/// Initialize logging based on verbosity level.
///
/// With a log file configured, output goes through a non-blocking file
/// writer instead of stderr.
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(file) = file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = file
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", file.display()))?;
    let directory = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

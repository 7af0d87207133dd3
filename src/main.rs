//! HealthAI: Local chronic-disease dashboard
//!
//! Binary entry point: logging first, then the terminal UI.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthai::adapters::sanitize::SanitizingMakeWriter;
use healthai::config::AppConfig;
use healthai::tui::App;

const LOG_MODE_ENV: &str = "HEALTHAI_LOG_MODE";
const LOG_FILE_ENV: &str = "HEALTHAI_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "healthai.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    File,
    Stdout,
}

impl LogTarget {
    /// `file`, `stdout`, or anything else for auto: a TTY gets the file so
    /// log lines never land on the alternate screen.
    fn from_env() -> Self {
        match std::env::var(LOG_MODE_ENV).as_deref() {
            Ok("file") => Self::File,
            Ok("stdout") => Self::Stdout,
            _ if std::io::stdout().is_terminal() => Self::File,
            _ => Self::Stdout,
        }
    }
}

/// Install the global subscriber. Keep the guard alive until exit.
fn init_logging() -> Result<WorkerGuard> {
    let (writer, guard) = match LogTarget::from_env() {
        LogTarget::File => {
            let path = std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
            if let Some(dir) = Path::new(&path).parent().filter(|d| !d.as_os_str().is_empty()) {
                // A missing directory surfaces as the open error below.
                std::fs::create_dir_all(dir).ok();
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Cannot open log file {path}"))?;
            tracing_appender::non_blocking(file)
        }
        LogTarget::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let _log_guard = init_logging()?;
    tracing::info!("HealthAI starting");

    let config = AppConfig::from_env();
    tracing::debug!("Database at {}", config.db_path.display());

    App::new(&config)?.run()?;

    tracing::info!("HealthAI stopped");
    Ok(())
}

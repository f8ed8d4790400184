use anyhow::anyhow;
use tracing_subscriber::{EnvFilter, fmt, fmt::writer::BoxMakeWriter};

use crate::config::AppSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    /// Keeps stdout clean for command output.
    Stderr,
}

/// Default filter when `RUST_LOG` is unset.
pub fn default_directives(app: &AppSettings) -> String {
    let level = if app.is_development() || app.debug { "debug" } else { "info" };
    format!("{level},hyper=warn,hyper_util=warn,h2=warn,rustls=warn,reqwest=warn")
}

/// Server logging: JSON lines in production, human-readable lines
/// everywhere else.
pub fn init_server_tracing(app: &AppSettings) -> anyhow::Result<()> {
    init_tracing(&default_directives(app), app.is_production(), LogOutput::Stdout)
}

/// Install the global subscriber. `RUST_LOG` wins over `directives`.
pub fn init_tracing(directives: &str, json: bool, output: LogOutput) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = fmt().with_env_filter(filter).with_writer(writer).with_target(true);

    let result = if json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialise tracing: {e}"))
}

// ============================================================
// Layer 6 - Logging Setup
// ============================================================
// Builds the process-wide tracing subscriber from an explicit
// configuration value instead of mutating a global logger later.
//
//   stderr   always, ANSI colours, filtered by RUST_LOG
//   log file optional, appended to, no ANSI escapes
//
// Default level for this crate is info; RUST_LOG adds to it.
//
// Reference: tracing-subscriber documentation (Layer, EnvFilter)

use anyhow::{Context, Result};
use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for this crate
pub const DEFAULT_DIRECTIVE: &str = "imp_arg_trainer=info";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Optional file receiving a copy of every log line
    file: Option<PathBuf>,
}

impl LogConfig {
    /// Log to stderr only
    pub fn new() -> Self {
        Self::default()
    }

    /// Also append every log line to `path`
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Install the subscriber. Fails if one is already installed.
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::from_default_env().add_directive(DEFAULT_DIRECTIVE.parse()?);

        let file_layer = match self.file() {
            Some(path) => Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(open_log_file(path)?)),
            ),
            None => None,
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(file_layer)
            .try_init()
            .context("Cannot install the log subscriber")?;

        if let Some(path) = self.file() {
            tracing::info!("Logging to '{}'", path.display());
        }
        Ok(())
    }
}

/// Open `path` for appending, creating it if missing.
pub fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open log file '{}'", path.display()))
}

//! Shared observability helpers for the binary and integration tests.
//!
//! [`init_logging`] installs the single `tracing` subscriber for the process: an
//! `EnvFilter` honouring `RUST_LOG`, a daily-rolling file sink, and an optional
//! stderr mirror. Call it once near process start; later calls are no-ops that
//! hand back the already resolved log file path.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the non-blocking writer alive and remembers where the file sink points.
struct Installed {
    _guard: WorkerGuard,
    file: PathBuf,
}

static INSTALLED: OnceLock<Installed> = OnceLock::new();

const LOG_DIR_ENV: &str = "PULSE_LOG_DIR";

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Logical name of the component (used for defaults and file names).
    pub app_name: &'static str,
    /// Explicit log directory. If `None`, `PULSE_LOG_DIR` is consulted, then
    /// `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    /// Mirror events to `stderr` in addition to the file sink.
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "pulse",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

/// Initialise the global `tracing` subscriber and return today's log file path.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(installed) = INSTALLED.get() {
        return Ok(installed.file.clone());
    }

    let dir = log_dir(&config);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    // `rolling::daily` appends `.YYYY-MM-DD` to the prefix.
    let prefix = format!("{}.log", config.app_name);
    let file = dir.join(format!("{prefix}.{}", Local::now().format("%Y-%m-%d")));
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &prefix));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter));
    let json = config.format == LogFormat::Json;
    let to_file = if json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_ansi(false).with_writer(writer).boxed()
    };
    let to_stderr = config.emit_stderr.then(|| {
        if json {
            fmt::layer().json().with_writer(std::io::stderr).boxed()
        } else {
            fmt::layer().with_writer(std::io::stderr).boxed()
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(to_file)
        .with(to_stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot install tracing subscriber: {e}"))?;

    let installed = INSTALLED.get_or_init(|| Installed {
        _guard: guard,
        file,
    });
    Ok(installed.file.clone())
}

/// Explicit directory, then `PULSE_LOG_DIR`, then `~/.local/share/<app_name>`.
fn log_dir(config: &LogConfig) -> PathBuf {
    let from_env = std::env::var(LOG_DIR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    match config.log_dir.clone().or(from_env) {
        Some(dir) => with_home(&dir),
        None => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".local/share").join(config.app_name),
            None => Path::new(".").join(config.app_name),
        },
    }
}

/// Expand a leading `~/`.
fn with_home(path: &Path) -> PathBuf {
    let home = std::env::var_os("HOME");
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

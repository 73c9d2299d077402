use clap::Parser;
use pulse_config::PulseConfigLoader;
use std::path::PathBuf;

/// Read when `--config` is not given, if present in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pulse.yaml";

/// Collect recent posts for a query, label their sentiment and save them as CSV.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "pulse", version, about)]
pub struct Cli {
    /// YAML configuration file; must exist when given.
    #[arg(short, long, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Search query, in the remote API's query syntax.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Maximum number of posts to collect.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Posts requested per page (10..=100).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Pause between page requests, in milliseconds.
    #[arg(long)]
    pub page_pause_ms: Option<u64>,

    /// CSV file to write.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// What to do when nothing was collected.
    #[arg(long, value_parser = ["skip", "header_only"])]
    pub on_empty: Option<String>,

    #[arg(long, value_parser = ["text", "json"])]
    pub log_format: Option<String>,
}

impl Cli {
    /// Config loader with this invocation's file and flag overrides applied.
    pub fn loader(&self) -> PulseConfigLoader {
        let mut loader = match &self.config {
            Some(path) => PulseConfigLoader::new().with_file(path),
            None => PulseConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
        };

        if let Some(query) = &self.query {
            loader = loader.with_override("search.query", query.as_str());
        }
        if let Some(limit) = self.limit {
            loader = loader.with_override("search.limit", limit);
        }
        if let Some(page_size) = self.page_size {
            loader = loader.with_override("search.page_size", page_size);
        }
        if let Some(pause) = self.page_pause_ms {
            loader = loader.with_override("search.page_pause_ms", pause);
        }
        if let Some(output) = &self.output {
            loader = loader.with_override("output.path", output.to_string_lossy().into_owned());
        }
        if let Some(policy) = &self.on_empty {
            loader = loader.with_override("output.on_empty", policy.as_str());
        }
        if let Some(format) = &self.log_format {
            loader = loader.with_override("logging.format", format.as_str());
        }
        loader
    }
}

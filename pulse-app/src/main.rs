use clap::Parser;
use pulse_app::pipeline::{self, RunReport};
use pulse_app::{Cli, diagnostic, success_message};
use pulse_common::Result;
use pulse_common::observability::{LogConfig, init_logging};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(report) => {
            println!("{}", success_message(&report));
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, exit_code = err.exit_code(), "pulse.failed");
            eprintln!("{}", diagnostic(&err));
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<RunReport> {
    // 1) Load config (flags > env > file > defaults)
    let cfg = cli.loader().load()?;

    // 2) Logging, as configured
    let log_path = init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: cfg.logging.format,
        ..LogConfig::default()
    })?;
    tracing::info!(
        log_file = %log_path.display(),
        query = %cfg.search.query,
        limit = cfg.search.limit,
        output = %cfg.output.path.display(),
        "pulse.start"
    );

    // 3) Collect, classify, save
    pipeline::execute(&cfg).await
}

//! Library side of the `pulse` binary: CLI definition, the collection pipeline,
//! and the operator-facing messages printed at exit.
use pulse_common::PulseError;
use pipeline::RunReport;
use pulse_store::WriteOutcome;

pub mod cli;
pub mod pipeline;

pub use cli::Cli;

/// Summary printed after a successful run.
pub fn success_message(report: &RunReport) -> String {
    match &report.outcome {
        WriteOutcome::Written { path, rows } => format!(
            "Collected {rows} posts ({} positive, {} negative, {} neutral)\nSaved to {}",
            report.labels.positive,
            report.labels.negative,
            report.labels.neutral,
            path.display()
        ),
        WriteOutcome::HeaderOnly { path } => format!(
            "Warning: no posts were collected. Check the query or API access.\nWrote header only to {}",
            path.display()
        ),
        WriteOutcome::Skipped => {
            "Warning: no posts were collected. Check the query or API access.".to_string()
        }
    }
}

/// Diagnostic printed when a run fails.
pub fn diagnostic(err: &PulseError) -> String {
    match err {
        PulseError::Configuration(msg) => format!("Configuration error: {msg}"),
        PulseError::RateLimitExceeded(msg) => format!(
            "Rate limit exceeded (HTTP 429). Wait for the quota window to reset (usually 15 minutes) before re-running.\nDetails: {msg}"
        ),
        PulseError::RemoteApi(msg) => format!("Remote API error: {msg}"),
        PulseError::Unexpected(e) => format!("Unexpected error: {e:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::LabelTally;
    use std::path::PathBuf;

    #[test]
    fn success_message_names_count_and_path() {
        let report = RunReport {
            collected: 2,
            labels: LabelTally {
                positive: 1,
                negative: 1,
                neutral: 0,
            },
            outcome: WriteOutcome::Written {
                path: PathBuf::from("campaign_sentiment_data.csv"),
                rows: 2,
            },
        };
        let msg = success_message(&report);
        assert!(msg.contains("Collected 2 posts"));
        assert!(msg.contains("campaign_sentiment_data.csv"));
    }

    #[test]
    fn empty_runs_warn() {
        let report = RunReport {
            collected: 0,
            labels: LabelTally::default(),
            outcome: WriteOutcome::Skipped,
        };
        assert!(success_message(&report).starts_with("Warning"));
    }

    #[test]
    fn rate_limit_diagnostic_advises_waiting() {
        let msg = diagnostic(&PulseError::RateLimitExceeded("Too Many Requests".into()));
        assert!(msg.contains("429"));
        assert!(msg.contains("Too Many Requests"));
    }
}

//! CSV persistence for collected records.
//!
//! One header row, then one row per [`Record`] in collection order. Each write
//! replaces whatever was at the target path. When a run collected nothing the
//! [`EmptyOutputPolicy`] decides between writing no file and writing only the
//! header.
use pulse_common::{EmptyOutputPolicy, PulseError, Record, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

/// Column names, in file order. They match the [`Record`] field names, with the
/// engagement counters flattened.
pub const HEADER: [&str; 10] = [
    "id",
    "raw_text",
    "created_at",
    "author_id",
    "language",
    "retweet_count",
    "like_count",
    "reply_count",
    "clean_text",
    "sentiment_label",
];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("record {id}: cannot format created_at: {source}")]
    Timestamp {
        id: String,
        #[source]
        source: time::error::Format,
    },
    #[error("unexpected header in {path}: {found:?}")]
    Header { path: PathBuf, found: Vec<String> },
}

impl From<StoreError> for PulseError {
    fn from(e: StoreError) -> Self {
        PulseError::Unexpected(anyhow::Error::new(e))
    }
}

/// One row of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub id: String,
    pub raw_text: String,
    /// RFC 3339.
    pub created_at: String,
    pub author_id: String,
    pub language: Option<String>,
    pub retweet_count: u64,
    pub like_count: u64,
    pub reply_count: u64,
    pub clean_text: String,
    pub sentiment_label: Option<SentimentLabel>,
}

impl CsvRow {
    pub fn from_record(record: &Record) -> Result<Self, StoreError> {
        let created_at =
            record
                .created_at
                .format(&Rfc3339)
                .map_err(|source| StoreError::Timestamp {
                    id: record.id.clone(),
                    source,
                })?;
        Ok(Self {
            id: record.id.clone(),
            raw_text: record.raw_text.clone(),
            created_at,
            author_id: record.author_id.clone(),
            language: record.language.clone(),
            retweet_count: record.engagement.retweet_count,
            like_count: record.engagement.like_count,
            reply_count: record.engagement.reply_count,
            clean_text: record.clean_text.clone().unwrap_or_default(),
            sentiment_label: record.sentiment_label,
        })
    }
}

/// What a call to [`write_records`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { path: PathBuf, rows: usize },
    HeaderOnly { path: PathBuf },
    Skipped,
}

impl WriteOutcome {
    pub fn rows(&self) -> usize {
        match self {
            WriteOutcome::Written { rows, .. } => *rows,
            _ => 0,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            WriteOutcome::Written { path, .. } | WriteOutcome::HeaderOnly { path } => Some(path),
            WriteOutcome::Skipped => None,
        }
    }
}

/// Serialize `records` to `path`, creating parent directories as needed.
pub fn write_records(
    path: &Path,
    records: &[Record],
    on_empty: EmptyOutputPolicy,
) -> Result<WriteOutcome, StoreError> {
    if records.is_empty() && on_empty == EmptyOutputPolicy::Skip {
        tracing::debug!(path = %path.display(), "store.csv.skipped");
        return Ok(WriteOutcome::Skipped);
    }

    // Convert everything up front so a bad row never leaves a half-written file.
    let rows = records
        .iter()
        .map(CsvRow::from_record)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = fs::File::create(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(HEADER)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let path = path.to_path_buf();
    if rows.is_empty() {
        tracing::info!(path = %path.display(), "store.csv.header_only");
        return Ok(WriteOutcome::HeaderOnly { path });
    }
    tracing::info!(path = %path.display(), rows = rows.len(), "store.csv.written");
    Ok(WriteOutcome::Written {
        path,
        rows: rows.len(),
    })
}

/// Read a file produced by [`write_records`].
pub fn read_records(path: &Path) -> Result<Vec<CsvRow>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let found: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
    if found != HEADER {
        return Err(StoreError::Header {
            path: path.to_path_buf(),
            found,
        });
    }

    reader
        .deserialize()
        .collect::<Result<Vec<CsvRow>, _>>()
        .map_err(StoreError::from)
}

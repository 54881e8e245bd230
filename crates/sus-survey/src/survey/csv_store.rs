use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use tracing::{debug, warn};

use super::export;
use super::questions::QUESTION_COUNT;
use super::repository::{RepositoryError, ResponseRepository};
use super::submission::{ScoredSubmission, StoredSubmission};

const DELIMITER: u8 = b';';
const FIELD_COUNT: usize = 3 + QUESTION_COUNT;

/// Append-only `;`-separated results file.
///
/// Each append is encoded in memory first and written with a single
/// `write_all` while holding the file lock, so readers never see half a row.
#[derive(Debug)]
pub struct CsvResponseRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvResponseRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>, RepositoryError> {
        self.lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("results file lock poisoned".to_string()))
    }
}

impl ResponseRepository for CsvResponseRepository {
    fn append(&self, record: &ScoredSubmission) -> Result<(), RepositoryError> {
        let _guard = self.guard()?;
        let write_header = std::fs::metadata(&self.path)
            .map(|metadata| metadata.len() == 0)
            .unwrap_or(true);

        let mut encoder = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(Vec::new());
        if write_header {
            encoder.write_record(export::header())?;
        }
        encoder.write_record(export::row(&StoredSubmission::from(record)))?;
        let bytes = encoder
            .into_inner()
            .map_err(|err| RepositoryError::Io(err.into_error()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&bytes)?;
        file.flush()?;

        debug!(path = %self.path.display(), "appended survey submission");
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<StoredSubmission>, RepositoryError> {
        let _guard = self.guard()?;
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    warn!(line = line + 2, error = %err, "skipping unreadable results row");
                    continue;
                }
            };

            match parse_row(&row) {
                Ok(record) => records.push(record),
                Err(err) => warn!(line = line + 2, error = %err, "skipping malformed results row"),
            }
        }

        Ok(records)
    }
}

/// A stored row that cannot be turned into a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    #[error("expected 13 fields, found {0}")]
    TooFewFields(usize),
    #[error("nickname is empty")]
    MissingNickname,
    #[error("unrecognised timestamp '{0}'")]
    Timestamp(String),
    #[error("score '{0}' is not a number")]
    Score(String),
}

/// Parses one results row. Non-numeric answers are kept as `None` so the
/// record still counts toward the trend and the other questions.
pub fn parse_row(row: &StringRecord) -> Result<StoredSubmission, MalformedRecord> {
    if row.len() < FIELD_COUNT {
        return Err(MalformedRecord::TooFewFields(row.len()));
    }

    let nickname = row.get(0).unwrap_or_default().to_string();
    if nickname.is_empty() {
        return Err(MalformedRecord::MissingNickname);
    }

    let raw_timestamp = row.get(1).unwrap_or_default();
    let timestamp = parse_timestamp(raw_timestamp)
        .ok_or_else(|| MalformedRecord::Timestamp(raw_timestamp.to_string()))?;

    let raw_score = row.get(2).unwrap_or_default();
    let score = raw_score
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| MalformedRecord::Score(raw_score.to_string()))?;

    let responses = (3..FIELD_COUNT)
        .map(|index| row.get(index).and_then(|cell| cell.parse::<i64>().ok()))
        .collect();

    Ok(StoredSubmission {
        nickname,
        timestamp,
        score,
        responses,
    })
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

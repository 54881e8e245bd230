use super::submission::{ScoredSubmission, StoredSubmission};

/// Storage contract for scored submissions.
///
/// Appends must be atomic per record: `list_all` never returns a partially
/// written submission. Reads may lag a concurrent append by one record.
pub trait ResponseRepository: Send + Sync {
    fn append(&self, record: &ScoredSubmission) -> Result<(), RepositoryError>;
    /// Every stored submission, oldest first.
    fn list_all(&self) -> Result<Vec<StoredSubmission>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("results file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("results file encoding error: {0}")]
    Csv(#[from] csv::Error),
}

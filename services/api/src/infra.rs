use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use sus_survey::config::{AppConfig, ConfigError};
use sus_survey::survey::{RepositoryError, ResponseRepository, ScoredSubmission, StoredSubmission};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store used when `SUS_STORAGE=memory`; contents vanish on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResponseRepository {
    records: Arc<Mutex<Vec<StoredSubmission>>>,
}

impl ResponseRepository for InMemoryResponseRepository {
    fn append(&self, record: &ScoredSubmission) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.push(StoredSubmission::from(record));
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<StoredSubmission>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }
}

/// The results file named on the command line, else the configured one.
pub(crate) fn resolve_results_path(overridden: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match overridden {
        Some(path) => Ok(path),
        None => Ok(AppConfig::load()?.storage.results_path),
    }
}

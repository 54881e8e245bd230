use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::survey::questions::QUESTION_COUNT;
use crate::survey::repository::{RepositoryError, ResponseRepository};
use crate::survey::submission::{
    answer_field, RawSubmission, ScoredSubmission, StoredSubmission, NICKNAME_FIELD,
};
use crate::survey::{survey_router, SurveyService};

/// Answers that score 100: agree with positive items, disagree with negative ones.
pub(super) const BEST: [&str; QUESTION_COUNT] = ["5", "1", "5", "1", "5", "1", "5", "1", "5", "1"];
/// Answers that score 0.
pub(super) const WORST: [&str; QUESTION_COUNT] = ["1", "5", "1", "5", "1", "5", "1", "5", "1", "5"];
/// Neutral answers that score 50.
pub(super) const NEUTRAL: [&str; QUESTION_COUNT] = ["3"; QUESTION_COUNT];

pub(super) fn raw(nickname: &str, answers: [&str; QUESTION_COUNT]) -> RawSubmission {
    RawSubmission::new(nickname, answers.map(|answer| Some(answer.to_string())))
}

pub(super) fn form(nickname: &str, answers: &[&str]) -> HashMap<String, String> {
    let mut form = HashMap::new();
    form.insert(NICKNAME_FIELD.to_string(), nickname.to_string());
    for (index, answer) in answers.iter().enumerate() {
        form.insert(answer_field(index), answer.to_string());
    }
    form
}

pub(super) fn form_body(nickname: &str, answers: &[&str]) -> String {
    let mut pairs = vec![format!("nickname={nickname}")];
    pairs.extend(
        answers
            .iter()
            .enumerate()
            .map(|(index, answer)| format!("{}={answer}", answer_field(index))),
    );
    pairs.join("&")
}

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn build_service() -> (SurveyService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = SurveyService::new(repository.clone());
    (service, repository)
}

pub(super) fn survey_router_with_service<R>(service: SurveyService<R>) -> axum::Router
where
    R: ResponseRepository + 'static,
{
    survey_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<StoredSubmission>>>,
}

impl MemoryRepository {
    pub(super) fn seeded(records: Vec<StoredSubmission>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ResponseRepository for MemoryRepository {
    fn append(&self, record: &ScoredSubmission) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(StoredSubmission::from(record));
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<StoredSubmission>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .clone())
    }
}

/// Accepts reads but refuses writes, like a full or read-only volume.
pub(super) struct ReadOnlyRepository;

impl ResponseRepository for ReadOnlyRepository {
    fn append(&self, _record: &ScoredSubmission) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list_all(&self) -> Result<Vec<StoredSubmission>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ResponseRepository for UnavailableRepository {
    fn append(&self, _record: &ScoredSubmission) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn list_all(&self) -> Result<Vec<StoredSubmission>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}

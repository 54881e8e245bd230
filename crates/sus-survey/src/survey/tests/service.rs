use super::common::*;
use std::sync::Arc;

use crate::survey::interpretation::{Grade, Rating};
use crate::survey::repository::{RepositoryError, ResponseRepository};
use crate::survey::scoring::ScoreCalculator;
use crate::survey::service::STORAGE_WARNING;
use crate::survey::submission::{StoredSubmission, ValidationError};
use crate::survey::{SurveyService, SurveyServiceError};

#[test]
fn submit_scores_interprets_and_stores() {
    let (service, repository) = build_service();

    let receipt = service
        .submit_at(raw("  Robin ", BEST), at(1, 9))
        .expect("submission accepted");

    assert_eq!(receipt.nickname, "Robin");
    assert_eq!(receipt.score, 100.0);
    assert_eq!(receipt.grade, Grade::A);
    assert_eq!(receipt.rating, Rating::Excellent);
    assert!(receipt.persisted);
    assert!(receipt.warning.is_none());

    let stored = repository.list_all().expect("list succeeds");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].nickname, "Robin");
    assert_eq!(stored[0].timestamp, at(1, 9));
    assert_eq!(stored[0].responses.len(), 10);
}

#[test]
fn stored_score_is_reproducible_from_responses() {
    let (service, repository) = build_service();
    let answers = ["4", "2", "5", "1", "3", "2", "4", "3", "4", "2"];
    service
        .submit_at(raw("repro", answers), at(2, 10))
        .expect("submission accepted");

    let stored = repository.list_all().expect("list succeeds");
    let responses: [u8; 10] = std::array::from_fn(|index| {
        stored[0].responses[index]
            .and_then(|value| u8::try_from(value).ok())
            .expect("valid response")
    });
    assert_eq!(
        ScoreCalculator::standard().score_responses(&responses),
        stored[0].score
    );
}

#[test]
fn submit_rejects_blank_nickname_without_storing() {
    let (service, repository) = build_service();

    match service.submit(raw("   ", BEST)) {
        Err(SurveyServiceError::Validation {
            reason: ValidationError::MissingNickname,
            nickname: None,
        }) => {}
        other => panic!("expected missing nickname, got {other:?}"),
    }
    assert_eq!(repository.len(), 0);
}

#[test]
fn submit_rejects_incomplete_answers_and_keeps_nickname() {
    let (service, repository) = build_service();
    let mut submission = raw("Kai", NEUTRAL);
    submission.answers[6] = Some("7".to_string());
    submission.answers[8] = None;

    match service.submit(submission) {
        Err(SurveyServiceError::Validation {
            reason: ValidationError::Incomplete(incomplete),
            nickname: Some(nickname),
        }) => {
            assert_eq!(nickname, "Kai");
            assert_eq!(incomplete.unanswered, vec![6, 8]);
        }
        other => panic!("expected incomplete answers, got {other:?}"),
    }
    assert_eq!(repository.len(), 0);
}

#[test]
fn storage_failure_still_returns_the_score_with_a_warning() {
    let service = SurveyService::new(Arc::new(ReadOnlyRepository));

    let receipt = service
        .submit(raw("offline", WORST))
        .expect("score still reported");

    assert_eq!(receipt.score, 0.0);
    assert_eq!(receipt.grade, Grade::F);
    assert!(!receipt.persisted);
    assert_eq!(receipt.warning.as_deref(), Some(STORAGE_WARNING));
}

#[test]
fn reads_surface_storage_failures() {
    let service = SurveyService::new(Arc::new(UnavailableRepository));

    assert!(matches!(
        service.statistics(),
        Err(SurveyServiceError::Storage(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.results(),
        Err(SurveyServiceError::Storage(_))
    ));
    assert!(matches!(
        service.export_csv(),
        Err(SurveyServiceError::Storage(_))
    ));
}

#[test]
fn statistics_on_empty_store_are_null() {
    let (service, _) = build_service();
    let statistics = service.statistics().expect("statistics computed");

    assert_eq!(statistics.submission_count, 0);
    assert!(statistics.questions.iter().all(|question| {
        question.mean.is_none() && question.std_dev.is_none() && question.mode.value.is_none()
    }));
    assert!(statistics.score_trend.is_empty());
}

#[test]
fn statistics_ignore_a_corrupted_record() {
    let mut corrupted: Vec<Option<i64>> = vec![Some(3); 10];
    corrupted[0] = None;
    corrupted[3] = Some(42);
    let repository = Arc::new(MemoryRepository::seeded(vec![StoredSubmission {
        nickname: "legacy".to_string(),
        timestamp: at(1, 8),
        score: 50.0,
        responses: corrupted,
    }]));
    let service = SurveyService::new(repository);

    service
        .submit_at(raw("first", BEST), at(2, 8))
        .expect("first accepted");
    service
        .submit_at(raw("second", WORST), at(3, 8))
        .expect("second accepted");

    let statistics = service.statistics().expect("statistics computed");
    let first = statistics.question(0).expect("question 0");
    assert_eq!(first.responses, 2);
    assert_eq!(first.mean, Some(3.0));
    assert_eq!(first.std_dev, Some(2.0));
    assert_eq!(first.frequency, [1, 0, 0, 0, 1]);
    assert_eq!(first.mode.value, Some(1));
    assert_eq!(first.mode.percent, 50.0);

    let fourth = statistics.question(3).expect("question 3");
    assert_eq!(fourth.responses, 2);
    assert_eq!(fourth.frequency, [1, 0, 0, 0, 1]);

    let second = statistics.question(1).expect("question 1");
    assert_eq!(second.responses, 3);
    assert_eq!(second.frequency, [1, 0, 1, 0, 1]);

    let trend: Vec<f64> = statistics.score_trend.iter().map(|point| point.score).collect();
    assert_eq!(trend, vec![50.0, 100.0, 0.0]);
}

#[test]
fn results_carry_interpretations() {
    let (service, _) = build_service();
    service
        .submit_at(raw("neutral", NEUTRAL), at(4, 12))
        .expect("accepted");

    let results = service.results().expect("results listed");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 50.0);
    assert_eq!(results[0].grade, Grade::D);
    assert_eq!(results[0].rating_label, "Below Average");
}

#[test]
fn export_orders_nickname_timestamp_score_then_answers() {
    let (service, _) = build_service();
    service
        .submit_at(raw("exporter", BEST), at(5, 7))
        .expect("accepted");

    let csv = String::from_utf8(service.export_csv().expect("export")).expect("utf8");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "nickname,timestamp,score,P1,P2,P3,P4,P5,P6,P7,P8,P9,P10",
            "exporter,2025-05-05T07:00:00Z,100.0,5,1,5,1,5,1,5,1,5,1",
        ]
    );
}

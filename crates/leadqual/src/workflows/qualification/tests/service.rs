use std::sync::Arc;

use super::common::*;
use crate::workflows::qualification::domain::{InvalidInput, LeadId, LeadStatus};
use crate::workflows::qualification::repository::{LeadRepository, RepositoryError};
use crate::workflows::qualification::scoring::ScoreLabel;
use crate::workflows::qualification::service::{
    CallWebhookStatus, LeadQualificationService, QualificationServiceError,
};
use crate::workflows::qualification::transcript::FALLBACK_SCORE;

#[test]
fn submit_scores_and_persists_the_lead() {
    let (service, repository, _, _) = build_service();

    let record = service.submit(warm_submission()).expect("submission stores");

    assert_eq!(record.status, LeadStatus::Warm);
    let result = record.score.expect("score computed");
    // 2.5 + 2 + 1.5 + 1 = 7
    assert_eq!(result.score, 7);
    assert_eq!(result.label, ScoreLabel::Warm);
    assert_eq!(repository.record_count(), 1);
}

#[test]
fn submit_hands_hot_leads_to_agents() {
    let (service, _, _, notifier) = build_service();

    let record = service.submit(hot_submission()).expect("submission stores");

    assert_eq!(record.status, LeadStatus::Qualified);
    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].lead_id, record.lead_id);
    assert_eq!(events[0].template, "hot_lead_hand_off");
    assert_eq!(events[0].details.get("score").map(String::as_str), Some("10"));
}

#[test]
fn submit_does_not_notify_below_the_hot_threshold() {
    let (service, _, _, notifier) = build_service();

    service.submit(warm_submission()).expect("submission stores");

    assert!(notifier.events().is_empty(), "warm leads are not handed off");
}

#[test]
fn submit_rejects_incomplete_questionnaires() {
    let (service, repository, _, _) = build_service();

    let mut submission = hot_submission();
    submission.form.agent_status = None;

    match service.submit(submission) {
        Err(QualificationServiceError::Input(InvalidInput::Missing("agent_status"))) => {}
        other => panic!("expected invalid input error, got {other:?}"),
    }
    assert_eq!(repository.record_count(), 0, "nothing persisted on rejection");
}

#[test]
fn start_call_dispatches_script_and_tracks_the_call() {
    let (service, repository, dialer, _) = build_service();
    let record = service.submit(warm_submission()).expect("submission stores");

    let dispatched = service.start_call(&record.lead_id).expect("call dispatches");

    let requests = dialer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].phone, record.contact.phone);
    assert_eq!(requests[0].metadata.lead_id, record.lead_id);
    assert!(requests[0].script.contains("Cornerstone Realty"));

    let stored = repository
        .fetch(&record.lead_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, LeadStatus::CallInProgress);
    assert_eq!(stored.provider_call_id.as_deref(), Some(dispatched.call_id.as_str()));
}

#[test]
fn start_call_surfaces_provider_rejection() {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = LeadQualificationService::new(
        repository.clone(),
        Arc::new(RejectingDialer),
        notifier,
        dialer_settings(),
    );
    let record = service.submit(warm_submission()).expect("submission stores");

    match service.start_call(&record.lead_id) {
        Err(QualificationServiceError::Dialer(_)) => {}
        other => panic!("expected dialer error, got {other:?}"),
    }
}

#[test]
fn completed_call_rescores_from_the_transcript() {
    let (service, repository, _, notifier) = build_service();
    let record = service.submit(warm_submission()).expect("submission stores");
    service.start_call(&record.lead_id).expect("call dispatches");

    let webhook = completed_webhook(
        &record.lead_id,
        Some("Great call. They are pre-approved and want to buy. Your score is 9 out of 10."),
    );
    let updated = service.complete_call(webhook).expect("webhook processes");

    assert_eq!(updated.status, LeadStatus::Qualified);
    assert_eq!(updated.score.map(|result| result.score), Some(9));
    assert!(!updated.needs_review);
    let summary = updated.transcript_summary.expect("summary stored");
    assert_eq!(summary.financing.as_deref(), Some("pre_approved"));

    let logs = repository.call_logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].lead_id, record.lead_id);
    assert_eq!(logs[0].duration_secs, Some(118));
    assert!(logs[0].transcript.as_deref().unwrap_or("").contains("9 out of 10"));

    // A hot transcript outcome also triggers the hand-off.
    assert_eq!(notifier.events().len(), 1);
}

#[test]
fn completed_call_without_transcript_defaults_and_flags_review() {
    let (service, repository, _, notifier) = build_service();
    let record = service.submit(warm_submission()).expect("submission stores");

    let webhook = completed_webhook(&record.lead_id, None);
    let updated = service.complete_call(webhook).expect("webhook processes");

    assert_eq!(updated.score.map(|result| result.score), Some(FALLBACK_SCORE));
    assert!(updated.needs_review);
    assert_eq!(updated.status, LeadStatus::Cold);
    assert!(notifier.events().is_empty());

    let flagged = repository.needing_review(10).expect("review query succeeds");
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].lead_id, record.lead_id);
}

#[test]
fn failed_call_marks_the_lead_without_losing_the_log() {
    let (service, repository, _, _) = build_service();
    let record = service.submit(warm_submission()).expect("submission stores");

    let mut webhook = completed_webhook(&record.lead_id, None);
    webhook.call_status = CallWebhookStatus::NoAnswer;
    let updated = service.complete_call(webhook).expect("webhook processes");

    assert_eq!(updated.status, LeadStatus::CallFailed);
    // The pre-call form score is untouched.
    assert_eq!(updated.score.map(|result| result.score), Some(7));
    assert_eq!(repository.call_logs().len(), 1);
}

#[test]
fn unknown_call_status_leaves_the_lead_unchanged() {
    let (service, repository, _, _) = build_service();
    let record = service.submit(warm_submission()).expect("submission stores");

    let mut webhook = completed_webhook(&record.lead_id, Some("half a sentence"));
    webhook.call_status = CallWebhookStatus::Unknown;
    let updated = service.complete_call(webhook).expect("webhook tolerated");

    assert_eq!(updated.status, LeadStatus::Warm);
    assert!(repository.call_logs().is_empty());
}

#[test]
fn webhook_without_lead_id_is_rejected() {
    let (service, _, _, _) = build_service();

    let mut webhook = completed_webhook(&LeadId("ignored".to_string()), None);
    webhook.metadata = None;

    match service.complete_call(webhook) {
        Err(QualificationServiceError::MissingLeadId) => {}
        other => panic!("expected missing lead id error, got {other:?}"),
    }
}

#[test]
fn webhook_for_unknown_lead_reports_not_found() {
    let (service, _, _, _) = build_service();

    let webhook = completed_webhook(&LeadId("lead-999999".to_string()), Some("hello"));
    match service.complete_call(webhook) {
        Err(QualificationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn assign_agent_books_the_lead() {
    let (service, _, _, _) = build_service();
    let record = service.submit(hot_submission()).expect("submission stores");

    let updated = service
        .assign_agent(&record.lead_id, "agent@cornerstone.example")
        .expect("assignment succeeds");

    assert_eq!(updated.status, LeadStatus::Booked);
    assert_eq!(updated.assigned_agent.as_deref(), Some("agent@cornerstone.example"));
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _, _) = build_service();

    match service.get(&LeadId("missing".to_string())) {
        Err(QualificationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

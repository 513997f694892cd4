use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::DialerSettings;
use crate::workflows::qualification::dialer::{
    CallDispatcher, CallRequest, DialerError, DispatchedCall,
};
use crate::workflows::qualification::domain::{
    AgentStatus, ContactInfo, Financing, Intent, LeadId, QualificationAnswers, QualificationForm,
    Timeline, UrgencyReason,
};
use crate::workflows::qualification::repository::{
    AgentNotifier, CallLog, HandOffAlert, LeadRecord, LeadRepository, NotifyError, RepositoryError,
};
use crate::workflows::qualification::service::{
    CallWebhook, CallWebhookStatus, LeadQualificationService, LeadSubmission, WebhookMetadata,
};

pub(super) fn dialer_settings() -> DialerSettings {
    DialerSettings {
        agency_name: "Cornerstone Realty".to_string(),
        voice: "maya".to_string(),
    }
}

pub(super) fn contact() -> ContactInfo {
    ContactInfo {
        name: "Jordan Ames".to_string(),
        phone: "+15155550134".to_string(),
        email: "jordan@example.com".to_string(),
    }
}

pub(super) fn form(
    intent: &str,
    timeline: &str,
    financing: &str,
    agent_status: &str,
    urgency: Option<&str>,
) -> QualificationForm {
    QualificationForm {
        intent: Some(intent.to_string()),
        timeline: Some(timeline.to_string()),
        financing: Some(financing.to_string()),
        agent_status: Some(agent_status.to_string()),
        urgency: urgency.map(str::to_string),
    }
}

pub(super) fn answers(
    intent: Intent,
    timeline: Timeline,
    financing: Financing,
    agent_status: AgentStatus,
    urgency: Option<UrgencyReason>,
) -> QualificationAnswers {
    QualificationAnswers {
        intent,
        timeline,
        financing,
        agent_status,
        urgency,
    }
}

pub(super) fn hot_submission() -> LeadSubmission {
    LeadSubmission {
        contact: contact(),
        target_area: Some("Des Moines metro".to_string()),
        form: form("buy", "immediate", "cash_buyer", "no", Some("family_growth")),
    }
}

pub(super) fn warm_submission() -> LeadSubmission {
    LeadSubmission {
        contact: contact(),
        target_area: None,
        form: form(
            "both",
            "three_months",
            "need_approval",
            "yes_not_exclusive",
            None,
        ),
    }
}

pub(super) fn completed_webhook(lead_id: &LeadId, transcript: Option<&str>) -> CallWebhook {
    CallWebhook {
        call_id: Some("call-000001".to_string()),
        call_status: CallWebhookStatus::Completed,
        call_length: Some(118),
        recording_url: Some("https://recordings.example.com/call-000001.mp3".to_string()),
        transcript: transcript.map(str::to_string),
        metadata: Some(WebhookMetadata {
            lead_id: Some(lead_id.0.clone()),
        }),
    }
}

pub(super) fn build_service() -> (
    LeadQualificationService<MemoryRepository, MemoryDialer, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryDialer>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let dialer = Arc::new(MemoryDialer::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = LeadQualificationService::new(
        repository.clone(),
        dialer.clone(),
        notifier.clone(),
        dialer_settings(),
    );
    (service, repository, dialer, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
    pub(super) logs: Arc<Mutex<Vec<CallLog>>>,
}

impl MemoryRepository {
    pub(super) fn call_logs(&self) -> Vec<CallLog> {
        self.logs.lock().expect("log mutex poisoned").clone()
    }

    pub(super) fn record_count(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl LeadRepository for MemoryRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.lead_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.lead_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.lead_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn append_call_log(&self, log: CallLog) -> Result<(), RepositoryError> {
        self.logs.lock().expect("log mutex poisoned").push(log);
        Ok(())
    }

    fn needing_review(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut flagged: Vec<LeadRecord> = guard
            .values()
            .filter(|record| record.needs_review)
            .cloned()
            .collect();
        flagged.sort_by_key(|record| record.created_at);
        flagged.truncate(limit);
        Ok(flagged)
    }
}

/// Repository that refuses every operation, for failure-path assertions.
pub(super) struct UnavailableRepository;

impl LeadRepository for UnavailableRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn append_call_log(&self, _log: CallLog) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn needing_review(&self, _limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryDialer {
    sequence: AtomicU64,
    pub(super) requests: Arc<Mutex<Vec<CallRequest>>>,
}

impl MemoryDialer {
    pub(super) fn requests(&self) -> Vec<CallRequest> {
        self.requests.lock().expect("dialer mutex poisoned").clone()
    }
}

impl CallDispatcher for MemoryDialer {
    fn dispatch(&self, request: CallRequest) -> Result<DispatchedCall, DialerError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        self.requests
            .lock()
            .expect("dialer mutex poisoned")
            .push(request);
        Ok(DispatchedCall {
            call_id: format!("call-{id:06}"),
        })
    }
}

/// Dialer that always refuses, for provider-failure assertions.
pub(super) struct RejectingDialer;

impl CallDispatcher for RejectingDialer {
    fn dispatch(&self, _request: CallRequest) -> Result<DispatchedCall, DialerError> {
        Err(DialerError::Provider("credit exhausted".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<HandOffAlert>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<HandOffAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AgentNotifier for MemoryNotifier {
    fn publish(&self, alert: HandOffAlert) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

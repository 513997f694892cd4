use leadqual::workflows::qualification::{
    AgentNotifier, CallDispatcher, CallLog, CallRequest, DialerError, DispatchedCall, HandOffAlert,
    LeadId, LeadRecord, LeadRepository, NotifyError, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
    call_logs: Arc<Mutex<Vec<CallLog>>>,
}

impl LeadRepository for InMemoryLeadRepository {
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
        if guard.contains_key(&record.lead_id) {
            guard.insert(record.lead_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn append_call_log(&self, log: CallLog) -> Result<(), RepositoryError> {
        let mut guard = self.call_logs.lock().expect("call log mutex poisoned");
        guard.push(log);
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

/// Stand-in call provider: assigns call ids locally and logs the dispatch
/// instead of placing a real call.
#[derive(Default)]
pub(crate) struct InMemoryDialer {
    sequence: AtomicU64,
}

impl CallDispatcher for InMemoryDialer {
    fn dispatch(&self, request: CallRequest) -> Result<DispatchedCall, DialerError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let call_id = format!("call-{id:06}");
        info!(
            lead_id = %request.metadata.lead_id.0,
            phone = %request.phone,
            voice = %request.voice,
            %call_id,
            "dispatching outbound qualification call"
        );
        Ok(DispatchedCall { call_id })
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAgentNotifier {
    events: Arc<Mutex<Vec<HandOffAlert>>>,
}

impl AgentNotifier for InMemoryAgentNotifier {
    fn publish(&self, alert: HandOffAlert) -> Result<(), NotifyError> {
        info!(lead_id = %alert.lead_id.0, template = %alert.template, "hot lead hand-off");
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryAgentNotifier {
    pub(crate) fn events(&self) -> Vec<HandOffAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

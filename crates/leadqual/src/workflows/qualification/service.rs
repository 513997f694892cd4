use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DialerSettings;

use super::dialer::{self, CallDispatcher, CallMetadata, CallRequest, DialerError, DispatchedCall};
use super::domain::{
    ContactInfo, InvalidInput, LeadId, LeadStatus, QualificationForm,
};
use super::repository::{
    AgentNotifier, CallLog, HandOffAlert, LeadRecord, LeadRepository, NotifyError, RepositoryError,
};
use super::scoring::{score, ScoreLabel, ScoreResult};
use super::transcript::{extract_summary, FALLBACK_SCORE};

/// Service composing the scoring engine, lead store, call provider, and
/// agent hand-off boundary. Collaborators are injected; the service owns no
/// ambient global state.
pub struct LeadQualificationService<R, D, N> {
    repository: Arc<R>,
    dialer: Arc<D>,
    notifier: Arc<N>,
    settings: DialerSettings,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

/// Intake form payload: contact details plus the raw questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub contact: ContactInfo,
    #[serde(default)]
    pub target_area: Option<String>,
    #[serde(default)]
    pub form: QualificationForm,
}

/// Provider-reported call outcome delivered to the webhook receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallWebhookStatus {
    Completed,
    Ended,
    Failed,
    NoAnswer,
    #[serde(other)]
    Unknown,
}

/// Callback payload posted by the call provider after an outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallWebhook {
    #[serde(default)]
    pub call_id: Option<String>,
    pub call_status: CallWebhookStatus,
    #[serde(default)]
    pub call_length: Option<u32>,
    #[serde(default)]
    pub recording_url: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub metadata: Option<WebhookMetadata>,
}

/// Provider-echoed metadata; the lead id must survive the round trip for
/// the callback to be attributable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMetadata {
    #[serde(default)]
    pub lead_id: Option<String>,
}

impl<R, D, N> LeadQualificationService<R, D, N>
where
    R: LeadRepository + 'static,
    D: CallDispatcher + 'static,
    N: AgentNotifier + 'static,
{
    pub fn new(repository: Arc<R>, dialer: Arc<D>, notifier: Arc<N>, settings: DialerSettings) -> Self {
        Self {
            repository,
            dialer,
            notifier,
            settings,
        }
    }

    /// Validate and score an intake form submission, persist the lead, and
    /// hand hot leads straight to an agent.
    pub fn submit(
        &self,
        submission: LeadSubmission,
    ) -> Result<LeadRecord, QualificationServiceError> {
        let answers = submission.form.validate()?;
        let result = score(&answers);

        let now = Utc::now();
        let record = LeadRecord {
            lead_id: next_lead_id(),
            contact: submission.contact,
            target_area: submission.target_area,
            answers: Some(answers),
            score: Some(result),
            status: LeadStatus::from_label(result.label),
            cadence: Some(result.label.cadence()),
            needs_review: false,
            transcript_summary: None,
            provider_call_id: None,
            assigned_agent: None,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(lead_id = %stored.lead_id.0, score = result.score, label = result.label.label(), "lead scored from intake form");

        if result.label == ScoreLabel::Hot {
            self.hand_off(&stored, result)?;
        }

        Ok(stored)
    }

    /// Dispatch the outbound AI qualification call for a stored lead.
    pub fn start_call(
        &self,
        lead_id: &LeadId,
    ) -> Result<DispatchedCall, QualificationServiceError> {
        let mut record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;

        let script =
            dialer::qualification_script(&record.contact.name, &self.settings.agency_name);
        let dispatched = self.dialer.dispatch(CallRequest {
            phone: record.contact.phone.clone(),
            script,
            voice: self.settings.voice.clone(),
            metadata: CallMetadata {
                lead_id: record.lead_id.clone(),
                lead_name: record.contact.name.clone(),
                lead_email: record.contact.email.clone(),
            },
        })?;

        record.provider_call_id = Some(dispatched.call_id.clone());
        record.status = LeadStatus::CallInProgress;
        record.updated_at = Utc::now();
        self.repository.update(record)?;

        info!(lead_id = %lead_id.0, call_id = %dispatched.call_id, "qualification call dispatched");
        Ok(dispatched)
    }

    /// Ingest the provider callback for a finished call.
    ///
    /// Completed calls run the transcript extractor; when it yields no
    /// score the default of [`FALLBACK_SCORE`] applies and the lead is
    /// flagged for manual review. Failed or unanswered calls keep their
    /// log but move the lead to `call_failed`.
    pub fn complete_call(
        &self,
        webhook: CallWebhook,
    ) -> Result<LeadRecord, QualificationServiceError> {
        let lead_id = webhook
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.lead_id.clone())
            .map(LeadId)
            .ok_or(QualificationServiceError::MissingLeadId)?;

        let mut record = self
            .repository
            .fetch(&lead_id)?
            .ok_or(RepositoryError::NotFound)?;

        match webhook.call_status {
            CallWebhookStatus::Completed | CallWebhookStatus::Ended => {
                let summary = webhook
                    .transcript
                    .as_deref()
                    .map(extract_summary)
                    .unwrap_or_default();
                let needs_review = summary.score.is_none();
                let value = summary.score.unwrap_or(FALLBACK_SCORE);
                let result = ScoreResult {
                    score: value,
                    label: ScoreLabel::from_score(value),
                };

                record.score = Some(result);
                record.status = LeadStatus::from_label(result.label);
                record.cadence = Some(result.label.cadence());
                record.needs_review = needs_review;
                record.transcript_summary = Some(summary.clone());
                record.updated_at = Utc::now();

                self.repository.append_call_log(CallLog {
                    lead_id: lead_id.clone(),
                    provider_call_id: webhook.call_id,
                    duration_secs: webhook.call_length,
                    recording_url: webhook.recording_url,
                    transcript: webhook.transcript,
                    summary: Some(summary),
                    completed_at: record.updated_at,
                })?;
                self.repository.update(record.clone())?;

                info!(lead_id = %lead_id.0, score = result.score, label = result.label.label(), needs_review, "call transcript processed");

                if result.label == ScoreLabel::Hot && !needs_review {
                    self.hand_off(&record, result)?;
                }
            }
            CallWebhookStatus::Failed | CallWebhookStatus::NoAnswer => {
                record.status = LeadStatus::CallFailed;
                record.updated_at = Utc::now();

                self.repository.append_call_log(CallLog {
                    lead_id: lead_id.clone(),
                    provider_call_id: webhook.call_id,
                    duration_secs: webhook.call_length,
                    recording_url: webhook.recording_url,
                    transcript: webhook.transcript,
                    summary: None,
                    completed_at: record.updated_at,
                })?;
                self.repository.update(record.clone())?;

                warn!(lead_id = %lead_id.0, status = ?webhook.call_status, "qualification call did not complete");
            }
            CallWebhookStatus::Unknown => {
                warn!(lead_id = %lead_id.0, "ignoring unrecognized call status");
            }
        }

        Ok(record)
    }

    /// Book the lead with a named agent after a qualified hand-off.
    pub fn assign_agent(
        &self,
        lead_id: &LeadId,
        agent_email: &str,
    ) -> Result<LeadRecord, QualificationServiceError> {
        let mut record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;

        record.assigned_agent = Some(agent_email.to_string());
        record.status = LeadStatus::Booked;
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;

        info!(lead_id = %lead_id.0, agent = agent_email, "lead booked with agent");
        Ok(record)
    }

    /// Fetch a lead and its current status for API responses.
    pub fn get(&self, lead_id: &LeadId) -> Result<LeadRecord, QualificationServiceError> {
        let record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn hand_off(
        &self,
        record: &LeadRecord,
        result: ScoreResult,
    ) -> Result<(), QualificationServiceError> {
        let mut details = BTreeMap::new();
        details.insert("score".to_string(), result.score.to_string());
        details.insert("phone".to_string(), record.contact.phone.clone());
        details.insert(
            "cadence".to_string(),
            result.label.cadence().label().to_string(),
        );

        self.notifier.publish(HandOffAlert {
            template: "hot_lead_hand_off".to_string(),
            lead_id: record.lead_id.clone(),
            details,
        })?;
        Ok(())
    }
}

/// Error raised by the qualification service.
#[derive(Debug, thiserror::Error)]
pub enum QualificationServiceError {
    #[error(transparent)]
    Input(#[from] InvalidInput),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Dialer(#[from] DialerError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("webhook metadata did not include a lead id")]
    MissingLeadId,
}

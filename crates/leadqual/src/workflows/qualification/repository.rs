use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ContactInfo, FollowUpCadence, LeadId, LeadStatus, QualificationAnswers};
use super::scoring::ScoreResult;
use super::transcript::TranscriptSummary;

/// Repository record for one lead: contact data, questionnaire, scoring
/// outcome, and workflow status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub lead_id: LeadId,
    pub contact: ContactInfo,
    pub target_area: Option<String>,
    /// `None` when the lead was qualified from a call transcript only.
    pub answers: Option<QualificationAnswers>,
    pub score: Option<ScoreResult>,
    pub status: LeadStatus,
    pub cadence: Option<FollowUpCadence>,
    /// Set when a completed call produced no extractable score and the
    /// default was applied; such leads queue for manual review.
    pub needs_review: bool,
    pub transcript_summary: Option<TranscriptSummary>,
    pub provider_call_id: Option<String>,
    pub assigned_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadRecord {
    pub fn status_view(&self) -> LeadStatusView {
        LeadStatusView {
            lead_id: self.lead_id.clone(),
            status: self.status.label(),
            score: self.score.map(|result| result.score),
            label: self.score.map(|result| result.label.label()),
            cadence: self.cadence.map(FollowUpCadence::label),
            needs_review: self.needs_review,
            assigned_agent: self.assigned_agent.clone(),
        }
    }
}

/// Sanitized representation of a lead's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct LeadStatusView {
    pub lead_id: LeadId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence: Option<&'static str>,
    pub needs_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_agent: Option<String>,
}

/// Call-provider artifacts persisted alongside the lead after a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLog {
    pub lead_id: LeadId,
    pub provider_call_id: Option<String>,
    pub duration_secs: Option<u32>,
    pub recording_url: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<TranscriptSummary>,
    pub completed_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
/// The engine never touches persistence directly.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError>;
    fn append_call_log(&self, log: CallLog) -> Result<(), RepositoryError>;
    /// Leads whose call produced no extractable score, oldest first.
    fn needing_review(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing hot-lead hand-off hooks (e.g. SMS or e-mail adapters).
pub trait AgentNotifier: Send + Sync {
    fn publish(&self, alert: HandOffAlert) -> Result<(), NotifyError>;
}

/// Alert payload so routes/tests can assert the hand-off boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOffAlert {
    pub template: String,
    pub lead_id: LeadId,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

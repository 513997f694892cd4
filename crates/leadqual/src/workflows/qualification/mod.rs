//! Lead intake, scoring, and AI-call qualification workflow.
//!
//! The scoring engine itself ([`scoring`] and [`transcript`]) is pure and
//! dependency-free; persistence, the outbound call provider, and agent
//! notifications are injected at the service boundary so the workflow never
//! reaches for ambient global state.

pub mod dialer;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod transcript;

#[cfg(test)]
mod tests;

pub use dialer::{CallDispatcher, CallMetadata, CallRequest, DialerError, DispatchedCall};
pub use domain::{
    AgentStatus, ContactInfo, Financing, FollowUpCadence, Intent, InvalidInput, LeadId, LeadStatus,
    QualificationAnswers, QualificationForm, Timeline, UrgencyReason,
};
pub use repository::{
    AgentNotifier, CallLog, HandOffAlert, LeadRecord, LeadRepository, LeadStatusView, NotifyError,
    RepositoryError,
};
pub use router::lead_router;
pub use scoring::{score, ScoreLabel, ScoreResult};
pub use service::{
    CallWebhook, CallWebhookStatus, LeadQualificationService, LeadSubmission,
    QualificationServiceError, WebhookMetadata,
};
pub use transcript::{extract_summary, TranscriptSummary, FALLBACK_SCORE};

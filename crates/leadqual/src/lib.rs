//! Lead qualification for AI-assisted real estate intake.
//!
//! The core of the crate is a pure scoring engine: a weighted rubric that
//! turns a structured questionnaire into a 0-10 priority score, plus a
//! best-effort extractor that recovers an approximate score from free-text
//! call transcripts. Around the engine sits the qualification workflow:
//! intake, outbound AI call dispatch, webhook ingestion, and agent hand-off,
//! all behind injected repository/dialer/notifier traits.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

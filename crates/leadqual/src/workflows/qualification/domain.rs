use serde::{Deserialize, Serialize};

use super::scoring::ScoreLabel;

/// Identifier wrapper for leads moving through the qualification workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// Contact details collected on the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// What the lead wants to do in the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Buy,
    Sell,
    Both,
    Rent,
    JustLooking,
}

impl Intent {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            "both" => Some(Self::Both),
            "rent" => Some(Self::Rent),
            "just_looking" => Some(Self::JustLooking),
            _ => None,
        }
    }
}

/// How soon the lead expects to transact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    Immediate,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    NoTimeline,
}

impl Timeline {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "immediate" => Some(Self::Immediate),
            "one_month" => Some(Self::OneMonth),
            "three_months" => Some(Self::ThreeMonths),
            "six_months" => Some(Self::SixMonths),
            "one_year" => Some(Self::OneYear),
            "no_timeline" => Some(Self::NoTimeline),
            _ => None,
        }
    }
}

/// Financing posture declared during intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Financing {
    PreApproved,
    CashBuyer,
    NeedApproval,
    NeedToSellFirst,
    ExploringOptions,
}

impl Financing {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pre_approved" => Some(Self::PreApproved),
            "cash_buyer" => Some(Self::CashBuyer),
            "need_approval" => Some(Self::NeedApproval),
            "need_to_sell_first" => Some(Self::NeedToSellFirst),
            "exploring_options" => Some(Self::ExploringOptions),
            _ => None,
        }
    }
}

/// Whether the lead is already represented by another agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    No,
    HadBadExperience,
    YesNotExclusive,
    YesExclusive,
}

impl AgentStatus {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "no" => Some(Self::No),
            "had_bad_experience" => Some(Self::HadBadExperience),
            "yes_not_exclusive" => Some(Self::YesNotExclusive),
            "yes_exclusive" => Some(Self::YesExclusive),
            _ => None,
        }
    }
}

/// Why the lead wants to move. Only affects the urgency bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyReason {
    JobRelocation,
    FamilyGrowth,
    Downsizing,
    Investment,
    FirstTimeBuyer,
    Upgrade,
    Other,
}

impl UrgencyReason {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "job_relocation" => Some(Self::JobRelocation),
            "family_growth" => Some(Self::FamilyGrowth),
            "downsizing" => Some(Self::Downsizing),
            "investment" => Some(Self::Investment),
            "first_time_buyer" => Some(Self::FirstTimeBuyer),
            "upgrade" => Some(Self::Upgrade),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Raw questionnaire payload exactly as collected by the intake form or the
/// call flow. Every field is optional at the wire boundary; [`QualificationForm::validate`]
/// is the only path into the typed answers the scoring engine accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationForm {
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub financing: Option<String>,
    #[serde(default)]
    pub agent_status: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
}

impl QualificationForm {
    /// Checked conversion into [`QualificationAnswers`].
    ///
    /// A missing or unrecognized required field is an error, never a silent
    /// zero-weight default: treating it as zero would make "missing data"
    /// indistinguishable from an intentional low-value answer.
    pub fn validate(&self) -> Result<QualificationAnswers, InvalidInput> {
        let intent = required("intent", &self.intent, Intent::parse)?;
        let timeline = required("timeline", &self.timeline, Timeline::parse)?;
        let financing = required("financing", &self.financing, Financing::parse)?;
        let agent_status = required("agent_status", &self.agent_status, AgentStatus::parse)?;
        let urgency = optional("urgency", &self.urgency, UrgencyReason::parse)?;

        Ok(QualificationAnswers {
            intent,
            timeline,
            financing,
            agent_status,
            urgency,
        })
    }
}

fn required<T>(
    field: &'static str,
    raw: &Option<String>,
    parse: fn(&str) -> Option<T>,
) -> Result<T, InvalidInput> {
    let value = raw
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(InvalidInput::Missing(field))?;

    parse(value).ok_or_else(|| InvalidInput::Unrecognized {
        field,
        value: value.to_string(),
    })
}

fn optional<T>(
    field: &'static str,
    raw: &Option<String>,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, InvalidInput> {
    match raw.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| InvalidInput::Unrecognized {
                field,
                value: value.to_string(),
            }),
        None => Ok(None),
    }
}

/// Fully-validated questionnaire. The scoring rubric is total over these
/// types, so scoring itself can never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationAnswers {
    pub intent: Intent,
    pub timeline: Timeline,
    pub financing: Financing,
    pub agent_status: AgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyReason>,
}

/// Raised when a required questionnaire field is absent or outside its
/// recognized value set. Never retried automatically; the input will not
/// change until the caller re-collects it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("required field '{0}' is missing")]
    Missing(&'static str),
    #[error("field '{field}' has unrecognized value '{value}'")]
    Unrecognized { field: &'static str, value: String },
}

/// Follow-up speed derived from the score label. Callers must not hardcode
/// their own thresholds; this mapping is the single source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpCadence {
    ImmediateHandOff,
    ScheduledCallback,
    NurtureSequence,
}

impl FollowUpCadence {
    pub const fn label(self) -> &'static str {
        match self {
            FollowUpCadence::ImmediateHandOff => "immediate_hand_off",
            FollowUpCadence::ScheduledCallback => "scheduled_callback",
            FollowUpCadence::NurtureSequence => "nurture_sequence",
        }
    }
}

/// High level status tracked throughout the qualification workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    CallInProgress,
    Qualified,
    Warm,
    Cold,
    CallFailed,
    Booked,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::CallInProgress => "call_in_progress",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Warm => "warm",
            LeadStatus::Cold => "cold",
            LeadStatus::CallFailed => "call_failed",
            LeadStatus::Booked => "booked",
        }
    }

    /// Status after scoring derives from the label alone.
    pub const fn from_label(label: ScoreLabel) -> Self {
        match label {
            ScoreLabel::Hot => LeadStatus::Qualified,
            ScoreLabel::Warm => LeadStatus::Warm,
            ScoreLabel::Cool | ScoreLabel::Cold => LeadStatus::Cold,
        }
    }
}

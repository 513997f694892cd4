use super::super::domain::{
    AgentStatus, Financing, Intent, QualificationAnswers, Timeline, UrgencyReason,
};

// Canonical weight tables. Axis maxima: 3 + 3 + 2 + 1.5 + 0.5 = 10.

pub(crate) fn intent_weight(intent: Intent) -> f32 {
    match intent {
        Intent::Buy | Intent::Sell => 3.0,
        Intent::Both => 2.5,
        Intent::Rent => 1.0,
        Intent::JustLooking => 0.5,
    }
}

pub(crate) fn timeline_weight(timeline: Timeline) -> f32 {
    match timeline {
        Timeline::Immediate => 3.0,
        Timeline::OneMonth => 2.5,
        Timeline::ThreeMonths => 2.0,
        Timeline::SixMonths => 1.0,
        Timeline::OneYear => 0.5,
        Timeline::NoTimeline => 0.0,
    }
}

pub(crate) fn financing_weight(financing: Financing) -> f32 {
    match financing {
        Financing::PreApproved | Financing::CashBuyer => 2.0,
        Financing::NeedApproval => 1.5,
        Financing::NeedToSellFirst => 1.0,
        Financing::ExploringOptions => 0.5,
    }
}

pub(crate) fn agent_status_weight(agent_status: AgentStatus) -> f32 {
    match agent_status {
        AgentStatus::No | AgentStatus::HadBadExperience => 1.5,
        AgentStatus::YesNotExclusive => 1.0,
        AgentStatus::YesExclusive => 0.0,
    }
}

pub(crate) fn urgency_bonus(urgency: Option<UrgencyReason>) -> f32 {
    match urgency {
        Some(UrgencyReason::JobRelocation) | Some(UrgencyReason::FamilyGrowth) => 0.5,
        _ => 0.0,
    }
}

pub(crate) fn weight_sum(answers: &QualificationAnswers) -> f32 {
    intent_weight(answers.intent)
        + timeline_weight(answers.timeline)
        + financing_weight(answers.financing)
        + agent_status_weight(answers.agent_status)
        + urgency_bonus(answers.urgency)
}

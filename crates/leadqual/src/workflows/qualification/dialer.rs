use serde::{Deserialize, Serialize};

use super::domain::LeadId;

/// Outbound-call provider boundary. Implementations hand the script and
/// phone number to a voice-agent service; the provider later delivers the
/// transcript through the call webhook.
pub trait CallDispatcher: Send + Sync {
    fn dispatch(&self, request: CallRequest) -> Result<DispatchedCall, DialerError>;
}

/// Everything the provider needs to place one qualification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub phone: String,
    pub script: String,
    pub voice: String,
    pub metadata: CallMetadata,
}

/// Round-trips through the provider so the webhook can be correlated back
/// to the lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMetadata {
    pub lead_id: LeadId,
    pub lead_name: String,
    pub lead_email: String,
}

/// Provider acknowledgement for a dispatched call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchedCall {
    pub call_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DialerError {
    #[error("call provider rejected request: {0}")]
    Provider(String),
}

/// Build the outbound qualification script for one lead.
///
/// The closing line instructs the voice agent to state the score as
/// "[NUMBER] out of 10", which is what the transcript extractor's explicit
/// patterns look for when the provider returns free text.
pub(crate) fn qualification_script(lead_name: &str, agency_name: &str) -> String {
    let greeting_name = if lead_name.trim().is_empty() {
        "there"
    } else {
        lead_name.trim()
    };

    format!(
        "Hello {greeting_name}! This is Sarah from {agency_name}. You just requested a \
market analysis on our website, and I have five quick questions to match you with the \
right agent. This takes about two minutes. Ready?

Ask these questions one at a time and wait for each answer:

Question 1: Are you looking to buy or sell a home?

Question 2: What's your timeline - right away, next month, a few months out, or just exploring?

Question 3: Do you already have mortgage pre-approval, or would you like help with financing?

Question 4: Which area are you interested in?

Question 5: Are you currently working with another agent?

After all five answers, score the lead:
- 9 or 10 when they are ready soon, pre-approved or paying cash, and have no other agent
- 7 or 8 when they are one to three months out and arranging financing
- 5 or 6 when the timeline is three to six months or financing is still open
- 1 to 4 when they are just exploring, have no timeline, or already work with another agent

Close with: \"Thanks! Your score is [NUMBER] out of 10. One of our agents will \
be in touch shortly. Have a great day!\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_includes_lead_name_and_branding() {
        let script = qualification_script("Jordan", "Cornerstone Realty");
        assert!(script.contains("Hello Jordan!"));
        assert!(script.contains("Sarah from Cornerstone Realty"));
        assert!(script.contains("Question 5"));
    }

    #[test]
    fn script_falls_back_to_generic_greeting() {
        let script = qualification_script("   ", "Cornerstone Realty");
        assert!(script.contains("Hello there!"));
    }

    #[test]
    fn script_closing_line_matches_extractor_patterns() {
        // The spoken score format must stay recoverable by the transcript
        // extractor once "[NUMBER]" is filled in.
        let script = qualification_script("Jordan", "Cornerstone Realty");
        let spoken = script.replace("[NUMBER]", "9");
        let summary = super::super::transcript::extract_summary(&spoken);
        assert_eq!(summary.score, Some(9));
    }
}

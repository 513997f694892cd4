//! Best-effort extraction of a score and qualification summary from a
//! free-text call transcript.
//!
//! Used when the call provider free-forms the conversation and only states
//! the score verbally instead of returning structured answers. Matching is
//! plain substring scanning over the lower-cased transcript with no negation
//! handling: "not pre-approved" still matches "pre-approved". The extractor
//! never fails; malformed or empty input yields an empty summary and the
//! caller applies its own default.

use serde::{Deserialize, Serialize};

/// Score applied by callers when extraction yields nothing, and the tier
/// assigned to a non-empty transcript with no recognizable keywords.
pub const FALLBACK_SCORE: u8 = 5;

/// Non-authoritative summary recovered from a transcript.
///
/// `score` is `None` only for empty input; classification fields stay unset
/// whenever the corresponding keywords never appear, rather than guessing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financing: Option<String>,
}

impl TranscriptSummary {
    pub fn is_empty(&self) -> bool {
        self.score.is_none()
            && self.intent.is_none()
            && self.timeline.is_none()
            && self.financing.is_none()
    }
}

/// Extract a score and qualification summary from raw transcript text.
pub fn extract_summary(transcript: &str) -> TranscriptSummary {
    if transcript.trim().is_empty() {
        return TranscriptSummary::default();
    }

    let lower = transcript.to_lowercase();

    TranscriptSummary {
        score: Some(explicit_score(&lower).unwrap_or_else(|| keyword_score(&lower))),
        intent: intent_classification(&lower).map(str::to_owned),
        timeline: timeline_classification(&lower).map(str::to_owned),
        financing: financing_classification(&lower).map(str::to_owned),
    }
}

// Maximum run of filler characters tolerated between a score keyword and
// its number, so "score: 9", "score 9", and "score is 9" all match.
const KEYWORD_GAP: usize = 6;

/// Explicit numeric score, tried before any keyword heuristics. Patterns in
/// priority order; the first one whose number lands in [1, 10] wins.
fn explicit_score(lower: &str) -> Option<u8> {
    let patterns: [fn(&str) -> Option<u32>; 4] = [
        |text| number_after_keyword(text, "score"),
        number_out_of_ten,
        |text| number_after_keyword(text, "rate"),
        |text| number_after_keyword(text, "lead score"),
    ];

    for pattern in patterns {
        if let Some(value) = pattern(lower) {
            if (1..=10).contains(&value) {
                return Some(value as u8);
            }
        }
    }

    None
}

/// First number following an occurrence of `keyword`, separated by at most
/// [`KEYWORD_GAP`] filler characters (spaces, colons, short words such as
/// "is" or the "d" in "rated").
fn number_after_keyword(lower: &str, keyword: &str) -> Option<u32> {
    let bytes = lower.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = lower[search_from..].find(keyword) {
        let mut pos = search_from + offset + keyword.len();
        let gap_end = (pos + KEYWORD_GAP).min(bytes.len());

        while pos < gap_end && matches!(bytes[pos], b' ' | b':' | b'a'..=b'z') {
            pos += 1;
        }

        if pos < bytes.len() && bytes[pos].is_ascii_digit() {
            let (value, _) = digit_run(bytes, pos);
            if value.is_some() {
                return value;
            }
        }

        search_from = search_from + offset + keyword.len();
    }

    None
}

/// First number phrased as a fraction of ten: "9/10", "9 / 10", or the
/// spoken form "9 out of 10".
fn number_out_of_ten(lower: &str) -> Option<u32> {
    let bytes = lower.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if !bytes[pos].is_ascii_digit() {
            pos += 1;
            continue;
        }

        let (value, digits_end) = digit_run(bytes, pos);
        let mut rest = digits_end;

        while rest < bytes.len() && bytes[rest] == b' ' {
            rest += 1;
        }

        let divider_end = if lower[rest..].starts_with('/') {
            Some(rest + 1)
        } else if lower[rest..].starts_with("out of") {
            Some(rest + "out of".len())
        } else {
            None
        };

        if let (Some(value), Some(mut after)) = (value, divider_end) {
            while after < bytes.len() && bytes[after] == b' ' {
                after += 1;
            }
            let ten = lower[after..].starts_with("10")
                && !bytes
                    .get(after + 2)
                    .map(|byte| byte.is_ascii_digit())
                    .unwrap_or(false);
            if ten {
                return Some(value);
            }
        }

        pos = digits_end;
    }

    None
}

/// Scan a digit run starting at `start`. Returns the parsed value (`None`
/// when the run overflows a `u32`) and the index just past the run.
fn digit_run(bytes: &[u8], start: usize) -> (Option<u32>, usize) {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    // Digit runs are ASCII, so the slice boundaries are valid UTF-8.
    let value = std::str::from_utf8(&bytes[start..end])
        .ok()
        .and_then(|digits| digits.parse::<u32>().ok());
    (value, end)
}

const HIGH_VALUE_KEYWORDS: [&str; 4] = [
    "ready now",
    "pre-approved",
    "cash buyer",
    "need to move quickly",
];

const MEDIUM_VALUE_KEYWORDS: [&str; 3] = ["looking to buy", "next month", "getting pre-approved"];

const LOW_VALUE_KEYWORDS: [&str; 3] = ["just looking", "researching", "maybe next year"];

/// Ordered keyword tiers, applied only when no explicit score was stated.
fn keyword_score(lower: &str) -> u8 {
    if contains_any(lower, &HIGH_VALUE_KEYWORDS) {
        9
    } else if contains_any(lower, &MEDIUM_VALUE_KEYWORDS) {
        7
    } else if contains_any(lower, &LOW_VALUE_KEYWORDS) {
        3
    } else {
        FALLBACK_SCORE
    }
}

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lower.contains(keyword))
}

fn intent_classification(lower: &str) -> Option<&'static str> {
    match (lower.contains("buy"), lower.contains("sell")) {
        (true, true) => Some("both"),
        (false, true) => Some("sell"),
        (true, false) => Some("buy"),
        (false, false) => None,
    }
}

fn timeline_classification(lower: &str) -> Option<&'static str> {
    if lower.contains("immediately") || lower.contains("right now") {
        Some("immediate")
    } else if lower.contains("next month") || lower.contains("30 days") {
        Some("1_month")
    } else if lower.contains("few months") || lower.contains("3 months") {
        Some("3_months")
    } else {
        None
    }
}

fn financing_classification(lower: &str) -> Option<&'static str> {
    if lower.contains("pre-approved") || lower.contains("pre approved") {
        Some("pre_approved")
    } else if lower.contains("cash") {
        Some("cash_buyer")
    } else if lower.contains("need approval") || lower.contains("get approved") {
        Some("need_approval")
    } else {
        None
    }
}

use serde::{Deserialize, Serialize};

/// Three-level trust tag attached to parse and resolution outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Numeric trust score stored alongside persisted speeches
    pub fn score(self) -> f64 {
        match self {
            Confidence::High => 1.0,
            Confidence::Medium => 0.7,
            Confidence::Low => 0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// A speaker label split into name and title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerName {
    /// Name with whitespace removed (e.g. `大下`)
    pub name: String,
    /// Matched role title, empty when none was recognised
    pub role: String,
    pub confidence: Confidence,
}

/// One speaker turn as segmented from the page stream, before resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSpeechSegment {
    /// Speaker label with its original spacing (e.g. `大 下 議 長`)
    pub speaker_name_raw: String,
    /// Normalised speaker name (e.g. `大下`)
    pub speaker_name: String,
    /// Detected role title
    pub speaker_role: String,
    /// Utterance text, trimmed, lines joined with `\n`
    pub speech_text: String,
    pub page_start: u32,
    pub page_end: u32,
    pub confidence: Confidence,
}

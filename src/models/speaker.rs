use serde::{Deserialize, Serialize};

use super::Confidence;

/// Provenance of an alias, ordered by priority (manual wins)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasType {
    /// Learned from an unresolved speech label
    SpeechDerived,
    /// Registered from a preamble roster entry
    AttendeeDerived,
    /// Entered by an operator
    Manual,
}

impl AliasType {
    pub fn priority(self) -> u8 {
        match self {
            AliasType::Manual => 3,
            AliasType::AttendeeDerived => 2,
            AliasType::SpeechDerived => 1,
        }
    }
}

/// An alternate normalised label known to refer to a speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    /// Whitespace-stripped lookup key
    pub alias_norm: String,
    pub speaker_id: String,
    pub alias_type: AliasType,
    /// Weight given at registration (1.0 full name, 0.8 family name, 0.3 speech)
    pub confidence: f64,
}

impl AliasEntry {
    pub fn new(
        alias_norm: impl Into<String>,
        speaker_id: impl Into<String>,
        alias_type: AliasType,
        confidence: f64,
    ) -> Self {
        Self {
            alias_norm: alias_norm.into(),
            speaker_id: speaker_id.into(),
            alias_type,
            confidence,
        }
    }
}

/// Which resolution strategy produced a [`ResolveResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    ExactFullname,
    ExactFamily,
    AliasNorm,
    ParenHint,
    Prefix,
    Unresolved,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::ExactFullname => "exact_fullname",
            MatchStrategy::ExactFamily => "exact_family",
            MatchStrategy::AliasNorm => "alias_norm",
            MatchStrategy::ParenHint => "paren_hint",
            MatchStrategy::Prefix => "prefix",
            MatchStrategy::Unresolved => "unresolved",
        }
    }
}

/// Outcome of resolving a speaker name to a canonical identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResult {
    pub speaker_id: Option<String>,
    pub full_name: Option<String>,
    pub confidence: Confidence,
    pub match_strategy: MatchStrategy,
}

impl ResolveResult {
    pub fn resolved(
        speaker_id: impl Into<String>,
        full_name: Option<String>,
        confidence: Confidence,
        match_strategy: MatchStrategy,
    ) -> Self {
        Self {
            speaker_id: Some(speaker_id.into()),
            full_name,
            confidence,
            match_strategy,
        }
    }

    pub fn unresolved() -> Self {
        Self {
            speaker_id: None,
            full_name: None,
            confidence: Confidence::Low,
            match_strategy: MatchStrategy::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.speaker_id.is_some()
    }
}

/// Coarse speaker class derived from a free-text title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    Councilor,
    Mayor,
    Executive,
    Chair,
    Staff,
    Unknown,
}

impl SpeakerRole {
    /// Map a role title such as `総務部長` to its class
    pub fn classify(title: &str) -> Self {
        const STAFF_MARKERS: [&str; 7] = ["部長", "課長", "局長", "参事", "次長", "監査委員", "危機管理監"];

        match title {
            "議員" => SpeakerRole::Councilor,
            "市長" => SpeakerRole::Mayor,
            "副市長" | "教育長" => SpeakerRole::Executive,
            "議長" | "副議長" => SpeakerRole::Chair,
            _ if title.contains("委員長") => SpeakerRole::Chair,
            _ if STAFF_MARKERS.iter().any(|m| title.contains(m)) => SpeakerRole::Staff,
            _ => SpeakerRole::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_type_priority_order() {
        assert!(AliasType::Manual > AliasType::AttendeeDerived);
        assert!(AliasType::AttendeeDerived > AliasType::SpeechDerived);
        assert!(AliasType::Manual.priority() > AliasType::SpeechDerived.priority());
    }

    #[test]
    fn test_classify_roles() {
        assert_eq!(SpeakerRole::classify("議員"), SpeakerRole::Councilor);
        assert_eq!(SpeakerRole::classify("市長"), SpeakerRole::Mayor);
        assert_eq!(SpeakerRole::classify("副市長"), SpeakerRole::Executive);
        assert_eq!(SpeakerRole::classify("副議長"), SpeakerRole::Chair);
        assert_eq!(SpeakerRole::classify("予算決算常任委員長"), SpeakerRole::Chair);
        assert_eq!(SpeakerRole::classify("総務部長"), SpeakerRole::Staff);
        assert_eq!(SpeakerRole::classify("危機管理監"), SpeakerRole::Staff);
        assert_eq!(SpeakerRole::classify("書記"), SpeakerRole::Unknown);
        assert_eq!(SpeakerRole::classify(""), SpeakerRole::Unknown);
    }

    #[test]
    fn test_unresolved_result() {
        let result = ResolveResult::unresolved();
        assert!(!result.is_resolved());
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.match_strategy, MatchStrategy::Unresolved);
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    derive_session_info, extract_preamble, AliasIndex, AttendeeIndex, AttendeeParser,
    SpeakerResolver, SpeechParser,
};
use crate::directory::SpeakerDirectory;
use crate::heuristics::Lexicon;
use crate::models::{Attendee, MatchStrategy, PageText, RawSpeechSegment, SessionInfo};

/// Configuration for document processing
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Documents parsed concurrently in batch mode
    pub jobs: usize,
    /// Register unresolved speaker names as provisional speakers
    pub learn_unresolved: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            jobs: std::thread::available_parallelism().map_or(4, |n| n.get()),
            learn_unresolved: false,
        }
    }
}

/// Output of the pure parsing stages for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Whether a speech marker was found to anchor a preamble
    pub has_preamble: bool,
    pub attendees: Vec<Attendee>,
    pub speeches: Vec<RawSpeechSegment>,
}

/// A speech segment attributed to a speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSpeech {
    /// 0-based position in the document
    pub sequence: usize,
    pub speaker_id: Option<String>,
    pub speaker_name_raw: String,
    pub speaker_name: String,
    pub speaker_role: String,
    /// Canonical full name when the speaker was resolved
    pub full_name: Option<String>,
    pub speech_text: String,
    pub page_start: u32,
    pub page_end: u32,
    /// Resolution trust score (1.0 / 0.7 / 0.3)
    pub confidence: f64,
    pub match_strategy: MatchStrategy,
}

/// Resolution counts for a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub matched: usize,
    pub unmatched: usize,
    pub by_strategy: BTreeMap<String, usize>,
}

impl MatchStats {
    pub fn total(&self) -> usize {
        self.matched + self.unmatched
    }

    /// Fraction of speeches attributed to a speaker, 0.0 for an empty document
    pub fn match_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.matched as f64 / total as f64,
        }
    }

    fn record(&mut self, speech: &ResolvedSpeech) {
        if speech.speaker_id.is_some() {
            self.matched += 1;
        } else {
            self.unmatched += 1;
        }
        *self
            .by_strategy
            .entry(speech.match_strategy.as_str().to_string())
            .or_default() += 1;
    }
}

/// A fully processed document ready to be persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionInfo>,
    pub parsed_at: DateTime<Utc>,
    pub attendees: Vec<Attendee>,
    pub speeches: Vec<ResolvedSpeech>,
    pub stats: MatchStats,
}

/// Run the pure parsing stages over one document
///
/// Deterministic and free of shared state, so documents can be parsed on
/// any number of workers.
pub fn parse_document(pages: &[PageText], lexicon: &Lexicon) -> ParsedDocument {
    let preamble = extract_preamble(pages);
    let attendees = match &preamble {
        Some(text) => AttendeeParser::new(lexicon).parse_preamble(text),
        None => Vec::new(),
    };
    let speeches = SpeechParser::new(lexicon).parse_pages(pages);

    info!(
        "Parsed {} page(s): {} attendee(s), {} speech(es)",
        pages.len(),
        attendees.len(),
        speeches.len()
    );
    ParsedDocument {
        has_preamble: preamble.is_some(),
        attendees,
        speeches,
    }
}

/// Attribute each segment in order against a roster and alias snapshot
pub fn resolve_speeches(
    segments: &[RawSpeechSegment],
    attendees: &AttendeeIndex,
    aliases: &AliasIndex,
) -> Vec<ResolvedSpeech> {
    let resolver = SpeakerResolver::new(attendees, aliases);

    segments
        .iter()
        .enumerate()
        .map(|(sequence, segment)| {
            let role = (!segment.speaker_role.is_empty()).then_some(segment.speaker_role.as_str());
            let result = resolver.resolve(&segment.speaker_name, role);
            ResolvedSpeech {
                sequence,
                speaker_id: result.speaker_id,
                speaker_name_raw: segment.speaker_name_raw.clone(),
                speaker_name: segment.speaker_name.clone(),
                speaker_role: segment.speaker_role.clone(),
                full_name: result.full_name,
                speech_text: segment.speech_text.clone(),
                page_start: segment.page_start,
                page_end: segment.page_end,
                confidence: result.confidence.score(),
                match_strategy: result.match_strategy,
            }
        })
        .collect()
}

/// Register a parsed document's attendees and resolve its speeches
///
/// The alias snapshot is taken after the attendees are registered and
/// before any unresolved names are learned, so every speech in a document
/// sees the same index.
pub fn resolve_document(
    parsed: ParsedDocument,
    directory: &mut SpeakerDirectory,
    source_url: Option<&str>,
    config: &PipelineConfig,
) -> ResolvedDocument {
    let attendee_index = directory.upsert_attendees(&parsed.attendees);
    let alias_index = directory.alias_index();
    let speeches = resolve_speeches(&parsed.speeches, &attendee_index, &alias_index);

    let mut stats = MatchStats::default();
    for speech in &speeches {
        stats.record(speech);
        if speech.speaker_id.is_none() && config.learn_unresolved {
            directory.record_unresolved(&speech.speaker_name, &speech.speaker_role);
        }
    }

    if stats.unmatched > 0 {
        warn!("{}/{} speech(es) unmatched", stats.unmatched, stats.total());
    }
    info!(
        "Resolved {} speech(es), match rate {:.1}%",
        stats.total(),
        stats.match_rate() * 100.0
    );

    ResolvedDocument {
        source_url: source_url.map(str::to_string),
        session: source_url.and_then(derive_session_info),
        parsed_at: Utc::now(),
        attendees: parsed.attendees,
        speeches,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;

    fn plenary_pages() -> Vec<PageText> {
        vec![
            PageText::new(
                1,
                [
                    "令和６年第４回安芸高田市議会定例会（第３日）",
                    "出席議員（１６名）",
                    "１番 南 澤 克 彦 ２番 大 下 正 幸",
                    "３番 山 本 数 博 ４番 山 本 優",
                    "欠席議員（なし）",
                    "説明のため出席した者の職氏名",
                    "市長 石 丸 伸 二 財政課長 沖 田 伸 二",
                    "職務のため出席した事務局職員の職氏名",
                    "事務局長 佐々木 智 之",
                ]
                .join("\n"),
            ),
            PageText::new(
                2,
                [
                    "○大 下 議 長",
                    "　ただいまから本日の会議を開きます。",
                    "○山本（数）議員　質問します。",
                    "○石 丸 市 長",
                    "　お答えします。",
                    "○田中議員　確認です。",
                ]
                .join("\n"),
            ),
        ]
    }

    #[test]
    fn test_parse_document() {
        let parsed = parse_document(&plenary_pages(), Lexicon::shared());
        assert!(parsed.has_preamble);
        assert_eq!(parsed.attendees.len(), 7);
        assert_eq!(parsed.speeches.len(), 4);
    }

    #[test]
    fn test_parse_document_without_marker() {
        let pages = vec![PageText::new(1, "目次\n議事日程のみ")];
        let parsed = parse_document(&pages, Lexicon::shared());
        assert!(!parsed.has_preamble);
        assert!(parsed.attendees.is_empty());
        assert!(parsed.speeches.is_empty());
    }

    #[test]
    fn test_resolve_document() {
        let parsed = parse_document(&plenary_pages(), Lexicon::shared());
        let mut directory = SpeakerDirectory::new();
        let url = "https://example.jp/files/rei-wa-6nen-daiyon-kai-teireikai-3r061217.pdf";
        let doc = resolve_document(parsed, &mut directory, Some(url), &PipelineConfig::default());

        let sequences: Vec<usize> = doc.speeches.iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3]);

        assert_eq!(doc.speeches[0].match_strategy, MatchStrategy::ExactFamily);
        assert_eq!(doc.speeches[0].full_name.as_deref(), Some("大下正幸"));
        assert_eq!(doc.speeches[0].confidence, Confidence::High.score());
        assert_eq!(doc.speeches[1].match_strategy, MatchStrategy::ParenHint);
        assert_eq!(doc.speeches[1].full_name.as_deref(), Some("山本数博"));
        assert_eq!(doc.speeches[2].match_strategy, MatchStrategy::ExactFamily);
        assert_eq!(doc.speeches[3].match_strategy, MatchStrategy::Unresolved);
        assert_eq!(doc.speeches[3].confidence, 0.3);

        assert_eq!(doc.stats.matched, 3);
        assert_eq!(doc.stats.unmatched, 1);
        assert_eq!(doc.stats.by_strategy.get("exact_family"), Some(&2));
        assert_eq!(
            doc.session.as_ref().map(|s| s.session_name.as_str()),
            Some("令和6年第4回定例会")
        );
        // Unresolved names are not learned by default
        assert!(directory.speaker_by_name("田中").is_none());
    }

    #[test]
    fn test_learn_unresolved_feeds_next_document() {
        let mut directory = SpeakerDirectory::new();
        let config = PipelineConfig {
            learn_unresolved: true,
            ..Default::default()
        };

        let first = resolve_document(
            parse_document(&plenary_pages(), Lexicon::shared()),
            &mut directory,
            None,
            &config,
        );
        assert_eq!(first.speeches[3].match_strategy, MatchStrategy::Unresolved);
        assert!(first.session.is_none());

        let second = resolve_document(
            parse_document(&plenary_pages(), Lexicon::shared()),
            &mut directory,
            None,
            &config,
        );
        assert_eq!(second.speeches[3].match_strategy, MatchStrategy::AliasNorm);
        assert_eq!(second.stats.unmatched, 0);
    }

    #[test]
    fn test_match_rate() {
        assert_eq!(MatchStats::default().match_rate(), 0.0);
        let stats = MatchStats {
            matched: 3,
            unmatched: 1,
            ..Default::default()
        };
        assert_eq!(stats.match_rate(), 0.75);
    }
}

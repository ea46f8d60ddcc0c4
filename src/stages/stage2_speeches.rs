use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::parse_speaker_name_with;
use crate::heuristics::{is_name_like, original_offset, remove_whitespace, Lexicon, SPEECH_MARKER};
use crate::models::{PageText, RawSpeechSegment, SpeakerName};

/// A non-empty line tagged with the page it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    pub page: u32,
    pub line: String,
}

/// A recognised speaker label at the start of a marker line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerLine {
    /// Label with its original spacing, marker removed
    pub raw: String,
    /// Utterance text following the label on the same line, trimmed
    pub rest: String,
}

/// Classification of one body line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechLine {
    /// Decorative rule made of tildes and circles
    Separator,
    /// Start of a new speaker turn
    Speaker(SpeakerLine),
    /// Ordinary text, including marker lines that are not speaker labels
    Body(String),
}

/// The turn currently being accumulated
#[derive(Debug, Clone)]
pub struct OpenSpeech {
    raw: String,
    speaker: SpeakerName,
    lines: Vec<String>,
    page_start: u32,
    page_end: u32,
}

impl OpenSpeech {
    fn into_segment(self) -> Option<RawSpeechSegment> {
        let speech_text = self.lines.join("\n").trim().to_string();
        if speech_text.is_empty() {
            return None;
        }
        Some(RawSpeechSegment {
            speaker_name_raw: self.raw,
            speaker_name: self.speaker.name,
            speaker_role: self.speaker.role,
            speech_text,
            page_start: self.page_start,
            page_end: self.page_end,
            confidence: self.speaker.confidence,
        })
    }
}

/// Segmentation state: before the first speaker, or inside a turn
#[derive(Debug, Clone)]
pub enum SpeechState {
    Idle,
    Speaking(OpenSpeech),
}

/// Segments the page stream into speaker-labelled turns
pub struct SpeechParser<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> SpeechParser<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn parse_pages(&self, pages: &[PageText]) -> Vec<RawSpeechSegment> {
        let mut segments = Vec::new();
        let mut state = SpeechState::Idle;

        for PageLine { page, line } in flatten_pages(pages) {
            let event = self.classify(&line);
            state = self.step(state, event, page, &mut segments);
        }
        if let SpeechState::Speaking(open) = state {
            segments.extend(open.into_segment());
        }

        debug!("Segmented {} speech(es)", segments.len());
        segments
    }

    pub fn classify(&self, line: &str) -> SpeechLine {
        if is_separator(line) {
            return SpeechLine::Separator;
        }
        if line.starts_with(SPEECH_MARKER) {
            if let Some(speaker) = self.match_speaker_line(line) {
                return SpeechLine::Speaker(speaker);
            }
        }
        SpeechLine::Body(line.to_string())
    }

    /// Apply one line to the state, flushing finished turns into `out`
    pub fn step(
        &self,
        state: SpeechState,
        event: SpeechLine,
        page: u32,
        out: &mut Vec<RawSpeechSegment>,
    ) -> SpeechState {
        match (state, event) {
            (state, SpeechLine::Separator) => state,
            (state, SpeechLine::Speaker(speaker)) => {
                if let SpeechState::Speaking(open) = state {
                    out.extend(open.into_segment());
                }
                let mut lines = Vec::new();
                if !speaker.rest.is_empty() {
                    lines.push(speaker.rest);
                }
                SpeechState::Speaking(OpenSpeech {
                    speaker: parse_speaker_name_with(&speaker.raw, self.lexicon),
                    raw: speaker.raw,
                    lines,
                    page_start: page,
                    page_end: page,
                })
            }
            // Text ahead of the first recognised speaker is dropped
            (SpeechState::Idle, SpeechLine::Body(_)) => SpeechState::Idle,
            (SpeechState::Speaking(mut open), SpeechLine::Body(text)) => {
                open.lines.push(text);
                open.page_end = page;
                SpeechState::Speaking(open)
            }
        }
    }

    /// Recognise a speaker label at the start of a marker line
    ///
    /// Prefers the label with the shortest name (the earliest first
    /// occurrence of any role title within the name length limit), then the
    /// longest title at that position. Falls back to a bare short name with
    /// nothing else on the line.
    pub fn match_speaker_line(&self, line: &str) -> Option<SpeakerLine> {
        let after = line.strip_prefix(SPEECH_MARKER)?;
        if after.is_empty() {
            return None;
        }
        let normalized = remove_whitespace(after);
        let roles = self.lexicon.roles();

        for (name_chars, (pos, _)) in normalized
            .char_indices()
            .enumerate()
            .skip(1)
            .take(self.lexicon.max_speaker_name_chars())
        {
            if !is_name_like(&normalized[..pos]) {
                break;
            }
            if let Some(title) = roles.first_occurrences_at(&normalized, pos).first() {
                let label_chars = name_chars + title.chars().count();
                let end = original_offset(after, label_chars);
                return Some(SpeakerLine {
                    raw: after[..end].to_string(),
                    rest: after[end..].trim().to_string(),
                });
            }
        }

        bare_name_label(line).map(|raw| SpeakerLine {
            raw,
            rest: String::new(),
        })
    }
}

/// Segment the document with the default lexicon
pub fn parse_speeches(pages: &[PageText]) -> Vec<RawSpeechSegment> {
    SpeechParser::new(Lexicon::shared()).parse_pages(pages)
}

/// Flatten pages into right-trimmed lines, dropping blanks and bare page numbers
pub fn flatten_pages(pages: &[PageText]) -> Vec<PageLine> {
    static PAGE_NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    let page_number =
        PAGE_NUMBER_RE.get_or_init(|| Regex::new(r"^\s*[0-9]+\s*$").expect("static regex"));

    pages
        .iter()
        .flat_map(|page| {
            page.text
                .split('\n')
                .filter(|line| !page_number.is_match(line))
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .map(move |line| PageLine {
                    page: page.page,
                    line: line.to_string(),
                })
        })
        .collect()
}

fn is_separator(line: &str) -> bool {
    static SEPARATOR_RE: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_RE
        .get_or_init(|| Regex::new(r"^[～~○◯\s]+$").expect("static regex"))
        .is_match(line)
}

/// `○` followed only by a short kanji/kana name, optionally space separated
fn bare_name_label(line: &str) -> Option<String> {
    static BARE_NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = BARE_NAME_RE.get_or_init(|| {
        Regex::new(
            r"^○([\p{Han}\p{Katakana}\p{Hiragana}]{1,10}(?:\s+[\p{Han}\p{Katakana}\p{Hiragana}]{1,5})*)\s*$",
        )
        .expect("static regex")
    });
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;

    fn parser() -> SpeechParser<'static> {
        SpeechParser::new(Lexicon::shared())
    }

    fn matched(line: &str) -> SpeakerLine {
        parser()
            .match_speaker_line(line)
            .unwrap_or_else(|| panic!("no speaker in {line}"))
    }

    #[test]
    fn test_match_label_only() {
        let result = matched("○大 下 議 長");
        assert_eq!(result.raw, "大 下 議 長");
        assert_eq!(result.rest, "");
    }

    #[test]
    fn test_match_label_with_utterance() {
        let result = matched("○大下議長ただいまの出席議員は17名であります。");
        assert_eq!(result.raw, "大下議長");
        assert_eq!(result.rest, "ただいまの出席議員は17名であります。");
    }

    #[test]
    fn test_match_long_title_with_utterance() {
        let result = matched("○南澤産業厚生常任委員長まず1点目");
        assert_eq!(result.raw, "南澤産業厚生常任委員長");
        assert_eq!(result.rest, "まず1点目");
    }

    #[test]
    fn test_match_member_with_utterance() {
        let result = matched("○南澤委員賛成の立場で討論いたします。");
        assert_eq!(result.raw, "南澤委員");
        assert_eq!(result.rest, "賛成の立場で討論いたします。");
    }

    #[test]
    fn test_match_section_chief_prefers_longer_title() {
        let result = matched("○沖田財政課長本案は、安芸髙田市公の施設における");
        assert_eq!(result.raw, "沖田財政課長");
        assert_eq!(result.rest, "本案は、安芸髙田市公の施設における");
    }

    #[test]
    fn test_match_compound_secretariat_title() {
        let result = matched("○稲田農業委員会事務局長農業委員会事務局に係る要点を説明します。");
        assert_eq!(result.raw, "稲田農業委員会事務局長");
        assert_eq!(result.rest, "農業委員会事務局に係る要点を説明します。");
    }

    #[test]
    fn test_match_spaced_label_with_utterance() {
        let result = matched("○宍 戸 議 員　議長、質問があります。");
        assert_eq!(result.raw, "宍 戸 議 員");
        assert_eq!(result.rest, "議長、質問があります。");
    }

    #[test]
    fn test_match_parenthesised_name() {
        let result = matched("○山本（数）委員　質問します。");
        assert_eq!(result.raw, "山本（数）委員");
        assert_eq!(result.rest, "質問します。");
    }

    #[test]
    fn test_match_bare_name_fallback() {
        let result = matched("○田中 太郎");
        assert_eq!(result.raw, "田中 太郎");
        assert_eq!(result.rest, "");
    }

    #[test]
    fn test_title_beyond_name_limit_is_ignored() {
        // 議長 only appears after a long run of text
        assert!(parser()
            .match_speaker_line("○以上をもちまして本日の日程は全部終了しました議長")
            .is_none());
    }

    #[test]
    fn test_marker_alone_is_not_a_speaker() {
        assert!(parser().match_speaker_line("○").is_none());
        assert!(parser().match_speaker_line("大下議長").is_none());
    }

    #[test]
    fn test_agenda_marker_line_is_not_a_speaker() {
        assert!(parser().match_speaker_line("○日程第１　会議録署名議員の指名").is_none());
    }

    #[test]
    fn test_flatten_drops_page_numbers() {
        let pages = vec![PageText::new(1, "内容\n3\n次の内容")];
        let lines: Vec<String> = flatten_pages(&pages).into_iter().map(|l| l.line).collect();
        assert_eq!(lines, vec!["内容", "次の内容"]);
    }

    #[test]
    fn test_flatten_drops_blank_lines() {
        let pages = vec![PageText::new(1, "行1\n\n  \n行2  ")];
        let lines: Vec<String> = flatten_pages(&pages).into_iter().map(|l| l.line).collect();
        assert_eq!(lines, vec!["行1", "行2"]);
    }

    #[test]
    fn test_flatten_tracks_pages() {
        let pages = vec![PageText::new(1, "1ページ目"), PageText::new(2, "2ページ目")];
        let lines = flatten_pages(&pages);
        assert_eq!(lines[0].page, 1);
        assert_eq!(lines[1].page, 2);
    }

    #[test]
    fn test_classify_separator() {
        assert_eq!(parser().classify("～～～～◯～～～～"), SpeechLine::Separator);
        assert_eq!(parser().classify("○"), SpeechLine::Separator);
    }

    #[test]
    fn test_step_discards_text_before_first_speaker() {
        let p = parser();
        let mut out = Vec::new();
        let state = p.step(SpeechState::Idle, SpeechLine::Body("議事日程".into()), 1, &mut out);
        assert!(matches!(state, SpeechState::Idle));
        assert!(out.is_empty());
    }

    #[test]
    fn test_step_flushes_on_new_speaker() {
        let p = parser();
        let mut out = Vec::new();
        let speaker = |raw: &str| {
            SpeechLine::Speaker(SpeakerLine {
                raw: raw.to_string(),
                rest: String::new(),
            })
        };

        let state = p.step(SpeechState::Idle, speaker("大下議長"), 3, &mut out);
        let state = p.step(state, SpeechLine::Body("発言".into()), 4, &mut out);
        assert!(out.is_empty());

        let state = p.step(state, speaker("宍戸議員"), 5, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].speaker_name, "大下");
        assert_eq!(out[0].page_start, 3);
        assert_eq!(out[0].page_end, 4);
        assert!(matches!(state, SpeechState::Speaking(_)));
    }

    #[test]
    fn test_empty_turn_is_dropped() {
        let pages = vec![PageText::new(1, "○大 下 議 長\n○宍 戸 議 員\n　質問")];
        let speeches = parse_speeches(&pages);
        assert_eq!(speeches.len(), 1);
        assert_eq!(speeches[0].speaker_name, "宍戸");
    }

    #[test]
    fn test_basic_segmentation() {
        let pages = vec![PageText::new(
            3,
            [
                "○大 下 議 長",
                "　ただいまの出席議員は17名であります。",
                "定足数に達しておりますので、ただいまから本日の会議を開きます。",
                "○宍 戸 議 員",
                "　議長、質問があります。",
            ]
            .join("\n"),
        )];

        let speeches = parse_speeches(&pages);
        assert_eq!(speeches.len(), 2);

        assert_eq!(speeches[0].speaker_name_raw, "大 下 議 長");
        assert_eq!(speeches[0].speaker_name, "大下");
        assert_eq!(speeches[0].speaker_role, "議長");
        assert_eq!(speeches[0].confidence, Confidence::High);
        assert!(speeches[0].speech_text.contains("出席議員は17名"));
        assert!(speeches[0].speech_text.contains('\n'));
        assert_eq!(speeches[0].page_start, 3);
        assert_eq!(speeches[0].page_end, 3);

        assert_eq!(speeches[1].speaker_name, "宍戸");
        assert_eq!(speeches[1].speaker_role, "議員");
        assert_eq!(speeches[1].speech_text, "議長、質問があります。");
    }

    #[test]
    fn test_same_line_utterances() {
        let pages = vec![PageText::new(
            3,
            "○大下議長ただいまの出席議員は17名であります。\n○南澤委員賛成の立場で討論いたします。",
        )];

        let speeches = parse_speeches(&pages);
        assert_eq!(speeches.len(), 2);
        assert_eq!(speeches[0].speaker_name, "大下");
        assert_eq!(speeches[0].speaker_role, "議長");
        assert_eq!(speeches[0].speech_text, "ただいまの出席議員は17名であります。");
        assert_eq!(speeches[1].speaker_name, "南澤");
        assert_eq!(speeches[1].speaker_role, "委員");
        assert_eq!(speeches[1].speech_text, "賛成の立場で討論いたします。");
    }

    #[test]
    fn test_separators_are_skipped() {
        let pages = vec![PageText::new(
            3,
            "○大 下 議 長\n　発言内容\n～～～～～～～～◯～～～～～～～～\n○宍 戸 議 員\n　次の発言",
        )];
        let speeches = parse_speeches(&pages);
        assert_eq!(speeches.len(), 2);
        assert_eq!(speeches[0].speech_text, "発言内容");
    }

    #[test]
    fn test_unrecognised_marker_line_is_body_text() {
        let pages = vec![PageText::new(
            3,
            "○大 下 議 長\n　それでは日程に入ります。\n○日程第１　会議録署名議員の指名\n　指名します。",
        )];
        let speeches = parse_speeches(&pages);
        assert_eq!(speeches.len(), 1);
        assert!(speeches[0].speech_text.contains("○日程第１"));
        assert!(speeches[0].speech_text.ends_with("指名します。"));
    }

    #[test]
    fn test_preamble_text_is_skipped() {
        let pages = vec![PageText::new(1, "議事日程\n出席議員リスト\n○大 下 議 長\n　発言内容")];
        let speeches = parse_speeches(&pages);
        assert_eq!(speeches.len(), 1);
        assert_eq!(speeches[0].speaker_name, "大下");
    }

    #[test]
    fn test_page_range_spans_pages() {
        let pages = vec![
            PageText::new(3, "○大 下 議 長\n　発言開始"),
            PageText::new(4, "　発言続き\n4"),
            PageText::new(5, "○宍 戸 議 員\n　新しい発言"),
        ];
        let speeches = parse_speeches(&pages);
        assert_eq!(speeches.len(), 2);
        assert_eq!(speeches[0].page_start, 3);
        assert_eq!(speeches[0].page_end, 4);
        assert_eq!(speeches[1].page_start, 5);
        assert_eq!(speeches[1].page_end, 5);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(parse_speeches(&[]).is_empty());
        let pages = vec![PageText::new(1, "前文のみのテキスト\n何も発言なし")];
        assert!(parse_speeches(&pages).is_empty());
    }
}

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::extract_preamble;
use crate::heuristics::{
    extract_family_name, is_fullwidth_digit, is_kanji_or_kana, remove_whitespace,
    to_halfwidth_digits, Lexicon,
};
use crate::models::{Attendee, AttendeeCategory, PageText};

/// Role recorded for councilors taken from the numbered roster
pub const COUNCILOR_ROLE: &str = "議員";

/// Heading phrases that open a roster section
const SECTION_HEADINGS: [(&str, Section); 6] = [
    ("出席議員", Section::Councilor),
    ("出席委員", Section::Councilor),
    ("説明のため出席した者", Section::Executive),
    ("規定により出席した者", Section::Executive),
    ("事務局の職氏名", Section::Staff),
    ("事務局職員", Section::Staff),
];

/// Roster section the parser is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Councilor,
    Executive,
    Staff,
}

impl Section {
    pub fn category(self) -> Option<AttendeeCategory> {
        match self {
            Section::None => None,
            Section::Councilor => Some(AttendeeCategory::Councilor),
            Section::Executive => Some(AttendeeCategory::Executive),
            Section::Staff => Some(AttendeeCategory::Staff),
        }
    }

    /// Section state after reading a line of the given kind
    pub fn next(self, line: PreambleLine) -> Section {
        match line {
            PreambleLine::Blank | PreambleLine::Content => self,
            PreambleLine::Heading(section) => section,
            PreambleLine::SectionEnd => Section::None,
        }
    }
}

/// Classification of one preamble line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreambleLine {
    Blank,
    /// Heading that opens a section; carries no attendee data itself
    Heading(Section),
    /// A new enumerated top-level item (`３．` .. `９．`) closing the section
    SectionEnd,
    Content,
}

impl PreambleLine {
    pub fn classify(line: &str) -> Self {
        static SECTION_END_RE: OnceLock<Regex> = OnceLock::new();
        let section_end =
            SECTION_END_RE.get_or_init(|| Regex::new(r"^[０-９\s]*[３-９]．").expect("static regex"));

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return PreambleLine::Blank;
        }
        // A heading that is also an enumerated item opens the new section directly
        let normalized = remove_whitespace(trimmed);
        if let Some(&(_, section)) = SECTION_HEADINGS
            .iter()
            .find(|(phrase, _)| normalized.contains(phrase))
        {
            return PreambleLine::Heading(section);
        }
        if section_end.is_match(trimmed) {
            return PreambleLine::SectionEnd;
        }
        PreambleLine::Content
    }
}

/// Turns preamble text into an attendee roster
pub struct AttendeeParser<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> AttendeeParser<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Parse the attendees listed ahead of the first speaker turn
    pub fn parse_pages(&self, pages: &[PageText]) -> Vec<Attendee> {
        match extract_preamble(pages) {
            Some(preamble) => self.parse_preamble(&preamble),
            None => {
                debug!("No speech marker found; skipping attendee parse");
                Vec::new()
            }
        }
    }

    pub fn parse_preamble(&self, preamble: &str) -> Vec<Attendee> {
        let mut attendees = Vec::new();
        let mut section = Section::None;

        for line in preamble.split('\n') {
            let kind = PreambleLine::classify(line);
            let current = section;
            section = section.next(kind);
            if kind != PreambleLine::Content {
                continue;
            }

            let trimmed = line.trim();
            match current {
                Section::None => {}
                Section::Councilor if has_seat_number(trimmed) => {
                    attendees.extend(self.parse_roster_line(trimmed));
                }
                Section::Councilor => {
                    // Committee minutes list members as `委員長芦田宏治副委員長...`
                    attendees.extend(self.parse_role_line(trimmed, AttendeeCategory::Councilor));
                }
                Section::Executive => {
                    attendees.extend(self.parse_role_line(trimmed, AttendeeCategory::Executive));
                }
                Section::Staff => {
                    attendees.extend(self.parse_role_line(trimmed, AttendeeCategory::Staff));
                }
            }
        }

        debug!(
            "Parsed {} attendee(s) from {} preamble line(s)",
            attendees.len(),
            preamble.split('\n').count()
        );
        attendees
    }

    /// Parse a numbered roster line such as `１番　南 澤 克 彦　　２番　田 邊 介 三`
    pub fn parse_roster_line(&self, line: &str) -> Vec<Attendee> {
        static SEAT_RE: OnceLock<Regex> = OnceLock::new();
        let seat_re = SEAT_RE.get_or_init(|| Regex::new(r"([０-９\s]+)番").expect("static regex"));

        let mut attendees = Vec::new();
        for chunk in split_roster_entries(line) {
            let chunk = chunk.trim();
            let Some(caps) = seat_re.captures(chunk) else {
                continue;
            };
            let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let seat_number = to_halfwidth_digits(&remove_whitespace(digits.as_str()))
                .parse::<u32>()
                .ok();
            let name = chunk[whole.end()..].trim();
            let full_name = remove_whitespace(name);
            if full_name.chars().count() < self.lexicon.min_name_chars() {
                continue;
            }

            attendees.push(Attendee {
                family_name: extract_family_name(name),
                full_name,
                role: COUNCILOR_ROLE.to_string(),
                seat_number,
                category: AttendeeCategory::Councilor,
            });
        }
        attendees
    }

    /// Parse a line of alternating titles and names, e.g. `市長石丸伸二副市長米村公男`
    pub fn parse_role_line(&self, line: &str, category: AttendeeCategory) -> Vec<Attendee> {
        let normalized = remove_whitespace(line);
        let roles = self.lexicon.roles().scan(&normalized);

        let mut attendees = Vec::new();
        for (i, role) in roles.iter().enumerate() {
            let name_end = roles.get(i + 1).map_or(normalized.len(), |next| next.start);
            let name = self.lexicon.truncate_to_name(&normalized[role.end..name_end]);
            if name.chars().count() < self.lexicon.min_name_chars() {
                continue;
            }

            attendees.push(Attendee {
                family_name: self.lexicon.guess_family_name(&name),
                full_name: name,
                role: role.title.to_string(),
                seat_number: None,
                category,
            });
        }
        attendees
    }
}

/// Parse the attendee roster with the default lexicon
pub fn parse_attendees(pages: &[PageText]) -> Vec<Attendee> {
    AttendeeParser::new(Lexicon::shared()).parse_pages(pages)
}

/// Whether the line carries a seat number (fullwidth digits followed by `番`)
fn has_seat_number(line: &str) -> bool {
    static SEAT_MARKER_RE: OnceLock<Regex> = OnceLock::new();
    SEAT_MARKER_RE
        .get_or_init(|| Regex::new(r"[０-９][０-９\s]*番").expect("static regex"))
        .is_match(line)
}

/// Split a roster line before every seat number that follows a name
///
/// A boundary is a fullwidth digit whose nearest preceding non-whitespace
/// character is kanji or kana; whitespace stays with the previous entry.
fn split_roster_entries(line: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut last_visible: Option<char> = None;

    for (i, c) in line.char_indices() {
        if is_fullwidth_digit(c) && i > start && last_visible.is_some_and(is_kanji_or_kana) {
            entries.push(&line[start..i]);
            start = i;
        }
        if !c.is_whitespace() {
            last_visible = Some(c);
        }
    }
    entries.push(&line[start..]);
    entries
}

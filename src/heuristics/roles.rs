use std::collections::{HashMap, HashSet};

/// Built-in role titles in priority order
///
/// More specific titles come before the generic titles they end with
/// (`副委員長` before `委員長`, `事務局長` before `局長`). Suffix matching
/// relies on this order; occurrence scanning uses earliest-then-longest.
pub const DEFAULT_ROLE_TITLES: [&str; 37] = [
    "予算決算常任委員長",
    "総務文教常任委員長",
    "産業建設常任委員長",
    "産業厚生常任委員長",
    "農業委員会事務局長",
    "常任委員長",
    "特別委員長",
    "副委員長",
    "委員長",
    "副議長",
    "議長",
    "議員",
    "副市長",
    "市長",
    "教育長",
    "総務部長",
    "企画部長",
    "市民部長",
    "福祉保健部長",
    "産業部長",
    "建設部長",
    "消防長",
    "危機管理監",
    "財政課長",
    "総務課長",
    "会計管理者",
    "水道局長",
    "教育次長",
    "事務局長",
    "部長",
    "課長",
    "局長",
    "参事",
    "次長",
    "監査委員",
    "委員",
    "書記",
];

/// A role title found in a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMatch<'a> {
    pub title: &'a str,
    /// Byte offset of the first character of the title
    pub start: usize,
    /// Byte offset just past the title
    pub end: usize,
}

/// Priority-ordered role titles with precomputed lookup tables
///
/// Titles are bucketed by first character (longest first) for occurrence
/// scans and by last character (priority order) for suffix checks, so a scan
/// touches only the titles that can start or end at a given character.
#[derive(Debug, Clone)]
pub struct RoleTable {
    titles: Vec<String>,
    by_first_char: HashMap<char, Vec<usize>>,
    by_last_char: HashMap<char, Vec<usize>>,
}

impl RoleTable {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let titles: Vec<String> = titles
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.is_empty() && seen.insert(t.clone()))
            .collect();

        let mut by_first_char: HashMap<char, Vec<usize>> = HashMap::new();
        let mut by_last_char: HashMap<char, Vec<usize>> = HashMap::new();
        for (i, title) in titles.iter().enumerate() {
            if let (Some(first), Some(last)) = (title.chars().next(), title.chars().last()) {
                by_first_char.entry(first).or_default().push(i);
                by_last_char.entry(last).or_default().push(i);
            }
        }
        // Longest first so the first hit at a position is the longest title there
        for bucket in by_first_char.values_mut() {
            bucket.sort_by(|&a, &b| {
                titles[b]
                    .chars()
                    .count()
                    .cmp(&titles[a].chars().count())
                    .then(a.cmp(&b))
            });
        }

        Self {
            titles,
            by_first_char,
            by_last_char,
        }
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Longest title starting exactly at byte offset `pos`
    pub fn longest_at(&self, text: &str, pos: usize) -> Option<RoleMatch<'_>> {
        let rest = text.get(pos..)?;
        let first = rest.chars().next()?;
        self.by_first_char.get(&first)?.iter().find_map(|&i| {
            let title = self.titles[i].as_str();
            rest.starts_with(title).then(|| RoleMatch {
                title,
                start: pos,
                end: pos + title.len(),
            })
        })
    }

    /// Leftmost title occurrence at or after byte offset `from`, ties broken by length
    pub fn earliest_from(&self, text: &str, from: usize) -> Option<RoleMatch<'_>> {
        let rest = text.get(from..)?;
        rest.char_indices()
            .find_map(|(offset, _)| self.longest_at(text, from + offset))
    }

    /// Ordered, non-overlapping title occurrences scanning left to right
    pub fn scan(&self, text: &str) -> Vec<RoleMatch<'_>> {
        let mut matches = Vec::new();
        let mut cursor = 0;
        while cursor < text.len() {
            let Some(m) = self.earliest_from(text, cursor) else {
                break;
            };
            cursor = m.end;
            matches.push(m);
        }
        matches
    }

    /// First title in priority order that `text` ends with, leaving a non-empty prefix
    pub fn suffix_of(&self, text: &str) -> Option<RoleMatch<'_>> {
        let last = text.chars().last()?;
        self.by_last_char.get(&last)?.iter().find_map(|&i| {
            let title = self.titles[i].as_str();
            (text.len() > title.len() && text.ends_with(title)).then(|| RoleMatch {
                title,
                start: text.len() - title.len(),
                end: text.len(),
            })
        })
    }

    /// Titles whose first occurrence in `text` starts at byte offset `pos`, longest first
    pub fn first_occurrences_at(&self, text: &str, pos: usize) -> Vec<&str> {
        let Some(first) = text.get(pos..).and_then(|rest| rest.chars().next()) else {
            return Vec::new();
        };
        self.by_first_char
            .get(&first)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|&i| self.titles[i].as_str())
                    .filter(|title| text.find(title) == Some(pos))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_TITLES)
    }
}

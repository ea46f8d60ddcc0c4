use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::trace;

use crate::heuristics::remove_whitespace;
use crate::models::{Confidence, MatchStrategy, ResolveResult};

/// Minimum family-name length for prefix matching, in characters
const MIN_PREFIX_CHARS: usize = 2;

/// Per-document lookup from attendee names to speaker ids
///
/// Iteration order is insertion order, so "first match" scans are stable
/// for a given roster.
#[derive(Debug, Clone, Default)]
pub struct AttendeeIndex {
    by_full_name: IndexMap<String, String>,
    by_family_name: IndexMap<String, String>,
}

impl AttendeeIndex {
    /// Build from `(full_name, family_name, speaker_id)` entries
    ///
    /// A family name claimed by two different speaker ids is left out of the
    /// family lookup entirely.
    pub fn from_entries<I, F, N, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (F, N, S)>,
        F: Into<String>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut by_full_name = IndexMap::new();
        let mut by_family_name: IndexMap<String, String> = IndexMap::new();
        let mut ambiguous = HashSet::new();

        for (full_name, family_name, speaker_id) in entries {
            let (full_name, family_name, speaker_id) =
                (full_name.into(), family_name.into(), speaker_id.into());

            if !family_name.is_empty() && !ambiguous.contains(&family_name) {
                match by_family_name.get(&family_name).cloned() {
                    Some(existing) if existing != speaker_id => {
                        by_family_name.shift_remove(&family_name);
                        ambiguous.insert(family_name);
                    }
                    Some(_) => {}
                    None => {
                        by_family_name.insert(family_name, speaker_id.clone());
                    }
                }
            }
            if !full_name.is_empty() {
                by_full_name.insert(full_name, speaker_id);
            }
        }

        Self {
            by_full_name,
            by_family_name,
        }
    }

    pub fn by_full_name(&self) -> &IndexMap<String, String> {
        &self.by_full_name
    }

    pub fn by_family_name(&self) -> &IndexMap<String, String> {
        &self.by_family_name
    }

    /// Reverse lookup of the first full name registered for a speaker
    pub fn full_name_of(&self, speaker_id: &str) -> Option<&str> {
        self.by_full_name
            .iter()
            .find(|(_, id)| id.as_str() == speaker_id)
            .map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.by_full_name.is_empty() && self.by_family_name.is_empty()
    }
}

/// Read-only snapshot of a jurisdiction's aliases: normalised label to speaker id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasIndex(HashMap<String, String>);

impl AliasIndex {
    pub fn get(&self, alias_norm: &str) -> Option<&str> {
        self.0.get(alias_norm).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for AliasIndex {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Resolves parsed speaker names against a roster and alias index
///
/// Strategies run in a fixed order and the first hit wins. The family-name
/// and prefix strategies decline rather than guess between attendees.
pub struct SpeakerResolver<'a> {
    attendees: &'a AttendeeIndex,
    aliases: &'a AliasIndex,
}

impl<'a> SpeakerResolver<'a> {
    pub fn new(attendees: &'a AttendeeIndex, aliases: &'a AliasIndex) -> Self {
        Self { attendees, aliases }
    }

    /// Resolve a name; the role is accepted but does not affect matching yet
    pub fn resolve(&self, name: &str, _role: Option<&str>) -> ResolveResult {
        let norm = remove_whitespace(name);
        if norm.is_empty() {
            return ResolveResult::unresolved();
        }

        let result = self
            .exact_full_name(&norm)
            .or_else(|| self.exact_family_name(&norm))
            .or_else(|| self.alias(&norm))
            .or_else(|| self.paren_hint(&norm))
            .or_else(|| self.unique_prefix(&norm))
            .unwrap_or_else(ResolveResult::unresolved);

        trace!("Resolved {:?} via {}", norm, result.match_strategy.as_str());
        result
    }

    fn exact_full_name(&self, norm: &str) -> Option<ResolveResult> {
        let id = self.attendees.by_full_name.get(norm)?;
        Some(ResolveResult::resolved(
            id.as_str(),
            Some(norm.to_string()),
            Confidence::High,
            MatchStrategy::ExactFullname,
        ))
    }

    fn exact_family_name(&self, norm: &str) -> Option<ResolveResult> {
        let id = self.attendees.by_family_name.get(norm)?;
        Some(ResolveResult::resolved(
            id.as_str(),
            self.attendees.full_name_of(id).map(str::to_string),
            Confidence::High,
            MatchStrategy::ExactFamily,
        ))
    }

    fn alias(&self, norm: &str) -> Option<ResolveResult> {
        let id = self.aliases.get(norm)?;
        Some(ResolveResult::resolved(
            id,
            self.attendees.full_name_of(id).map(str::to_string),
            Confidence::High,
            MatchStrategy::AliasNorm,
        ))
    }

    /// `山本(数)` picks the attendee whose full name extends `山本` and contains `数`
    fn paren_hint(&self, norm: &str) -> Option<ResolveResult> {
        static PAREN_RE: OnceLock<Regex> = OnceLock::new();
        let re = PAREN_RE.get_or_init(|| Regex::new(r"^(.+)[（(](.+)[）)]$").expect("static regex"));

        let caps = re.captures(norm)?;
        let (base, hint) = (&caps[1], &caps[2]);

        self.attendees
            .by_full_name
            .iter()
            .find(|(full_name, _)| {
                full_name.len() > base.len() && full_name.starts_with(base) && full_name.contains(hint)
            })
            .map(|(full_name, id)| {
                ResolveResult::resolved(
                    id.as_str(),
                    Some(full_name.clone()),
                    Confidence::High,
                    MatchStrategy::ParenHint,
                )
            })
    }

    fn unique_prefix(&self, norm: &str) -> Option<ResolveResult> {
        let mut candidates = self
            .attendees
            .by_family_name
            .iter()
            .filter(|(family, _)| {
                family.chars().count() >= MIN_PREFIX_CHARS && norm.starts_with(family.as_str())
            })
            .filter_map(|(_, id)| Some((id, self.attendees.full_name_of(id)?)));

        let (id, full_name) = candidates.next()?;
        if candidates.next().is_some() {
            return None;
        }
        Some(ResolveResult::resolved(
            id.as_str(),
            Some(full_name.to_string()),
            Confidence::Medium,
            MatchStrategy::Prefix,
        ))
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::heuristics::remove_whitespace;
use crate::models::AliasEntry;
use crate::stages::AliasIndex;

/// Jurisdiction-wide alias store keyed by normalised label
///
/// A key already owned by a different speaker is only taken over by an
/// alias of strictly higher provenance (manual > attendee > speech).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<AliasEntry>", into = "Vec<AliasEntry>")]
pub struct AliasTable {
    entries: IndexMap<String, AliasEntry>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias, returning whether the table changed
    pub fn register(&mut self, mut entry: AliasEntry) -> bool {
        entry.alias_norm = remove_whitespace(&entry.alias_norm);
        if entry.alias_norm.is_empty() {
            return false;
        }

        match self.entries.get(&entry.alias_norm) {
            None => {}
            Some(existing) if existing.speaker_id == entry.speaker_id => return false,
            Some(existing) if entry.alias_type.priority() <= existing.alias_type.priority() => {
                debug!(
                    "Keeping {:?} for {} over {:?}",
                    existing.alias_type, existing.alias_norm, entry.alias_type
                );
                return false;
            }
            Some(_) => {}
        }

        self.entries.insert(entry.alias_norm.clone(), entry);
        true
    }

    pub fn get(&self, alias_norm: &str) -> Option<&AliasEntry> {
        self.entries.get(alias_norm)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot for a resolver
    pub fn index(&self) -> AliasIndex {
        self.entries
            .iter()
            .map(|(norm, entry)| (norm.clone(), entry.speaker_id.clone()))
            .collect()
    }
}

impl From<Vec<AliasEntry>> for AliasTable {
    fn from(entries: Vec<AliasEntry>) -> Self {
        let mut table = AliasTable::new();
        for entry in entries {
            table.register(entry);
        }
        table
    }
}

impl From<AliasTable> for Vec<AliasEntry> {
    fn from(table: AliasTable) -> Self {
        table.entries.into_values().collect()
    }
}

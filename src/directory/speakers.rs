use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::AliasTable;
use crate::heuristics::remove_whitespace;
use crate::models::{AliasEntry, AliasType, Attendee, SpeakerRole};
use crate::stages::{AliasIndex, AttendeeIndex};

const FULL_NAME_ALIAS_WEIGHT: f64 = 1.0;
const FAMILY_NAME_ALIAS_WEIGHT: f64 = 0.8;
const SPEECH_ALIAS_WEIGHT: f64 = 0.3;

/// A canonical speaker identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: String,
    /// Whitespace-stripped display name
    pub name: String,
    pub role: SpeakerRole,
}

/// Known speakers and aliases for one jurisdiction
///
/// Speakers are found or created by normalised name. Parsing never touches
/// the directory; only document resolution does, one document at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakerDirectory {
    speakers: IndexMap<String, Speaker>,
    aliases: AliasTable,
}

impl SpeakerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the speaker with this name, creating one if needed
    ///
    /// An existing speaker of unknown role picks up the role when the title
    /// is now recognised.
    pub fn find_or_create(&mut self, name: &str, title: &str) -> String {
        let name = remove_whitespace(name);
        let role = SpeakerRole::classify(title);

        if let Some(speaker) = self.speakers.get_mut(&name) {
            if speaker.role == SpeakerRole::Unknown && role != SpeakerRole::Unknown {
                debug!("Learned role {:?} for {}", role, speaker.name);
                speaker.role = role;
            }
            return speaker.id.clone();
        }

        let id = Uuid::new_v4().to_string();
        debug!("New speaker {} ({:?})", name, role);
        self.speakers.insert(
            name.clone(),
            Speaker {
                id: id.clone(),
                name,
                role,
            },
        );
        id
    }

    /// Register a document's attendees and build its lookup index
    ///
    /// Full and family names become attendee-derived aliases. A family name
    /// shared by two attendees is still registered as an alias (first one
    /// wins) but is left out of the returned index.
    pub fn upsert_attendees(&mut self, attendees: &[Attendee]) -> AttendeeIndex {
        let mut entries = Vec::with_capacity(attendees.len());

        for attendee in attendees.iter().filter(|a| !a.full_name.is_empty()) {
            let id = self.find_or_create(&attendee.full_name, &attendee.role);
            self.aliases.register(AliasEntry::new(
                attendee.full_name.as_str(),
                id.as_str(),
                AliasType::AttendeeDerived,
                FULL_NAME_ALIAS_WEIGHT,
            ));
            self.aliases.register(AliasEntry::new(
                attendee.family_name.as_str(),
                id.as_str(),
                AliasType::AttendeeDerived,
                FAMILY_NAME_ALIAS_WEIGHT,
            ));
            entries.push((attendee.full_name.clone(), attendee.family_name.clone(), id));
        }

        let index = AttendeeIndex::from_entries(entries);
        info!(
            "Registered {} attendee(s); {} speaker(s), {} alias(es) known",
            attendees.len(),
            self.speakers.len(),
            self.aliases.len()
        );
        index
    }

    /// Create a provisional speaker for a name nothing matched
    ///
    /// The name is kept as a low-weight speech-derived alias so later
    /// documents resolve it, and so any attendee or manual alias replaces it.
    pub fn record_unresolved(&mut self, name: &str, title: &str) -> Option<String> {
        if remove_whitespace(name).is_empty() {
            return None;
        }
        let id = self.find_or_create(name, title);
        self.aliases.register(AliasEntry::new(
            name,
            id.as_str(),
            AliasType::SpeechDerived,
            SPEECH_ALIAS_WEIGHT,
        ));
        Some(id)
    }

    /// Add an alias directly, e.g. an operator correction
    pub fn register_alias(&mut self, entry: AliasEntry) -> bool {
        self.aliases.register(entry)
    }

    pub fn alias_index(&self) -> AliasIndex {
        self.aliases.index()
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn speaker(&self, id: &str) -> Option<&Speaker> {
        self.speakers.values().find(|s| s.id == id)
    }

    pub fn speaker_by_name(&self, name: &str) -> Option<&Speaker> {
        self.speakers.get(&remove_whitespace(name))
    }

    pub fn speakers(&self) -> impl Iterator<Item = &Speaker> {
        self.speakers.values()
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }
}

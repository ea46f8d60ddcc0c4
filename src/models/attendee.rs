use serde::{Deserialize, Serialize};

/// Which roster section an attendee was listed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeCategory {
    /// Elected member (numbered roster or committee member line)
    Councilor,
    /// Official attending to give explanations (mayor, department heads, ...)
    Executive,
    /// Assembly secretariat staff
    Staff,
}

/// A person listed in the preamble of a minutes document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// Full name with all whitespace removed
    pub full_name: String,
    /// Estimated family name
    pub family_name: String,
    /// Free-text title, e.g. `議員` or `総務部長`
    pub role: String,
    /// Seat number for councilors listed on the numbered roster
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<u32>,
    pub category: AttendeeCategory,
}

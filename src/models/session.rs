use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of assembly meeting a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// 定例会
    Regular,
    /// 臨時会
    Extra,
    /// Standing or special committee
    Committee,
    /// 予算決算常任委員会
    BudgetCommittee,
    Other,
}

/// Session metadata derived from a document's source URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Gregorian fiscal year (Reiwa year + 2018)
    pub fiscal_year: i32,
    pub reiwa_year: i32,
    /// Session ordinal (`第N回`), when the slug carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
    pub session_type: SessionType,
    /// Display name and grouping key, e.g. `令和6年第1回定例会`
    pub session_name: String,
    /// Per-day title, e.g. `令和6年第4回定例会（第3日）`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_title: Option<String>,
    /// Meeting date from an `rYYMMDD` slug token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub held_on: Option<NaiveDate>,
}

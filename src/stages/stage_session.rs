use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::models::{SessionInfo, SessionType};

/// Gregorian year of Reiwa 0
pub const REIWA_EPOCH: i32 = 2018;

const ORDINAL_TOKENS: [(&str, u32); 5] = [
    ("daiikkai", 1),
    ("dai-?ni-?kai", 2),
    ("dai-?san-?kai", 3),
    ("dai-?yon-?kai", 4),
    ("dai-?go-?kai", 5),
];

/// Meeting kinds tested in order; `iinkai` is the catch-all for committees
const SESSION_TOKENS: [(&str, &str, SessionType); 6] = [
    ("teireikai", "定例会", SessionType::Regular),
    ("rinji-?kai", "臨時会", SessionType::Extra),
    ("yosan-?kessan-?jounin-?iinkai", "予算決算常任委員会", SessionType::BudgetCommittee),
    ("soumu-?bunkyou-?jounin-?iinkai", "総務文教常任委員会", SessionType::Committee),
    ("sangyou-?kousei-?jounin-?iinkai", "産業厚生常任委員会", SessionType::Committee),
    ("iinkai", "委員会", SessionType::Committee),
];

struct SlugPatterns {
    reiwa_explicit: Regex,
    reiwa_from_date: Regex,
    ordinals: Vec<(Regex, u32)>,
    ordinal_numeric: Regex,
    sessions: Vec<(Regex, &'static str, SessionType)>,
    meeting_day: Regex,
    date: Regex,
}

fn patterns() -> &'static SlugPatterns {
    static PATTERNS: OnceLock<SlugPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |p: &str| Regex::new(p).expect("static regex");
        SlugPatterns {
            reiwa_explicit: re(r"rei-?wa-?(\d+)-?nen"),
            reiwa_from_date: re(r"[_\-]?r(\d{2})\d{4}"),
            ordinals: ORDINAL_TOKENS.iter().map(|&(p, n)| (re(p), n)).collect(),
            ordinal_numeric: re(r"dai-(\d+)kai"),
            sessions: SESSION_TOKENS
                .iter()
                .map(|&(p, label, kind)| (re(p), label, kind))
                .collect(),
            meeting_day: re(r"teireikai-?(\d+)r"),
            date: re(r"r(\d{2})(\d{2})(\d{2})(?:[_\-.]|$)"),
        }
    })
}

/// Final path segment of a URL, lowercased, without a `.pdf` extension
pub fn url_slug(url: &str) -> String {
    let last = url.rsplit('/').next().unwrap_or_default().to_lowercase();
    match last.strip_suffix(".pdf") {
        Some(stem) => stem.to_string(),
        None => last,
    }
}

/// Derive session metadata from a document URL
///
/// Returns `None` when no Reiwa year can be found. Ordinal and meeting kind
/// are optional; an unrecognised kind yields [`SessionType::Other`] and a
/// session name without a kind label.
pub fn derive_session_info(url: &str) -> Option<SessionInfo> {
    let slug = url_slug(url);
    let p = patterns();

    let explicit_year = capture_number(&p.reiwa_explicit, &slug);
    let reiwa_year = explicit_year.or_else(|| capture_number(&p.reiwa_from_date, &slug))?;
    // Out-of-range era years are treated like a missing year
    let reiwa_year = i32::try_from(reiwa_year).ok()?;
    let fiscal_year = REIWA_EPOCH.checked_add(reiwa_year)?;

    let ordinal = p
        .ordinals
        .iter()
        .find(|(re, _)| re.is_match(&slug))
        .map(|(_, n)| *n)
        .or_else(|| capture_number(&p.ordinal_numeric, &slug));

    let kind = p.sessions.iter().find(|(re, _, _)| re.is_match(&slug));
    let session_type = kind.map_or(SessionType::Other, |(_, _, t)| *t);

    let mut session_name = format!("令和{reiwa_year}年");
    if let Some(n) = ordinal {
        session_name.push_str(&format!("第{n}回"));
    }
    if let Some((_, label, _)) = kind {
        session_name.push_str(label);
    }

    // Day titles need both an explicit era token and a known meeting kind
    let meeting_title = match (explicit_year, kind) {
        (Some(_), Some(_)) => Some(match capture_number(&p.meeting_day, &slug) {
            Some(day) if session_type == SessionType::Regular => format!("{session_name}（第{day}日）"),
            _ => session_name.clone(),
        }),
        _ => None,
    };

    let info = SessionInfo {
        fiscal_year,
        reiwa_year,
        ordinal,
        session_type,
        session_name,
        meeting_title,
        held_on: parse_held_on(&slug),
    };
    debug!("Derived session {:?} from {}", info.session_name, url);
    Some(info)
}

/// Meeting date from an `rYYMMDD` token, rejecting impossible dates
pub fn parse_held_on(slug: &str) -> Option<NaiveDate> {
    let caps = patterns().date.captures(slug)?;
    let field = |i: usize| caps[i].parse::<u32>().ok();
    let (reiwa_year, month, day) = (field(1)?, field(2)?, field(3)?);
    if reiwa_year == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(REIWA_EPOCH + reiwa_year as i32, month, day)
}

fn capture_number(re: &Regex, slug: &str) -> Option<u32> {
    re.captures(slug)?.get(1)?.as_str().parse().ok()
}

use crate::heuristics::{remove_whitespace, Lexicon};
use crate::models::{Confidence, SpeakerName};

/// Split a speaker label into name and role title
///
/// The label is stripped of whitespace and checked against the role table
/// in priority order; the first title it ends with (leaving a non-empty
/// name) wins. Labels without a known title keep the whole text as the name
/// at medium confidence, or low when nothing is left.
pub fn parse_speaker_name_with(raw: &str, lexicon: &Lexicon) -> SpeakerName {
    let normalized = remove_whitespace(raw);

    if let Some(m) = lexicon.roles().suffix_of(&normalized) {
        return SpeakerName {
            name: normalized[..m.start].to_string(),
            role: m.title.to_string(),
            confidence: Confidence::High,
        };
    }

    let confidence = if normalized.is_empty() {
        Confidence::Low
    } else {
        Confidence::Medium
    };
    SpeakerName {
        name: normalized,
        role: String::new(),
        confidence,
    }
}

/// Split a speaker label using the default lexicon
pub fn parse_speaker_name(raw: &str) -> SpeakerName {
    parse_speaker_name_with(raw, Lexicon::shared())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_split(raw: &str, name: &str, role: &str) {
        let result = parse_speaker_name(raw);
        assert_eq!(result.name, name, "name of {raw}");
        assert_eq!(result.role, role, "role of {raw}");
        assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn test_chair() {
        assert_split("大 下 議 長", "大下", "議長");
    }

    #[test]
    fn test_councilor() {
        assert_split("宍 戸 議 員", "宍戸", "議員");
    }

    #[test]
    fn test_long_committee_chair() {
        assert_split("石飛予算決算常任委員長", "石飛", "予算決算常任委員長");
    }

    #[test]
    fn test_mayor_and_deputy() {
        assert_split("藤 田 市 長", "藤田", "市長");
        assert_split("猪掛副市長", "猪掛", "副市長");
    }

    #[test]
    fn test_vice_chair_is_not_split_inside_title() {
        assert_split("山本副委員長", "山本", "副委員長");
        assert_split("田中副議長", "田中", "副議長");
    }

    #[test]
    fn test_executives() {
        assert_split("山本教育長", "山本", "教育長");
        assert_split("田中総務部長", "田中", "総務部長");
        assert_split("沖田財政課長", "沖田", "財政課長");
        assert_split("高藤事務局長", "高藤", "事務局長");
    }

    #[test]
    fn test_no_role_is_medium() {
        let result = parse_speaker_name("田中太郎");
        assert_eq!(result.name, "田中太郎");
        assert_eq!(result.role, "");
        assert_eq!(result.confidence, Confidence::Medium);
    }

    #[test]
    fn test_empty_label_is_low() {
        let result = parse_speaker_name(" 　");
        assert_eq!(result.name, "");
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_title_only_label_keeps_title_as_name() {
        let result = parse_speaker_name("議長");
        assert_eq!(result.name, "議長");
        assert_eq!(result.role, "");
        assert_eq!(result.confidence, Confidence::Medium);
    }
}

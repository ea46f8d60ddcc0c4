use crate::heuristics::SPEECH_MARKER;
use crate::models::PageText;

/// Extract the document front matter preceding the first speaker turn
///
/// Lines are read in page order until one (after left-trim) starts with the
/// speech marker; everything before it is returned joined with `\n`.
/// Returns `None` when no marker line exists: the document has no speech
/// body to anchor the preamble on.
pub fn extract_preamble(pages: &[PageText]) -> Option<String> {
    let mut lines: Vec<&str> = Vec::new();

    for page in pages {
        for line in page.text.split('\n') {
            if line.trim_start().starts_with(SPEECH_MARKER) {
                return Some(lines.join("\n"));
            }
            lines.push(line);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_stops_at_first_marker() {
        let pages = vec![PageText::new(
            1,
            "安芸高田市議会定例会会議録\n出席議員\n○大 下 議 長\n　発言",
        )];
        assert_eq!(
            extract_preamble(&pages).as_deref(),
            Some("安芸高田市議会定例会会議録\n出席議員")
        );
    }

    #[test]
    fn test_preamble_spans_pages() {
        let pages = vec![
            PageText::new(1, "表紙"),
            PageText::new(2, "出席議員\n　　○大下議長"),
        ];
        assert_eq!(extract_preamble(&pages).as_deref(), Some("表紙\n出席議員"));
    }

    #[test]
    fn test_marker_on_first_line_gives_empty_preamble() {
        let pages = vec![PageText::new(1, "○大下議長\n発言")];
        assert_eq!(extract_preamble(&pages).as_deref(), Some(""));
    }

    #[test]
    fn test_no_marker_means_no_preamble() {
        let pages = vec![PageText::new(1, "前文のみのテキスト\n何も発言なし")];
        assert_eq!(extract_preamble(&pages), None);
        assert_eq!(extract_preamble(&[]), None);
    }
}

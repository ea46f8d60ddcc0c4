use std::sync::OnceLock;

use regex::Regex;

/// The circle glyph that opens each speaker turn
pub const SPEECH_MARKER: char = '○';

/// Remove every whitespace character, including the ideographic space
pub fn remove_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Convert fullwidth digits (`０`-`９`) to ASCII, leaving other characters untouched
pub fn to_halfwidth_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

pub fn is_fullwidth_digit(c: char) -> bool {
    ('０'..='９').contains(&c)
}

/// Whether `c` is a kanji, hiragana or katakana character
pub fn is_kanji_or_kana(c: char) -> bool {
    static SCRIPT_RE: OnceLock<Regex> = OnceLock::new();
    let re = SCRIPT_RE.get_or_init(|| {
        Regex::new(r"^[\p{Han}\p{Hiragana}\p{Katakana}]$").expect("static regex")
    });
    let mut buf = [0u8; 4];
    re.is_match(c.encode_utf8(&mut buf))
}

/// Whether `s` looks like a bare name: kanji/kana plus spaces and parentheses only
pub fn is_name_like(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            is_kanji_or_kana(c) || c.is_whitespace() || matches!(c, '(' | ')' | '（' | '）')
        })
}

/// Byte offset just past the first `n` non-whitespace characters of `original`
///
/// Maps a length measured on the whitespace-stripped text back onto the
/// spaced original.
pub fn original_offset(original: &str, n: usize) -> usize {
    let mut count = 0;
    for (i, c) in original.char_indices() {
        if count == n {
            return i;
        }
        if !c.is_whitespace() {
            count += 1;
        }
    }
    original.len()
}

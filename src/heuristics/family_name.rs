use std::collections::HashSet;

use super::text::remove_whitespace;

/// Common one-character surnames; everything else defaults to two characters
pub const DEFAULT_ONE_CHAR_FAMILY_NAMES: [&str; 14] = [
    "林", "森", "原", "関", "堀", "辻", "東", "西", "谷", "泉", "柳", "杉", "馬", "沢",
];

/// Estimate the family name of a space-separated roster name
///
/// Rosters either space every character (`南 澤 克 彦`) or separate family
/// and given name (`南澤 克彦`). With every token one character long a
/// two-character surname is assumed, except for exactly two tokens.
pub fn extract_family_name(spaced_name: &str) -> String {
    let tokens: Vec<&str> = spaced_name.split_whitespace().collect();
    if tokens.len() <= 1 {
        return remove_whitespace(spaced_name);
    }

    if tokens.iter().all(|t| t.chars().count() == 1) {
        if tokens.len() == 2 {
            return tokens[0].to_string();
        }
        return format!("{}{}", tokens[0], tokens[1]);
    }

    tokens[0].to_string()
}

/// Estimate the family name of a name with no surviving spacing
pub fn guess_family_name_from_normalized(name: &str, one_char_names: &HashSet<char>) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if name.chars().count() <= 2 {
        return name.to_string();
    }
    if one_char_names.contains(&first) {
        return first.to_string();
    }
    name.chars().take(2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_names() -> HashSet<char> {
        DEFAULT_ONE_CHAR_FAMILY_NAMES
            .iter()
            .filter_map(|s| s.chars().next())
            .collect()
    }

    #[test]
    fn test_extract_four_single_chars() {
        assert_eq!(extract_family_name("南 澤 克 彦"), "南澤");
    }

    #[test]
    fn test_extract_three_single_chars() {
        assert_eq!(extract_family_name("石 丸 伸"), "石丸");
    }

    #[test]
    fn test_extract_two_single_chars() {
        assert_eq!(extract_family_name("林 太"), "林");
    }

    #[test]
    fn test_extract_unspaced_returns_whole_name() {
        assert_eq!(extract_family_name("南澤克彦"), "南澤克彦");
        assert_eq!(extract_family_name("  南澤克彦 "), "南澤克彦");
    }

    #[test]
    fn test_extract_grouped_tokens() {
        assert_eq!(extract_family_name("南澤 克彦"), "南澤");
        assert_eq!(extract_family_name("佐々木\u{3000}智之"), "佐々木");
    }

    #[test]
    fn test_guess_defaults_to_two_chars() {
        assert_eq!(guess_family_name_from_normalized("南澤克彦", &default_names()), "南澤");
    }

    #[test]
    fn test_guess_known_single_char_surname() {
        assert_eq!(guess_family_name_from_normalized("林太郎", &default_names()), "林");
    }

    #[test]
    fn test_guess_short_names_unchanged() {
        assert_eq!(guess_family_name_from_normalized("南澤", &default_names()), "南澤");
        assert_eq!(guess_family_name_from_normalized("林", &default_names()), "林");
        assert_eq!(guess_family_name_from_normalized("", &default_names()), "");
    }
}

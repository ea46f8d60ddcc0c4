use super::roles::RoleTable;

/// Bigrams that open an organisational-unit name (`政策企画課`, `総務部`, ...)
const ORG_BIGRAMS: [&str; 36] = [
    "政策", "企画", "総務", "社会", "環境", "事務", "福祉", "保健", "財政", "教育", "産業", "建設",
    "市民", "危機", "管理", "会計", "水道", "農業", "消防", "商工", "観光", "税務", "生活", "子育",
    "地域", "振興", "都市", "議会", "統括", "人権", "学校", "秘書", "監査", "選挙", "下水", "上下",
];

/// Characters that only appear in unit names (`課`, `係`, ...)
const ORG_UNIT_CHARS: [char; 4] = ['課', '係', '局', '室'];

/// Characters after which nothing belongs to the name
const NAME_TERMINATORS: [char; 3] = ['・', '(', '（'];

/// Trim the text captured between two role titles down to the person's name
///
/// The first `min_name_chars` characters are never cut as a unit tail.
///
/// Best effort: preamble lines run titles and names together without
/// separators, and titles missing from the role table leave organisation
/// names glued to the surrounding names.
///
/// - `補佐小野光基` → `小野光基` (trailing half of `課長補佐`)
/// - `兼福祉事務所長井上和志` → `井上和志` (concurrent post)
/// - `沖田伸二政策企画` → `沖田伸二` (unit name of the next, unknown title)
/// - `田中太郎（代理）` → `田中太郎`
pub fn truncate_to_name(candidate: &str, roles: &RoleTable, min_name_chars: usize) -> String {
    let mut name = candidate;

    if let Some(rest) = name.strip_prefix("補佐") {
        name = rest;
    }

    if let Some(rest) = name.strip_prefix("兼") {
        name = match roles.longest_at(rest, 0) {
            Some(m) => &rest[m.end..],
            None => match rest.find('長') {
                Some(i) => &rest[i + '長'.len_utf8()..],
                None => rest,
            },
        };
    }

    if let Some(i) = name.find(NAME_TERMINATORS) {
        name = &name[..i];
    }

    let chars: Vec<(usize, char)> = name.char_indices().collect();
    for (n, &(offset, c)) in chars.iter().enumerate().skip(min_name_chars) {
        let opens_unit = ORG_UNIT_CHARS.contains(&c)
            || ORG_BIGRAMS
                .iter()
                .any(|bigram| name[offset..].starts_with(bigram));
        if opens_unit {
            tracing::trace!(candidate, cut_at = n, "cut organisational tail");
            return name[..offset].to_string();
        }
    }

    name.to_string()
}

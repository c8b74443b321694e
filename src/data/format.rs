//! Display formatting for upstream identifiers
//!
//! The API returns kebab-case identifiers (`mr-mime`, `special-attack`).
//! These helpers turn them into display names and attach the conventional
//! color for each elemental type.

/// Fallback color for types missing from the table
pub const UNKNOWN_TYPE_COLOR: &str = "#68A090";

/// Conventional colors for each elemental type
const TYPE_COLORS: &[(&str, &str)] = &[
    ("normal", "#A8A77A"),
    ("fire", "#EE8130"),
    ("water", "#6390F0"),
    ("electric", "#F7D02C"),
    ("grass", "#7AC74C"),
    ("ice", "#96D9D6"),
    ("fighting", "#C22E28"),
    ("poison", "#A33EA1"),
    ("ground", "#E2BF65"),
    ("flying", "#A98FF3"),
    ("psychic", "#F95587"),
    ("bug", "#A6B91A"),
    ("rock", "#B6A136"),
    ("ghost", "#735797"),
    ("dragon", "#6F35FC"),
    ("dark", "#705746"),
    ("steel", "#B7B7CE"),
    ("fairy", "#D685AD"),
];

/// Turn a kebab-case identifier into a title-cased display name
///
/// `"mr-mime"` becomes `"Mr Mime"`, `"special-attack"` becomes
/// `"Special Attack"`. Empty segments are dropped.
pub fn format_name(raw: &str) -> String {
    raw.split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Color hint for an elemental type, falling back to [`UNKNOWN_TYPE_COLOR`]
pub fn type_color(type_name: &str) -> &'static str {
    TYPE_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(type_name))
        .map(|(_, color)| *color)
        .unwrap_or(UNKNOWN_TYPE_COLOR)
}

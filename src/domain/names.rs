// src/domain/names.rs
//
// Name normalization shared by both repository backends.
// The SQLite backend registers these same functions as SQL scalar
// functions so stored rows are compared exactly as in memory.

/// Normalize a person name for matching.
///
/// Trims, splits on whitespace and capitalizes every token: the first
/// character is uppercased and the rest lowercased ("  chris PRATT " ->
/// "Chris Pratt", "J.K. Simmons" -> "J.k. Simmons").
pub fn normalize_person_name(name: &str) -> String {
    name.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Case folding used for title search
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Usernames are stored and matched trimmed and lowercased
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

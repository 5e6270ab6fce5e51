use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical form used to compare classifications with allow-list entries.
///
/// Uppercases, decomposes (NFD), drops combining marks, collapses whitespace
/// runs to one space and trims. `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(value: &str) -> String {
    let stripped: String = value
        .to_uppercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

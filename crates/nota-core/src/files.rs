//! File name helpers.

use std::path::Path;

/// Whether `name` ends in `.{extension}`, ignoring ASCII case.
///
/// `extension` is given without the leading dot (`"zip"`, `"xml"`).
#[must_use]
pub fn has_extension(name: impl AsRef<Path>, extension: &str) -> bool {
    name.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

//! Extension normalisation
//!
//! Mappings store extensions in one canonical form: lower-case with a single
//! leading dot (`.png`). Everything entering the tree goes through
//! [`normalize_extension`]; everything looked up at import time goes through
//! [`extension_of`].

use super::error::{TreeError, TreeResult};
use crate::file::naming::find_invalid_char;

/// Normalise user input such as `PNG`, `.Png` or ` png ` to `.png`.
pub fn normalize_extension(raw: &str) -> TreeResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TreeError::invalid_extension(raw, "extension is empty"));
    }

    let mut extension = trimmed.to_lowercase();
    if !extension.starts_with('.') {
        tracing::warn!(
            "Extension '{}' missing leading period, adding '.' automatically",
            trimmed
        );
        extension.insert(0, '.');
    }

    let body = &extension[1..];
    if body.is_empty() {
        return Err(TreeError::invalid_extension(
            raw,
            "must be at least one character after the period",
        ));
    }

    if let Some(c) = find_invalid_char(body) {
        return Err(TreeError::invalid_extension(
            raw,
            format!("contains invalid filename character {:?}", c),
        ));
    }

    if body.starts_with('.') || body.chars().any(char::is_whitespace) {
        return Err(TreeError::invalid_extension(
            raw,
            "must not contain whitespace or a second leading period",
        ));
    }

    Ok(extension)
}

/// Extension of an asset path in mapping form, or `None` when the file has
/// no extension.
///
/// A dotfile such as `Assets/.hidden` counts as having no extension, so it is
/// never organised even if `.hidden` were mapped.
pub fn extension_of(asset_path: &str) -> Option<String> {
    let file_name = crate::util::paths::file_name_of(asset_path);
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(pos) if pos + 1 == file_name.len() => None,
        Some(pos) => Some(file_name[pos..].to_lowercase()),
    }
}

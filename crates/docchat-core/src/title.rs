//! Session title helpers.

use std::path::Path;

/// Prefix of the title given to a session named after an uploaded file.
pub const FILE_TITLE_PREFIX: &str = "📄 ";

/// Prefix of the transcript line recording an upload.
pub const UPLOAD_NOTICE_PREFIX: &str = "📎 Uploaded: ";

/// Title for a session named after the uploaded file `name`.
pub fn file_title(name: &str) -> String {
    format!("{FILE_TITLE_PREFIX}{name}")
}

/// Transcript line recording an upload of `name`.
pub fn upload_notice(name: &str) -> String {
    format!("{UPLOAD_NOTICE_PREFIX}{name}")
}

/// Display name of a file: its final path component, or the whole path.
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Normalizes a user-supplied title.
///
/// Takes the first non-empty line, trimmed. Returns `None` when nothing
/// remains, so empty renames are rejected before any request is made.
pub fn normalize_title(raw: &str) -> Option<String> {
    let line = raw.lines().find(|l| !l.trim().is_empty())?.trim();
    let line: String = line.chars().filter(|c| !c.is_control()).collect();
    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}

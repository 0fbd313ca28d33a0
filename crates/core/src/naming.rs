//! Upload naming convention engine.
//!
//! Generates deterministic folder numbers, sanitized stored filenames, and
//! project upload paths. Folder numbers come from the project's primary key
//! (zero-padded, assigned once at creation) so they are unique without
//! counting rows.

use crate::types::DbId;

/// Zero-padded folder number for a project's on-disk upload directory.
///
/// Padded to at least 3 digits; ids beyond 999 simply widen.
///
/// # Examples
///
/// ```
/// use bureau_core::naming::folder_number;
///
/// assert_eq!(folder_number(1), "001");
/// assert_eq!(folder_number(42), "042");
/// assert_eq!(folder_number(1234), "1234");
/// ```
pub fn folder_number(project_id: DbId) -> String {
    format!("{project_id:03}")
}

/// Sanitize a client-supplied filename for on-disk storage.
///
/// Keeps ASCII alphanumerics, `-`, `_`, and `.`; everything else becomes
/// `_`. Path separators never survive, so a crafted name cannot escape the
/// upload directory. An empty or dot-only result falls back to `"file"`.
pub fn sanitize_filename(original: &str) -> String {
    // Take only the final path component of whatever the client sent.
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '.' || c == '_') {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Timestamp-qualified stored filename: `<millis>-<sanitized original>`.
///
/// The millisecond prefix keeps concurrent uploads of identically named
/// files from colliding.
pub fn stored_filename(timestamp_millis: i64, original: &str) -> String {
    format!("{timestamp_millis}-{}", sanitize_filename(original))
}

/// Canonical stored path for a file inside a project's upload folder.
pub fn project_upload_path(folder: &str, filename: &str) -> String {
    format!("/uploads/projects/{folder}/{filename}")
}

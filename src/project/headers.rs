//! Header classification and header → translation-unit fallback.

use std::path::{Path, PathBuf};

use crate::config::ExtensionSets;

/// Classification of a query file by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Header,
    Source,
    Other,
}

/// Classify `path` by exact (case-sensitive) extension.
pub fn classify(path: &Path, sets: &ExtensionSets) -> FileKind {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileKind::Other;
    };
    let matches = |list: &[String]| list.iter().any(|e| e.strip_prefix('.') == Some(ext));

    if matches(&sets.header) {
        FileKind::Header
    } else if matches(&sets.source) {
        FileKind::Source
    } else {
        FileKind::Other
    }
}

/// Sibling paths to try for a header, in the order of `source_extensions`.
///
/// Lazy and filesystem-free: existence is left to the index lookup.
pub fn candidate_sources<'a>(
    path: &'a Path,
    source_extensions: &'a [String],
) -> impl Iterator<Item = PathBuf> + 'a {
    source_extensions
        .iter()
        .map(move |ext| path.with_extension(ext.trim_start_matches('.')))
}

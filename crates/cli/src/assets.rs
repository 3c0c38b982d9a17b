//! Asset pool enumeration from a directory listing.

use std::fs;
use std::path::Path;

use cowspots_core::AssetRef;

use crate::error::CliError;

/// Extension kept by default.
pub const DEFAULT_EXTENSION: &str = "svg";
/// Public URL prefix the files are served under.
pub const DEFAULT_PREFIX: &str = "/cowspots/";

/// Lists regular files in `dir` whose extension matches `ext`
/// (case-insensitive), sorted by name and prefixed with `prefix`.
pub fn scan_dir(dir: &Path, ext: &str, prefix: &str) -> Result<Vec<AssetRef>, CliError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", dir.display())))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if let (true, Some(name)) = (matches, path.file_name().and_then(|n| n.to_str())) {
            names.push(name.to_string());
        }
    }
    names.sort();

    let prefix = if prefix.is_empty() || prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    };
    log::debug!("found {} .{ext} assets in {}", names.len(), dir.display());
    Ok(names
        .into_iter()
        .map(|name| AssetRef::new(format!("{prefix}{name}")))
        .collect())
}

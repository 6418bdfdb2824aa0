use std::fs;
use std::io;
use std::path::Path;

use likers_core::parse_target_lines;

use crate::SourceError;

/// Read the target file: one URL per line, blank lines ignored.
pub fn load_targets(path: Option<&Path>) -> Result<Vec<String>, SourceError> {
    let path = path.ok_or(SourceError::NotSpecified)?;
    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
        _ => SourceError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let targets = parse_target_lines(&raw);
    if targets.is_empty() {
        return Err(SourceError::Empty(path.to_path_buf()));
    }
    Ok(targets)
}

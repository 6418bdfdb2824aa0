use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::DeviceError;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("crash directory unusable: {0}")]
    CrashDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Everything known about a failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct CrashDetails<'a> {
    pub source: &'a str,
    pub error: &'a DeviceError,
    pub hierarchy: Option<&'a str>,
    pub recording: Option<&'a str>,
}

/// Writes one text report per recovered crash into a directory.
#[derive(Clone)]
pub struct CrashReporter {
    dir: PathBuf,
    now_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

impl CrashReporter {
    pub fn new(dir: PathBuf) -> Self {
        Self::with_clock(dir, Arc::new(|| chrono::Utc::now().to_rfc3339()))
    }

    pub fn with_clock(dir: PathBuf, now_utc: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        Self { dir, now_utc }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the report atomically and return its path.
    pub fn write(&self, details: &CrashDetails<'_>) -> Result<PathBuf, PersistError> {
        let timestamp = (self.now_utc)();
        let mut content = format!(
            "timestamp: {timestamp}\nsource: {}\nerror: {}\n",
            details.source, details.error
        );
        if let Some(recording) = details.recording {
            content.push_str(&format!("recording: {recording}\n"));
        }
        if let Some(hierarchy) = details.hierarchy {
            content.push_str("--- ui hierarchy ---\n");
            content.push_str(hierarchy);
            content.push('\n');
        }

        let filename = crash_filename(details.source, &timestamp);
        write_atomically(&self.dir, &filename, &content)
    }
}

impl std::fmt::Debug for CrashReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrashReporter")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// `{source}--{hash8}.txt`, where the hash covers source and timestamp so
/// repeated crashes of one source do not overwrite each other.
pub fn crash_filename(source: &str, timestamp: &str) -> String {
    let mut name: String = source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .take(80)
        .collect();
    if name.is_empty() {
        name.push_str("campaign");
    }

    let digest = Sha256::digest(format!("{source}|{timestamp}").as_bytes());
    let hash: String = digest.iter().take(4).map(|b| format!("{b:02x}")).collect();
    format!("{name}--{hash}.txt")
}

fn write_atomically(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PersistError::CrashDir(format!("{dir:?} is not a directory")));
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::CrashDir(e.to_string()))?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}

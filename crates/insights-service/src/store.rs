//! File-backed cache of advanced analyses with a fixed time-to-live.
//!
//! Each entry is `<id>.json` in the store directory. An id is claimed by
//! creating its file exclusively; the content is then written to a temporary
//! file that is renamed over it, so readers never observe partial entries.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::report::AnalysisResult;

const ENTRY_EXTENSION: &str = "json";
const TMP_EXTENSION: &str = "json.tmp";

/// On-disk envelope around a stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub analysis_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub analysis: AnalysisResult,
}

/// Just the timestamp, for sweeping without decoding whole entries.
#[derive(Deserialize)]
struct EntryHeader {
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub entry_count: usize,
    pub total_size: u64,
}

impl StoreInfo {
    pub fn size_mb(&self) -> f64 {
        (self.total_size as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisStore {
    dir: PathBuf,
    ttl: Duration,
}

/// Ids become file names, so only a conservative character set is allowed.
fn validate_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

impl AnalysisStore {
    /// Open the store, creating its directory if needed.
    pub fn open(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, ttl })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn ttl_delta(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX)
    }

    fn entry_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{id}.{ENTRY_EXTENSION}")))
    }

    fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(created_at) > self.ttl_delta()
    }

    pub fn save(&self, analysis: &AnalysisResult) -> Result<StoredAnalysis, StoreError> {
        self.save_at(analysis, Utc::now())
    }

    /// Persist `analysis` under a fresh `<username>_<unix secs>` id.
    pub fn save_at(
        &self,
        analysis: &AnalysisResult,
        now: DateTime<Utc>,
    ) -> Result<StoredAnalysis, StoreError> {
        let base = format!("{}_{}", analysis.username, now.timestamp());
        let (id, path) = self.reserve_id(&base)?;

        let entry = StoredAnalysis {
            analysis_id: id,
            created_at: now,
            expires_at: now + self.ttl_delta(),
            analysis: analysis.clone(),
        };

        // The reserved id is unique, so its temp name is too.
        let tmp = path.with_extension(TMP_EXTENSION);
        let written = serde_json::to_vec_pretty(&entry)
            .map_err(StoreError::from)
            .and_then(|json| fs::write(&tmp, json).map_err(StoreError::from))
            .and_then(|()| fs::rename(&tmp, &path).map_err(StoreError::from));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        info!(analysis_id = %entry.analysis_id, "Saved analysis");
        Ok(entry)
    }

    /// Claim `base`, or `base_N` for the first free N, by creating the entry
    /// file exclusively. Concurrent writers never share an id.
    fn reserve_id(&self, base: &str) -> Result<(String, PathBuf), StoreError> {
        let mut id = base.to_string();
        let mut suffix = 1;
        loop {
            let path = self.entry_path(&id)?;
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok((id, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    id = format!("{base}_{suffix}");
                    suffix += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn load(&self, id: &str) -> Option<StoredAnalysis> {
        self.load_at(id, Utc::now())
    }

    /// Entry for `id`, or `None` when it is missing, unreadable or expired.
    /// Expired entries are deleted.
    pub fn load_at(&self, id: &str, now: DateTime<Utc>) -> Option<StoredAnalysis> {
        let path = match self.entry_path(id) {
            Ok(path) => path,
            Err(e) => {
                warn!("Rejected analysis lookup: {e}");
                return None;
            }
        };

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(analysis_id = id, "Failed to read analysis: {e}");
                return None;
            }
        };

        let entry: StoredAnalysis = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(analysis_id = id, "Failed to decode analysis: {e}");
                return None;
            }
        };

        if self.is_expired(entry.created_at, now) {
            debug!(analysis_id = id, "Analysis expired");
            if let Err(e) = self.delete(id) {
                warn!(analysis_id = id, "Failed to delete expired analysis: {e}");
            }
            return None;
        }

        Some(entry)
    }

    /// Remove an entry. Returns whether a file was deleted.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let path = self.entry_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(analysis_id = id, "Deleted analysis");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        self.files_ending_with(&format!(".{ENTRY_EXTENSION}"))
    }

    /// Temp files left behind by writers that died before renaming.
    fn orphaned_temp_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        self.files_ending_with(&format!(".{TMP_EXTENSION}"))
    }

    fn files_ending_with(&self, suffix: &str) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(suffix));
            if matches && path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }

    /// Creation time recorded in the entry, or the file's modification time
    /// when the entry cannot be decoded.
    fn created_at(path: &Path) -> Option<DateTime<Utc>> {
        let header = fs::read(path)
            .ok()
            .and_then(|bytes| serde_json::from_slice::<EntryHeader>(&bytes).ok());
        match header {
            Some(h) => Some(h.created_at),
            None => Self::modified_at(path),
        }
    }

    pub fn sweep(&self) -> Result<usize, StoreError> {
        self.sweep_at(Utc::now())
    }

    /// Delete every entry older than the TTL. Returns how many were removed.
    pub fn sweep_at(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut deleted = 0;
        for path in self.entry_files()? {
            let Some(created_at) = Self::created_at(&path) else {
                continue;
            };
            if !self.is_expired(created_at, now) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => deleted += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), "Failed to remove expired analysis: {e}"),
            }
        }

        for path in self.orphaned_temp_files()? {
            let stale = Self::modified_at(&path).is_some_and(|at| self.is_expired(at, now));
            if stale {
                match fs::remove_file(&path) {
                    Ok(()) => debug!(path = %path.display(), "Removed orphaned temp file"),
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => warn!(path = %path.display(), "Failed to remove temp file: {e}"),
                }
            }
        }

        if deleted > 0 {
            info!(deleted, "Swept expired analyses");
        }
        Ok(deleted)
    }

    pub fn info(&self) -> Result<StoreInfo, StoreError> {
        let mut info = StoreInfo::default();
        for path in self.entry_files()? {
            match fs::metadata(&path) {
                Ok(meta) => {
                    info.entry_count += 1;
                    info.total_size += meta.len();
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(info)
    }
}

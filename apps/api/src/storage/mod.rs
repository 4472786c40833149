//! Flat-file résumé store.
//!
//! The whole store is one JSON array. Every read loads the entire array and
//! every append rewrites it: read, push in memory, write back. Appends inside
//! this process are serialised by `ResumeStore`; two *processes* appending to
//! the same file still race and the later writer wins.
//!
//! A missing file is an empty store. A file holding invalid JSON reads as
//! empty under `ReadPolicy::Lenient` (the default), so it is replaced by the
//! next append; `ReadPolicy::Strict` reports it instead. A file that exists
//! but cannot be read is always an error.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::ResumeRecord;

pub const DEFAULT_DATA_PATH: &str = "extracted_data/data.json";

const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Store at {path} is not a valid record array: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage task failed: {0}")]
    Task(String),
}

/// How an unreadable store file is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadPolicy {
    /// Invalid content reads as an empty store.
    #[default]
    Lenient,
    /// Invalid content is an error; a missing file is still empty.
    Strict,
}

/// Loads every stored record, in insertion order.
pub fn load_all(path: &Path, policy: ReadPolicy) -> Result<Vec<ResumeRecord>, StorageError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        // Any other read failure is reported under both policies; the file
        // may still hold valid records.
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match serde_json::from_slice::<Vec<ResumeRecord>>(&raw) {
        Ok(records) => Ok(records),
        Err(e) if policy == ReadPolicy::Lenient => {
            warn!("Store {} is not valid JSON ({e}); treating as empty", path.display());
            Ok(Vec::new())
        }
        Err(source) => Err(StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Appends one record and rewrites the whole file.
///
/// Creates the parent directory if needed. The new content is written to a
/// temporary file beside the store and renamed over it.
pub fn append_record(
    record: &ResumeRecord,
    path: &Path,
    policy: ReadPolicy,
) -> Result<usize, StorageError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|source| StorageError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    let mut records = load_all(path, policy)?;
    records.push(record.clone());
    write_all(&records, path, parent)?;

    debug!("Store {} now holds {} records", path.display(), records.len());
    Ok(records.len())
}

fn write_all(records: &[ResumeRecord], path: &Path, dir: &Path) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut ser = serde_json::Serializer::with_formatter(
            tmp.as_file_mut(),
            PrettyFormatter::with_indent(INDENT),
        );
        records.serialize(&mut ser)?;
    }
    tmp.as_file_mut().flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Handle to the store shared by all request handlers.
#[derive(Clone)]
pub struct ResumeStore {
    path: Arc<PathBuf>,
    policy: ReadPolicy,
    write_lock: Arc<Mutex<()>>,
}

impl ResumeStore {
    pub fn new(path: impl Into<PathBuf>, policy: ReadPolicy) -> Self {
        Self {
            path: Arc::new(path.into()),
            policy,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends on the blocking pool; returns the number of stored records.
    pub async fn append(&self, record: ResumeRecord) -> Result<usize, StorageError> {
        let _guard = self.write_lock.lock().await;
        let path = Arc::clone(&self.path);
        let policy = self.policy;
        let count = tokio::task::spawn_blocking(move || append_record(&record, &path, policy))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))??;
        info!("Saved resume record ({count} stored)");
        Ok(count)
    }

    pub async fn load_all(&self) -> Result<Vec<ResumeRecord>, StorageError> {
        let path = Arc::clone(&self.path);
        let policy = self.policy;
        tokio::task::spawn_blocking(move || load_all(&path, policy))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

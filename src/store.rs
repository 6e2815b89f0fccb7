//! Key-value persistence for the progress record.
//!
//! Each value is replaced wholesale. The file store writes `{key}.json.tmp`,
//! syncs it and renames it over the previous file, so a crash mid-write
//! leaves the old record intact.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::certificates::{ProgressState, PROGRESS_VERSION};
use crate::error::{FootprintError, Result};

/// Key under which the progress record is stored.
pub const PROGRESS_KEY: &str = "user_progress";

pub trait BlobStore {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Replace the whole value. Readers see either the old or the new bytes.
    fn replace(&mut self, key: &str, bytes: &[u8]) -> Result<()>;
}

// ---- Atomic file write ------------------------------------------------------

/// Write `data` to `{path}.tmp`, fsync, then rename onto `path`.
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp, path)
}

// ---- Stores -----------------------------------------------------------------

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileBlobStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(FootprintError::invalid(format!("invalid store key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        atomic_write(&path, bytes)?;
        debug!(path = %path.display(), len = bytes.len(), "blob replaced");
        Ok(())
    }
}

/// In-process store, used by tests and embedders without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
    read_only: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every `replace` fails with a persistence error.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn insert(&mut self, key: &str, bytes: Vec<u8>) {
        self.blobs.insert(key.to_string(), bytes);
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn replace(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        if self.read_only {
            return Err(FootprintError::Persistence(format!(
                "store is read-only, cannot write {key:?}"
            )));
        }
        self.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

// ---- Progress record ----------------------------------------------------------

/// Load progress, falling back to fresh defaults on any problem.
pub fn load_progress(store: &dyn BlobStore) -> ProgressState {
    let bytes = match store.get(PROGRESS_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            info!("no saved progress, starting fresh");
            return ProgressState::default();
        }
        Err(e) => {
            warn!(error = %e, "could not read saved progress, starting fresh");
            return ProgressState::default();
        }
    };

    match serde_json::from_slice::<ProgressState>(&bytes) {
        Ok(state) if state.version > PROGRESS_VERSION => {
            warn!(
                found = state.version,
                supported = PROGRESS_VERSION,
                "saved progress is from a newer version, starting fresh"
            );
            ProgressState::default()
        }
        Ok(mut state) => {
            state.normalize();
            info!(
                earned = state.earned().len(),
                cycles = state.completed_cycles,
                "progress loaded"
            );
            state
        }
        Err(e) => {
            warn!(error = %e, "saved progress is corrupt, starting fresh");
            ProgressState::default()
        }
    }
}

pub fn encode_progress(state: &ProgressState) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(state)?)
}

pub fn save_progress(store: &mut dyn BlobStore, state: &ProgressState) -> Result<()> {
    let bytes = encode_progress(state)?;
    store.replace(PROGRESS_KEY, &bytes)
}

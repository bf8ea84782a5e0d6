//! A store kept in a single JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{fs, io};

use typedpref_kv_store::{Batch, Error, KvStore};

struct State {
    entries: BTreeMap<String, String>,
    dirty: bool,
    deferred_error: Option<Error>,
}

/// A store persisted as a single JSON object file: `{"key": "payload", ...}`.
///
/// The whole map lives in memory; reads never touch the disk. `commit`
/// rewrites the file before returning. `apply` only marks the map dirty;
/// it reaches the disk on the next `commit`, `sync`, or when the store is
/// dropped.
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<State>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading it if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<JsonFileStore, Error> {
        let path = path.into();
        let entries = Self::load(&path)?;

        Ok(JsonFileStore {
            path,
            state: Mutex::new(State {
                entries,
                dirty: false,
                deferred_error: None,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write applied changes to disk, if there are any.
    ///
    /// A failure is returned and also kept for `take_deferred_error`.
    pub fn sync(&self) -> Result<(), Error> {
        let mut state = self.state.lock().map_err(|_| Error::Poisoned)?;
        if !state.dirty {
            return Ok(());
        }

        match self.save(&state.entries) {
            Ok(()) => {
                state.dirty = false;
                Ok(())
            }
            Err(err) => {
                state.deferred_error = Some(copy_error(&err));
                Err(err)
            }
        }
    }

    /// Whether applied changes are waiting to be written.
    pub fn has_pending(&self) -> Result<bool, Error> {
        let state = self.state.lock().map_err(|_| Error::Poisoned)?;
        Ok(state.dirty)
    }

    /// Take the last failure of a deferred flush, if any.
    pub fn take_deferred_error(&self) -> Result<Option<Error>, Error> {
        let mut state = self.state.lock().map_err(|_| Error::Poisoned)?;
        Ok(state.deferred_error.take())
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, Error> {
        log::debug!("Reading {}...", path.display());

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|err| Error::Corrupt {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        use io::Write;

        log::debug!("Writing {}...", self.path.display());

        let io_error = |source: io::Error| Error::Io {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_vec_pretty(entries).map_err(|err| {
            Error::ImplementationFailure {
                message: format!("Failed to serialize store entries: {}", err),
            }
        })?;

        // Write beside the target and rename, so a crash never leaves half a file.
        let tmp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&tmp_path).map_err(io_error)?;
        f.write_all(&json).map_err(io_error)?;
        f.sync_all().map_err(io_error)?;
        fs::rename(&tmp_path, &self.path).map_err(io_error)?;

        Ok(())
    }
}

/// Rebuild `err` so one copy can be returned and another kept.
fn copy_error(err: &Error) -> Error {
    match err {
        Error::Io { path, source } => Error::Io {
            path: path.clone(),
            source: io::Error::new(source.kind(), source.to_string()),
        },
        Error::Corrupt { path, message } => Error::Corrupt {
            path: path.clone(),
            message: message.clone(),
        },
        Error::Poisoned => Error::Poisoned,
        Error::ImplementationFailure { message } => Error::ImplementationFailure {
            message: message.clone(),
        },
    }
}

impl KvStore for JsonFileStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
        let state = self.state.lock().map_err(|_| Error::Poisoned)?;
        Ok(state.entries.get(key).cloned())
    }

    fn contains(&self, key: &str) -> Result<bool, Error> {
        let state = self.state.lock().map_err(|_| Error::Poisoned)?;
        Ok(state.entries.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, Error> {
        let state = self.state.lock().map_err(|_| Error::Poisoned)?;
        Ok(state.entries.keys().cloned().collect())
    }

    fn commit(&self, batch: Batch) -> Result<(), Error> {
        let mut state = self.state.lock().map_err(|_| Error::Poisoned)?;

        let mut next = state.entries.clone();
        batch.apply_to(&mut next);
        // Only publish the batch once it is on disk.
        self.save(&next)?;

        state.entries = next;
        state.dirty = false;
        Ok(())
    }

    fn apply(&self, batch: Batch) -> Result<(), Error> {
        let mut state = self.state.lock().map_err(|_| Error::Poisoned)?;
        log::trace!(
            "Deferring {} change(s) to {}",
            batch.len(),
            self.path.display()
        );

        batch.apply_to(&mut state.entries);
        state.dirty = true;
        Ok(())
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        let entries = match self.state.get_mut() {
            Ok(state) if state.dirty => std::mem::take(&mut state.entries),
            Ok(_) => return,
            Err(_) => {
                log::error!(
                    "Store lock poisoned, pending changes to {} are lost",
                    self.path.display()
                );
                return;
            }
        };

        if let Err(err) = self.save(&entries) {
            log::error!("Failed to flush deferred changes on drop: {}", err);
        }
    }
}

//! Key/value backends for the session store.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::SessionError;

/// String key/value storage, the shape of browser local storage.
///
/// A batch either lands completely or leaves every entry as it was.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<(), SessionError>;
    fn remove_all(&mut self, keys: &[&str]) -> Result<(), SessionError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.set_all(vec![(key, value)])
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<(), SessionError> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), SessionError> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}

/// File-backed store keeping every entry in one JSON object.
///
/// Each change is written to a sibling temp file that replaces the session
/// file once complete, so entries persist across restarts and a failed write
/// changes neither the file nor the entries held in memory. On unix the file
/// is readable by its owner only.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
                key: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened session file {} ({} entries)", path.display(), entries.len());

        Ok(Self { path, entries })
    }

    fn commit(&mut self, next: BTreeMap<String, String>) -> Result<(), SessionError> {
        if next == self.entries {
            return Ok(());
        }
        self.write(&next)?;
        self.entries = next;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|source| SessionError::Corrupt {
            key: self.path.display().to_string(),
            source,
        })?;

        let mut staging = self.path.as_os_str().to_owned();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        write_private(&staging, raw.as_bytes())?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

/// Write `contents` to `path`, owner read/write only on unix
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // mode() only applies on creation; a leftover temp file keeps its own
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_all(&mut self, entries: Vec<(&str, String)>) -> Result<(), SessionError> {
        let mut next = self.entries.clone();
        for (key, value) in entries {
            next.insert(key.to_string(), value);
        }
        self.commit(next)
    }

    fn remove_all(&mut self, keys: &[&str]) -> Result<(), SessionError> {
        let mut next = self.entries.clone();
        for key in keys {
            next.remove(*key);
        }
        self.commit(next)
    }
}

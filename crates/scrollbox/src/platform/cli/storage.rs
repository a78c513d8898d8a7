//! File-based session store for the CLI.
//!
//! Each key lives in `<base>/<key>.json` as a JSON string, so a sequence of
//! CLI invocations sharing a state directory behaves like one browsing
//! session.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::storage::SessionStore;

pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    pub fn load(&self, key: &str) -> std::io::Result<Option<String>> {
        let contents = match fs::read_to_string(self.path(key)) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|error| std::io::Error::new(ErrorKind::InvalidData, error))
    }

    pub fn save(&self, key: &str, value: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string(value)?;
        fs::write(self.path(key), json)
    }

    pub fn remove(&self, key: &str) -> std::io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }
}

impl SessionStore for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.load(key).unwrap_or_else(|error| {
            log::warn!("cannot read session key {key:?} from {}: {error}", self.base_path.display());
            None
        })
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Err(error) = self.save(key, value) {
            log::warn!("cannot write session key {key:?} to {}: {error}", self.base_path.display());
        }
    }

    fn remove_item(&mut self, key: &str) {
        if let Err(error) = self.remove(key) {
            log::warn!("cannot remove session key {key:?} from {}: {error}", self.base_path.display());
        }
    }
}

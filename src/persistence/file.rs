//! Directory-backed store for native builds

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temp file first and are renamed into place so a crash
/// never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir`, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fry-fortune-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("achievements").unwrap(), None);

        store.set("achievements", r#"["CPS_8"]"#).unwrap();
        assert_eq!(store.get("achievements").unwrap().as_deref(), Some(r#"["CPS_8"]"#));
        assert!(dir.join("achievements.json").exists());

        // A second handle sees the same data
        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("achievements").unwrap().as_deref(), Some(r#"["CPS_8"]"#));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_keys_are_sanitized() {
        let dir = scratch_dir("sanitize");
        let store = FileStore::open(&dir).unwrap();
        assert_eq!(store.path_for("../evil key"), dir.join("___evil_key.json"));
        let _ = fs::remove_dir_all(&dir);
    }
}

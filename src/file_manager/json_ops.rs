// Atomic JSON file operations

use crate::error::StorageError;
use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref FILE_LOCK: Mutex<()> = Mutex::new(());
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let _lock = FILE_LOCK
        .lock()
        .map_err(|e| StorageError::Lock(e.to_string()))?;

    if !path.exists() {
        return Err(StorageError::NotFound(path.display().to_string()));
    }

    let mut file = File::open(path).map_err(|e| io_error(path, e))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| io_error(path, e))?;

    serde_json::from_str(&contents).map_err(|e| StorageError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Writes JSON atomically using write-to-temp-then-rename
pub fn write_json_file<T: Serialize>(path: &Path, data: &T) -> Result<(), StorageError> {
    let _lock = FILE_LOCK
        .lock()
        .map_err(|e| StorageError::Lock(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let json_string = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("tmp");

    let mut temp_file = File::create(&temp_path).map_err(|e| io_error(&temp_path, e))?;

    temp_file
        .write_all(json_string.as_bytes())
        .map_err(|e| io_error(&temp_path, e))?;

    temp_file
        .sync_all()
        .map_err(|e| io_error(&temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| io_error(path, e))?;

    Ok(())
}

pub fn initialize_json_file<T: Serialize>(path: &Path, default: &T) -> Result<(), StorageError> {
    if !path.exists() {
        debug!("Initializing JSON file: {:?}", path);
        write_json_file(path, default)?;
    }
    Ok(())
}

pub fn read_json_file_or_default<T: DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, StorageError> {
    if path.exists() {
        read_json_file(path)
    } else {
        Ok(T::default())
    }
}

pub fn update_json_file<T, F>(path: &Path, update_fn: F) -> Result<T, StorageError>
where
    T: DeserializeOwned + Serialize + Clone + Default,
    F: FnOnce(&mut T),
{
    let mut data: T = read_json_file_or_default(path)?;
    update_fn(&mut data);
    write_json_file(path, &data)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        hits: u32,
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("counter.json");

        write_json_file(&path, &Counter { hits: 3 }).unwrap();
        let read: Counter = read_json_file(&path).unwrap();
        assert_eq!(read, Counter { hits: 3 });
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(
            read_json_file::<Counter>(&path),
            Err(StorageError::NotFound(_))
        ));
        assert_eq!(read_json_file_or_default::<Counter>(&path).unwrap(), Counter::default());
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            read_json_file::<Counter>(&path),
            Err(StorageError::Parse { .. })
        ));
    }

    #[test]
    fn test_update_and_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter.json");

        initialize_json_file(&path, &Counter { hits: 1 }).unwrap();
        initialize_json_file(&path, &Counter { hits: 99 }).unwrap();
        let updated: Counter = update_json_file(&path, |c: &mut Counter| c.hits += 1).unwrap();
        assert_eq!(updated.hits, 2);
    }
}

//! JSON file dataset store.

use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::error::BcgError;
use crate::ports::dataset_port::DatasetPort;

pub struct JsonFileAdapter {
    path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl DatasetPort for JsonFileAdapter {
    fn fetch(&self) -> Result<Option<Value>, BcgError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BcgError::Storage {
                    reason: format!("failed to read {}: {}", self.path.display(), e),
                })
            }
        };
        // Undecodable text is handed on as a string so the load contract can
        // reject it as a malformed payload.
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Ok(Some(Value::String(content))),
        }
    }

    fn save(&self, payload: &Value) -> Result<(), BcgError> {
        let text = serde_json::to_string_pretty(payload).map_err(|e| BcgError::Storage {
            reason: format!("failed to encode payload: {}", e),
        })?;
        fs::write(&self.path, text).map_err(|e| BcgError::Storage {
            reason: format!("failed to write {}: {}", self.path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let adapter = JsonFileAdapter::new(dir.path().join("none.json"));
        assert!(adapter.fetch().unwrap().is_none());
    }

    #[test]
    fn save_then_fetch() {
        let dir = TempDir::new().unwrap();
        let adapter = JsonFileAdapter::new(dir.path().join("matrix.json"));
        let payload = json!({"salesForecast": {"products": []}});
        adapter.save(&payload).unwrap();
        assert_eq!(adapter.fetch().unwrap(), Some(payload));
    }

    #[test]
    fn garbage_file_comes_back_as_string() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matrix.json");
        fs::write(&path, "not json at all").unwrap();
        let adapter = JsonFileAdapter::new(path);
        assert_eq!(
            adapter.fetch().unwrap(),
            Some(Value::String("not json at all".into()))
        );
    }

    #[test]
    fn unwritable_path_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let adapter = JsonFileAdapter::new(dir.path().join("missing_dir").join("m.json"));
        let err = adapter.save(&json!({})).unwrap_err();
        assert!(matches!(err, BcgError::Storage { .. }));
    }
}

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use asteroids_core::constants::BEST_TIME_KEY;
use asteroids_core::{BestTimeStore, StoreError};
use serde_json::{Map, Value};

/// Best time persisted as `{"asteroids-high-score": <millis>}`. Other keys in
/// the document are preserved on write.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drops the stored record. Returns whether one existed.
    pub fn reset(&mut self) -> Result<bool, StoreError> {
        let Some(mut document) = self.read_document()? else {
            return Ok(false);
        };
        let existed = document.remove(BEST_TIME_KEY).is_some();
        if existed {
            self.write_document(&document)?;
        }
        Ok(existed)
    }

    fn read_document(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StoreError::Io(format!(
                    "failed reading {}: {err}",
                    self.path.display()
                )))
            }
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(document)) => Ok(Some(document)),
            Ok(_) => Err(StoreError::Decode(format!(
                "{} is not a json object",
                self.path.display()
            ))),
            Err(err) => Err(StoreError::Decode(format!(
                "{}: {err}",
                self.path.display()
            ))),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                StoreError::Io(format!("failed creating {}: {err}", parent.display()))
            })?;
        }

        let encoded = serde_json::to_vec_pretty(document)
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        fs::write(&self.path, encoded).map_err(|err| {
            StoreError::Io(format!("failed writing {}: {err}", self.path.display()))
        })
    }
}

impl BestTimeStore for JsonFileStore {
    fn best_time(&self) -> Option<Duration> {
        let document = match self.read_document() {
            Ok(document) => document?,
            Err(err) => {
                tracing::warn!("ignoring unreadable best time: {err}");
                return None;
            }
        };
        document
            .get(BEST_TIME_KEY)
            .and_then(Value::as_u64)
            .map(Duration::from_millis)
    }

    fn set_best_time(&mut self, best: Duration) -> Result<(), StoreError> {
        let mut document = self.read_document()?.unwrap_or_default();
        document.insert(
            BEST_TIME_KEY.to_string(),
            Value::from(best.as_millis() as u64),
        );
        self.write_document(&document)
    }
}

use std::{fs, io, path::PathBuf};

use bertha_knockout_system_best_score::{ScoreStore, StoreError};
use serde::{Deserialize, Serialize};

/// Best score document as written to disk.
#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    berthaknockout_best: u32,
}

/// Store that keeps the best score in a small JSON document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`. The file is created on the first save.
    pub(crate) fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<u32>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        let record: BestScoreRecord =
            serde_json::from_str(&contents).map_err(|error| StoreError::Malformed {
                reason: error.to_string(),
            })?;
        Ok(Some(record.berthaknockout_best))
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        let record = BestScoreRecord {
            berthaknockout_best: score,
        };
        let json = serde_json::to_string(&record).map_err(|error| StoreError::Malformed {
            reason: error.to_string(),
        })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

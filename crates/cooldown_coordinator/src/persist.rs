//! Persistence utilities: the event log file format and its error type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::types::JOURNAL_VERSION;
use crate::world::WorldEvent;

fn default_journal_version() -> u32 {
    JOURNAL_VERSION
}

// ============================================================================
// Event log
// ============================================================================

/// A versioned, serializable snapshot of a world's event journal. This is
/// the repository's save/sync artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(default = "default_journal_version")]
    pub version: u32,
    pub events: Vec<WorldEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            version: JOURNAL_VERSION,
            events: Vec::new(),
        }
    }

    pub fn from_events(events: impl Into<Vec<WorldEvent>>) -> Self {
        Self {
            version: JOURNAL_VERSION,
            events: events.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self, PersistError> {
        let log: Self = serde_json::from_str(input)?;
        log.validate_version()?;
        Ok(log)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        write_json_to_path(self, path.as_ref())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let log: Self = read_json_from_path(path.as_ref())?;
        log.validate_version()?;
        Ok(log)
    }

    pub(crate) fn validate_version(&self) -> Result<(), PersistError> {
        if self.version == JOURNAL_VERSION {
            Ok(())
        } else {
            Err(PersistError::UnsupportedVersion {
                version: self.version,
                expected: JOURNAL_VERSION,
            })
        }
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    Io(String),
    Serde(String),
    UnsupportedVersion { version: u32, expected: u32 },
}

impl From<io::Error> for PersistError {
    fn from(err: io::Error) -> Self {
        PersistError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::Serde(err.to_string())
    }
}

// ============================================================================
// Helper functions
// ============================================================================

pub(crate) fn write_json_to_path<T: Serialize>(value: &T, path: &Path) -> Result<(), PersistError> {
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(path, data)?;
    Ok(())
}

pub(crate) fn read_json_from_path<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

//! Cross-session score storage
//!
//! Features:
//! - Versioned JSON envelope per player
//! - Backup rotation (tmp -> save, old save -> backup)
//! - Falls back to the backup when the save is unreadable

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::PersistedState;

/// Current envelope format
pub const ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("score store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("score record version {0} is not supported")]
    UnsupportedVersion(u32),
}

/// Where per-player records live between sessions
pub trait ScoreStore {
    fn load(&self, player_id: &str) -> Result<Option<PersistedState>, PersistenceError>;
    fn save(&mut self, player_id: &str, record: &PersistedState) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    player_id: String,
    record: PersistedState,
}

/// One JSON file per player in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, player_id: &str, extension: &str) -> PathBuf {
        // Player ids come from the host; keep them to a safe file name
        let stem: String = player_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{stem}.{extension}"))
    }

    fn read(path: &Path) -> Result<Option<PersistedState>, PersistenceError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = serde_json::from_str(&json)?;
        if envelope.version != ENVELOPE_VERSION {
            return Err(PersistenceError::UnsupportedVersion(envelope.version));
        }
        Ok(Some(envelope.record))
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self, player_id: &str) -> Result<Option<PersistedState>, PersistenceError> {
        let err = match Self::read(&self.path(player_id, "json")) {
            Ok(record) => return Ok(record),
            Err(e) => e,
        };
        warn!("Score record for {} unreadable ({}), trying backup", player_id, err);
        // The main file's error wins unless the backup yields a record
        match Self::read(&self.path(player_id, "bak")) {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => Err(err),
            Err(backup_err) => {
                warn!("Backup for {} unreadable too ({})", player_id, backup_err);
                Err(err)
            }
        }
    }

    fn save(&mut self, player_id: &str, record: &PersistedState) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            player_id: player_id.to_string(),
            record: record.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        let save = self.path(player_id, "json");
        let tmp = self.path(player_id, "tmp");
        fs::write(&tmp, json)?;
        if save.exists() {
            fs::rename(&save, self.path(player_id, "bak"))?;
        }
        fs::rename(&tmp, &save)?;
        info!("Saved scores for {} ({} holes)", player_id, record.holes_played());
        Ok(())
    }
}

/// Records kept in memory, for tests and hosts with their own storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    records: BTreeMap<String, PersistedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self, player_id: &str) -> Result<Option<PersistedState>, PersistenceError> {
        Ok(self.records.get(player_id).cloned())
    }

    fn save(&mut self, player_id: &str, record: &PersistedState) -> Result<(), PersistenceError> {
        self.records.insert(player_id.to_string(), record.clone());
        Ok(())
    }
}

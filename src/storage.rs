//! Snapshot persistence: a key-value blob store holding the latest committed score sheet.
//!
//! The snapshot is two JSON blobs, one for the player list and one for the round list.

use crate::models::{Player, Round, ScoreSheet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Blob key for the player list.
pub const PLAYERS_KEY: &str = "players";
/// Blob key for the round list.
pub const ROUNDS_KEY: &str = "rounds";

/// Errors from reading or writing a snapshot.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage I/O error: {}", e),
            StoreError::Json(e) => write!(f, "snapshot encoding error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Where committed score sheets are mirrored.
pub trait SheetStore {
    /// The saved snapshot, or `None` when nothing (or only half a snapshot) is stored.
    fn load(&self) -> Result<Option<ScoreSheet>, StoreError>;
    fn save(&self, sheet: &ScoreSheet) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

fn encode(sheet: &ScoreSheet) -> Result<(String, String), StoreError> {
    Ok((
        serde_json::to_string(&sheet.players)?,
        serde_json::to_string(&sheet.rounds)?,
    ))
}

fn decode(players: &str, rounds: &str) -> Result<ScoreSheet, StoreError> {
    let players: Vec<Player> = serde_json::from_str(players)?;
    let rounds: Vec<Round> = serde_json::from_str(rounds)?;
    Ok(ScoreSheet::new(players, rounds))
}

#[derive(Debug, Default)]
struct Blobs {
    players: Option<String>,
    rounds: Option<String>,
}

/// In-process blob store. Clones share the same blobs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Blobs>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> std::sync::MutexGuard<'_, Blobs> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Raw blob by key (`PLAYERS_KEY` or `ROUNDS_KEY`).
    pub fn blob(&self, key: &str) -> Option<String> {
        let blobs = self.blobs();
        match key {
            PLAYERS_KEY => blobs.players.clone(),
            ROUNDS_KEY => blobs.rounds.clone(),
            _ => None,
        }
    }
}

impl SheetStore for MemoryStore {
    fn load(&self) -> Result<Option<ScoreSheet>, StoreError> {
        let blobs = self.blobs();
        match (&blobs.players, &blobs.rounds) {
            (Some(players), Some(rounds)) => decode(players, rounds).map(Some),
            _ => Ok(None),
        }
    }

    fn save(&self, sheet: &ScoreSheet) -> Result<(), StoreError> {
        let mut blobs = self.blobs();
        let (players, rounds) = encode(sheet)?;
        blobs.players = Some(players);
        blobs.rounds = Some(rounds);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut blobs = self.blobs();
        blobs.players = None;
        blobs.rounds = None;
        Ok(())
    }
}

/// Blob store backed by a directory: `players.json` and `rounds.json`.
#[derive(Clone, Debug)]
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

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read_blob(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write via a temp file and rename so a crash never leaves a truncated blob.
    fn write_blob(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_blob(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SheetStore for JsonFileStore {
    fn load(&self) -> Result<Option<ScoreSheet>, StoreError> {
        let players = self.read_blob(PLAYERS_KEY)?;
        let rounds = self.read_blob(ROUNDS_KEY)?;
        match (players, rounds) {
            (Some(players), Some(rounds)) => decode(&players, &rounds).map(Some),
            (None, None) => Ok(None),
            _ => {
                log::warn!("Incomplete snapshot in {}; ignoring it", self.dir.display());
                Ok(None)
            }
        }
    }

    fn save(&self, sheet: &ScoreSheet) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let (players, rounds) = encode(sheet)?;
        self.write_blob(PLAYERS_KEY, &players)?;
        self.write_blob(ROUNDS_KEY, &rounds)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.remove_blob(PLAYERS_KEY)?;
        self.remove_blob(ROUNDS_KEY)?;
        Ok(())
    }
}

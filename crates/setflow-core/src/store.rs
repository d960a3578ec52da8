//! JSON-file persistence for named routines.
//!
//! Each routine lives in its own pretty-printed file under
//! `~/.config/setflow[-dev]/routines/<id>.json`. The exercise list inside is
//! the core [`Routine`] type unchanged, so import/export round-trips the
//! session input losslessly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::routine::Routine;

/// Returns `~/.config/setflow[-dev]/` based on SETFLOW_ENV.
///
/// Set SETFLOW_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SETFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("setflow-dev")
    } else {
        base_dir.join("setflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// A named routine as it sits on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRoutine {
    pub id: Uuid,
    pub name: String,
    pub exercises: Routine,
}

impl StoredRoutine {
    pub fn new(name: impl Into<String>, exercises: Routine) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            exercises,
        }
    }
}

/// Directory-backed routine store.
pub struct RoutineStore {
    dir: PathBuf,
}

impl RoutineStore {
    /// Open the default store, seeding the starter routine on first use.
    pub fn open() -> Result<Self> {
        let store = Self::at(data_dir()?.join("routines"))?;
        if store.list()?.is_empty() {
            store.save(&StoredRoutine::new("Starter", Routine::starter()))?;
        }
        Ok(store)
    }

    /// Open a store at an explicit directory, creating it if needed.
    pub fn at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// All stored routines, sorted by name. Files that fail to parse are
    /// skipped rather than failing the listing.
    pub fn list(&self) -> Result<Vec<StoredRoutine>> {
        let mut routines = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            if let Ok(routine) = serde_json::from_str::<StoredRoutine>(&content) {
                routines.push(routine);
            }
        }
        routines.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(routines)
    }

    /// Resolve a routine by exact id, exact name, or unique name prefix
    /// (case-insensitive).
    pub fn find(&self, query: &str) -> Result<StoredRoutine> {
        let routines = self.list()?;
        if let Some(found) = routines.iter().find(|r| r.id.to_string() == query) {
            return Ok(found.clone());
        }
        let needle = query.to_lowercase();
        if let Some(found) = routines.iter().find(|r| r.name.to_lowercase() == needle) {
            return Ok(found.clone());
        }
        let mut matches = routines
            .into_iter()
            .filter(|r| r.name.to_lowercase().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(StoreError::AmbiguousName(query.to_string()).into()),
            _ => Err(StoreError::NotFound(query.to_string()).into()),
        }
    }

    pub fn save(&self, routine: &StoredRoutine) -> Result<()> {
        let content = serde_json::to_string_pretty(routine)?;
        std::fs::write(self.path_for(routine.id), content)?;
        Ok(())
    }

    pub fn delete(&self, query: &str) -> Result<StoredRoutine> {
        let routine = self.find(query)?;
        std::fs::remove_file(self.path_for(routine.id))?;
        Ok(routine)
    }

    /// Read a routine from an arbitrary path: either a stored-routine file
    /// or a bare exercise array. Imported routines get a fresh id when the
    /// file is a bare array.
    pub fn import(&self, path: &Path, name: Option<String>) -> Result<StoredRoutine> {
        let content = std::fs::read_to_string(path)?;
        let mut routine = if let Ok(stored) = serde_json::from_str::<StoredRoutine>(&content) {
            stored
        } else if let Ok(exercises) = serde_json::from_str::<Routine>(&content) {
            let fallback = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Imported")
                .to_string();
            StoredRoutine::new(fallback, exercises)
        } else {
            return Err(StoreError::InvalidFormat(path.display().to_string()).into());
        };
        if let Some(name) = name {
            routine.name = name;
        }
        self.save(&routine)?;
        Ok(routine)
    }

    /// Write the exercise list to `path` as a bare JSON array -- the shape
    /// `import` and any other consumer of the session input accepts.
    pub fn export(&self, query: &str, path: &Path) -> Result<()> {
        let routine = self.find(query)?;
        let content = serde_json::to_string_pretty(&routine.exercises)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

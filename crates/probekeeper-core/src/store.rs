//! Agent state persistence
//!
//! Flags, relations and fingerprints persist as one JSON document; a
//! missing file is a fresh agent.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CoreError;
use crate::state::AgentState;

/// JSON-file backed state store
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state, defaulting when no file exists
    pub fn load(&self) -> Result<AgentState, CoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| CoreError::Serialize(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted state, starting fresh");
                Ok(AgentState::default())
            }
            Err(e) => Err(CoreError::StatePersist(e.to_string())),
        }
    }

    /// Persist the state, replacing any previous document
    pub fn save(&self, state: &AgentState) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::StatePersist(e.to_string()))?;
        }

        let bytes =
            serde_json::to_vec_pretty(state).map_err(|e| CoreError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, bytes).map_err(|e| CoreError::StatePersist(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Relation;

    #[test]
    fn test_missing_file_yields_default_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let state = store.load().unwrap();

        assert_eq!(state.flags, crate::state::Flags::default());
    }

    #[test]
    fn test_state_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let mut state = AgentState::default();
        state.flags.installed = true;
        state.flags.started = true;
        state.relations.set(Relation::Prometheus, true);
        state.fingerprints.data_changed("config", b"abc");

        store.save(&state).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.flags, state.flags);
        assert_eq!(loaded.relations, state.relations);
        assert_eq!(loaded.fingerprints, state.fingerprints);
    }

    #[test]
    fn test_unknown_keys_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"flags": {"installed": true, "retired_marker": true}, "future_section": 1}"#,
        )
        .unwrap();

        let state = StateStore::new(&path).load().unwrap();

        assert!(state.flags.installed);
    }
}

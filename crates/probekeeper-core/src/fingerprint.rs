//! Change-detection fingerprints
//!
//! Stores a SHA-256 digest per key; `data_changed` reports whether the
//! current value differs from the last-seen one and records the new digest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Per-key content digests persisted with the agent state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprints(BTreeMap<String, String>);

impl Fingerprints {
    /// Whether `data` differs from the digest last recorded under `key`
    ///
    /// Records the new digest either way, so a subsequent call with the
    /// same data returns `false`. A key seen for the first time counts as
    /// changed.
    pub fn data_changed(&mut self, key: &str, data: impl AsRef<[u8]>) -> bool {
        let digest = format!("{:x}", Sha256::digest(data.as_ref()));

        match self.0.get(key) {
            Some(previous) if *previous == digest => false,
            _ => {
                self.0.insert(key.to_string(), digest);
                true
            }
        }
    }

    /// Digest currently recorded under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_counts_as_changed() {
        let mut fingerprints = Fingerprints::default();

        assert!(fingerprints.data_changed("config", b"a"));
        assert!(!fingerprints.data_changed("config", b"a"));
    }

    #[test]
    fn test_new_value_changes_and_sticks() {
        let mut fingerprints = Fingerprints::default();

        fingerprints.data_changed("config", b"a");
        assert!(fingerprints.data_changed("config", b"b"));
        assert!(!fingerprints.data_changed("config", b"b"));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut fingerprints = Fingerprints::default();

        fingerprints.data_changed("config", b"a");
        assert!(fingerprints.data_changed("rendered", b"a"));
    }
}

//! Alphabet snapshot save/load.
//!
//! Only the extended entries are stored: the base and reserved codes are the
//! same in every alphabet. Loading replays the registrations in order, so a
//! generation run decodes codes exactly as the training run assigned them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{CorpusError, CorpusResult};
use crate::data::{Alphabet, Code};

/// One extended alphabet entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub code: Code,
    pub ch: char,
}

/// Serializable alphabet data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphabetSnapshot {
    /// Total code count at save time.
    pub alphabet_size: usize,
    /// Extended entries in registration order.
    pub extended: Vec<SnapshotEntry>,
}

impl AlphabetSnapshot {
    #[must_use]
    pub fn from_alphabet(alphabet: &Alphabet) -> Self {
        Self {
            alphabet_size: alphabet.alphabet_size(),
            extended: alphabet
                .extended_entries()
                .into_iter()
                .map(|(code, ch)| SnapshotEntry { code, ch })
                .collect(),
        }
    }

    /// Rebuild the alphabet by registering every entry in order.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::InvalidSnapshot`] if an entry's code differs from
    /// the one registration assigns, or the final size does not match.
    pub fn to_alphabet(&self) -> CorpusResult<Alphabet> {
        let mut alphabet = Alphabet::new();
        for entry in &self.extended {
            if alphabet.contains(entry.ch) {
                return Err(CorpusError::InvalidSnapshot(format!(
                    "{:?} is already in the alphabet",
                    entry.ch
                )));
            }
            let code = alphabet.register_char(entry.ch);
            if code != entry.code {
                return Err(CorpusError::InvalidSnapshot(format!(
                    "{:?} stored with code {}, registration assigns {}",
                    entry.ch, entry.code, code
                )));
            }
        }
        if alphabet.alphabet_size() != self.alphabet_size {
            return Err(CorpusError::InvalidSnapshot(format!(
                "alphabet_size {} does not match rebuilt size {}",
                self.alphabet_size,
                alphabet.alphabet_size()
            )));
        }
        Ok(alphabet)
    }
}

/// Save an alphabet snapshot to a JSON file.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_alphabet(alphabet: &Alphabet, path: &Path) -> CorpusResult<()> {
    let json = serde_json::to_string_pretty(&AlphabetSnapshot::from_alphabet(alphabet))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CorpusError::io(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| CorpusError::io(path, e))
}

/// Load an alphabet from a JSON snapshot.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the snapshot is inconsistent.
pub fn load_alphabet(path: &Path) -> CorpusResult<Alphabet> {
    let json = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
    let snapshot: AlphabetSnapshot = serde_json::from_str(&json)?;
    snapshot.to_alphabet()
}

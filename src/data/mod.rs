//! Corpus loading, text normalization, alphabet and batch generation.
//!
//! ## Submodules
//!
//! - [`vocab`]: Character alphabet with reserved, base and extended codes
//! - [`corpus`]: Multi-source loading into one ordered code sequence
//! - [`batches`]: Epoch-rotated `(inputs, targets)` batch iterator

pub mod batches;
pub mod corpus;
pub mod vocab;

use std::borrow::Cow;

use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

use crate::core::{CorpusError, CorpusResult};

pub use batches::{count_batches, get_training_batches, Batch, TrainingBatches};
pub use corpus::{
    collect_text_files, expand_inputs, load_corpus, load_from_files, Corpus, FileSource, LoadConfig,
    MemorySource, TextSource,
};
pub use vocab::{Alphabet, Code, NEWLINE_CODE, UNK_CODE};

/// Text handed to the encoder, tagged by how it is represented.
///
/// Raw bytes are decoded with the fixed source encoding (UTF-8) before
/// normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput<'a> {
    Text(&'a str),
    RawBytes(&'a [u8]),
}

impl<'a> TextInput<'a> {
    /// Resolve to text, decoding raw bytes as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Decode`] if the bytes are not valid UTF-8.
    pub fn to_text(self) -> CorpusResult<Cow<'a, str>> {
        match self {
            TextInput::Text(s) => Ok(Cow::Borrowed(s)),
            TextInput::RawBytes(bytes) => {
                let (text, had_errors) = encoding_rs::UTF_8.decode_without_bom_handling(bytes);
                if had_errors {
                    return Err(CorpusError::Decode(format!(
                        "{} bytes are not valid {}",
                        bytes.len(),
                        encoding_rs::UTF_8.name()
                    )));
                }
                Ok(text)
            }
        }
    }
}

impl<'a> From<&'a str> for TextInput<'a> {
    fn from(s: &'a str) -> Self {
        TextInput::Text(s)
    }
}

impl<'a> From<&'a [u8]> for TextInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        TextInput::RawBytes(bytes)
    }
}

/// Strip diacritics: compatibility decomposition (NFKD), then drop
/// nonspacing marks (general category Mn).
///
/// Spacing marks (Mc) and enclosing marks (Me) are kept: they carry letters
/// in scripts such as Devanagari rather than accents.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.nfkd()
        .filter(|&c| get_general_category(c) != GeneralCategory::NonspacingMark)
        .collect()
}

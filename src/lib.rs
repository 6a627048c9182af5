//! # charcorpus
//!
//! Corpus preparation for character-level sequence models.
//!
//! ## Overview
//!
//! Text is mapped to a compact integer alphabet, several sources are joined
//! into one code stream, and the stream is cut into fixed-size training
//! batches whose rows rotate from epoch to epoch (for recurrent models that
//! carry state per batch row). At generation time a next code is drawn from
//! the model's output with top-k sampling and decoded back to a character.
//!
//! ## Structure
//!
//! - [`core`]: Error type
//! - [`data`]: Alphabet, normalization, corpus loading, batch generation
//! - [`sampling`]: Top-k categorical sampling
//! - [`checkpoint`]: Alphabet snapshot save/load
//! - [`codec`]: File re-encoding and normalization utilities
//! - [`utils`]: Index helpers over probability vectors

pub mod checkpoint;
pub mod codec;
pub mod core;
pub mod data;
pub mod sampling;
pub mod utils;

pub use crate::core::{CorpusError, CorpusResult};
pub use data::{
    get_training_batches, load_corpus, load_from_files, normalize_text, Alphabet, Batch, Code,
    Corpus, LoadConfig, TextInput, TrainingBatches, NEWLINE_CODE, UNK_CODE,
};
pub use sampling::{peek_char_from_prob, TopKSampler, DEFAULT_TOP_N};

/// Batching and sampling configuration.
///
/// Used by [`Config::batches`] and the command-line front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub n_epochs: usize,
    pub batch_size: usize,
    pub seq_length: usize,
    pub top_n: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n_epochs: 10,
            batch_size: 32,
            seq_length: 50,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl Config {
    /// Check that every size is positive.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::InvalidArgument`] naming the first zero field.
    pub fn validate(&self) -> CorpusResult<()> {
        for (name, value) in [
            ("n_epochs", self.n_epochs),
            ("batch_size", self.batch_size),
            ("seq_length", self.seq_length),
            ("top_n", self.top_n),
        ] {
            if value == 0 {
                return Err(CorpusError::InvalidArgument(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        Ok(())
    }

    /// Training batches over `corpus` with this configuration.
    ///
    /// # Errors
    ///
    /// See [`get_training_batches`].
    pub fn batches(&self, corpus: &Corpus) -> CorpusResult<TrainingBatches> {
        self.validate()?;
        get_training_batches(self.n_epochs, self.batch_size, self.seq_length, corpus.codes())
    }
}

//! Corpus loading: read sources, normalize, encode, concatenate.
//!
//! Sources are consumed in the order given and their codes are appended to a
//! single [`Corpus`]. An optional sentinel character marks the end of each
//! source; it is registered in the [`Alphabet`] on first use.

use std::fs;
use std::path::{Path, PathBuf};

use super::normalize_text;
use super::vocab::{Alphabet, Code};
use crate::core::{CorpusError, CorpusResult};

/// Options for [`load_corpus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Sentinel appended after every source.
    pub eof_char: Option<char>,
    /// Strip diacritics before encoding.
    pub normalize: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            eof_char: None,
            normalize: true,
        }
    }
}

/// A readable text source.
pub trait TextSource {
    /// Name used in progress logs.
    fn name(&self) -> String;

    /// Read the full text of the source.
    fn read_text(&self) -> CorpusResult<String>;
}

/// A UTF-8 text file.
#[derive(Debug, Clone)]
pub struct FileSource(pub PathBuf);

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource(path.into())
    }
}

impl TextSource for FileSource {
    fn name(&self) -> String {
        self.0.display().to_string()
    }

    fn read_text(&self) -> CorpusResult<String> {
        fs::read_to_string(&self.0).map_err(|e| CorpusError::io(&self.0, e))
    }
}

/// Text already in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    pub name: String,
    pub text: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl TextSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn read_text(&self) -> CorpusResult<String> {
        Ok(self.text.clone())
    }
}

/// An encoded corpus: every source's codes, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus(Vec<Code>);

impl Corpus {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn codes(&self) -> &[Code] {
        &self.0
    }

    #[must_use]
    pub fn into_codes(self) -> Vec<Code> {
        self.0
    }
}

impl From<Vec<Code>> for Corpus {
    fn from(codes: Vec<Code>) -> Self {
        Corpus(codes)
    }
}

impl AsRef<[Code]> for Corpus {
    fn as_ref(&self) -> &[Code] {
        &self.0
    }
}

/// Load and encode every source into one corpus.
///
/// For each source, in order: read it, normalize it if `config.normalize`,
/// encode it and append the codes. With `config.eof_char` set, the sentinel
/// is registered if the alphabet does not know it yet and its code follows
/// every source. The sentinel is appended after normalization so it is
/// never decomposed.
///
/// # Errors
///
/// Returns the first error raised by a source's [`TextSource::read_text`].
pub fn load_corpus<S: TextSource>(
    alphabet: &mut Alphabet,
    sources: &[S],
    config: &LoadConfig,
) -> CorpusResult<Corpus> {
    let mut codes = Vec::new();

    for source in sources {
        let text = source.read_text()?;
        let eof_code = config.eof_char.map(|c| alphabet.register_char(c));

        let content = if config.normalize {
            normalize_text(&text)
        } else {
            text
        };
        codes.extend(alphabet.encode_str(&content, false));
        if let Some(code) = eof_code {
            codes.push(code);
        }

        tracing::info!("file '{}' loaded", source.name());
    }

    tracing::info!("finished ({} characters loaded)", codes.len());
    Ok(Corpus(codes))
}

/// Load a list of UTF-8 files with [`load_corpus`].
///
/// # Errors
///
/// Returns [`CorpusError::Io`] if a file cannot be read or is not valid UTF-8.
pub fn load_from_files<P: AsRef<Path>>(
    alphabet: &mut Alphabet,
    paths: &[P],
    config: &LoadConfig,
) -> CorpusResult<Corpus> {
    let sources: Vec<FileSource> = paths
        .iter()
        .map(|p| FileSource::new(p.as_ref()))
        .collect();
    load_corpus(alphabet, &sources, config)
}

/// Collect the `.txt` files of a directory, sorted by path.
///
/// # Errors
///
/// Returns [`CorpusError::Io`] if the directory or one of its entries cannot
/// be read.
pub fn collect_text_files(dir: &Path) -> CorpusResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| CorpusError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CorpusError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Expand a list of inputs: directories become their sorted `.txt` files,
/// anything else is kept as given.
///
/// # Errors
///
/// Returns [`CorpusError::Io`] if a directory cannot be read.
pub fn expand_inputs<P: AsRef<Path>>(inputs: &[P]) -> CorpusResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            files.extend(collect_text_files(input)?);
        } else {
            files.push(input.to_path_buf());
        }
    }
    Ok(files)
}

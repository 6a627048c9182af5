//! File repair utilities: re-encoding and in-place normalization.
//!
//! [`reencode_files`] rewrites files in a target encoding. Each file is first
//! decoded strictly with the declared source encoding (the target encoding if
//! none is declared); if that fails, every entry of [`CANDIDATE_ENCODINGS`] is
//! tried in order and the first that decodes cleanly wins. A file no
//! candidate can decode is left untouched and reported as
//! [`CorpusError::CodecExhausted`].

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::core::{CorpusError, CorpusResult};
use crate::data::normalize_text;

/// Source encodings tried, in order, when the declared one fails.
pub static CANDIDATE_ENCODINGS: &[&Encoding] = &[
    encoding_rs::UTF_8,
    encoding_rs::WINDOWS_1252,
    encoding_rs::BIG5,
    encoding_rs::IBM866,
    encoding_rs::WINDOWS_874,
    encoding_rs::SHIFT_JIS,
    encoding_rs::EUC_KR,
    encoding_rs::WINDOWS_1250,
    encoding_rs::WINDOWS_1251,
    encoding_rs::WINDOWS_1253,
    encoding_rs::WINDOWS_1254,
    encoding_rs::WINDOWS_1255,
    encoding_rs::WINDOWS_1256,
    encoding_rs::WINDOWS_1257,
    encoding_rs::WINDOWS_1258,
    encoding_rs::EUC_JP,
    encoding_rs::GBK,
    encoding_rs::GB18030,
    encoding_rs::ISO_2022_JP,
    encoding_rs::ISO_8859_2,
    encoding_rs::ISO_8859_3,
    encoding_rs::ISO_8859_4,
    encoding_rs::ISO_8859_5,
    encoding_rs::ISO_8859_6,
    encoding_rs::ISO_8859_7,
    encoding_rs::ISO_8859_8,
    encoding_rs::ISO_8859_10,
    encoding_rs::ISO_8859_13,
    encoding_rs::ISO_8859_14,
    encoding_rs::ISO_8859_15,
    encoding_rs::KOI8_R,
    encoding_rs::KOI8_U,
    encoding_rs::X_MAC_CYRILLIC,
    encoding_rs::MACINTOSH,
    encoding_rs::UTF_16LE,
    encoding_rs::UTF_16BE,
];

/// Outcome of re-encoding one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReencodeReport {
    pub path: PathBuf,
    /// Encoding the file was decoded with.
    pub source: &'static Encoding,
    pub target: &'static Encoding,
    /// Whether the source encoding came from the candidate list.
    pub guessed: bool,
}

/// Resolve an encoding label such as `"utf8"`, `"latin1"` or `"cp1251"`.
///
/// # Errors
///
/// Returns [`CorpusError::UnsupportedEncoding`] for unknown labels.
pub fn encoding_for_label(label: &str) -> CorpusResult<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| CorpusError::UnsupportedEncoding(label.to_string()))
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Re-encode one file, guessing its source encoding from `candidates` if needed.
///
/// # Errors
///
/// - [`CorpusError::UnsupportedEncoding`] if `target` cannot be written (UTF-16).
/// - [`CorpusError::CodecExhausted`] if neither the declared encoding nor any
///   candidate decodes the file; the file is not modified.
/// - [`CorpusError::Unencodable`] if the text cannot be represented in `target`.
/// - [`CorpusError::Io`] on read or write failure.
pub fn reencode_file_with(
    path: &Path,
    target: &'static Encoding,
    source: Option<&'static Encoding>,
    candidates: &[&'static Encoding],
) -> CorpusResult<ReencodeReport> {
    if target.output_encoding() != target {
        return Err(CorpusError::UnsupportedEncoding(format!(
            "{} cannot be used as a target encoding",
            target.name()
        )));
    }

    let declared = source.unwrap_or(target);
    tracing::info!(
        "encoding file '{}' from {} to {}",
        path.display(),
        declared.name(),
        target.name()
    );

    let bytes = std::fs::read(path).map_err(|e| CorpusError::io(path, e))?;

    let mut attempted = vec![declared.name()];
    let (text, used, guessed) = match decode_strict(declared, &bytes) {
        Some(text) => (text, declared, false),
        None => {
            tracing::warn!("decode error: trying to guess codec for '{}'", path.display());
            let mut found = None;
            for &candidate in candidates {
                attempted.push(candidate.name());
                if let Some(text) = decode_strict(candidate, &bytes) {
                    tracing::info!("source codec changed to {}", candidate.name());
                    found = Some((text, candidate, true));
                    break;
                }
            }
            found.ok_or_else(|| CorpusError::CodecExhausted {
                path: path.to_path_buf(),
                attempted,
            })?
        }
    };

    let (encoded, _, unmappable) = target.encode(&text);
    if unmappable {
        return Err(CorpusError::Unencodable {
            path: path.to_path_buf(),
            encoding: target.name(),
        });
    }
    std::fs::write(path, &encoded).map_err(|e| CorpusError::io(path, e))?;

    Ok(ReencodeReport {
        path: path.to_path_buf(),
        source: used,
        target,
        guessed,
    })
}

/// Re-encode every file in `paths` into `target`.
///
/// Stops at the first failure; files already processed keep their new encoding.
///
/// # Errors
///
/// See [`reencode_file_with`].
pub fn reencode_files<P: AsRef<Path>>(
    paths: &[P],
    target: &'static Encoding,
    source: Option<&'static Encoding>,
) -> CorpusResult<Vec<ReencodeReport>> {
    paths
        .iter()
        .map(|p| reencode_file_with(p.as_ref(), target, source, CANDIDATE_ENCODINGS))
        .collect()
}

/// Rewrite UTF-8 files in place with diacritics stripped.
///
/// # Errors
///
/// Returns [`CorpusError::Io`] if a file cannot be read (or is not UTF-8) or written.
pub fn normalize_files<P: AsRef<Path>>(paths: &[P]) -> CorpusResult<()> {
    for path in paths {
        let path = path.as_ref();
        tracing::info!("normalizing file '{}'", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        std::fs::write(path, normalize_text(&text)).map_err(|e| CorpusError::io(path, e))?;
    }
    Ok(())
}

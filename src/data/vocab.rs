//! Character alphabet for next-character prediction.
//!
//! Maps between characters and integer codes:
//!
//! ```text
//! 0        UNK (anything without a mapping, decodes to nothing)
//! 1        '\n'
//! 2..=96   printable ASCII ' '..='~' (ordinal - 30)
//! 98..     extended characters, in registration order
//! ```
//!
//! Base and reserved codes never change. Extended codes are appended by
//! [`Alphabet::register_char`] and are assigned `alphabet_size() + 1`, so the
//! first extended code is 98.

use std::collections::HashMap;

use super::{normalize_text, TextInput};
use crate::core::CorpusResult;

/// Integer code of a character.
pub type Code = usize;

/// Code for characters with no mapping.
pub const UNK_CODE: Code = 0;
/// Code for `'\n'`.
pub const NEWLINE_CODE: Code = 1;

const BASE_FIRST: u32 = ' ' as u32;
const BASE_LAST: u32 = '~' as u32;
const BASE_OFFSET: u32 = 30;
/// Number of printable ASCII characters in the base range.
pub const BASE_RANGE_SIZE: usize = (BASE_LAST - BASE_FIRST + 1) as usize;

/// Bidirectional character ↔ code mapping.
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    /// Extended characters to their code.
    char_to_code: HashMap<char, Code>,
    /// Extended codes back to their character.
    code_to_char: HashMap<Code, char>,
    /// Extended characters in registration order.
    extended: Vec<char>,
}

impl Alphabet {
    /// Create an alphabet holding only the reserved and base codes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes in use: base range + newline + extended + UNK.
    #[must_use]
    pub fn alphabet_size(&self) -> usize {
        BASE_RANGE_SIZE + 1 + self.extended.len() + 1
    }

    /// Number of registered extended characters.
    #[must_use]
    pub fn extended_len(&self) -> usize {
        self.extended.len()
    }

    /// Encode one character. Unknown characters map to [`UNK_CODE`].
    #[must_use]
    pub fn encode_char(&self, c: char) -> Code {
        let ord = c as u32;
        if (BASE_FIRST..=BASE_LAST).contains(&ord) {
            return (ord - BASE_OFFSET) as Code;
        }
        if c == '\n' {
            return NEWLINE_CODE;
        }
        self.char_to_code.get(&c).copied().unwrap_or(UNK_CODE)
    }

    /// Decode one code. Returns `None` for [`UNK_CODE`] and unknown codes.
    #[must_use]
    pub fn decode_char(&self, code: Code) -> Option<char> {
        if let Some(&c) = self.code_to_char.get(&code) {
            return Some(c);
        }
        if code == NEWLINE_CODE {
            return Some('\n');
        }
        let base = (BASE_FIRST - BASE_OFFSET) as Code..=(BASE_LAST - BASE_OFFSET) as Code;
        if base.contains(&code) {
            return char::from_u32(code as u32 + BASE_OFFSET);
        }
        None
    }

    /// Whether `c` encodes to something other than UNK.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.encode_char(c) != UNK_CODE
    }

    /// Register a new character and return its code.
    ///
    /// The new code is `alphabet_size() + 1`. Registering a character that
    /// already has a code is a no-op: the existing code is returned and the
    /// alphabet does not grow.
    pub fn register_char(&mut self, c: char) -> Code {
        let existing = self.encode_char(c);
        if existing != UNK_CODE {
            return existing;
        }
        let code = self.alphabet_size() + 1;
        self.char_to_code.insert(c, code);
        self.code_to_char.insert(code, c);
        self.extended.push(c);
        code
    }

    /// Extended entries as `(code, char)` pairs, in registration order.
    #[must_use]
    pub fn extended_entries(&self) -> Vec<(Code, char)> {
        self.extended
            .iter()
            .map(|c| (self.char_to_code[c], *c))
            .collect()
    }

    /// Encode a string, stripping diacritics first when `normalize` is set.
    #[must_use]
    pub fn encode_str(&self, text: &str, normalize: bool) -> Vec<Code> {
        if normalize {
            self.encode_chars(&normalize_text(text))
        } else {
            self.encode_chars(text)
        }
    }

    /// Encode text or raw UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CorpusError::Decode`] if raw bytes are not valid UTF-8.
    pub fn encode_input(&self, input: TextInput<'_>, normalize: bool) -> CorpusResult<Vec<Code>> {
        let text = input.to_text()?;
        Ok(self.encode_str(&text, normalize))
    }

    /// Decode a code sequence. UNK and unknown codes are dropped.
    #[must_use]
    pub fn decode(&self, codes: &[Code]) -> String {
        codes.iter().filter_map(|&c| self.decode_char(c)).collect()
    }

    fn encode_chars(&self, text: &str) -> Vec<Code> {
        text.chars().map(|c| self.encode_char(c)).collect()
    }
}

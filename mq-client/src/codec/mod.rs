//! EBCDIC text conversion.
//!
//! Payloads coming off a z/OS-hosted queue are tagged with a CCSID and
//! carried as fixed-width EBCDIC bytes. This module converts them to and
//! from UTF-8 strings, with the code page always an explicit parameter —
//! nothing here assumes a single "the" EBCDIC.
//!
//! Both supported code pages map all 256 byte values, so a raw table miss
//! cannot happen. A payload counts as undecodable when a byte lands on a
//! control character other than HT/LF/CR, which is how binary data on a
//! text queue actually shows up.

mod tables;

use std::fmt;

use thiserror::Error;

/// Failure to interpret payload bytes as text.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// A byte decoded to a non-text control character.
    #[error("byte 0x{byte:02X} at offset {offset} is not text in {codepage}")]
    NotText {
        byte: u8,
        offset: usize,
        codepage: &'static str,
    },

    /// A payload tagged UTF-8 was not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Failure to represent text in a target code page.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    /// The character has no position in the code page. Never substituted
    /// silently; the caller decides what to do.
    #[error("character {ch:?} has no mapping in {codepage}")]
    Unmappable { ch: char, codepage: &'static str },
}

/// One fixed-width EBCDIC code page: a forward table to Latin-1 and its
/// exact inverse.
pub struct CodePage {
    pub name: &'static str,
    pub ccsid: u16,
    to_latin1: &'static [u8; 256],
    from_latin1: &'static [u8; 256],
}

/// EBCDIC CCSID 037 (US/Canada). The code page the original tooling used
/// for manual decode fallback.
pub static CP037: CodePage = CodePage {
    name: "CP037",
    ccsid: 37,
    to_latin1: &tables::CP037_TO_LATIN1,
    from_latin1: &tables::LATIN1_TO_CP037,
};

/// EBCDIC CCSID 500 (International). The usual on-wire tag for z/OS queues.
pub static CP500: CodePage = CodePage {
    name: "CP500",
    ccsid: 500,
    to_latin1: &tables::CP500_TO_LATIN1,
    from_latin1: &tables::LATIN1_TO_CP500,
};

/// Look up a supported code page by CCSID.
pub fn from_ccsid(ccsid: u16) -> Option<&'static CodePage> {
    match ccsid {
        37 => Some(&CP037),
        500 => Some(&CP500),
        _ => None,
    }
}

impl CodePage {
    /// Decode EBCDIC bytes to a UTF-8 string.
    ///
    /// Fails on the first byte that maps to a non-text control character;
    /// HT, LF and CR are allowed through.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        let mut out = String::with_capacity(bytes.len());
        for (offset, &byte) in bytes.iter().enumerate() {
            let ch = char::from(self.to_latin1[byte as usize]);
            if !is_text_char(ch) {
                return Err(DecodeError::NotText {
                    byte,
                    offset,
                    codepage: self.name,
                });
            }
            out.push(ch);
        }
        Ok(out)
    }

    /// Encode a UTF-8 string to EBCDIC bytes.
    ///
    /// Fails on the first character outside the code page's text
    /// repertoire. The accepted set is exactly what [`decode`] will
    /// accept back, so every successful encode round-trips.
    ///
    /// [`decode`]: CodePage::decode
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let code = ch as u32;
            if code > 0xFF || !is_text_char(ch) {
                return Err(EncodeError::Unmappable {
                    ch,
                    codepage: self.name,
                });
            }
            out.push(self.from_latin1[code as usize]);
        }
        Ok(out)
    }
}

impl fmt::Debug for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodePage")
            .field("name", &self.name)
            .field("ccsid", &self.ccsid)
            .finish()
    }
}

impl PartialEq for CodePage {
    fn eq(&self, other: &Self) -> bool {
        self.ccsid == other.ccsid
    }
}

/// Render an undecodable payload for the report:
/// `<binary, N bytes> hex=<UPPERCASE_HEX>`.
pub fn hex_dump(bytes: &[u8]) -> String {
    format!("<binary, {} bytes> hex={}", bytes.len(), hex::encode_upper(bytes))
}

fn is_text_char(ch: char) -> bool {
    match ch {
        '\t' | '\n' | '\r' => true,
        _ => {
            let code = ch as u32;
            !(code < 0x20 || code == 0x7F || (0x80..=0x9F).contains(&code))
        }
    }
}

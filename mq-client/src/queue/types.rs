//! Message and outcome types shared by the queue handle and the drivers.

use crate::codec::{CodePage, DecodeError, EncodeError, CP037, CP500};

/// Format tag for fixed text messages (the MQFMT_STRING convention).
pub const FORMAT_STRING: &str = "MQSTR";

/// How a payload's bytes are to be interpreted. A statement of intent
/// from the wire, not a guarantee anything was converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// EBCDIC CCSID 037
    Ebcdic037,
    /// EBCDIC CCSID 500
    Ebcdic500,
    /// CCSID 1208
    Utf8,
    /// No usable tag arrived with the message.
    Unknown,
}

impl PayloadEncoding {
    /// Map a wire-level content-encoding tag to a declared encoding.
    pub fn from_content_encoding(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("37") | Some("037") => PayloadEncoding::Ebcdic037,
            Some("500") => PayloadEncoding::Ebcdic500,
            Some("1208") => PayloadEncoding::Utf8,
            Some(other) if other.eq_ignore_ascii_case("utf-8") => PayloadEncoding::Utf8,
            _ => PayloadEncoding::Unknown,
        }
    }

    /// The CCSID tag to stamp on outbound messages, if any.
    pub fn content_encoding(&self) -> Option<&'static str> {
        match self {
            PayloadEncoding::Ebcdic037 => Some("37"),
            PayloadEncoding::Ebcdic500 => Some("500"),
            PayloadEncoding::Utf8 => Some("1208"),
            PayloadEncoding::Unknown => None,
        }
    }

    /// Declared encoding for a payload produced with the given code page.
    pub fn for_codepage(codepage: &CodePage) -> Self {
        match codepage.ccsid {
            37 => PayloadEncoding::Ebcdic037,
            500 => PayloadEncoding::Ebcdic500,
            _ => PayloadEncoding::Unknown,
        }
    }

    fn codepage(&self) -> Option<&'static CodePage> {
        match self {
            PayloadEncoding::Ebcdic037 => Some(&CP037),
            PayloadEncoding::Ebcdic500 => Some(&CP500),
            _ => None,
        }
    }
}

/// One queue message: wire-exact payload bytes plus how to read them.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Exact bytes as carried on the queue.
    pub payload: Vec<u8>,
    /// Declared interpretation of those bytes.
    pub encoding: PayloadEncoding,
    /// Format tag, e.g. [`FORMAT_STRING`] for fixed text.
    pub format: String,
}

impl Message {
    /// Build an outbound fixed-text message. The encoding tag and the
    /// payload bytes always come from the same code page.
    pub fn outbound(text: &str, codepage: &'static CodePage) -> Result<Self, EncodeError> {
        Ok(Message {
            payload: codepage.encode(text)?,
            encoding: PayloadEncoding::for_codepage(codepage),
            format: FORMAT_STRING.to_string(),
        })
    }

    /// Decode the payload according to its declared encoding. Always runs
    /// over the bytes deterministically; `fallback` covers the Unknown
    /// case where no tag arrived.
    pub fn to_text(&self, fallback: &'static CodePage) -> Result<String, DecodeError> {
        match self.encoding.codepage() {
            Some(codepage) => codepage.decode(&self.payload),
            None => match self.encoding {
                PayloadEncoding::Utf8 => Ok(std::str::from_utf8(&self.payload)?.to_string()),
                _ => fallback.decode(&self.payload),
            },
        }
    }
}

/// Result of a get call. An empty queue is a first-class outcome, not an
/// error; real failures travel as `Err(MqError)` alongside this type.
#[derive(Debug, Clone, PartialEq)]
pub enum GetOutcome {
    /// A message was delivered (and, for destructive gets, removed).
    Delivered(Message),
    /// No message available: the normal end-of-queue signal.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_encoding_mapping() {
        assert_eq!(
            PayloadEncoding::from_content_encoding(Some("500")),
            PayloadEncoding::Ebcdic500
        );
        assert_eq!(
            PayloadEncoding::from_content_encoding(Some("37")),
            PayloadEncoding::Ebcdic037
        );
        assert_eq!(
            PayloadEncoding::from_content_encoding(Some("037")),
            PayloadEncoding::Ebcdic037
        );
        assert_eq!(
            PayloadEncoding::from_content_encoding(Some("1208")),
            PayloadEncoding::Utf8
        );
        assert_eq!(
            PayloadEncoding::from_content_encoding(Some("UTF-8")),
            PayloadEncoding::Utf8
        );
        assert_eq!(
            PayloadEncoding::from_content_encoding(Some("819")),
            PayloadEncoding::Unknown
        );
        assert_eq!(
            PayloadEncoding::from_content_encoding(None),
            PayloadEncoding::Unknown
        );
    }

    #[test]
    fn outbound_tag_matches_bytes() {
        let message = Message::outbound("ORDER 42", &crate::codec::CP500).unwrap();
        assert_eq!(message.encoding, PayloadEncoding::Ebcdic500);
        assert_eq!(message.encoding.content_encoding(), Some("500"));
        assert_eq!(message.format, FORMAT_STRING);
        assert_eq!(crate::codec::CP500.decode(&message.payload).unwrap(), "ORDER 42");
    }

    #[test]
    fn to_text_uses_declared_encoding() {
        let message = Message {
            payload: crate::codec::CP037.encode("HELLO").unwrap(),
            encoding: PayloadEncoding::Ebcdic037,
            format: FORMAT_STRING.to_string(),
        };
        assert_eq!(message.to_text(&crate::codec::CP500).unwrap(), "HELLO");
    }

    #[test]
    fn to_text_falls_back_when_untagged() {
        let message = Message {
            payload: crate::codec::CP037.encode("HELLO").unwrap(),
            encoding: PayloadEncoding::Unknown,
            format: String::new(),
        };
        assert_eq!(message.to_text(&crate::codec::CP037).unwrap(), "HELLO");
    }

    #[test]
    fn to_text_utf8() {
        let message = Message {
            payload: "héllo".as_bytes().to_vec(),
            encoding: PayloadEncoding::Utf8,
            format: FORMAT_STRING.to_string(),
        };
        assert_eq!(message.to_text(&crate::codec::CP037).unwrap(), "héllo");

        let broken = Message {
            payload: vec![0xFF, 0xFE],
            encoding: PayloadEncoding::Utf8,
            format: FORMAT_STRING.to_string(),
        };
        assert!(broken.to_text(&crate::codec::CP037).is_err());
    }
}

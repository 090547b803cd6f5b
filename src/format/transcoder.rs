//! Request/response transcoding per declared format.
//!
//! # Design Decisions
//! - The format is a property of the matched endpoint; request
//!   Content-Type is never consulted
//! - NINJA2 bodies without the `<ninja2>` wrapper are parsed as plain XML
//! - A handler returning the wrong shape is a handler bug, not a client error

use std::fmt;

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cipher::{CipherError, Ninja2Cipher};
use crate::format::envelope::{Envelope, Payload};
use crate::format::form::FormFields;
use crate::format::xml::{XmlDocument, XmlError};

const NINJA2_OPEN: &str = "<ninja2>";
const NINJA2_CLOSE: &str = "</ninja2>";

/// Errors raised while transcoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The request body does not fit the endpoint's input format.
    #[error("Invalid input {format}: {reason}")]
    InvalidInput {
        format: Format,
        reason: String,
        /// Raw body (lossy UTF-8) for diagnostics.
        body: String,
    },

    /// The handler produced a value the output format cannot carry.
    #[error("Invalid output for {format}: expected {expected}, got {actual}")]
    ShapeMismatch {
        format: Format,
        expected: &'static str,
        actual: &'static str,
    },
}

/// The four legacy body formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    Ninja2,
    Xml,
    Form,
    Raw,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Ninja2 => "NINJA2",
            Format::Xml => "XML",
            Format::Form => "FORM",
            Format::Raw => "RAW",
        };
        f.write_str(name)
    }
}

impl Format {
    /// Content type of responses in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Ninja2 | Format::Xml => "application/xml",
            Format::Form | Format::Raw => "text/plain",
        }
    }

    /// Payload shape this format carries.
    pub fn expected_shape(self) -> &'static str {
        match self {
            Format::Ninja2 | Format::Xml => "xml document",
            Format::Form => "form mapping",
            Format::Raw => "text",
        }
    }

    /// Decode a request body.
    pub fn decode(self, body: &[u8], cipher: &Ninja2Cipher) -> Result<Payload, FormatError> {
        match self {
            Format::Ninja2 => {
                let text = self.utf8(body, body)?;
                let xml = match unwrap_ninja2(text) {
                    Some(inner) => {
                        let plain = cipher
                            .decrypt(inner)
                            .map_err(|e: CipherError| self.invalid(e.to_string(), body))?;
                        String::from_utf8(plain)
                            .map_err(|e| self.invalid(e.to_string(), body))?
                    }
                    None => text.to_string(),
                };
                self.parse_xml(&xml, body).map(Payload::Xml)
            }
            Format::Xml => {
                let text = self.utf8(body, body)?;
                self.parse_xml(text, body).map(Payload::Xml)
            }
            Format::Form => Ok(Payload::Form(FormFields::parse(body))),
            Format::Raw => self.utf8(body, body).map(|t| Payload::Text(t.to_string())),
        }
    }

    /// Check the payload shape and wrap it for the wire.
    pub fn encode(self, payload: Payload, cipher: &Ninja2Cipher) -> Result<Envelope, FormatError> {
        match (self, payload) {
            (Format::Ninja2, Payload::Xml(doc)) => Ok(Envelope::OpaqueText(
                cipher.encrypt(doc.to_xml_string().as_bytes()),
            )),
            (Format::Xml, Payload::Xml(doc)) => Ok(Envelope::XmlDocument(doc)),
            (Format::Form, Payload::Form(form)) => Ok(Envelope::FormFields(form)),
            (Format::Raw, Payload::Text(text)) => Ok(Envelope::RawBytes(Bytes::from(text))),
            (format, other) => Err(FormatError::ShapeMismatch {
                format,
                expected: format.expected_shape(),
                actual: other.kind(),
            }),
        }
    }

    fn utf8<'a>(self, bytes: &'a [u8], body: &[u8]) -> Result<&'a str, FormatError> {
        std::str::from_utf8(bytes).map_err(|e| self.invalid(e.to_string(), body))
    }

    fn parse_xml(self, text: &str, body: &[u8]) -> Result<XmlDocument, FormatError> {
        XmlDocument::parse(text).map_err(|e: XmlError| self.invalid(e.to_string(), body))
    }

    fn invalid(self, reason: String, body: &[u8]) -> FormatError {
        FormatError::InvalidInput {
            format: self,
            reason,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

/// Inner text of a `<ninja2>…</ninja2>` body.
///
/// Mirrors the legacy `/^<ninja2>(.+)<\/ninja2>$/` test: the inner text is
/// non-empty, runs to the last closing tag, holds no newline, and one
/// trailing newline after the closing tag is tolerated.
pub fn unwrap_ninja2(body: &str) -> Option<&str> {
    let body = body.strip_suffix('\n').unwrap_or(body);
    let inner = body.strip_prefix(NINJA2_OPEN)?.strip_suffix(NINJA2_CLOSE)?;
    if inner.is_empty() || inner.contains('\n') {
        return None;
    }
    Some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::xml::XmlElement;

    fn flash() -> XmlDocument {
        XmlDocument::new(
            XmlElement::new("flash")
                .with_child(XmlElement::new("strToken").with_text("LOGINTOKENSTRNG"))
                .with_child(XmlElement::new("intCharID").with_text("12345678")),
        )
    }

    #[test]
    fn test_ninja2_body_is_unwrapped_and_decrypted() {
        let cipher = Ninja2Cipher::default();
        let body = format!(
            "<ninja2>{}</ninja2>",
            cipher.encrypt(flash().to_xml_string().as_bytes())
        );

        let payload = Format::Ninja2.decode(body.as_bytes(), &cipher).unwrap();
        assert_eq!(payload, Payload::Xml(flash()));
    }

    #[test]
    fn test_ninja2_accepts_bare_xml() {
        let cipher = Ninja2Cipher::default();
        let body = flash().to_xml_string();
        let payload = Format::Ninja2.decode(body.as_bytes(), &cipher).unwrap();
        assert_eq!(payload, Payload::Xml(flash()));
    }

    #[test]
    fn test_ninja2_bad_ciphertext_is_invalid_input() {
        let cipher = Ninja2Cipher::default();
        let err = Format::Ninja2.decode(b"<ninja2>XXXX</ninja2>", &cipher).unwrap_err();
        match err {
            FormatError::InvalidInput { format, body, .. } => {
                assert_eq!(format, Format::Ninja2);
                assert_eq!(body, "<ninja2>XXXX</ninja2>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unwrap_follows_legacy_pattern() {
        assert_eq!(unwrap_ninja2("<ninja2>abcd</ninja2>"), Some("abcd"));
        assert_eq!(unwrap_ninja2("<ninja2>abcd</ninja2>\n"), Some("abcd"));
        assert_eq!(
            unwrap_ninja2("<ninja2>ab</ninja2>cd</ninja2>"),
            Some("ab</ninja2>cd")
        );
        assert_eq!(unwrap_ninja2("<ninja2></ninja2>"), None);
        assert_eq!(unwrap_ninja2("<ninja2>ab\ncd</ninja2>"), None);
        assert_eq!(unwrap_ninja2(" <ninja2>abcd</ninja2>"), None);
        assert_eq!(unwrap_ninja2("<flash/>"), None);
    }

    #[test]
    fn test_xml_rejects_garbage() {
        let cipher = Ninja2Cipher::default();
        assert!(matches!(
            Format::Xml.decode(b"<flash>", &cipher),
            Err(FormatError::InvalidInput { format: Format::Xml, .. })
        ));
        assert!(matches!(
            Format::Raw.decode(&[0xff, 0xfe], &cipher),
            Err(FormatError::InvalidInput { format: Format::Raw, .. })
        ));
    }

    #[test]
    fn test_form_and_raw_decode() {
        let cipher = Ninja2Cipher::default();
        let form = Format::Form.decode(b"input=6p1k", &cipher).unwrap();
        assert_eq!(form.as_form().unwrap().get("input"), Some("6p1k"));

        let raw = Format::Raw.decode(b"<anything & everything>", &cipher).unwrap();
        assert_eq!(raw, Payload::Text("<anything & everything>".into()));
    }

    #[test]
    fn test_encode_round_trips_through_ninja2() {
        let cipher = Ninja2Cipher::default();
        let envelope = Format::Ninja2.encode(Payload::Xml(flash()), &cipher).unwrap();
        assert_eq!(envelope.content_type(), "application/xml");

        let body = envelope.into_body();
        let decoded = Format::Ninja2.decode(&body, &cipher).unwrap();
        assert_eq!(decoded, Payload::Xml(flash()));
    }

    #[test]
    fn test_encode_checks_shape() {
        let cipher = Ninja2Cipher::default();
        let err = Format::Form.encode(Payload::Text("oops".into()), &cipher).unwrap_err();
        assert_eq!(
            err,
            FormatError::ShapeMismatch {
                format: Format::Form,
                expected: "form mapping",
                actual: "text",
            }
        );
        assert!(Format::Xml.encode(Payload::Form(FormFields::new()), &cipher).is_err());
        assert!(Format::Ninja2.encode(Payload::Text(String::new()), &cipher).is_err());
        assert!(Format::Raw.encode(Payload::Xml(flash()), &cipher).is_err());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(Format::Ninja2.content_type(), "application/xml");
        assert_eq!(Format::Xml.content_type(), "application/xml");
        assert_eq!(Format::Form.content_type(), "text/plain");
        assert_eq!(Format::Raw.content_type(), "text/plain");
    }
}

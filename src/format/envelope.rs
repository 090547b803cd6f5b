//! Decoded payloads and encoded envelopes.

use axum::body::Bytes;

use crate::format::form::FormFields;
use crate::format::xml::XmlDocument;

/// Value handed to and returned by endpoint handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Decoded from, or encodable as, XML or NINJA2.
    Xml(XmlDocument),
    /// Decoded from, or encodable as, FORM.
    Form(FormFields),
    /// Decoded from, or encodable as, RAW.
    Text(String),
}

impl Payload {
    /// Short name of the shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Xml(_) => "xml document",
            Payload::Form(_) => "form mapping",
            Payload::Text(_) => "text",
        }
    }

    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match self {
            Payload::Xml(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormFields> {
        match self {
            Payload::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<XmlDocument> for Payload {
    fn from(doc: XmlDocument) -> Self {
        Payload::Xml(doc)
    }
}

impl From<FormFields> for Payload {
    fn from(form: FormFields) -> Self {
        Payload::Form(form)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

/// Wire-ready response body, one variant per output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Ninja2 ciphertext, written inside `<ninja2>` tags.
    OpaqueText(String),
    XmlDocument(XmlDocument),
    FormFields(FormFields),
    RawBytes(Bytes),
}

impl Envelope {
    pub fn content_type(&self) -> &'static str {
        match self {
            Envelope::OpaqueText(_) | Envelope::XmlDocument(_) => "application/xml",
            Envelope::FormFields(_) | Envelope::RawBytes(_) => "text/plain",
        }
    }

    /// Serialize into the response body.
    pub fn into_body(self) -> Bytes {
        match self {
            Envelope::OpaqueText(text) => Bytes::from(format!("<ninja2>{text}</ninja2>")),
            Envelope::XmlDocument(doc) => Bytes::from(doc.to_xml_string()),
            Envelope::FormFields(form) => Bytes::from(form.to_urlencoded()),
            Envelope::RawBytes(bytes) => bytes,
        }
    }
}

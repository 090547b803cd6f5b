//! Legacy error envelope.
//!
//! The upstream server reported failures in-band as
//! `<error><info code reason message action/></error>`. Gateway errors use
//! the same shape so the client cannot tell them apart.

use serde::{Deserialize, Serialize};

use crate::format::envelope::Payload;
use crate::format::form::FormFields;
use crate::format::transcoder::Format;
use crate::format::xml::{XmlDocument, XmlElement};

/// Code the legacy server used for rejected input.
pub const INVALID_INPUT_CODE: &str = "538.07";

/// Reason paired with [`INVALID_INPUT_CODE`].
pub const INVALID_INPUT_REASON: &str = "Invalid Input!";

/// The four opaque fields of a legacy error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub reason: String,
    pub message: String,
    pub action: String,
}

impl ErrorEnvelope {
    pub fn new(
        code: impl Into<String>,
        reason: impl Into<String>,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            reason: reason.into(),
            message: message.into(),
            action: action.into(),
        }
    }

    /// Envelope sent when a request body cannot be decoded.
    pub fn invalid_input() -> Self {
        Self::new(INVALID_INPUT_CODE, INVALID_INPUT_REASON, "", "")
    }

    /// `<error><info .../></error>` document.
    pub fn to_document(&self) -> XmlDocument {
        XmlDocument::new(
            XmlElement::new("error").with_child(
                XmlElement::new("info")
                    .with_attribute("code", self.code.as_str())
                    .with_attribute("reason", self.reason.as_str())
                    .with_attribute("message", self.message.as_str())
                    .with_attribute("action", self.action.as_str()),
            ),
        )
    }

    /// Shape the envelope for an endpoint's output format.
    ///
    /// FORM endpoints receive the four fields as a mapping; RAW endpoints
    /// receive the XML text.
    pub fn into_payload(self, format: Format) -> Payload {
        match format {
            Format::Ninja2 | Format::Xml => Payload::Xml(self.to_document()),
            Format::Form => Payload::Form(
                FormFields::new()
                    .with("code", self.code)
                    .with("reason", self.reason)
                    .with("message", self.message)
                    .with("action", self.action),
            ),
            Format::Raw => Payload::Text(self.to_document().to_xml_string()),
        }
    }
}

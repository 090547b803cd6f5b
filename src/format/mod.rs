//! Body format subsystem.
//!
//! # Data Flow
//! ```text
//! request body
//!     → transcoder.rs (Format::decode: NINJA2 / XML / FORM / RAW)
//!     → Payload (xml.rs tree, form.rs mapping, or text)
//!     → [endpoint handler]
//!     → transcoder.rs (Format::encode, shape check)
//!     → Envelope (envelope.rs) → response body
//!
//! Failure path:
//!     DomainError / invalid input
//!     → error_envelope.rs (<error><info .../></error>)
//!     → Format::encode in the endpoint's output format
//! ```

pub mod envelope;
pub mod error_envelope;
pub mod form;
pub mod transcoder;
pub mod xml;

pub use envelope::{Envelope, Payload};
pub use error_envelope::ErrorEnvelope;
pub use form::FormFields;
pub use transcoder::{Format, FormatError};
pub use xml::{XmlDocument, XmlElement, XmlError, XmlNode};

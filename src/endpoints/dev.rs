//! Cipher developer tools.
//!
//! Plain-text versions of the legacy `/dev` pages: post a form with an
//! `input` field and get the enciphered or deciphered text back.

use crate::error::{DomainError, HandlerError};
use crate::format::{Format, Payload};
use crate::routing::{RegistryBuilder, RequestContext};

pub const ENCRYPT_PATH: &str = "/dev/ninja2encrypt";
pub const DECRYPT_PATH: &str = "/dev/ninja2decrypt";
pub const SANDBOX_PATH: &str = "/dev/sandbox";

/// Form field read by the cipher tools.
pub const INPUT_FIELD: &str = "input";

pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .endpoint(ENCRYPT_PATH, Format::Form, Format::Raw, encrypt)
        .endpoint(DECRYPT_PATH, Format::Form, Format::Raw, decrypt)
        .endpoint(SANDBOX_PATH, Format::Raw, Format::Raw, sandbox)
}

fn input_field(payload: &Payload) -> Option<&str> {
    payload.as_form().and_then(|form| form.get(INPUT_FIELD))
}

fn encrypt(payload: Payload, ctx: &RequestContext<'_>) -> Result<Payload, HandlerError> {
    let output = input_field(&payload)
        .map(|input| ctx.cipher.encrypt(input.as_bytes()))
        .unwrap_or_default();
    Ok(Payload::Text(output))
}

fn decrypt(payload: Payload, ctx: &RequestContext<'_>) -> Result<Payload, HandlerError> {
    let Some(input) = input_field(&payload) else {
        return Ok(Payload::Text(String::new()));
    };
    let plain = ctx.cipher.decrypt(input.trim()).map_err(|e| {
        tracing::debug!(error = %e, "Rejected cipher text");
        DomainError::invalid_input()
    })?;
    Ok(Payload::Text(String::from_utf8_lossy(&plain).into_owned()))
}

fn sandbox(_payload: Payload, _ctx: &RequestContext<'_>) -> Result<Payload, HandlerError> {
    Ok(Payload::Text(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cipher::Ninja2Cipher;
    use crate::format::FormFields;
    use crate::routing::{Dispatcher, Outcome, Registry};
    use crate::storage::MemoryStorage;

    fn dispatcher() -> Dispatcher {
        let registry = register(Registry::builder()).build().unwrap();
        Dispatcher::new(
            Arc::new(registry),
            Arc::new(MemoryStorage::opened()),
            Ninja2Cipher::default(),
        )
    }

    #[test]
    fn test_encrypt_then_decrypt() {
        let dispatcher = dispatcher();
        let body = FormFields::new().with(INPUT_FIELD, "<flash/>").to_urlencoded();
        let encrypted = dispatcher.dispatch(ENCRYPT_PATH, body.as_bytes()).unwrap();
        assert_eq!(encrypted.content_type, "text/plain");
        assert_eq!(encrypted.body.len(), "<flash/>".len() * 4);

        let cipher_text = std::str::from_utf8(&encrypted.body).unwrap();
        let body = FormFields::new().with(INPUT_FIELD, cipher_text).to_urlencoded();
        let decrypted = dispatcher.dispatch(DECRYPT_PATH, body.as_bytes()).unwrap();
        assert_eq!(decrypted.body, "<flash/>");
    }

    #[test]
    fn test_missing_input_gives_empty_output() {
        let dispatcher = dispatcher();
        assert!(dispatcher.dispatch(ENCRYPT_PATH, b"").unwrap().body.is_empty());
        assert!(dispatcher.dispatch(DECRYPT_PATH, b"other=1").unwrap().body.is_empty());
    }

    #[test]
    fn test_bad_cipher_text_is_invalid_input() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch(DECRYPT_PATH, b"input=abc").unwrap();
        assert_eq!(response.outcome, Outcome::DomainError);
        assert_eq!(
            response.body,
            r#"<error><info code="538.07" reason="Invalid Input!" message="" action=""/></error>"#
        );
    }

    #[test]
    fn test_sandbox_is_empty() {
        let response = dispatcher().dispatch(SANDBOX_PATH, b"anything").unwrap();
        assert_eq!(response.outcome, Outcome::Success);
        assert!(response.body.is_empty());
    }
}

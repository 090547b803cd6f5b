//! End-to-end tests against a running gateway.

use reqwest::header;
use reqwest::StatusCode;

use ninja2_gateway::cipher::Ninja2Cipher;
use ninja2_gateway::config::GatewayConfig;
use ninja2_gateway::error::{DomainError, HandlerError};
use ninja2_gateway::format::{Format, FormFields, Payload, XmlDocument, XmlElement};
use ninja2_gateway::routing::{Registry, RegistryBuilder};
use ninja2_gateway::storage::Record;

mod common;

const INVALID_INPUT_XML: &str =
    r#"<error><info code="538.07" reason="Invalid Input!" message="" action=""/></error>"#;

fn quest_endpoints() -> RegistryBuilder {
    Registry::builder()
        .endpoint("/cf-questload.asp", Format::Ninja2, Format::Ninja2, |payload, _| {
            let request = payload
                .as_xml()
                .ok_or_else(|| HandlerError::Other("expected xml".into()))?;
            let quest_id = request
                .root
                .child_text("intQuestID")
                .ok_or_else(DomainError::invalid_input)?;
            Ok(Payload::Xml(XmlDocument::new(
                XmlElement::new("quest").with_child(
                    XmlElement::new("quest")
                        .with_attribute("QuestID", quest_id)
                        .with_attribute("strName", "Doomwood"),
                ),
            )))
        })
        .endpoint("/cf-characternew.asp", Format::Form, Format::Form, |payload, ctx| {
            let form = payload.as_form().cloned().unwrap_or_default();
            let Some(name) = form.get("strCharacterName") else {
                return Err(DomainError::new("500", "Missing name").with_action("None").into());
            };
            let mut record = Record::new();
            record.insert("name".into(), name.into());
            let stored = ctx.storage.insert("char", record)?;
            let id = stored.get("id").map(|v| v.to_string()).unwrap_or_default();
            Ok(Payload::Form(FormFields::new().with("code", "0").with("CharID", id)))
        })
        .endpoint("/cf-crash.asp", Format::Raw, Format::Raw, |_, _| {
            Err(HandlerError::Other("connection to database lost".into()))
        })
}

#[tokio::test]
async fn test_ninja2_round_trip() {
    let gateway = common::start_gateway(GatewayConfig::default(), quest_endpoints()).await;
    let cipher = Ninja2Cipher::default();

    let body = format!(
        "<ninja2>{}</ninja2>",
        cipher.encrypt(b"<flash><intQuestID>42</intQuestID></flash>")
    );
    let res = reqwest::Client::new()
        .post(gateway.url("/cf-questload.asp"))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/xml");
    assert!(res.headers().contains_key("x-request-id"));

    let text = res.text().await.unwrap();
    let inner = text
        .strip_prefix("<ninja2>")
        .and_then(|t| t.strip_suffix("</ninja2>"))
        .unwrap();
    let plain = String::from_utf8(cipher.decrypt(inner).unwrap()).unwrap();
    assert_eq!(plain, r#"<quest><quest QuestID="42" strName="Doomwood"/></quest>"#);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_bare_xml_accepted_on_ninja2_endpoint() {
    let gateway = common::start_gateway(GatewayConfig::default(), quest_endpoints()).await;
    let cipher = Ninja2Cipher::default();

    let res = reqwest::Client::new()
        .post(gateway.url("/cf-questload.asp"))
        .body("<flash><intQuestID>7</intQuestID></flash>")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let text = res.text().await.unwrap();
    let decoded = Format::Ninja2.decode(text.as_bytes(), &cipher).unwrap();
    let doc = decoded.as_xml().unwrap();
    assert_eq!(doc.root.child("quest").unwrap().attribute("QuestID"), Some("7"));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_body_gets_invalid_input_envelope() {
    let gateway = common::start_gateway(GatewayConfig::default(), quest_endpoints()).await;
    let cipher = Ninja2Cipher::default();

    let res = reqwest::Client::new()
        .post(gateway.url("/cf-questload.asp"))
        .body("<ninja2>not-cipher-text</ninja2>")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let text = res.text().await.unwrap();
    let decoded = Format::Ninja2.decode(text.as_bytes(), &cipher).unwrap();
    assert_eq!(decoded.as_xml().unwrap().to_xml_string(), INVALID_INPUT_XML);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_form_endpoint_uses_storage() {
    let gateway = common::start_gateway(GatewayConfig::default(), quest_endpoints()).await;
    let client = reqwest::Client::new();

    for expected in ["code=0&CharID=1", "code=0&CharID=2"] {
        let res = client
            .post(gateway.url("/cf-characternew.asp"))
            .body("strCharacterName=Hero+One")
            .send()
            .await
            .unwrap();
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(res.text().await.unwrap(), expected);
    }

    let res = client
        .post(gateway.url("/cf-characternew.asp"))
        .body("strGender=M")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.text().await.unwrap(),
        "code=500&reason=Missing+name&message=&action=None"
    );

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_method_is_404() {
    let gateway = common::start_gateway(GatewayConfig::default(), quest_endpoints()).await;

    let res = reqwest::get(gateway.url("/cf-nothing.asp")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "Method Not Found: /cf-nothing.asp");

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_fallback_answers_unknown_method() {
    let mut config = GatewayConfig::default();
    config.endpoints.fallback = true;
    let gateway = common::start_gateway(config, quest_endpoints()).await;

    let res = reqwest::get(gateway.url("/cf-nothing.asp")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/xml");
    assert_eq!(res.text().await.unwrap(), INVALID_INPUT_XML);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_unexpected_failure_is_plain_500() {
    let gateway = common::start_gateway(GatewayConfig::default(), quest_endpoints()).await;

    let res = reqwest::get(gateway.url("/cf-crash.asp")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = res.text().await.unwrap();
    assert_eq!(text, "Internal Server Error");
    assert!(!text.contains("database"));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_preflight_echoes_origin() {
    let gateway = common::start_gateway(GatewayConfig::default(), quest_endpoints()).await;

    let res = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, gateway.url("/cf-questload.asp"))
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://example.com");
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
    assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
    assert!(res.text().await.unwrap().is_empty());

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_cors_headers_on_regular_response() {
    let gateway = common::start_gateway(GatewayConfig::default(), quest_endpoints()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(gateway.url("/cf-nothing.asp"))
        .header(header::ORIGIN, "http://game.example")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://game.example");
    assert_eq!(res.headers()[header::ACCESS_CONTROL_MAX_AGE], "86400");

    let res = client.get(gateway.url("/cf-nothing.asp")).send().await.unwrap();
    assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_dev_tools() {
    let mut config = GatewayConfig::default();
    config.endpoints.dev_tools = true;
    let gateway = common::start_gateway(config, Registry::builder()).await;
    let client = reqwest::Client::new();

    let cipher_text = client
        .post(gateway.url("/dev/ninja2encrypt"))
        .body("input=%3Cflash%2F%3E")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(cipher_text.len(), 32);

    let plain = client
        .post(gateway.url("/dev/ninja2decrypt"))
        .body(format!("input={cipher_text}"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(plain, "<flash/>");

    gateway.shutdown.trigger();
}

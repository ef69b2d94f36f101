//! Integration tests for the HTTP proxy transport using wiremock.

use std::sync::Arc;
use std::time::Duration;

use arcana_application::{IngestOptions, OracleTransport, RunDivinationUseCase, TransportError};
use arcana_domain::{
    DEFAULT_SENTINEL, DivinationKind, DivinationPrompt, InstructionTable, ResultText, StreamEvent,
    WireFormat,
};
use arcana_infrastructure::HttpProxyTransport;
use futures::StreamExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn use_case(server: &MockServer, route: &str, wire_format: WireFormat) -> RunDivinationUseCase {
    let transport = HttpProxyTransport::new(&server.uri(), route, Some(Duration::from_secs(5)))
        .expect("transport");
    RunDivinationUseCase::new(Arc::new(transport), Arc::new(InstructionTable::builtin()))
        .with_ingest_options(IngestOptions::default().with_wire_format(wire_format))
}

#[tokio::test]
async fn open_posts_prompt_and_system_instruction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "prompt": "hello",
            "systemInstruction": "be mysterious"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpProxyTransport::new(&mock_server.uri(), "/api/proxy", None).unwrap();
    let prompt = DivinationPrompt {
        prompt: "hello".to_string(),
        system_instruction: "be mysterious".to_string(),
    };

    let body = transport.open(&prompt).await.expect("stream opens");
    let bytes: Vec<u8> = body
        .map(|chunk| chunk.expect("chunk").to_vec())
        .concat()
        .await;
    assert_eq!(bytes, b"ok");
}

#[tokio::test]
async fn open_maps_server_error_to_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let transport = HttpProxyTransport::new(&mock_server.uri(), "/api/proxy", None).unwrap();
    let prompt = DivinationPrompt {
        prompt: "p".to_string(),
        system_instruction: "s".to_string(),
    };

    let err = transport.open(&prompt).await.err().expect("error");
    assert_eq!(
        err,
        TransportError::Status {
            status: 500,
            reason: "Internal Server Error".to_string()
        }
    );
}

#[tokio::test]
async fn plain_text_reading_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("**【 符文显现 】** Fehu ᚠ".as_bytes().to_vec(), "text/plain; charset=utf-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let uc = use_case(&mock_server, "/api/proxy", WireFormat::PlainText);
    let mut result = ResultText::new();
    uc.submit(DivinationKind::Runes, "Should I stay?", None)
        .await
        .unwrap()
        .collect_into(&mut result)
        .await;

    assert_eq!(result.as_str(), "**【 符文显现 】** Fehu ᚠ");
    assert!(!result.is_interrupted());
}

#[tokio::test]
async fn json_fragment_reading_end_to_end() {
    let mock_server = MockServer::start().await;

    let body = concat!(
        r#"[{"candidates": [{"content": {"parts": [{"text": "火天"}],"role": "model"}}]}"#,
        "\r\n,\r\n",
        r#"{"candidates": [{"content": {"parts": [{"text": "大有\n"}],"role": "model"},"finishReason": "STOP"}]}"#,
        "\r\n]"
    );

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let uc = use_case(&mock_server, "/api/chat", WireFormat::JsonFragments);
    let events: Vec<StreamEvent> = uc
        .submit(DivinationKind::IChing, "Career?", None)
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(
        events,
        vec![
            StreamEvent::Delta("火天".to_string()),
            StreamEvent::Delta("大有\n".to_string()),
        ]
    );
}

#[tokio::test]
async fn http_500_shows_only_the_sentinel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uc = use_case(&mock_server, "/api/proxy", WireFormat::PlainText);
    let events: Vec<StreamEvent> = uc
        .submit(DivinationKind::Tarot, "Love?", None)
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(
        events,
        vec![StreamEvent::Interrupted(DEFAULT_SENTINEL.to_string())]
    );
    assert!(!uc.is_busy());
}

#[tokio::test]
async fn empty_question_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let uc = use_case(&mock_server, "/api/proxy", WireFormat::PlainText);
    assert!(uc.submit(DivinationKind::Tarot, "  ", None).await.is_err());
}

#[tokio::test]
async fn slow_response_times_out_into_sentinel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let transport =
        HttpProxyTransport::new(&mock_server.uri(), "/api/proxy", Some(Duration::from_millis(200)))
            .unwrap();
    let uc = RunDivinationUseCase::new(Arc::new(transport), Arc::new(InstructionTable::builtin()))
        .with_ingest_options(IngestOptions::default().with_sentinel("(timeout)"));

    let mut result = ResultText::new();
    uc.submit(DivinationKind::Runes, "q", None)
        .await
        .unwrap()
        .collect_into(&mut result)
        .await;
    assert_eq!(result.as_str(), "(timeout)");
}

//! Speech creation through the HTTP backend.

use crate::integration::mock_server::{MockServerFixture, ACCESS_KEY, SECRET_KEY};
use mockito::Matcher;
use speech_cloud_rust::credentials::StaticCredentialsProvider;
use speech_cloud_rust::types::Codec;
use speech_cloud_rust::{BufferSpeechHandler, Error, FileSpeechHandler, SpeechCloudConfig};
use std::sync::Arc;

const AUDIO: &[u8] = b"ID3\x04\x00fake-mp3-frames";

#[tokio::test]
async fn create_speech_and_handle_writes_file_before_returning() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_speech(AUDIO).await;
    let facade = fixture.facade();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("downloaded.mp3");
    let handler = FileSpeechHandler::new(&path);

    let result = facade
        .create_speech_and_handle("Salli", "This is Salli in downloadable mode.", &handler)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(result.body().is_closed());
    assert_eq!(result.body().bytes_read(), AUDIO.len() as u64);
    assert_eq!(handler.bytes_written(), AUDIO.len() as u64);
    assert_eq!(tokio::fs::read(&path).await.unwrap(), AUDIO);

    let meta = result.metadata();
    assert_eq!(meta.request_id.as_deref(), Some("req-1234"));
    assert_eq!(meta.content_type.as_deref(), Some("audio/mpeg"));
    assert_eq!(meta.request_characters, Some(35));
    assert_eq!(meta.request_units, Some(1));
}

#[tokio::test]
async fn create_speech_sends_request_in_wire_shape() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/CreateSpeech")
        .match_body(Matcher::Json(serde_json::json!({
            "Input": {"Data": "Hello", "Type": "text/plain"},
            "OutputFormat": {"Codec": "MP3", "SampleRate": 22050},
            "Voice": {"Name": "Joey"}
        })))
        .with_status(200)
        .with_body(AUDIO)
        .create_async()
        .await;
    let handler = BufferSpeechHandler::new();

    fixture
        .facade()
        .create_speech_and_handle("Joey", "Hello", &handler)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(handler.invocations(), 1);
    assert_eq!(handler.audio(), AUDIO);
}

#[tokio::test]
async fn create_speech_returns_unread_stream() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_speech(AUDIO).await;

    let mut result = fixture.facade().create_speech("Salli", "Hi").await.unwrap();

    assert!(!result.body().is_closed());
    let audio = result.body_mut().read_to_end().await.unwrap();
    assert_eq!(audio, AUDIO);
    assert!(result.body().is_closed());
}

#[tokio::test]
async fn create_speech_failure_skips_handler() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error(
            "CreateSpeech",
            400,
            r#"{"Message": "Voice not found: Nobody"}"#,
        )
        .await;
    let handler = BufferSpeechHandler::new();

    let err = fixture
        .facade()
        .create_speech_and_handle("Nobody", "text", &handler)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Remote { status: 400, .. }));
    assert_eq!(handler.invocations(), 0);
}

#[tokio::test]
async fn speech_url_is_retrievable() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("GET", "/CreateSpeech")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("Voice.Name".into(), "Salli".into()),
            Matcher::UrlEncoded("Input.Data".into(), "This is Salli in the cloud.".into()),
            Matcher::UrlEncoded("X-Amz-Algorithm".into(), "AWS4-HMAC-SHA256".into()),
            Matcher::Regex(format!("X-Amz-Credential={}%2F", ACCESS_KEY)),
            Matcher::Regex("X-Amz-Signature=[0-9a-f]{64}".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "audio/mpeg")
        .with_body(AUDIO)
        .create_async()
        .await;

    let url = fixture
        .facade()
        .create_speech_url("Salli", "This is Salli in the cloud.")
        .await
        .unwrap();
    assert!(url.as_str().starts_with(&fixture.base_url));

    let body = reqwest::get(url).await.unwrap().bytes().await.unwrap();
    mock.assert_async().await;
    assert_eq!(&body[..], AUDIO);
}

#[tokio::test]
async fn speech_url_with_unencodable_text_fails_without_request() {
    let fixture = MockServerFixture::new().await;

    let err = fixture
        .facade()
        .create_speech_url("Salli", "bell\u{7}")
        .await
        .unwrap_err();

    assert!(err.is_unsupported_encoding());
    assert!(!err.is_misconfiguration());
}

#[tokio::test]
async fn configured_codec_reaches_body_and_url() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/CreateSpeech")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "OutputFormat": {"Codec": "OGG", "SampleRate": 16000}
        })))
        .with_status(200)
        .with_header("content-type", "audio/ogg")
        .with_body(AUDIO)
        .create_async()
        .await;
    let mut config = SpeechCloudConfig::default();
    config.codec = Codec::Ogg;
    config.sample_rate = Some(16000);
    let facade = fixture.facade_with(
        config,
        Arc::new(StaticCredentialsProvider::new(ACCESS_KEY, SECRET_KEY)),
    );
    let handler = BufferSpeechHandler::new();

    facade
        .create_speech_and_handle("Salli", "Hello", &handler)
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(handler.audio(), AUDIO);

    let url = facade.create_speech_url("Salli", "Hello").await.unwrap();
    let query = url.query().unwrap();
    assert!(query.contains("OutputFormat.Codec=OGG"), "{query}");
    assert!(query.contains("OutputFormat.SampleRate=16000"), "{query}");
}

#[tokio::test]
async fn speech_url_query_is_percent_encoded() {
    let fixture = MockServerFixture::new().await;

    let url = fixture
        .facade()
        .create_speech_url("Salli", "hi there + more")
        .await
        .unwrap();

    let query = url.query().unwrap();
    assert!(query.starts_with("Input.Data=hi%20there%20%2B%20more&"), "{query}");
    assert!(!query.contains('+'), "{query}");
}

//! Voice and lexicon listing through the HTTP backend.

use crate::integration::mock_server::{MockServerFixture, ACCESS_KEY, SECRET_KEY};
use speech_cloud_rust::credentials::{Credentials, CredentialsProvider};
use speech_cloud_rust::diagnostics::DiagnosticEvent;
use speech_cloud_rust::types::Gender;
use speech_cloud_rust::{Error, GetLexiconRequest, ListVoicesRequest, SpeechCloudConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const VOICES: &str = r#"{
  "Voices": [
    {"Name": "Salli", "Language": "en-US", "Gender": "Female"},
    {"Name": "Joey", "Language": "en-US", "Gender": "Male"}
  ]
}"#;

#[tokio::test]
async fn list_voices_with_no_selector_returns_all_voices() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_action("ListVoices", VOICES).await;
    let facade = fixture.facade();

    let voices = facade.list_voices(None).await.unwrap();

    mock.assert_async().await;
    let names: Vec<&str> = voices.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Salli", "Joey"]);
    assert_eq!(voices[1].gender, Some(Gender::Male));
    assert_eq!(
        fixture.diagnostics.events(),
        vec![DiagnosticEvent::SelectorDefaulted {
            selector: "ListVoicesRequest"
        }]
    );
}

#[tokio::test]
async fn list_voices_sends_only_the_first_selector() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_action_with_body(
            "ListVoices",
            serde_json::json!({"Voice": {"Language": "en-GB"}}),
            r#"{"Voices": [{"Name": "Amy", "Language": "en-GB", "Gender": "Female"}]}"#,
        )
        .await;
    let facade = fixture.facade();

    let voices = facade
        .list_voices(vec![
            ListVoicesRequest::new().with_language("en-GB"),
            ListVoicesRequest::new().with_language("pl-PL"),
        ])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(voices.len(), 1);
    assert_eq!(voices[0].name, "Amy");
    assert_eq!(fixture.diagnostics.warnings().len(), 1);
}

#[tokio::test]
async fn list_voices_empty_listing_is_empty_vec() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_action("ListVoices", r#"{"Voices": []}"#).await;
    let voices = fixture.facade().list_voices(None).await.unwrap();
    assert!(voices.is_empty());
}

#[tokio::test]
async fn list_lexicon_names_without_lexicons_is_empty() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_action("ListLexicons", r#"{"Lexicons": []}"#).await;

    let names = fixture.facade().list_lexicon_names().await.unwrap();

    mock.assert_async().await;
    assert!(names.is_empty());
}

#[tokio::test]
async fn list_lexicon_names_returns_names() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_action(
            "ListLexicons",
            r#"{"Lexicons": [{"Name": "brands", "Language": "en-US"}, {"Name": "places"}]}"#,
        )
        .await;

    let names = fixture.facade().list_lexicon_names().await.unwrap();
    assert_eq!(names, vec!["brands".to_string(), "places".to_string()]);
}

#[tokio::test]
async fn get_lexicon_fetches_by_name() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_action_with_body(
            "GetLexicon",
            serde_json::json!({"Lexicon": {"Name": "brands"}}),
            r#"{"Lexicon": {"Name": "brands", "Contents": "<lexicon>...</lexicon>"}}"#,
        )
        .await;

    let lexicon = fixture
        .facade()
        .get_lexicon(Some(GetLexiconRequest::new("brands")))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(lexicon.name, "brands");
    assert_eq!(lexicon.contents, "<lexicon>...</lexicon>");
}

#[tokio::test]
async fn remote_failures_propagate_as_remote_errors() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error(
            "ListLexicons",
            403,
            r#"{"Message": "The security token included in the request is invalid."}"#,
        )
        .await;

    let err = fixture.facade().list_lexicon_names().await.unwrap_err();

    match err {
        Error::Remote {
            status,
            class,
            message,
            ..
        } => {
            assert_eq!(status, 403);
            assert_eq!(class, "permission_denied");
            assert_eq!(
                message,
                "The security token included in the request is invalid."
            );
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_type_header_is_used_without_json_message() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_error("ListVoices", 500, "oops").await;

    let err = fixture.facade().list_voices(None).await.unwrap_err();
    assert!(
        matches!(err, Error::Remote { status: 500, ref message, .. } if message == "RemoteError"),
        "unexpected error: {err:?}"
    );
}

#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

impl CredentialsProvider for CountingProvider {
    fn credentials(&self) -> speech_cloud_rust::Result<Credentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Credentials::new(ACCESS_KEY, SECRET_KEY))
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

#[tokio::test]
async fn credentials_are_resolved_once_per_facade() {
    let mut fixture = MockServerFixture::new().await;
    let _voices = fixture.mock_action("ListVoices", VOICES).await;
    let lexicons = fixture.mock_action("ListLexicons", r#"{"Lexicons": []}"#).await;
    let provider = Arc::new(CountingProvider::default());
    let facade = fixture.facade_with(SpeechCloudConfig::default(), provider.clone());

    facade.list_voices(None).await.unwrap();
    facade.list_voices(None).await.unwrap();
    facade.list_lexicon_names().await.unwrap();
    facade.create_speech_url("Salli", "hi").await.unwrap();

    lexicons.assert_async().await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

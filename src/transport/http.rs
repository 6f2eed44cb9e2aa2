use super::signer::SigV4Signer;
use super::{error_class_for_status, SpeechCloudBackend, SpeechUrlError, TransportError, UrlEncodingError};
use crate::config::SpeechCloudConfig;
use crate::credentials::Credentials;
use crate::types::{
    AudioStream, Gender, GetLexiconRequest, Lexicon, ListVoicesRequest, SpeechMetadata, SpeechRequest,
    SpeechResult, Voice,
};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::HeaderMap;
use reqwest::Proxy;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const REQUEST_ID_HEADER: &str = "x-amzn-IvonaTtsRequestId";
const REQUEST_CHARACTERS_HEADER: &str = "x-amzn-IvonaTtsRequestCharacters";
const REQUEST_UNITS_HEADER: &str = "x-amzn-IvonaTtsRequestUnits";
const ERROR_TYPE_HEADER: &str = "x-amzn-ErrorType";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListVoicesResponse {
    #[serde(default)]
    voices: Vec<Voice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LexiconEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListLexiconsResponse {
    #[serde(default)]
    lexicons: Vec<LexiconEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetLexiconResponse {
    lexicon: Lexicon,
}

/// HTTP client for the Speech Cloud API.
///
/// Every POST action is signed with SigV4 headers; speech URLs are presigned
/// with SigV4 query parameters.
pub struct HttpSpeechCloudClient {
    client: reqwest::Client,
    endpoint: Url,
    credentials: Credentials,
    signer: SigV4Signer,
    url_expiry_secs: u64,
}

impl HttpSpeechCloudClient {
    /// Client signing every request with `credentials`.
    pub fn new(config: &SpeechCloudConfig, credentials: Credentials) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy: {}", e),
                    ErrorContext::new().with_field_path("proxy_url"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        info!(
            endpoint = %endpoint,
            region = %config.region,
            "created speech cloud HTTP client"
        );

        Ok(Self {
            client,
            endpoint,
            credentials,
            signer: SigV4Signer::new(config.region.clone()),
            url_expiry_secs: config.url_expiry_secs,
        })
    }

    fn action_url(&self, action: &str) -> std::result::Result<Url, url::ParseError> {
        self.endpoint.join(action)
    }

    fn header_first(headers: &HeaderMap, name: &str) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    async fn post(&self, action: &str, body: &serde_json::Value) -> Result<reqwest::Response> {
        let url = self.action_url(action).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot build action URL: {}", e),
                ErrorContext::new().with_field_path("endpoint"),
            )
        })?;
        let payload = serde_json::to_vec(body)?;
        let signed = self.signer.sign_headers(
            &self.credentials,
            "POST",
            &url,
            &[("content-type".to_string(), "application/json".to_string())],
            &payload,
            &chrono::Utc::now(),
        );

        debug!(action, url = %url, "sending speech cloud request");
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Amz-Date", signed.amz_date)
            .header("Authorization", signed.authorization)
            .body(payload)
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::remote_error(response).await)
        }
    }

    async fn remote_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let request_id = Self::header_first(response.headers(), REQUEST_ID_HEADER);
        let error_type = Self::header_first(response.headers(), ERROR_TYPE_HEADER);
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("Message")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .or(error_type)
            .unwrap_or(body);

        Error::Remote {
            status,
            class: error_class_for_status(status).to_string(),
            message,
            request_id,
        }
    }

    /// Reject characters the service cannot accept in a query string.
    fn check_encodable(value: &str) -> std::result::Result<(), UrlEncodingError> {
        match value
            .char_indices()
            .find(|(_, c)| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
        {
            Some((position, character)) => {
                Err(UrlEncodingError::UnencodableCharacter { character, position })
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SpeechCloudBackend for HttpSpeechCloudClient {
    async fn list_voices(&self, request: &ListVoicesRequest) -> Result<Vec<Voice>> {
        let body = serde_json::to_value(request)?;
        let response: ListVoicesResponse = self
            .post("ListVoices", &body)
            .await?
            .json()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(response.voices)
    }

    async fn list_lexicons(&self) -> Result<Vec<String>> {
        let response: ListLexiconsResponse = self
            .post("ListLexicons", &serde_json::json!({}))
            .await?
            .json()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(response.lexicons.into_iter().map(|l| l.name).collect())
    }

    async fn get_lexicon(&self, request: &GetLexiconRequest) -> Result<Lexicon> {
        let response: GetLexiconResponse = self
            .post("GetLexicon", &request.to_body())
            .await?
            .json()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;
        Ok(response.lexicon)
    }

    async fn create_speech_url(
        &self,
        request: &SpeechRequest,
    ) -> std::result::Result<Url, SpeechUrlError> {
        Self::check_encodable(&request.input.data)?;
        Self::check_encodable(&request.voice.name)?;

        let mut url = self.action_url("CreateSpeech").map_err(UrlEncodingError::from)?;
        let mut params = vec![
            ("Input.Data", request.input.data.clone()),
            ("Input.Type", request.input.content_type.clone()),
            ("OutputFormat.Codec", request.output_format.codec.as_str().to_string()),
        ];
        if let Some(rate) = request.output_format.sample_rate {
            params.push(("OutputFormat.SampleRate", rate.to_string()));
        }
        params.push(("Voice.Name", request.voice.name.clone()));
        if let Some(language) = &request.voice.language {
            params.push(("Voice.Language", language.clone()));
        }
        if let Some(gender) = request.voice.gender {
            let gender = match gender {
                Gender::Female => "Female",
                Gender::Male => "Male",
            };
            params.push(("Voice.Gender", gender.to_string()));
        }

        self.signer.presign(
            &self.credentials,
            &mut url,
            &params,
            self.url_expiry_secs,
            &chrono::Utc::now(),
        );
        Ok(url)
    }

    async fn create_speech(&self, request: &SpeechRequest) -> Result<SpeechResult> {
        let body = serde_json::to_value(request)?;
        let response = self.post("CreateSpeech", &body).await?;

        let headers = response.headers();
        let metadata = SpeechMetadata {
            request_id: Self::header_first(headers, REQUEST_ID_HEADER),
            content_type: Self::header_first(headers, "content-type"),
            request_characters: Self::header_first(headers, REQUEST_CHARACTERS_HEADER)
                .and_then(|s| s.parse().ok()),
            request_units: Self::header_first(headers, REQUEST_UNITS_HEADER)
                .and_then(|s| s.parse().ok()),
        };
        debug!(request_id = ?metadata.request_id, "speech synthesized");

        let stream = response
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Ok(SpeechResult::new(metadata, AudioStream::new(Box::pin(stream))))
    }
}

//! AWS Signature Version 4 signing for Speech Cloud requests.
//!
//! Two forms are supported: an `Authorization` header for POST actions and
//! query-string presigning for the retrievable `CreateSpeech` URL.

use crate::credentials::Credentials;
use chrono::{DateTime, Utc};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::{Digest, Sha256};
use url::Url;

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SERVICE: &str = "tts";

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = <HmacSha256 as KeyInit>::new_from_slice(key)
        .expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn amz_date(now: &DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

fn short_date(now: &DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

/// `host[:port]` as it appears in the `Host` header.
pub fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Headers produced by [`SigV4Signer::sign_headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
}

/// Signs requests for one region/service pair.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    region: String,
    service: String,
}

impl SigV4Signer {
    pub fn new(region: impl Into<String>) -> Self {
        Self::for_service(region, SERVICE)
    }

    pub fn for_service(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
        }
    }

    fn scope(&self, now: &DateTime<Utc>) -> String {
        format!(
            "{}/{}/{}/aws4_request",
            short_date(now),
            self.region,
            self.service
        )
    }

    pub fn signing_key(&self, secret_key: &str, now: &DateTime<Utc>) -> Vec<u8> {
        let k_date = hmac(
            format!("AWS4{}", secret_key).as_bytes(),
            short_date(now).as_bytes(),
        );
        let k_region = hmac(&k_date, self.region.as_bytes());
        let k_service = hmac(&k_region, self.service.as_bytes());
        hmac(&k_service, b"aws4_request")
    }

    fn canonical_query(url: &Url) -> String {
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
            .collect();
        pairs.sort();
        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Canonical request text; `headers` must already include `host`.
    pub fn canonical_request(
        method: &str,
        url: &Url,
        headers: &[(String, String)],
        payload_hash: &str,
    ) -> (String, String) {
        let mut canonical: Vec<(String, String)> = headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim().to_string()))
            .collect();
        canonical.sort();

        let canonical_headers: String = canonical
            .iter()
            .map(|(k, v)| format!("{}:{}\n", k, v))
            .collect();
        let signed_headers = canonical
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let path = if url.path().is_empty() { "/" } else { url.path() };
        let request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method.to_uppercase(),
            path,
            Self::canonical_query(url),
            canonical_headers,
            signed_headers,
            payload_hash
        );
        (request, signed_headers)
    }

    fn signature(
        &self,
        creds: &Credentials,
        canonical_request: &str,
        now: &DateTime<Utc>,
    ) -> String {
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date(now),
            self.scope(now),
            sha256_hex(canonical_request.as_bytes())
        );
        hex::encode(hmac(
            &self.signing_key(&creds.secret_key, now),
            string_to_sign.as_bytes(),
        ))
    }

    /// Signature for the given request parts. `headers` must contain `host`
    /// and `x-amz-date`.
    pub fn sign(
        &self,
        creds: &Credentials,
        method: &str,
        url: &Url,
        headers: &[(String, String)],
        payload_hash: &str,
        now: &DateTime<Utc>,
    ) -> (String, String) {
        let (canonical, signed_headers) =
            Self::canonical_request(method, url, headers, payload_hash);
        (self.signature(creds, &canonical, now), signed_headers)
    }

    /// Sign a request carried in headers. `extra_headers` are signed together
    /// with `host` and `x-amz-date`.
    pub fn sign_headers(
        &self,
        creds: &Credentials,
        method: &str,
        url: &Url,
        extra_headers: &[(String, String)],
        payload: &[u8],
        now: &DateTime<Utc>,
    ) -> SignedHeaders {
        let date = amz_date(now);
        let mut headers = vec![
            ("host".to_string(), host_header(url)),
            ("x-amz-date".to_string(), date.clone()),
        ];
        headers.extend(extra_headers.iter().cloned());

        let (signature, signed_headers) =
            self.sign(creds, method, url, &headers, &sha256_hex(payload), now);
        SignedHeaders {
            authorization: format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                ALGORITHM,
                creds.access_key,
                self.scope(now),
                signed_headers,
                signature
            ),
            amz_date: date,
        }
    }

    /// Replace the query of a GET URL with `params` plus the presigning
    /// parameters. The query is written already canonical (RFC 3986 encoded,
    /// sorted), so the URL carries exactly the bytes that were signed.
    pub fn presign(
        &self,
        creds: &Credentials,
        url: &mut Url,
        params: &[(&str, String)],
        expires_secs: u64,
        now: &DateTime<Utc>,
    ) {
        let credential = format!("{}/{}", creds.access_key, self.scope(now));
        let date = amz_date(now);
        let expires = expires_secs.to_string();
        let mut pairs: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (uri_encode(k), uri_encode(v)))
            .chain(
                [
                    ("X-Amz-Algorithm", ALGORITHM),
                    ("X-Amz-Credential", credential.as_str()),
                    ("X-Amz-Date", date.as_str()),
                    ("X-Amz-Expires", expires.as_str()),
                    ("X-Amz-SignedHeaders", "host"),
                ]
                .iter()
                .map(|(k, v)| (uri_encode(k), uri_encode(v))),
            )
            .collect();
        pairs.sort();
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));

        let headers = vec![("host".to_string(), host_header(url))];
        let (signature, _) = self.sign(creds, "GET", url, &headers, &sha256_hex(b""), now);
        url.set_query(Some(&format!("{}&X-Amz-Signature={}", query, signature)));
    }
}

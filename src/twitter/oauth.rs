// OAuth 1.0a request signing (HMAC-SHA1) for the Twitter v1.1 API.
//
// Every timeline request carries an Authorization header built from the four
// configured secrets. The signature covers the method, the base URL and every
// query parameter, so the header has to be rebuilt for each page.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distr::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is, everything else is encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The consumer + access token pair used to sign requests.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

/// Per-request values that would otherwise be random / clock-derived.
#[derive(Debug, Clone)]
pub struct Nonce {
    pub nonce: String,
    pub timestamp: i64,
}

impl Nonce {
    pub fn generate() -> Self {
        let nonce: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        Self {
            nonce,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

impl OAuthCredentials {
    /// Build the `Authorization: OAuth ...` header value for a request.
    pub fn authorization_header(
        &self,
        method: &str,
        base_url: &str,
        params: &[(&str, &str)],
        nonce: &Nonce,
    ) -> Result<String> {
        let timestamp = nonce.timestamp.to_string();
        let oauth_params = self.oauth_params(&nonce.nonce, &timestamp);

        let base = signature_base_string(method, base_url, params, &oauth_params);
        let signature = self.sign(&base)?;

        let mut header_params = oauth_params;
        header_params.push(("oauth_signature", signature.as_str()));

        let fields: Vec<String> = header_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn oauth_params<'a>(&'a self, nonce: &'a str, timestamp: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.token.as_str()),
            ("oauth_version", "1.0"),
        ]
    }

    /// HMAC-SHA1 over the base string, keyed by both secrets, base64 encoded.
    pub fn sign(&self, base_string: &str) -> Result<String> {
        let key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid OAuth signing key: {e}"))?;
        mac.update(base_string.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// `METHOD&encoded(url)&encoded(sorted, encoded params)`.
pub fn signature_base_string(
    method: &str,
    base_url: &str,
    params: &[(&str, &str)],
    oauth_params: &[(&str, &str)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .chain(oauth_params.iter())
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&param_string)
    )
}

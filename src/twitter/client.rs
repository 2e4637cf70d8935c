// Twitter v1.1 REST client: OAuth 1.0a signed GETs over HTTP.
//
// A thin reqwest wrapper with one generic signed GET helper. The four
// configured secrets are held here and nowhere else.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::oauth::{Nonce, OAuthCredentials};
use crate::config::Config;

/// Default base URL for the v1.1 REST API.
pub const DEFAULT_TWITTER_API_URL: &str = "https://api.twitter.com/1.1";

/// Largest page the user timeline endpoint will return.
pub const MAX_PAGE_SIZE: u32 = 200;

/// OAuth-signed HTTP client for the Twitter v1.1 API.
pub struct TwitterClient {
    client: reqwest::Client,
    base_url: String,
    credentials: OAuthCredentials,
}

impl TwitterClient {
    /// Create a client pointing at the given base URL.
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: &str, credentials: OAuthCredentials, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("threadmail/0.1 (digest)")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Build a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.require_twitter()?;
        let credentials = OAuthCredentials {
            consumer_key: config.twitter_consumer_key.clone(),
            consumer_secret: config.twitter_consumer_secret.clone(),
            token: config.twitter_access_token_key.clone(),
            token_secret: config.twitter_access_token_secret.clone(),
        };
        Self::new(&config.twitter_api_url, credentials, config.http_timeout)
    }

    /// Make a signed GET request to a REST endpoint and deserialize the response.
    ///
    /// `path` is relative to the base URL (e.g. "statuses/user_timeline.json").
    pub async fn api_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let authorization =
            self.credentials
                .authorization_header("GET", &url, params, &Nonce::generate())?;

        debug!(path = path, "Twitter GET request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .with_context(|| format!("Twitter request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Twitter {path} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize {path} response"))
    }

    /// One page of an account's timeline, newest first.
    ///
    /// `max_id` is inclusive: the post with that id is returned again.
    pub async fn user_timeline(
        &self,
        screen_name: &str,
        count: u32,
        max_id: Option<u64>,
    ) -> Result<Vec<TweetPayload>> {
        let count = count.min(MAX_PAGE_SIZE).to_string();
        let max_id = max_id.map(|id| id.to_string());

        let mut params: Vec<(&str, &str)> = vec![
            ("screen_name", screen_name),
            ("count", &count),
            ("trim_user", "true"),
            ("tweet_mode", "extended"),
        ];
        if let Some(ref id) = max_id {
            params.push(("max_id", id));
        }

        self.api_get("statuses/user_timeline.json", &params)
            .await
            .with_context(|| format!("Failed to fetch timeline for @{screen_name}"))
    }
}

// -- Serde types for statuses/user_timeline --

/// A tweet as returned by the v1.1 API in extended mode.
///
/// `trim_user=true` strips the author object down to an id, so the author
/// handle is not read from here.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetPayload {
    pub id: u64,
    /// e.g. "Wed Oct 10 20:19:24 +0000 2018"
    pub created_at: String,
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub favorite_count: u64,
    pub in_reply_to_user_id: Option<u64>,
    pub in_reply_to_status_id: Option<u64>,
    pub quoted_status: Option<QuotedStatus>,
    pub quoted_status_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotedStatus {
    pub id: u64,
}

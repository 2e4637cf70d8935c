use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// What to do when one account's timeline can't be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailurePolicy {
    /// Log the failure, leave the account out of the digest, keep going (default)
    Skip,
    /// Stop the run with the fetch error
    Abort,
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy. Built once and passed
/// by reference into each stage; nothing reads the environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    pub twitter_consumer_key: String,
    pub twitter_consumer_secret: String,
    pub twitter_access_token_key: String,
    pub twitter_access_token_secret: String,
    pub twitter_api_url: String,
    pub sendgrid_api_key: String,
    pub sendgrid_api_url: String,
    pub from_email: String,
    pub subject: String,
    /// How many posts go into one digest
    pub thread_count: usize,
    /// How far back a post may be and still count as recent
    pub lookback: chrono::Duration,
    pub accounts_path: PathBuf,
    pub addresses_path: PathBuf,
    pub email_template_path: PathBuf,
    pub post_template_path: PathBuf,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
    /// Upper bound on the whole run
    pub run_deadline: Duration,
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// THREAD_COUNT and OFFSET_IN_DAYS are required positive integers.
    /// Everything else has a default; secrets default to empty and are
    /// checked later by the `require_*` methods.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let thread_count = positive_int(&get("THREAD_COUNT"), "THREAD_COUNT")?.with_context(
            || "THREAD_COUNT not set. Add it to your .env file (number of posts per digest).",
        )?;
        let offset_days = positive_int(&get("OFFSET_IN_DAYS"), "OFFSET_IN_DAYS")?.with_context(
            || "OFFSET_IN_DAYS not set. Add it to your .env file (lookback window in days).",
        )?;
        let http_timeout = positive_int(&get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS")?
            .unwrap_or(30);
        let run_deadline = positive_int(&get("RUN_DEADLINE_SECS"), "RUN_DEADLINE_SECS")?
            .unwrap_or(900);

        let lookback = i64::try_from(offset_days)
            .ok()
            .and_then(chrono::Duration::try_days)
            .with_context(|| format!("OFFSET_IN_DAYS is out of range: {offset_days}"))?;

        let fetch_failure_policy = match get("FETCH_FAILURE_POLICY").as_deref() {
            None | Some("") | Some("skip") => FetchFailurePolicy::Skip,
            Some("abort") => FetchFailurePolicy::Abort,
            Some(other) => anyhow::bail!(
                "FETCH_FAILURE_POLICY must be \"skip\" or \"abort\", got \"{other}\""
            ),
        };

        Ok(Self {
            twitter_consumer_key: or("TWITTER_CONSUMER_KEY", ""),
            twitter_consumer_secret: or("TWITTER_CONSUMER_SECRET", ""),
            twitter_access_token_key: or("TWITTER_ACCESS_TOKEN_KEY", ""),
            twitter_access_token_secret: or("TWITTER_ACCESS_TOKEN_SECRET", ""),
            twitter_api_url: or(
                "TWITTER_API_URL",
                crate::twitter::client::DEFAULT_TWITTER_API_URL,
            ),
            sendgrid_api_key: or("SENDGRID_API_KEY", ""),
            sendgrid_api_url: or(
                "SENDGRID_API_URL",
                crate::mail::sendgrid::DEFAULT_SENDGRID_API_URL,
            ),
            from_email: or("FROM_EMAIL", ""),
            subject: or("DIGEST_SUBJECT", "Eleven Digest Update"),
            thread_count: thread_count as usize,
            lookback,
            accounts_path: or("ACCOUNTS_FILE", "accounts.txt").into(),
            addresses_path: or("ADDRESSES_FILE", "addresses.txt").into(),
            email_template_path: or("EMAIL_TEMPLATE", "email_template.html").into(),
            post_template_path: or("TWEET_TEMPLATE", "tweet_template.html").into(),
            http_timeout: Duration::from_secs(http_timeout),
            run_deadline: Duration::from_secs(run_deadline),
            fetch_failure_policy,
        })
    }

    /// Check that all four social API secrets are configured.
    /// Call this before any timeline fetch.
    pub fn require_twitter(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("TWITTER_CONSUMER_KEY", &self.twitter_consumer_key),
            ("TWITTER_CONSUMER_SECRET", &self.twitter_consumer_secret),
            ("TWITTER_ACCESS_TOKEN_KEY", &self.twitter_access_token_key),
            ("TWITTER_ACCESS_TOKEN_SECRET", &self.twitter_access_token_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "{} not set. Add them to your .env file.\n\
                 See .env.example for the required variables.",
                missing.join(", ")
            );
        }
        Ok(())
    }

    /// Check that mail delivery is configured.
    /// Call this before sending anything.
    pub fn require_sendgrid(&self) -> Result<()> {
        if self.sendgrid_api_key.is_empty() {
            anyhow::bail!(
                "SENDGRID_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        if self.from_email.is_empty() {
            anyhow::bail!(
                "FROM_EMAIL not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}

/// Parse an optional positive integer. `Ok(None)` when unset or blank.
fn positive_int(value: &Option<String>, name: &str) -> Result<Option<u64>> {
    let Some(raw) = value.as_deref().filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let parsed: u64 = raw
        .parse()
        .with_context(|| format!("{name} must be a positive integer, got \"{raw}\""))?;
    if parsed == 0 {
        anyhow::bail!("{name} must be a positive integer, got 0");
    }
    Ok(Some(parsed))
}

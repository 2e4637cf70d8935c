// Timeline reader trait: the seam between the digest pipeline and the API.
//
// The pipeline only ever asks for "one page of this account's posts at or
// below this id". The real implementation talks to Twitter; tests script
// pages with a fake.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::client::{TweetPayload, TwitterClient};
use crate::post::Post;

/// Timestamp format used by the v1.1 API.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Reads pages of an account's recent posts, newest first.
#[async_trait]
pub trait TimelineReader: Send + Sync {
    /// Fetch up to `count` posts by `handle` with id <= `max_id`
    /// (no bound when `None`).
    async fn fetch_page(&self, handle: &str, count: u32, max_id: Option<u64>)
        -> Result<Vec<Post>>;
}

#[async_trait]
impl TimelineReader for TwitterClient {
    async fn fetch_page(
        &self,
        handle: &str,
        count: u32,
        max_id: Option<u64>,
    ) -> Result<Vec<Post>> {
        self.user_timeline(handle, count, max_id)
            .await?
            .into_iter()
            .map(|tweet| post_from_tweet(handle, tweet))
            .collect()
    }
}

/// Parse a v1.1 `created_at` string.
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(raw, CREATED_AT_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Unrecognized created_at timestamp: {raw}"))
}

/// Build a `Post` from an API tweet.
///
/// The author is the handle that was polled; trimmed responses carry no
/// screen name of their own.
pub fn post_from_tweet(handle: &str, tweet: TweetPayload) -> Result<Post> {
    let created_at = parse_created_at(&tweet.created_at)
        .with_context(|| format!("Bad timestamp on post {} by @{handle}", tweet.id))?;

    Ok(Post {
        id: tweet.id,
        author: handle.to_string(),
        created_at,
        engagement: tweet.favorite_count,
        in_reply_to_user: tweet.in_reply_to_user_id,
        in_reply_to_post: tweet.in_reply_to_status_id,
        text: tweet.full_text,
        quoted_post: tweet
            .quoted_status
            .map(|quoted| quoted.id)
            .or(tweet.quoted_status_id),
    })
}

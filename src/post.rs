// Post model: the single value that flows through the digest pipeline.
//
// Posts are built once by the timeline fetcher and then only moved around:
// filtered, grouped, reordered and rendered. Nothing downstream rewrites them.

use chrono::{DateTime, Utc};

/// Base URL used to build post permalinks.
pub const PERMALINK_BASE: &str = "https://twitter.com";

/// A simplified post with just the fields the digest needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Unique, monotonically increasing with recency.
    pub id: u64,
    /// Handle of the polled account. Set at construction, never rewritten.
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// Like/favorite count.
    pub engagement: u64,
    pub in_reply_to_user: Option<u64>,
    pub in_reply_to_post: Option<u64>,
    pub text: String,
    /// Id of the quoted/shared post, if this post quotes another one.
    pub quoted_post: Option<u64>,
}

impl Post {
    /// Public URL of this post.
    pub fn permalink(&self) -> String {
        format!("{}/{}/status/{}", PERMALINK_BASE, self.author, self.id)
    }

    /// True when either reply indicator is set.
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_user.is_some() || self.in_reply_to_post.is_some()
    }

    pub fn is_quote(&self) -> bool {
        self.quoted_post.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post {
            id: 1450000000000000001,
            author: "rustlang".to_string(),
            created_at: Utc::now(),
            engagement: 12,
            in_reply_to_user: None,
            in_reply_to_post: None,
            text: "hello".to_string(),
            quoted_post: None,
        }
    }

    #[test]
    fn test_permalink_uses_author_and_id() {
        assert_eq!(
            post().permalink(),
            "https://twitter.com/rustlang/status/1450000000000000001"
        );
    }

    #[test]
    fn test_reply_indicators() {
        let mut p = post();
        assert!(!p.is_reply());
        p.in_reply_to_user = Some(7);
        assert!(p.is_reply());
        p.in_reply_to_user = None;
        p.in_reply_to_post = Some(9);
        assert!(p.is_reply());
    }
}

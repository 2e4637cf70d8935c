// Timeline fetching: page backwards through each account until posts fall
// outside the lookback window.
//
// Paging uses the smallest post id seen as the next `max_id`. Ids grow with
// recency, so this matches the API's own pagination even when timestamps
// tie. Accounts are polled one at a time.

use std::collections::HashSet;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::FetchFailurePolicy;
use crate::post::Post;
use crate::twitter::client::MAX_PAGE_SIZE;
use crate::twitter::timeline::TimelineReader;

/// An account whose timeline could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFailure {
    pub handle: String,
    pub error: String,
}

/// Posts from every account that could be read, plus the ones that couldn't.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub posts: Vec<Post>,
    pub failures: Vec<AccountFailure>,
}

/// Collect every post by `handle` created strictly after `now - window`.
///
/// Stops when a page has nothing inside the window, or when the cursor
/// stops moving (the API handed back the same page). `max_id` is inclusive,
/// so the cursor post comes back on the next page; it is only kept once.
pub async fn fetch_account_posts(
    reader: &dyn TimelineReader,
    handle: &str,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<Vec<Post>> {
    let earliest = now - window;
    let mut posts = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut cursor: Option<u64> = None;

    loop {
        let page = reader.fetch_page(handle, MAX_PAGE_SIZE, cursor).await?;
        let page_len = page.len();

        let relevant: Vec<Post> = page
            .into_iter()
            .filter(|post| post.created_at > earliest)
            .collect();

        let Some(oldest) = relevant.iter().map(|post| post.id).min() else {
            break;
        };
        if cursor == Some(oldest) {
            break;
        }
        cursor = Some(oldest);

        posts.extend(relevant.into_iter().filter(|post| seen.insert(post.id)));

        debug!(
            page_posts = page_len,
            total_collected = posts.len(),
            max_id = oldest,
            "Fetched page of posts for @{}",
            handle
        );
    }

    info!(count = posts.len(), handle = handle, "Collected recent posts");

    Ok(posts)
}

/// Fetch every account in order and concatenate the results.
///
/// A handle listed more than once is only polled the first time.
///
/// A failed account is never folded into "no posts": with `Skip` it is
/// logged and listed in the report, with `Abort` the error ends the fetch.
pub async fn fetch_timelines(
    reader: &dyn TimelineReader,
    accounts: &[String],
    window: Duration,
    now: DateTime<Utc>,
    policy: FetchFailurePolicy,
) -> Result<FetchReport> {
    let pb = ProgressBar::new(accounts.len() as u64);
    pb.set_style(ProgressStyle::with_template(
        "  Fetching [{bar:30}] {pos}/{len} {msg}",
    )?);

    let mut report = FetchReport::default();
    let mut polled: HashSet<&str> = HashSet::new();

    for handle in accounts {
        if !polled.insert(handle.as_str()) {
            debug!(handle = %handle, "Skipping duplicate account");
            pb.inc(1);
            continue;
        }
        pb.set_message(format!("@{handle}"));
        match fetch_account_posts(reader, handle, window, now).await {
            Ok(posts) => report.posts.extend(posts),
            Err(e) => {
                if policy == FetchFailurePolicy::Abort {
                    pb.abandon();
                    return Err(e.context(format!("Aborting run: fetch failed for @{handle}")));
                }
                let error = format!("{e:#}");
                warn!(handle = %handle, error = %error, "Skipping account after fetch failure");
                report.failures.push(AccountFailure {
                    handle: handle.clone(),
                    error,
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        accounts = accounts.len(),
        posts = report.posts.len(),
        failed = report.failures.len(),
        "Timeline fetch complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn post(id: u64, age_hours: i64, now: DateTime<Utc>) -> Post {
        Post {
            id,
            author: "rustlang".to_string(),
            created_at: now - Duration::hours(age_hours),
            engagement: id,
            in_reply_to_user: None,
            in_reply_to_post: None,
            text: format!("post {id}"),
            quoted_post: None,
        }
    }

    /// Returns every post with id <= max_id, newest first, at most two per page.
    struct PagedReader {
        posts: Vec<Post>,
        calls: Mutex<Vec<Option<u64>>>,
    }

    #[async_trait]
    impl TimelineReader for PagedReader {
        async fn fetch_page(
            &self,
            _handle: &str,
            _count: u32,
            max_id: Option<u64>,
        ) -> Result<Vec<Post>> {
            self.calls.lock().unwrap().push(max_id);
            let mut page: Vec<Post> = self
                .posts
                .iter()
                .filter(|p| max_id.map_or(true, |max| p.id <= max))
                .cloned()
                .collect();
            page.sort_by(|a, b| b.id.cmp(&a.id));
            page.truncate(2);
            Ok(page)
        }
    }

    #[tokio::test]
    async fn test_pages_until_window_exhausted() {
        let now = Utc::now();
        let reader = PagedReader {
            posts: vec![
                post(50, 1, now),
                post(40, 2, now),
                post(30, 3, now),
                post(20, 30, now),
                post(10, 40, now),
            ],
            calls: Mutex::new(Vec::new()),
        };

        let posts = fetch_account_posts(&reader, "rustlang", Duration::hours(24), now)
            .await
            .unwrap();

        let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![50, 40, 30]);
        assert_eq!(
            *reader.calls.lock().unwrap(),
            vec![None, Some(40), Some(30)]
        );
    }

    #[tokio::test]
    async fn test_stops_when_cursor_does_not_advance() {
        let now = Utc::now();
        let reader = PagedReader {
            posts: vec![post(7, 1, now)],
            calls: Mutex::new(Vec::new()),
        };

        let posts = fetch_account_posts(&reader, "rustlang", Duration::days(1), now)
            .await
            .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(*reader.calls.lock().unwrap(), vec![None, Some(7)]);
    }

    #[tokio::test]
    async fn test_window_boundary_is_exclusive() {
        let now = Utc::now();
        let reader = PagedReader {
            posts: vec![post(2, 1, now), post(1, 24, now)],
            calls: Mutex::new(Vec::new()),
        };

        let posts = fetch_account_posts(&reader, "rustlang", Duration::hours(24), now)
            .await
            .unwrap();

        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
    }

    #[tokio::test]
    async fn test_repeated_handle_is_polled_once() {
        let now = Utc::now();
        let reader = PagedReader {
            posts: vec![post(9, 1, now), post(8, 2, now)],
            calls: Mutex::new(Vec::new()),
        };
        let accounts = vec!["rustlang".to_string(), "rustlang".to_string()];

        let report = fetch_timelines(
            &reader,
            &accounts,
            Duration::days(1),
            now,
            FetchFailurePolicy::Skip,
        )
        .await
        .unwrap();

        assert_eq!(report.posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![9, 8]);
        assert_eq!(*reader.calls.lock().unwrap(), vec![None, Some(8)]);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_empty_timeline() {
        let reader = PagedReader {
            posts: Vec::new(),
            calls: Mutex::new(Vec::new()),
        };
        let posts = fetch_account_posts(&reader, "quiet", Duration::days(1), Utc::now())
            .await
            .unwrap();
        assert!(posts.is_empty());
    }
}

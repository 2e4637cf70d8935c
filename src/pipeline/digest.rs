// The digest pipeline: fetch -> filter -> select -> render -> dispatch.
//
// A single pass with no feedback. The config and inputs are read-only; the
// reader and sender are injected so the whole run can be driven by fakes.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use super::dispatch::{dispatch, DispatchReport};
use super::fetch::{fetch_timelines, AccountFailure};
use super::filter::drop_replies;
use super::select::select_posts;
use crate::config::Config;
use crate::inputs::DigestInputs;
use crate::mail::traits::MailSender;
use crate::output::render::render_digest;
use crate::post::Post;
use crate::twitter::timeline::TimelineReader;

/// A rendered digest, ready to mail or preview.
#[derive(Debug)]
pub struct BuiltDigest {
    /// Selected posts in digest order.
    pub posts: Vec<Post>,
    pub html: String,
    /// Posts fetched, before the reply filter.
    pub fetched: usize,
    /// Posts left after the reply filter.
    pub candidates: usize,
    pub failed_accounts: Vec<AccountFailure>,
}

/// What happened during one full run.
#[derive(Debug)]
pub struct RunSummary {
    pub digest: BuiltDigest,
    pub dispatch: DispatchReport,
}

/// Fetch, filter, select and render: everything short of sending.
pub async fn build_digest(
    config: &Config,
    reader: &dyn TimelineReader,
    inputs: &DigestInputs,
    now: DateTime<Utc>,
) -> Result<BuiltDigest> {
    let report = fetch_timelines(
        reader,
        &inputs.accounts,
        config.lookback,
        now,
        config.fetch_failure_policy,
    )
    .await?;

    let fetched = report.posts.len();
    let candidates = drop_replies(report.posts);
    let candidate_count = candidates.len();
    let posts = select_posts(candidates, config.thread_count);

    info!(
        fetched = fetched,
        candidates = candidate_count,
        selected = posts.len(),
        target = config.thread_count,
        "Selected posts for digest"
    );

    let html = render_digest(&posts, &inputs.templates);

    Ok(BuiltDigest {
        posts,
        html,
        fetched,
        candidates: candidate_count,
        failed_accounts: report.failures,
    })
}

/// Build the digest and mail it to every subscriber.
///
/// Send failures never fail the run; they are reported in the summary.
pub async fn run(
    config: &Config,
    reader: &dyn TimelineReader,
    sender: &dyn MailSender,
    inputs: &DigestInputs,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let digest = build_digest(config, reader, inputs, now).await?;

    let delivery = dispatch(
        sender,
        &config.from_email,
        &config.subject,
        &digest.html,
        &inputs.subscribers,
    )
    .await;

    info!(
        selected = digest.posts.len(),
        failed_accounts = digest.failed_accounts.len(),
        delivered = delivery.delivered.len(),
        failed_sends = delivery.failed.len(),
        "Digest run complete"
    );

    Ok(RunSummary {
        digest,
        dispatch: delivery,
    })
}

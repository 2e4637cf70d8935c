// Colored terminal output for the chosen posts and the run summary.
//
// Everything here writes to a caller-supplied stream, so `preview` can keep
// stdout clean for the HTML and put the table on stderr.

use std::io::{self, Write};

use colored::Colorize;

use super::truncate_chars;
use crate::pipeline::digest::{BuiltDigest, RunSummary};
use crate::post::Post;

/// Display the selected posts in digest order.
pub fn display_posts(out: &mut dyn Write, posts: &[Post]) -> io::Result<()> {
    if posts.is_empty() {
        writeln!(
            out,
            "No posts selected. Check the account list and OFFSET_IN_DAYS."
        )?;
        return Ok(());
    }

    writeln!(
        out,
        "\n{}",
        format!("=== Digest ({} posts) ===", posts.len()).bold()
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "  {:>4}  {:<24} {:>7}  {}",
        "Rank".dimmed(),
        "Author".dimmed(),
        "Likes".dimmed(),
        "Text".dimmed(),
    )?;
    writeln!(out, "  {}", "-".repeat(78).dimmed())?;

    for (i, post) in posts.iter().enumerate() {
        let author = if post.is_quote() {
            format!("@{} {}", post.author, "(quote)".yellow())
        } else {
            format!("@{}", post.author)
        };
        let text = truncate_chars(&post.text.replace('\n', " "), 60);

        writeln!(
            out,
            "  {:>4}. {:<24} {:>7}  {}",
            i + 1,
            author,
            post.engagement.to_string().green(),
            text
        )?;
        writeln!(out, "        {}", post.permalink().dimmed())?;
    }

    writeln!(out)
}

/// Print how many posts made it through each stage.
pub fn display_digest_stats(out: &mut dyn Write, digest: &BuiltDigest) -> io::Result<()> {
    writeln!(
        out,
        "Fetched {} posts, {} after dropping replies, {} selected.",
        digest.fetched,
        digest.candidates,
        digest.posts.len()
    )?;

    for failure in &digest.failed_accounts {
        writeln!(
            out,
            "  {} @{}: {}",
            "skipped".red(),
            failure.handle,
            failure.error
        )?;
    }
    Ok(())
}

/// Print the outcome of a full run, including delivery results.
pub fn display_run_summary(out: &mut dyn Write, summary: &RunSummary) -> io::Result<()> {
    display_digest_stats(out, &summary.digest)?;

    writeln!(
        out,
        "Delivered to {} of {} subscribers.",
        summary.dispatch.delivered.len(),
        summary.dispatch.delivered.len() + summary.dispatch.failed.len()
    )?;

    for failure in &summary.dispatch.failed {
        writeln!(out, "  {} {}: {}", "failed".red(), failure.address, failure.error)?;
    }
    Ok(())
}

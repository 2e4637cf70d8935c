use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use threadmail::config::Config;
use threadmail::inputs::DigestInputs;
use threadmail::mail::sendgrid::SendGridSender;
use threadmail::output::terminal;
use threadmail::pipeline::digest;
use threadmail::twitter::client::TwitterClient;

/// Threadmail: email a digest of the most-liked recent posts.
///
/// Polls a list of accounts, drops replies, picks the best posts while
/// keeping any one account from crowding out the rest, and mails the
/// result to a list of subscribers.
#[derive(Parser)]
#[command(name = "threadmail", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the digest and email it to every subscriber
    Send,

    /// Build the digest without sending it
    Preview {
        /// Write the rendered HTML here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("threadmail=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Everything is validated before the first network call.
    let config = Config::load()?;
    let inputs = DigestInputs::load(&config)?;

    match cli.command {
        Commands::Send => {
            let reader = TwitterClient::from_config(&config)?;
            let sender = SendGridSender::from_config(&config)?;

            let summary = tokio::time::timeout(
                config.run_deadline,
                digest::run(&config, &reader, &sender, &inputs, chrono::Utc::now()),
            )
            .await
            .with_context(|| {
                format!(
                    "Digest run exceeded RUN_DEADLINE_SECS ({}s)",
                    config.run_deadline.as_secs()
                )
            })??;

            let mut out = std::io::stdout().lock();
            terminal::display_posts(&mut out, &summary.digest.posts)?;
            terminal::display_run_summary(&mut out, &summary)?;
        }

        Commands::Preview { output } => {
            let reader = TwitterClient::from_config(&config)?;

            let built = tokio::time::timeout(
                config.run_deadline,
                digest::build_digest(&config, &reader, &inputs, chrono::Utc::now()),
            )
            .await
            .with_context(|| {
                format!(
                    "Digest preview exceeded RUN_DEADLINE_SECS ({}s)",
                    config.run_deadline.as_secs()
                )
            })??;

            // Without --output the HTML owns stdout.
            let mut report: Box<dyn Write> = match output {
                Some(_) => Box::new(std::io::stdout().lock()),
                None => Box::new(std::io::stderr().lock()),
            };
            terminal::display_posts(&mut report, &built.posts)?;
            terminal::display_digest_stats(&mut report, &built)?;
            drop(report);

            match output {
                Some(path) => {
                    std::fs::write(&path, &built.html)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Wrote digest preview");
                    println!(
                        "\n{}",
                        format!("Preview saved to: {}", path.display()).bold()
                    );
                }
                None => println!("{}", built.html),
            }
        }
    }

    Ok(())
}

// Startup inputs: account list, subscriber list, and the two HTML templates.
//
// All four are read once, before any network activity.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;

/// The two HTML templates the digest is rendered from.
#[derive(Debug, Clone)]
pub struct Templates {
    /// Outer email, with `{{names}}` and `{{tweets}}` placeholders.
    pub email: String,
    /// One post, with `{{name}}`, `{{url}}` and `{{tweet}}` placeholders.
    pub post: String,
}

/// Everything a run reads from disk.
#[derive(Debug, Clone)]
pub struct DigestInputs {
    pub accounts: Vec<String>,
    pub subscribers: Vec<String>,
    pub templates: Templates,
}

impl DigestInputs {
    pub fn load(config: &Config) -> Result<Self> {
        let inputs = Self {
            accounts: read_lines(&config.accounts_path)?,
            subscribers: read_lines(&config.addresses_path)?,
            templates: Templates {
                email: read_template(&config.email_template_path)?,
                post: read_template(&config.post_template_path)?,
            },
        };

        info!(
            accounts = inputs.accounts.len(),
            subscribers = inputs.subscribers.len(),
            "Loaded digest inputs"
        );

        Ok(inputs)
    }
}

/// One entry per non-blank line, surrounding whitespace and line endings removed.
pub fn parse_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read list file {}", path.display()))?;
    Ok(parse_lines(&contents))
}

pub fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines_strips_endings_and_blanks() {
        let parsed = parse_lines("rustlang\r\n  tokio_rs \n\n\nserde\n");
        assert_eq!(parsed, vec!["rustlang", "tokio_rs", "serde"]);
    }

    #[test]
    fn test_parse_lines_without_trailing_newline() {
        assert_eq!(parse_lines("a@example.com"), vec!["a@example.com"]);
        assert!(parse_lines("").is_empty());
    }

    #[test]
    fn test_read_lines_missing_file_names_path() {
        let err = read_lines(Path::new("/nonexistent/threadmail/accounts.txt")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/threadmail/accounts.txt"));
    }
}

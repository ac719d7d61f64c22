//! GitHub Releases access through the `gh` CLI.

use crate::adapters::GitHubRelease;
use crate::error::{ChangelogError, Result};
use std::process::Command;

/// Fields requested from the releases API, one JSON object per line
const RELEASE_JQ: &str =
    ".[] | {tag_name, name, body, published_at, prerelease}";

/// Fetch up to 100 releases of `repo` (`owner/name`) with `gh api`
///
/// # Returns
/// * `Ok(Vec<GitHubRelease>)` - Releases in API order
/// * `Err` - If `gh` is missing, not authenticated or exits non-zero
pub fn fetch_releases(repo: &str) -> Result<Vec<GitHubRelease>> {
    let endpoint = format!("repos/{}/releases?per_page=100", repo);
    tracing::info!(%endpoint, "fetching GitHub releases");

    let output = Command::new("gh")
        .args(["api", &endpoint, "--jq", RELEASE_JQ])
        .output()
        .map_err(|e| ChangelogError::github(format!("Failed to run gh: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(ChangelogError::github(format!(
            "gh api {} failed with exit code {}\nStdout: {}\nStderr: {}",
            endpoint,
            output.status.code().unwrap_or(-1),
            stdout.trim(),
            stderr.trim()
        )));
    }

    Ok(parse_release_lines(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse newline-delimited release objects, skipping lines that do not parse
pub fn parse_release_lines(output: &str) -> Vec<GitHubRelease> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<GitHubRelease>(line) {
            Ok(release) => Some(release),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed release line");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_lines() {
        let output = r#"{"tag_name":"v1.1.0","name":"v1.1.0","body":"- fix: crash","published_at":"2024-02-01T10:00:00Z","prerelease":false}
not json
{"tag_name":"v1.0.0","name":null,"body":null,"published_at":null,"prerelease":true}

"#;
        let releases = parse_release_lines(output);
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag_name, "v1.1.0");
        assert_eq!(releases[0].published_at.as_deref(), Some("2024-02-01T10:00:00Z"));
        assert!(releases[1].prerelease);
        assert_eq!(releases[1].body, None);
    }
}

use std::process::Command;

use crate::data::Repository;

/// The GitHub repository behind the `origin` remote of the working directory.
pub fn get_current_repo() -> Option<Repository> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    parse_github_url(&url)
}

/// Owner and name from an SSH or HTTPS GitHub remote URL.
pub fn parse_github_url(url: &str) -> Option<Repository> {
    let path = if let Some(path) = url.strip_prefix("git@github.com:") {
        path
    } else {
        let path = url.split("github.com").nth(1)?;
        path.trim_start_matches('/').trim_start_matches(':')
    };
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut parts = path.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
            Some(Repository::new(owner, name))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssh_and_https_remotes() {
        let want = Some(Repository::new("src-d", "github-reminder"));
        assert_eq!(parse_github_url("git@github.com:src-d/github-reminder.git"), want);
        assert_eq!(parse_github_url("https://github.com/src-d/github-reminder.git"), want);
        assert_eq!(parse_github_url("https://github.com/src-d/github-reminder"), want);
    }

    #[test]
    fn other_hosts_are_ignored() {
        assert_eq!(parse_github_url("https://gitlab.com/src-d/github-reminder"), None);
        assert_eq!(parse_github_url("https://github.com/src-d"), None);
    }
}

use crate::data::Repository;

use super::git::{get_current_repo, parse_github_url};

/// Resolve an issue reference given on the command line.
///
/// Accepts `owner/repo#12`, an issue or pull request URL, or a bare `12` /
/// `#12` for the repository of the working directory.
pub fn resolve_issue_ref(reference: &str) -> Option<(Repository, u64)> {
    let reference = reference.trim();

    if let Some(number) = parse_number(reference) {
        return get_current_repo().map(|repo| (repo, number));
    }

    parse_issue_ref(reference)
}

/// Like [`resolve_issue_ref`] but without looking at the working directory.
pub fn parse_issue_ref(reference: &str) -> Option<(Repository, u64)> {
    let reference = reference.trim().trim_end_matches('/');

    if let Some((repo, number)) = reference.split_once('#') {
        if !repo.contains("github.com") {
            let (owner, name) = repo.split_once('/')?;
            if owner.is_empty() || name.is_empty() || name.contains('/') {
                return None;
            }
            return Some((Repository::new(owner, name), parse_number(number)?));
        }
    }

    // https://github.com/owner/repo/issues/12 or .../pull/12
    let (base, number) = reference.rsplit_once('/')?;
    let number = parse_number(number)?;
    let base = base
        .strip_suffix("/issues")
        .or_else(|| base.strip_suffix("/pull"))?;
    Some((parse_github_url(base)?, number))
}

fn parse_number(s: &str) -> Option<u64> {
    s.strip_prefix('#').unwrap_or(s).parse().ok()
}

pub mod git;
pub mod reference;

pub use git::{get_current_repo, parse_github_url};
pub use reference::{parse_issue_ref, resolve_issue_ref};

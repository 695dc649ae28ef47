use serde::Deserialize;
use std::str::FromStr;

use super::models::Repository;

/// Prefix shared by every threshold label, followed by the day count.
pub const LABEL_PREFIX: &str = "deadline < ";

pub const DEADLINE_KEYWORD: &str = "deadline";
pub const REMINDER_KEYWORD: &str = "reminder";

/// Login the App posts its comments under.
pub const DEFAULT_BOT_LOGIN: &str = "deadline-reminder[bot]";

// Webhook event kinds we react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    IssueComment,
    Issues,
    PullRequest,
}

impl HookEvent {
    pub fn to_str(self) -> &'static str {
        match self {
            HookEvent::IssueComment => "issue_comment",
            HookEvent::Issues => "issues",
            HookEvent::PullRequest => "pull_request",
        }
    }
}

impl FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue_comment" => Ok(HookEvent::IssueComment),
            "issues" => Ok(HookEvent::Issues),
            "pull_request" => Ok(HookEvent::PullRequest),
            other => Err(other.to_string()),
        }
    }
}

/// The issue a webhook delivery points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookTarget {
    pub installation: u64,
    pub repo: Repository,
    pub number: u64,
}

// Webhook payload types, only the fields we read

#[derive(Debug, Deserialize)]
pub struct HookInstallation {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct HookOwner {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct HookRepository {
    pub name: String,
    pub owner: HookOwner,
}

impl From<HookRepository> for Repository {
    fn from(repo: HookRepository) -> Self {
        Repository::new(repo.owner.login, repo.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct HookIssue {
    pub number: u64,
    #[serde(default)]
    pub repository: Option<HookRepository>,
}

/// Payload of both `issues` and `issue_comment` deliveries.
#[derive(Debug, Deserialize)]
pub struct IssuePayload {
    pub installation: Option<HookInstallation>,
    pub issue: HookIssue,
    pub repository: Option<HookRepository>,
}

#[derive(Debug, Deserialize)]
pub struct HookPullRequest {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub installation: Option<HookInstallation>,
    pub pull_request: HookPullRequest,
    pub repository: Option<HookRepository>,
}

use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Other,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of an issue or pull request together with its comments,
/// in the order the platform returned them.
#[derive(Debug, Clone)]
pub struct Issue {
    pub repo: Repository,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub state: IssueState,
    pub comments: Vec<Comment>,
}

impl Issue {
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }
}

/// A threshold label such as `deadline < 7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub days: i64,
}

/// A change to apply to an issue on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddLabel(String),
    RemoveLabel(String),
    PostComment(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::AddLabel(name) => write!(f, "add label {name:?}"),
            Action::RemoveLabel(name) => write!(f, "remove label {name:?}"),
            Action::PostComment(text) => write!(f, "comment {text:?}"),
        }
    }
}

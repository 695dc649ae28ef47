pub mod models;
pub mod types;

pub use models::{Action, Comment, Issue, IssueState, Label, Repository};
pub use types::{
    HookEvent, HookTarget, DEADLINE_KEYWORD, DEFAULT_BOT_LOGIN, LABEL_PREFIX, REMINDER_KEYWORD,
};

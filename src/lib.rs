pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod services;
pub mod utils;

pub use config::{BotIdentity, Config};
pub use data::{Action, Comment, Issue, IssueState, Label, Repository};
pub use engine::{plan_actions, LabelSet};
pub use error::{LabelError, WebhookError};
pub use services::{GithubApp, PassSummary, Platform, Runner};

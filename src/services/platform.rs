use anyhow::Result;
use async_trait::async_trait;

use crate::data::{Issue, Repository};

/// Everything the bot needs from the code hosting platform, scoped to one
/// App installation.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Repositories the installation has access to.
    async fn repositories(&self) -> Result<Vec<Repository>>;

    /// Names of every label defined in the repository.
    async fn repo_labels(&self, repo: &Repository) -> Result<Vec<String>>;

    /// Numbers of the open issues and pull requests of the repository.
    async fn open_issues(&self, repo: &Repository) -> Result<Vec<u64>>;

    /// The issue with all of its comments, oldest first.
    async fn issue(&self, repo: &Repository, number: u64) -> Result<Issue>;

    async fn create_comment(&self, repo: &Repository, number: u64, body: &str) -> Result<()>;

    async fn remove_label(&self, repo: &Repository, number: u64, label: &str) -> Result<()>;

    async fn add_label(&self, repo: &Repository, number: u64, label: &str) -> Result<()>;
}

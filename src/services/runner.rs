use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::ops::AddAssign;
use tracing::{debug, error, info, warn};

use crate::config::BotIdentity;
use crate::data::{Action, Repository};
use crate::engine::{plan_actions, LabelSet};

use super::github::GithubApp;
use super::platform::Platform;

/// Repositories of one installation handled at the same time.
const REPO_CONCURRENCY: usize = 4;

/// Counters reported at the end of a pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub issues: usize,
    pub actions: usize,
    pub failures: usize,
}

impl AddAssign for PassSummary {
    fn add_assign(&mut self, other: Self) {
        self.issues += other.issues;
        self.actions += other.actions;
        self.failures += other.failures;
    }
}

/// Drives the planning engine against one installation.
pub struct Runner<P> {
    platform: P,
    bot: BotIdentity,
    dry_run: bool,
}

impl<P: Platform> Runner<P> {
    pub fn new(platform: P, bot: BotIdentity) -> Self {
        Self {
            platform,
            bot,
            dry_run: false,
        }
    }

    /// Log actions instead of executing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Every repository of the installation. A failing repository is logged
    /// and counted, the others are still handled.
    pub async fn update_installation(&self) -> Result<PassSummary> {
        let repos = self.platform.repositories().await?;
        info!("updating {} repositories", repos.len());

        let results: Vec<_> = stream::iter(repos)
            .map(|repo| async move {
                let result = self.update_repo(&repo).await;
                (repo, result)
            })
            .buffer_unordered(REPO_CONCURRENCY)
            .collect()
            .await;

        let mut summary = PassSummary::default();
        for (repo, result) in results {
            match result {
                Ok(repo_summary) => summary += repo_summary,
                Err(err) => {
                    summary.failures += 1;
                    error!("could not handle repository {repo}: {err:#}");
                }
            }
        }
        Ok(summary)
    }

    /// Every open issue of the repository, with labels loaded once.
    pub async fn update_repo(&self, repo: &Repository) -> Result<PassSummary> {
        debug!("handling repository {repo}");

        let labels = self.load_labels(repo).await?;
        let numbers = self
            .platform
            .open_issues(repo)
            .await
            .with_context(|| format!("could not list issues of {repo}"))?;

        let now = Utc::now();
        let mut summary = PassSummary::default();
        for number in numbers {
            summary.issues += 1;
            match self.update_issue_with(repo, number, &labels, now).await {
                Ok(applied) => summary.actions += applied,
                Err(err) => {
                    summary.failures += 1;
                    error!("could not handle issue {repo}#{number}: {err:#}");
                }
            }
        }

        info!(
            "{repo}: {} issues, {} actions, {} failures",
            summary.issues, summary.actions, summary.failures
        );
        Ok(summary)
    }

    /// A single issue, as triggered by a webhook delivery.
    pub async fn update_issue(&self, repo: &Repository, number: u64) -> Result<usize> {
        let labels = self.load_labels(repo).await?;
        self.update_issue_with(repo, number, &labels, Utc::now())
            .await
            .with_context(|| format!("could not handle issue {repo}#{number}"))
    }

    /// The threshold labels of a repository, read fresh on every call.
    pub async fn load_labels(&self, repo: &Repository) -> Result<LabelSet> {
        let names = self
            .platform
            .repo_labels(repo)
            .await
            .with_context(|| format!("could not list labels of {repo}"))?;
        let labels = LabelSet::from_names(names);
        if labels.is_empty() {
            debug!("{repo} has no threshold labels, only reminders apply");
        }
        for (i, label) in labels.as_slice().iter().enumerate() {
            debug!("{repo} label #{i}: {}", label.name);
        }
        Ok(labels)
    }

    async fn update_issue_with(
        &self,
        repo: &Repository,
        number: u64,
        labels: &LabelSet,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let issue = self.platform.issue(repo, number).await?;
        debug!("handling issue {repo}#{number}: {}", issue.title);

        let actions = plan_actions(&issue, labels, now, &self.bot);
        self.apply(repo, number, &actions).await?;
        Ok(actions.len())
    }

    /// Execute actions in order. A failed label removal is logged and does
    /// not fail the issue.
    pub async fn apply(&self, repo: &Repository, number: u64, actions: &[Action]) -> Result<()> {
        for action in actions {
            if self.dry_run {
                info!("{repo}#{number}: would {action}");
                continue;
            }

            match action {
                Action::AddLabel(name) => {
                    info!("applying {name} to {repo}#{number}");
                    self.platform
                        .add_label(repo, number, name)
                        .await
                        .with_context(|| format!("could not apply label {name}"))?;
                }
                Action::RemoveLabel(name) => {
                    if let Err(err) = self.platform.remove_label(repo, number, name).await {
                        warn!("could not remove label {name} from {repo}#{number}: {err:#}");
                    }
                }
                Action::PostComment(text) => {
                    info!("commenting on {repo}#{number}: {text}");
                    self.platform
                        .create_comment(repo, number, text)
                        .await
                        .with_context(|| format!("could not comment on {repo}#{number}"))?;
                }
            }
        }
        Ok(())
    }
}

/// One pass over every installation of the App. Installations that fail are
/// logged and counted; only failing to list installations is an error.
pub async fn sweep(app: &GithubApp, bot: &BotIdentity, dry_run: bool) -> Result<PassSummary> {
    let installations = app.installations().await?;

    let mut summary = PassSummary::default();
    for id in installations {
        info!("updating all repos for installation {}/{id}", app.app_id());

        let client = match app.installation(id).await {
            Ok(client) => client,
            Err(err) => {
                summary.failures += 1;
                warn!("{err:#}");
                continue;
            }
        };

        let runner = Runner::new(client, bot.clone()).dry_run(dry_run);
        match runner.update_installation().await {
            Ok(installation) => summary += installation,
            Err(err) => {
                summary.failures += 1;
                error!("could not update installation {id}: {err:#}");
            }
        }
    }

    info!(
        "sweep done: {} issues, {} actions, {} failures",
        summary.issues, summary.actions, summary.failures
    );
    Ok(summary)
}

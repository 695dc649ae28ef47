use anyhow::{Context, Result};
use async_trait::async_trait;
use jsonwebtoken::EncodingKey;
use octocrab::models::{AppId, InstallationId, IssueState as GithubIssueState};
use octocrab::params::State;
use octocrab::Octocrab;
use serde::Deserialize;

use crate::data::{Comment, Issue, IssueState, Repository};

use super::platform::Platform;

const PER_PAGE: u8 = 100;

/// Client authenticated as the GitHub App itself.
#[derive(Clone)]
pub struct GithubApp {
    app_id: u64,
    octocrab: Octocrab,
}

impl GithubApp {
    pub fn new(app_id: u64, private_key: &[u8]) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(private_key)
            .context("could not read the application private key")?;
        let octocrab = Octocrab::builder()
            .app(AppId(app_id), key)
            .build()
            .context("could not create authenticated application client")?;
        Ok(Self { app_id, octocrab })
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Ids of every installation of the App.
    pub async fn installations(&self) -> Result<Vec<u64>> {
        let first = self
            .octocrab
            .apps()
            .installations()
            .per_page(PER_PAGE)
            .send()
            .await
            .context("could not fetch installations")?;
        let installations = self
            .octocrab
            .all_pages(first)
            .await
            .context("could not fetch installations")?;

        Ok(installations.into_iter().map(|inst| inst.id.0).collect())
    }

    /// A client acting on behalf of one installation.
    pub async fn installation(&self, id: u64) -> Result<GithubClient> {
        let (octocrab, _token) = self
            .octocrab
            .installation_and_token(InstallationId(id))
            .await
            .with_context(|| {
                format!(
                    "could not create authenticated client for installation {}/{}",
                    self.app_id, id
                )
            })?;
        Ok(GithubClient { octocrab })
    }
}

/// Installation-scoped client backing [`Platform`].
#[derive(Clone)]
pub struct GithubClient {
    octocrab: Octocrab,
}

// `GET /installation/repositories` is not wrapped by octocrab
#[derive(Debug, Deserialize)]
struct InstallationRepositories {
    total_count: u64,
    repositories: Vec<InstallationRepository>,
}

#[derive(Debug, Deserialize)]
struct InstallationRepository {
    name: String,
    owner: RepositoryOwner,
}

#[derive(Debug, Deserialize)]
struct RepositoryOwner {
    login: String,
}

#[async_trait]
impl Platform for GithubClient {
    async fn repositories(&self) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            let params: &[(&str, u32)] = &[("per_page", u32::from(PER_PAGE)), ("page", page)];
            let response: InstallationRepositories = self
                .octocrab
                .get("/installation/repositories", Some(params))
                .await
                .context("could not list repositories")?;

            let fetched = response.repositories.len();
            repos.extend(
                response
                    .repositories
                    .into_iter()
                    .map(|r| Repository::new(r.owner.login, r.name)),
            );

            if fetched < usize::from(PER_PAGE) || repos.len() as u64 >= response.total_count {
                break;
            }
            page += 1;
        }

        Ok(repos)
    }

    async fn repo_labels(&self, repo: &Repository) -> Result<Vec<String>> {
        let first = self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .list_labels_for_repo()
            .per_page(PER_PAGE)
            .send()
            .await
            .context("could not list labels")?;
        let labels = self
            .octocrab
            .all_pages(first)
            .await
            .context("could not list labels")?;

        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    async fn open_issues(&self, repo: &Repository) -> Result<Vec<u64>> {
        let first = self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .list()
            .state(State::Open)
            .per_page(PER_PAGE)
            .send()
            .await
            .context("could not list issues")?;
        let issues = self
            .octocrab
            .all_pages(first)
            .await
            .context("could not list issues")?;

        Ok(issues.into_iter().map(|i| i.number).collect())
    }

    async fn issue(&self, repo: &Repository, number: u64) -> Result<Issue> {
        let handler = self.octocrab.issues(&repo.owner, &repo.name);

        let issue = handler
            .get(number)
            .await
            .with_context(|| format!("could not fetch issue {repo}#{number}"))?;

        let first = handler
            .list_comments(number)
            .per_page(PER_PAGE)
            .send()
            .await
            .context("could not fetch comments")?;
        let comments = self
            .octocrab
            .all_pages(first)
            .await
            .context("could not fetch comments")?;

        let state = match issue.state {
            GithubIssueState::Open => IssueState::Open,
            _ => IssueState::Other,
        };

        Ok(Issue {
            repo: repo.clone(),
            number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            author: issue.user.login,
            state,
            comments: comments
                .into_iter()
                .map(|c| Comment {
                    author: c.user.login,
                    body: c.body.unwrap_or_default(),
                    created_at: c.created_at,
                })
                .collect(),
        })
    }

    async fn create_comment(&self, repo: &Repository, number: u64, body: &str) -> Result<()> {
        self.octocrab
            .issues(&repo.owner, &repo.name)
            .create_comment(number, body)
            .await?;
        Ok(())
    }

    async fn remove_label(&self, repo: &Repository, number: u64, label: &str) -> Result<()> {
        self.octocrab
            .issues(&repo.owner, &repo.name)
            .remove_label(number, label)
            .await?;
        Ok(())
    }

    async fn add_label(&self, repo: &Repository, number: u64, label: &str) -> Result<()> {
        self.octocrab
            .issues(&repo.owner, &repo.name)
            .add_labels(number, &[label.to_string()])
            .await?;
        Ok(())
    }
}

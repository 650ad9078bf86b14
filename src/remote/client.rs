use super::normalize::{ApiCommit, ApiRepo};
use crate::config::RemoteSettings;
use crate::error::{PulseError, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Where account history comes from. Implemented over HTTP by
/// [`GitHubClient`]; tests plug in canned data.
pub trait RemoteSource {
    fn list_repos(&self) -> Result<Vec<ApiRepo>>;
    fn repo_commits(&self, owner: &str, repo: &str) -> Result<Vec<ApiCommit>>;
    fn repo_languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>>;
}

pub struct GitHubClient {
    http: Client,
    token: String,
    settings: RemoteSettings,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, settings: RemoteSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            token: token.into(),
            settings,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.url(path);
        log::debug!("GET {url} {query:?}");
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::Api {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json::<T>()?)
    }
}

impl RemoteSource for GitHubClient {
    fn list_repos(&self) -> Result<Vec<ApiRepo>> {
        let per_page = self.settings.per_page;
        let mut repos = Vec::new();

        for page in 1..=self.settings.max_repo_pages {
            let batch: Vec<ApiRepo> = self.get(
                "/user/repos",
                &[
                    ("per_page", per_page.to_string()),
                    ("page", page.to_string()),
                    ("sort", "updated".to_string()),
                ],
            )?;
            let short = batch.len() < per_page as usize;
            repos.extend(batch);
            if short {
                break;
            }
        }

        Ok(repos)
    }

    fn repo_commits(&self, owner: &str, repo: &str) -> Result<Vec<ApiCommit>> {
        let per_page = self.settings.per_page;
        let path = format!("/repos/{owner}/{repo}/commits");
        let mut commits = Vec::new();

        for page in 1..=self.settings.commit_pages {
            let batch: Vec<ApiCommit> = match self.get(
                &path,
                &[("per_page", per_page.to_string()), ("page", page.to_string())],
            ) {
                Ok(batch) => batch,
                Err(e) if e.is_empty_repository() => {
                    log::debug!("{owner}/{repo} has no commits yet");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(e),
            };
            let short = batch.len() < per_page as usize;
            commits.extend(batch);
            if short {
                break;
            }
        }

        Ok(commits)
    }

    fn repo_languages(&self, owner: &str, repo: &str) -> Result<BTreeMap<String, u64>> {
        self.get(&format!("/repos/{owner}/{repo}/languages"), &[])
    }
}

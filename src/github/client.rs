use serde::Deserialize;

use super::url::{raw_url, tree_url, RepoRef};
use super::{GithubError, GithubResult};
use crate::state::data::FileEntry;

/// Body of `GET /repos/:owner/:repo/git/trees/:tree_sha`
#[derive(Deserialize, Debug)]
pub(crate) struct TreeResponse {
    pub tree: Vec<FileEntry>,
    /// Set by GitHub when the listing exceeded its size limit
    #[serde(default)]
    pub truncated: bool,
}

/// Thin async wrapper over the GitHub REST API and raw file host.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClient {
    /// Build a client talking to `api_base` (e.g. `https://api.github.com`)
    pub fn new(api_base: impl Into<String>) -> GithubResult<Self> {
        // GitHub rejects API calls without a user agent
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("texture-viewer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GithubError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }

    /// Fetch the full recursive file listing of the repository
    pub async fn fetch_tree(&self, repo: &RepoRef) -> GithubResult<Vec<FileEntry>> {
        let url = tree_url(&self.api_base, repo)?;
        log::info!("🔍 Reading tree: {}", url);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GithubError::Status(response.status().as_u16()));
        }

        let body: TreeResponse = response.json().await?;
        if body.truncated {
            log::warn!("⚠️  Tree listing of {} was truncated by the API", repo);
        }

        log::info!("✅ {} entries in {}", body.tree.len(), repo);
        Ok(body.tree)
    }

    /// Download the raw bytes of one file of the repository
    pub async fn fetch_raw(&self, repo: &RepoRef, path: &str) -> GithubResult<Vec<u8>> {
        let url = raw_url(repo, path)?;
        log::debug!("Downloading {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GithubError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

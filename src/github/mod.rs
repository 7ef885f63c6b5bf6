//! GitHub access: repository URL parsing, URL templates and the HTTP client.

pub mod client;
pub mod url;

pub use client::GithubClient;
pub use url::RepoRef;

use thiserror::Error;

/// Errors raised while locating or reading a repository.
///
/// Payloads are plain strings so the error can travel inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GithubError {
    /// The settings hold a URL that does not name a repository
    #[error("Repository URL is incorrect: {0:?}. Correct format: https://github.com/Gethe/wow-ui-textures/")]
    InvalidRepoUrl(String),
    /// A URL template references a parameter nobody supplied
    #[error("URL template parameter `{0}` has no value")]
    MissingParameter(String),
    /// Connection, TLS or body transfer failure
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status
    #[error("HTTP status: {0}")]
    Status(u16),
    /// The response body is not what was expected
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GithubError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            GithubError::Status(status.as_u16())
        } else {
            GithubError::Transport(e.to_string())
        }
    }
}

pub type GithubResult<T> = Result<T, GithubError>;

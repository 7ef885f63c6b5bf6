use std::collections::HashMap;
use std::fmt;

use super::GithubError;

/// Tree-ish every listing and raw download is read from
pub const TREE_SHA: &str = "live";

const TREE_PATH: &str = "/repos/:owner/:repo/git/trees/:tree_sha?recursive=1";
const RAW_BASE: &str = "https://raw.githubusercontent.com/:owner/:repo/:tree_sha";

/// Owner and name of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    /// Parse a repository page URL of the form `http(s)://host/<owner>/<repo>/...`.
    ///
    /// The repository segment must be followed by a `/`, so
    /// `https://github.com/Gethe/wow-ui-textures/` is accepted while
    /// `https://github.com/Gethe/wow-ui-textures` is not.
    pub fn parse(url: &str) -> Result<Self, GithubError> {
        let invalid = || GithubError::InvalidRepoUrl(url.to_string());

        let url = url.trim();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(invalid)?;

        let mut segments = rest.splitn(4, '/');
        let host = segments.next().filter(|s| !s.is_empty());
        let owner = segments.next().filter(|s| !s.is_empty());
        let repo = segments.next().filter(|s| !s.is_empty());
        // The fourth piece only exists when a slash follows the repository
        let tail = segments.next();

        match (host, owner, repo, tail) {
            (Some(_), Some(owner), Some(repo), Some(_)) => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(invalid()),
        }
    }

    /// Template parameters describing this repository
    pub fn params(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("owner", self.owner.clone()),
            ("repo", self.repo.clone()),
            ("tree_sha", TREE_SHA.to_string()),
        ])
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A URL with `:name` placeholders.
///
/// A placeholder is a `:` followed by one or more ASCII letters or
/// underscores; any other `:` (such as the one in `https://`) is literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlTemplate<'a> {
    template: &'a str,
}

impl<'a> UrlTemplate<'a> {
    pub const fn new(template: &'a str) -> Self {
        Self { template }
    }

    /// Substitute every placeholder. Fails on the first one without a value.
    pub fn render<V: AsRef<str>>(&self, params: &HashMap<&str, V>) -> Result<String, GithubError> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(idx) = rest.find(':') {
            out.push_str(&rest[..idx]);
            let after = &rest[idx + 1..];
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
                .unwrap_or(after.len());

            if name_len == 0 {
                out.push(':');
                rest = after;
                continue;
            }

            let name = &after[..name_len];
            let value = params
                .get(name)
                .ok_or_else(|| GithubError::MissingParameter(name.to_string()))?;
            out.push_str(value.as_ref());
            rest = &after[name_len..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// API URL of the recursive tree listing
pub fn tree_url(api_base: &str, repo: &RepoRef) -> Result<String, GithubError> {
    let path = UrlTemplate::new(TREE_PATH).render(&repo.params())?;
    Ok(format!("{}{}", api_base.trim_end_matches('/'), path))
}

/// Download URL of a single file of the repository
///
/// Each segment of `path` is percent-encoded, so names containing
/// `#`, `?`, `%` or spaces still address the right file.
pub fn raw_url(repo: &RepoRef, path: &str) -> Result<String, GithubError> {
    let base = UrlTemplate::new(RAW_BASE).render(&repo.params())?;
    let mut url = reqwest::Url::parse(&base).map_err(|e| GithubError::Parse(e.to_string()))?;

    url.path_segments_mut()
        .map_err(|()| GithubError::Parse(format!("{base} cannot take a path")))?
        .extend(path.split('/'));

    Ok(url.into())
}

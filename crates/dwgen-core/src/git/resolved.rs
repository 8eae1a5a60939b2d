//! Resolved repository addressing.

use std::fmt;

/// Branch token used when a URL does not name a branch.
pub const DEFAULT_BRANCH: &str = "HEAD";

/// Hosting provider a URL was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitProvider {
    /// Generic HTTP(S) repository
    Plain,
    GitHub,
    /// Bitbucket Cloud
    Bitbucket,
    /// Self-hosted Bitbucket Server / Data Center
    BitbucketServer,
}

impl fmt::Display for GitProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GitProvider::Plain => "plain",
            GitProvider::GitHub => "github",
            GitProvider::Bitbucket => "bitbucket",
            GitProvider::BitbucketServer => "bitbucket-server",
        };
        f.write_str(name)
    }
}

/// Normalized addressing facts for a repository at a branch.
///
/// Instances are only produced by provider resolvers, which derive the clone
/// URL and the raw-content location from one host/owner/repo/branch tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGitUrl {
    provider: GitProvider,
    host: String,
    owner: String,
    repo_name: String,
    branch: Option<String>,
    clone_url: String,
    content_prefix: String,
    content_query: Option<String>,
}

/// Provider-specific pieces used to assemble a [`ResolvedGitUrl`].
#[derive(Debug, Clone)]
pub(crate) struct UrlParts {
    pub provider: GitProvider,
    pub host: String,
    pub owner: String,
    pub repo_name: String,
    pub branch: Option<String>,
    pub clone_url: String,
    /// Everything before the relative path in a raw-content URL
    pub content_prefix: String,
    /// Query string (without `?`) appended after the relative path
    pub content_query: Option<String>,
}

impl ResolvedGitUrl {
    pub(crate) fn from_parts(parts: UrlParts) -> Self {
        Self {
            provider: parts.provider,
            host: parts.host,
            owner: parts.owner,
            repo_name: parts.repo_name,
            branch: parts.branch,
            clone_url: parts.clone_url,
            content_prefix: parts.content_prefix.trim_end_matches('/').to_string(),
            content_query: parts.content_query,
        }
    }

    pub fn provider(&self) -> GitProvider {
        self.provider
    }

    /// Host (with port, if any) the repository lives on.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Owner, workspace or project key of the repository.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// Branch named by the URL, if any.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Branch named by the URL, or [`DEFAULT_BRANCH`].
    pub fn branch_name(&self) -> &str {
        self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }

    /// HTTPS clone endpoint, without credentials.
    pub fn clone_url(&self) -> &str {
        &self.clone_url
    }

    /// Raw-content URL for a path relative to the repository root.
    pub fn content_url(&self, relative_path: &str) -> String {
        let path = relative_path.trim_start_matches("./").trim_start_matches('/');
        match &self.content_query {
            Some(query) => format!("{}/{}?{}", self.content_prefix, path, query),
            None => format!("{}/{}", self.content_prefix, path),
        }
    }
}

impl fmt::Display for ResolvedGitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}@{})", self.clone_url, self.provider, self.branch_name())
    }
}

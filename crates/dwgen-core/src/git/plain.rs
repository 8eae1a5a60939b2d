//! Generic HTTP(S) repositories.

use url::Url;

use crate::error::{Error, Result};

use super::resolved::{GitProvider, ResolvedGitUrl, UrlParts};
use super::resolver::{ProviderResolver, host_with_port, path_segments, strip_git_suffix};

/// Fallback for hosts without a dedicated provider.
///
/// The URL path is the repository: the clone URL always ends in `.git` and
/// content is looked up relative to the path without it.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainResolver;

impl ProviderResolver for PlainResolver {
    fn provider(&self) -> GitProvider {
        GitProvider::Plain
    }

    fn is_valid(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    fn resolve(&self, url: &Url) -> Result<ResolvedGitUrl> {
        let host = host_with_port(url);
        if host.is_empty() {
            return Err(Error::UnsupportedUrl(url.to_string()));
        }

        let segments = path_segments(url);
        let (repo_name, owner) = match segments.split_last() {
            Some((last, rest)) => (strip_git_suffix(last).to_string(), rest.join("/")),
            None => (host.clone(), String::new()),
        };

        let joined = segments.join("/");
        let path = strip_git_suffix(&joined);
        let base = format!("{}://{}", url.scheme(), host);
        let (clone_url, content_prefix) = if path.is_empty() {
            (base.clone(), base)
        } else {
            (format!("{}/{}.git", base, path), format!("{}/{}", base, path))
        };

        Ok(ResolvedGitUrl::from_parts(UrlParts {
            provider: GitProvider::Plain,
            host,
            owner,
            repo_name,
            branch: None,
            clone_url,
            content_prefix,
            content_query: None,
        }))
    }
}

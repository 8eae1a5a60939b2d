//! Bitbucket Cloud repository URLs.

use url::Url;

use crate::error::{Error, Result};

use super::DEFAULT_BRANCH;
use super::resolved::{GitProvider, ResolvedGitUrl, UrlParts};
use super::resolver::{ProviderResolver, path_segments, strip_git_suffix};

const BITBUCKET_HOST: &str = "bitbucket.org";
const API_HOST: &str = "api.bitbucket.org";

/// Resolves Bitbucket Cloud URLs.
///
/// Raw content is read through the 2.0 REST `src` endpoint, which serves
/// file bodies for `/{workspace}/{repo}/src/{ref}/{path}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitbucketResolver;

impl ProviderResolver for BitbucketResolver {
    fn provider(&self) -> GitProvider {
        GitProvider::Bitbucket
    }

    fn is_valid(&self, url: &Url) -> bool {
        matches!(
            url.host_str(),
            Some("bitbucket.org") | Some("www.bitbucket.org") | Some(API_HOST)
        )
    }

    fn resolve(&self, url: &Url) -> Result<ResolvedGitUrl> {
        let segments = path_segments(url);

        let (workspace, repo, rest) = if url.host_str() == Some(API_HOST) {
            // /2.0/repositories/{workspace}/{repo}/src/{ref}/{path}
            match segments.as_slice() {
                [_, "repositories", workspace, repo, rest @ ..] => (*workspace, *repo, rest),
                _ => return Err(Error::UnsupportedUrl(url.to_string())),
            }
        } else {
            match segments.as_slice() {
                [workspace, repo, rest @ ..] => (*workspace, *repo, rest),
                _ => return Err(Error::UnsupportedUrl(url.to_string())),
            }
        };

        let branch = match rest {
            ["src" | "branch" | "raw", branch, ..] => Some(*branch),
            _ => None,
        };

        Ok(Self::build(workspace, strip_git_suffix(repo), branch))
    }
}

impl BitbucketResolver {
    fn build(workspace: &str, repo: &str, branch: Option<&str>) -> ResolvedGitUrl {
        let branch = branch.map(str::to_string);
        let content_ref = branch.as_deref().unwrap_or(DEFAULT_BRANCH);

        ResolvedGitUrl::from_parts(UrlParts {
            provider: GitProvider::Bitbucket,
            host: BITBUCKET_HOST.to_string(),
            owner: workspace.to_string(),
            repo_name: repo.to_string(),
            clone_url: format!("https://{}/{}/{}.git", BITBUCKET_HOST, workspace, repo),
            content_prefix: format!(
                "https://{}/2.0/repositories/{}/{}/src/{}",
                API_HOST, workspace, repo, content_ref
            ),
            content_query: None,
            branch,
        })
    }
}

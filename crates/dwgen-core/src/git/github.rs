//! GitHub repository URLs.

use url::Url;

use crate::error::{Error, Result};

use super::resolved::{GitProvider, ResolvedGitUrl, UrlParts};
use super::resolver::{ProviderResolver, path_segments, strip_git_suffix};

const GITHUB_HOST: &str = "github.com";
const RAW_HOST: &str = "raw.githubusercontent.com";

/// Resolves `github.com` browsing URLs and `raw.githubusercontent.com` content URLs.
///
/// Supported shapes:
/// - `https://github.com/owner/repo[.git][/]`
/// - `https://github.com/owner/repo/tree/branch[/path]`
/// - `https://github.com/owner/repo/blob/branch/path`
/// - `https://raw.githubusercontent.com/owner/repo/[refs/heads/]branch/path`
#[derive(Debug, Default, Clone, Copy)]
pub struct GithubResolver;

impl ProviderResolver for GithubResolver {
    fn provider(&self) -> GitProvider {
        GitProvider::GitHub
    }

    fn is_valid(&self, url: &Url) -> bool {
        matches!(
            url.host_str(),
            Some("github.com") | Some("www.github.com") | Some(RAW_HOST)
        )
    }

    fn resolve(&self, url: &Url) -> Result<ResolvedGitUrl> {
        let segments = path_segments(url);
        if segments.len() < 2 {
            return Err(Error::UnsupportedUrl(url.to_string()));
        }
        let owner = segments[0];
        let repo = strip_git_suffix(segments[1]);

        let branch = if url.host_str() == Some(RAW_HOST) {
            match segments.get(2..) {
                Some(["refs", "heads", branch, ..]) => Some(*branch),
                Some([branch, ..]) => Some(*branch),
                _ => None,
            }
        } else {
            match segments.get(2..) {
                Some(["tree" | "blob", branch, ..]) => Some(*branch),
                _ => None,
            }
        };

        Ok(Self::build(owner, repo, branch))
    }
}

impl GithubResolver {
    fn build(owner: &str, repo: &str, branch: Option<&str>) -> ResolvedGitUrl {
        let branch = branch.map(str::to_string);
        let content_ref = branch.as_deref().unwrap_or(super::DEFAULT_BRANCH);

        ResolvedGitUrl::from_parts(UrlParts {
            provider: GitProvider::GitHub,
            host: GITHUB_HOST.to_string(),
            owner: owner.to_string(),
            repo_name: repo.to_string(),
            clone_url: format!("https://{}/{}/{}.git", GITHUB_HOST, owner, repo),
            content_prefix: format!("https://{}/{}/{}/{}", RAW_HOST, owner, repo, content_ref),
            content_query: None,
            branch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> ResolvedGitUrl {
        GithubResolver.resolve(&Url::parse(raw).unwrap()).unwrap()
    }

    #[test]
    fn repository_root() {
        let url = resolve("https://github.com/eclipse-che/che-dashboard");
        assert_eq!(url.owner(), "eclipse-che");
        assert_eq!(url.repo_name(), "che-dashboard");
        assert_eq!(url.branch(), None);
        assert_eq!(url.branch_name(), "HEAD");
        assert_eq!(url.clone_url(), "https://github.com/eclipse-che/che-dashboard.git");
        assert_eq!(
            url.content_url("devfile.yaml"),
            "https://raw.githubusercontent.com/eclipse-che/che-dashboard/HEAD/devfile.yaml"
        );
    }

    #[test]
    fn tree_url_with_subfolder_keeps_branch_only() {
        let url = resolve("https://github.com/o/r/tree/7.x/plugins/editor");
        assert_eq!(url.branch(), Some("7.x"));
        assert_eq!(
            url.content_url("devfile.yaml"),
            "https://raw.githubusercontent.com/o/r/7.x/devfile.yaml"
        );
    }

    #[test]
    fn blob_url() {
        let url = resolve("https://github.com/o/r/blob/main/devfile.yaml");
        assert_eq!(url.branch(), Some("main"));
        assert_eq!(url.repo_name(), "r");
    }

    #[test]
    fn raw_content_url() {
        let url = resolve("https://raw.githubusercontent.com/o/r/main/.devfile.yaml");
        assert_eq!(url.branch(), Some("main"));
        assert_eq!(url.clone_url(), "https://github.com/o/r.git");

        let url = resolve("https://raw.githubusercontent.com/o/r/refs/heads/dev/devfile.yaml");
        assert_eq!(url.branch(), Some("dev"));
    }

    #[test]
    fn owner_only_is_rejected() {
        let result = GithubResolver.resolve(&Url::parse("https://github.com/eclipse-che").unwrap());
        assert!(matches!(result, Err(Error::UnsupportedUrl(_))));
    }
}

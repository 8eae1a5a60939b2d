//! Bitbucket Server (Data Center) repository URLs.
//!
//! Self-hosted instances can live on any host and under any context path, so
//! they are recognized by path shape alone:
//! - `<ctx>/scm/<PROJECT>/<repo>[.git]` and `<ctx>/scm/~<user>/<repo>[.git]`
//! - `<ctx>/projects/<PROJECT>/repos/<repo>[/browse[/…]][?at=…]`
//! - `<ctx>/users/<user>/repos/<repo>[/browse[/…]][?at=…]`
//! - `<ctx>/rest/api/<version>/(projects|users)/<owner>/repos/<repo>/raw/…[?at=…]`

use url::{Url, form_urlencoded};

use crate::error::{Error, Result};

use super::resolved::{GitProvider, ResolvedGitUrl, UrlParts};
use super::resolver::{ProviderResolver, host_with_port, path_segments, strip_git_suffix};

const HEADS_PREFIX: &str = "refs/heads/";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Owner {
    Project(String),
    User(String),
}

impl Owner {
    /// Owner segment in `/scm/` clone paths.
    fn scm_path(&self) -> String {
        match self {
            Owner::Project(key) => key.clone(),
            Owner::User(name) => format!("~{}", name),
        }
    }

    /// Owner segment in REST API paths.
    fn rest_path(&self) -> String {
        match self {
            Owner::Project(key) => format!("projects/{}", key),
            Owner::User(name) => format!("users/{}", name),
        }
    }

    fn name(&self) -> &str {
        match self {
            Owner::Project(key) => key,
            Owner::User(name) => name,
        }
    }
}

/// Repository coordinates found in a Bitbucket Server path.
#[derive(Debug)]
struct Coordinates {
    context: String,
    owner: Owner,
    repo: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BitbucketServerResolver;

impl ProviderResolver for BitbucketServerResolver {
    fn provider(&self) -> GitProvider {
        GitProvider::BitbucketServer
    }

    fn is_valid(&self, url: &Url) -> bool {
        find_coordinates(&path_segments(url)).is_some()
    }

    fn resolve(&self, url: &Url) -> Result<ResolvedGitUrl> {
        let coordinates = find_coordinates(&path_segments(url))
            .ok_or_else(|| Error::UnsupportedUrl(url.to_string()))?;

        let branch = url
            .query_pairs()
            .find(|(key, _)| key == "at")
            .map(|(_, value)| {
                value
                    .strip_prefix(HEADS_PREFIX)
                    .unwrap_or(&value)
                    .to_string()
            })
            .filter(|branch| !branch.is_empty());

        let host = host_with_port(url);
        let base = format!("https://{}{}", host, coordinates.context);

        Ok(ResolvedGitUrl::from_parts(UrlParts {
            provider: GitProvider::BitbucketServer,
            owner: coordinates.owner.name().to_string(),
            repo_name: coordinates.repo.clone(),
            clone_url: format!(
                "{}/scm/{}/{}.git",
                base,
                coordinates.owner.scm_path(),
                coordinates.repo
            ),
            content_prefix: format!(
                "{}/rest/api/1.0/{}/repos/{}/raw",
                base,
                coordinates.owner.rest_path(),
                coordinates.repo
            ),
            content_query: branch.as_deref().map(at_query),
            host,
            branch,
        }))
    }
}

/// `at=<branch>`, percent-encoded.
fn at_query(branch: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("at", branch)
        .finish()
}

/// Scan path segments for the first recognizable repository shape.
///
/// Segments before the match form the context path of the installation.
fn find_coordinates(segments: &[&str]) -> Option<Coordinates> {
    (0..segments.len()).find_map(|start| {
        let (owner, repo) = match &segments[start..] {
            ["scm", owner, repo] => {
                let repo = strip_git_suffix(repo);
                match owner.strip_prefix('~') {
                    Some(user) => (Owner::User(user.to_string()), repo),
                    None => (Owner::Project(owner.to_string()), repo),
                }
            }
            ["projects", key, "repos", repo, ..] => (Owner::Project(key.to_string()), *repo),
            ["users", user, "repos", repo, ..] => (Owner::User(user.to_string()), *repo),
            ["rest", "api", _, "projects", key, "repos", repo, ..] => {
                (Owner::Project(key.to_string()), *repo)
            }
            ["rest", "api", _, "users", user, "repos", repo, ..] => {
                (Owner::User(user.to_string()), *repo)
            }
            _ => return None,
        };

        let context = segments[..start]
            .iter()
            .map(|segment| format!("/{}", segment))
            .collect::<String>();

        Some(Coordinates {
            context,
            owner,
            repo: repo.to_string(),
        })
    })
}

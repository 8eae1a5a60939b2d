//! Repository URL resolution across hosting providers.
//!
//! This module turns an arbitrary repository URL into a [`ResolvedGitUrl`]:
//! - GitHub (`github.com`, `raw.githubusercontent.com`)
//! - Bitbucket Cloud (`bitbucket.org`, `api.bitbucket.org`)
//! - Bitbucket Server (recognized by its `/scm/`, `/projects/…/repos/…` path shapes)
//! - any other HTTP(S) URL as a plain repository

mod bitbucket;
mod bitbucket_server;
mod github;
mod plain;
mod resolver;
mod resolved;

pub use bitbucket::BitbucketResolver;
pub use bitbucket_server::BitbucketServerResolver;
pub use github::GithubResolver;
pub use plain::PlainResolver;
pub use resolver::{GitUrlResolver, ProviderResolver};
pub use resolved::{DEFAULT_BRANCH, GitProvider, ResolvedGitUrl};

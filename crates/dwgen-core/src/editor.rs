//! Editor devfile retrieval.

use std::sync::Arc;

use serde_yaml::Value;
use tracing::debug;

use crate::devfile::parse_yaml;
use crate::error::Result;
use crate::fetch::UrlFetcher;

/// Loads editor definitions published at a URL.
#[derive(Clone)]
pub struct EditorResolver {
    fetcher: Arc<dyn UrlFetcher>,
}

impl EditorResolver {
    pub fn new(fetcher: Arc<dyn UrlFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch the editor devfile at `url` and parse it.
    pub async fn load_editor(&self, url: &str) -> Result<Value> {
        debug!("Loading editor from {}", url);
        let content = self.fetcher.fetch_text(url).await?;
        parse_yaml(&content, "editor devfile")
    }
}

impl std::fmt::Debug for EditorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;

    struct StaticFetcher(&'static str);

    #[async_trait]
    impl UrlFetcher for StaticFetcher {
        async fn fetch_text(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }

        async fn fetch_text_optional(&self, _url: &str) -> Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    #[tokio::test]
    async fn test_load_editor_parses_yaml() {
        let resolver = EditorResolver::new(Arc::new(StaticFetcher(
            "schemaVersion: 2.2.0\nmetadata:\n  name: che-code\n",
        )));
        let editor = resolver.load_editor("https://example.com/editor.yaml").await.unwrap();
        assert_eq!(editor["metadata"]["name"].as_str(), Some("che-code"));
    }

    #[tokio::test]
    async fn test_load_editor_rejects_malformed_yaml() {
        let resolver = EditorResolver::new(Arc::new(StaticFetcher("metadata: [unclosed")));
        let result = resolver.load_editor("https://example.com/editor.yaml").await;
        assert!(matches!(result, Err(Error::Yaml { .. })));
    }
}

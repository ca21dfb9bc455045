use super::{Comment, Post, PostSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::sync::OnceCell;

/// Posts and comments read from a JSON file instead of the network.
///
/// The file holds `{"posts": [...], "comments": [...]}`; either list may be
/// omitted. Authors are still resolved over HTTP. The file is read once;
/// posts and comments always come from the same contents.
pub struct LocalData {
    path: PathBuf,
    contents: OnceCell<LocalFile>,
}

#[derive(Debug, Default, Deserialize)]
struct LocalFile {
    #[serde(default)]
    posts: Vec<Post>,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl LocalData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: OnceCell::new(),
        }
    }

    async fn load(&self) -> Result<&LocalFile> {
        self.contents
            .get_or_try_init(|| async {
                let raw = tokio::fs::read_to_string(&self.path)
                    .await
                    .with_context(|| format!("failed to read {}", self.path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse {}", self.path.display()))
            })
            .await
    }
}

#[async_trait]
impl PostSource for LocalData {
    async fn posts(&self) -> Result<Vec<Post>> {
        Ok(self.load().await?.posts.clone())
    }

    async fn comments(&self) -> Result<Vec<Comment>> {
        Ok(self.load().await?.comments.clone())
    }
}

use super::{Author, AuthorSource, Post, PostSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9999";

pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApi {
    /// Builds a client for `base_url`. With no timeout a hung connection
    /// hangs the whole batch.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent("post-enricher/0.1");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn posts_url(&self) -> String {
        format!("{}/api/posts", self.base_url)
    }

    fn author_url(&self, id: i64) -> String {
        format!("{}/api/authors/{}", self.base_url, id)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        debug!(%url, %status, "response received");
        if !status.is_success() {
            return Err(anyhow::anyhow!("{} returned HTTP {}", url, status));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("malformed response body from {}", url))
    }
}

#[async_trait]
impl PostSource for HttpApi {
    async fn posts(&self) -> Result<Vec<Post>> {
        self.get_json(&self.posts_url()).await
    }
}

#[async_trait]
impl AuthorSource for HttpApi {
    async fn author(&self, id: i64) -> Result<Author> {
        self.get_json(&self.author_url(id)).await
    }
}

pub mod http;
pub mod local;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub published: i64,
    pub liked_by_me: bool,
    #[serde(default)]
    pub likes: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentWithAuthor>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub published: i64,
    pub liked_by_me: bool,
    #[serde(default)]
    pub likes: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub description: String,
    #[serde(rename = "type")]
    pub attachment_type: AttachmentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentType {
    Image,
    Video,
}

impl AttachmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentType::Image => "IMAGE",
            AttachmentType::Video => "VIDEO",
        }
    }
}

/// A comment paired with its resolved author, `None` when the lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

/// Where the base posts (and optionally their comments) come from.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn posts(&self) -> Result<Vec<Post>>;

    async fn comments(&self) -> Result<Vec<Comment>> {
        Ok(Vec::new())
    }
}

/// Resolves a single author profile by id.
#[async_trait]
pub trait AuthorSource: Send + Sync {
    async fn author(&self, id: i64) -> Result<Author>;
}

use crate::api::{Attachment, Author, CommentWithAuthor, Post};
use crate::config::OutputFormat;
use anyhow::Result;
use chrono::DateTime;

pub fn render(posts: &[Post], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(posts)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(posts)?),
    }
}

/// One line per post, followed by one indented line per comment.
pub fn render_text(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "No posts.".to_string();
    }

    let mut lines = Vec::new();
    for post in posts {
        lines.push(post_line(post));
        for comment in post.comments.iter().flatten() {
            lines.push(format!("  {}", comment_line(comment)));
        }
    }
    lines.join("\n")
}

fn post_line(post: &Post) -> String {
    let mut line = format!(
        "Post {}: {} | author: {} | {} | likes: {}",
        post.id,
        single_line(&post.content),
        author_label(post.author.as_ref()),
        format_published(post.published),
        post.likes
    );
    if post.liked_by_me {
        line.push_str(" [liked]");
    }
    if let Some(attachment) = &post.attachment {
        line.push_str(&attachment_label(attachment));
    }
    line
}

fn comment_line(entry: &CommentWithAuthor) -> String {
    let comment = &entry.comment;
    let mut line = format!(
        "Comment {}: {} | author: {} | {} | likes: {}",
        comment.id,
        single_line(&comment.content),
        author_label(entry.author.as_ref()),
        format_published(comment.published),
        comment.likes
    );
    if comment.liked_by_me {
        line.push_str(" [liked]");
    }
    line
}

/// Escapes line breaks so each post or comment stays on one output line.
fn single_line(content: &str) -> String {
    content.replace('\r', "\\r").replace('\n', "\\n")
}

fn author_label(author: Option<&Author>) -> String {
    match author {
        Some(author) => format!("{} ({})", author.name, author.avatar),
        None => "unknown".to_string(),
    }
}

fn attachment_label(attachment: &Attachment) -> String {
    format!(
        " | {}: {}",
        attachment.attachment_type.as_str(),
        attachment.url
    )
}

/// Seconds since the epoch as UTC, or the raw number when out of range.
fn format_published(published: i64) -> String {
    match DateTime::from_timestamp(published, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => published.to_string(),
    }
}

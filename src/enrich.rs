//! Joins posts and comments with their authors.
//!
//! Every lookup in a batch is issued at once and the batch resolves when the
//! slowest one does. A failed lookup becomes `None` for that item only; a
//! failed posts or comments request becomes an empty list.

use crate::api::{Author, AuthorSource, Comment, CommentWithAuthor, Post, PostSource};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub async fn fetch_posts<S: PostSource + ?Sized>(source: &S) -> Vec<Post> {
    info!("requesting posts");
    match source.posts().await {
        Ok(posts) => {
            info!(count = posts.len(), "posts received");
            posts
        }
        Err(e) => {
            warn!("failed to fetch posts: {:#}", e);
            Vec::new()
        }
    }
}

pub async fn fetch_comments<S: PostSource + ?Sized>(source: &S) -> Vec<Comment> {
    match source.comments().await {
        Ok(comments) => {
            debug!(count = comments.len(), "comments received");
            comments
        }
        Err(e) => {
            warn!("failed to fetch comments: {:#}", e);
            Vec::new()
        }
    }
}

pub async fn fetch_author<A: AuthorSource + ?Sized>(authors: &A, id: i64) -> Option<Author> {
    debug!(author_id = id, "requesting author");
    match authors.author(id).await {
        Ok(author) => Some(author),
        Err(e) => {
            warn!(author_id = id, "failed to fetch author: {:#}", e);
            None
        }
    }
}

/// Returns a copy of each post with its author attached, in input order.
pub async fn enrich_posts<A: AuthorSource + ?Sized>(authors: &A, posts: &[Post]) -> Vec<Post> {
    join_all(posts.iter().map(|post| async move {
        let author = fetch_author(authors, post.author_id).await;
        Post {
            author,
            ..post.clone()
        }
    }))
    .await
}

pub async fn enrich_comments<A: AuthorSource + ?Sized>(
    authors: &A,
    comments: &[Comment],
) -> Vec<CommentWithAuthor> {
    join_all(comments.iter().map(|comment| async move {
        CommentWithAuthor {
            comment: comment.clone(),
            author: fetch_author(authors, comment.author_id).await,
        }
    }))
    .await
}

/// Groups comments by `post_id`, keeping their original relative order.
pub fn group_comments_by_post(comments: Vec<Comment>) -> HashMap<i64, Vec<Comment>> {
    let mut groups: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in comments {
        groups.entry(comment.post_id).or_default().push(comment);
    }
    groups
}

/// Enriches posts with their authors and attaches each post's comments,
/// themselves enriched. Post and comment lookups share one join.
pub async fn enrich_posts_with_comments<A: AuthorSource + ?Sized>(
    authors: &A,
    posts: &[Post],
    comments_by_post: &HashMap<i64, Vec<Comment>>,
) -> Vec<Post> {
    let comment_batches = join_all(posts.iter().map(|post| async move {
        match comments_by_post.get(&post.id) {
            Some(comments) => Some(enrich_comments(authors, comments).await),
            None => None,
        }
    }));

    let (enriched, comments) =
        futures::join!(enrich_posts(authors, posts), comment_batches);

    enriched
        .into_iter()
        .zip(comments)
        .map(|(mut post, comments)| {
            post.comments = comments;
            post
        })
        .collect()
}

/// Fetches posts and comments from `source` and enriches them from `authors`.
/// No author lookups are made when there are no posts.
pub async fn run<S, A>(source: &S, authors: &A) -> Vec<Post>
where
    S: PostSource + ?Sized,
    A: AuthorSource + ?Sized,
{
    let posts = fetch_posts(source).await;
    if posts.is_empty() {
        info!("no posts to enrich");
        return Vec::new();
    }

    let comments_by_post = group_comments_by_post(fetch_comments(source).await);
    enrich_posts_with_comments(authors, &posts, &comments_by_post).await
}

//! Port abstraction for post persistence adapters and their errors.
//!
//! The repository owns every interaction with the `posts` table. Each call is
//! a single statement with no surrounding transaction and no retry; failures
//! propagate immediately.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Error, Post, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// No row exists for the requested identifier. The message matches
        /// Diesel's own text for an empty result.
        NotFound { id: PostId } => "Record not found",
        /// Repository connection could not be established.
        Connection { message: String } => "{message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "{message}",
    }
}

impl From<PostRepositoryError> for Error {
    fn from(error: PostRepositoryError) -> Self {
        match error {
            PostRepositoryError::NotFound { .. } => Error::not_found(error.to_string()),
            PostRepositoryError::Connection { message } | PostRepositoryError::Query { message } => {
                Error::storage_failure(message)
            }
        }
    }
}

/// Port for post storage and retrieval.
///
/// `update` and `delete` are permissive: neither checks how many rows the
/// statement touched. Updating a row that vanished returns the edited post
/// without any stored counterpart, and deleting a missing row succeeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and return it with the identifier issued by the store.
    async fn create(&self, body: &str) -> Result<Post, PostRepositoryError>;

    /// Fetch a post by identifier.
    ///
    /// Returns [`PostRepositoryError::NotFound`] when no row matches.
    async fn get(&self, id: PostId) -> Result<Post, PostRepositoryError>;

    /// Overwrite the body of `existing` and return the edited post.
    async fn update(&self, existing: Post, body: &str) -> Result<Post, PostRepositoryError>;

    /// Remove the row for `post`.
    async fn delete(&self, post: &Post) -> Result<(), PostRepositoryError>;
}

#[derive(Debug, Default)]
struct InMemoryPosts {
    last_id: i32,
    rows: BTreeMap<PostId, String>,
}

/// Process-local repository keeping posts in a map.
///
/// Identifiers start at 1 and are never reused, mirroring a database
/// sequence. Intended for tests and local experiments.
///
/// # Examples
/// ```
/// use backend::domain::ports::{InMemoryPostRepository, PostRepository};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = InMemoryPostRepository::new();
/// let post = repo.create("Hello, world!").await.expect("create");
/// assert_eq!(repo.get(post.id()).await.expect("get"), post);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<InMemoryPosts>,
}

impl InMemoryPostRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_posts<T>(
        &self,
        f: impl FnOnce(&mut InMemoryPosts) -> Result<T, PostRepositoryError>,
    ) -> Result<T, PostRepositoryError> {
        let mut guard = self
            .posts
            .lock()
            .map_err(|_| PostRepositoryError::connection("in-memory post store lock poisoned"))?;
        f(&mut guard)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, body: &str) -> Result<Post, PostRepositoryError> {
        self.with_posts(|posts| {
            let next = posts
                .last_id
                .checked_add(1)
                .ok_or_else(|| PostRepositoryError::query("post id sequence exhausted"))?;
            posts.last_id = next;
            let id = PostId::new(next);
            posts.rows.insert(id, body.to_owned());
            Ok(Post::new(id, body))
        })
    }

    async fn get(&self, id: PostId) -> Result<Post, PostRepositoryError> {
        self.with_posts(|posts| {
            posts
                .rows
                .get(&id)
                .map(|body| Post::new(id, body.as_str()))
                .ok_or_else(|| PostRepositoryError::not_found(id))
        })
    }

    async fn update(&self, existing: Post, body: &str) -> Result<Post, PostRepositoryError> {
        self.with_posts(|posts| {
            if let Some(stored) = posts.rows.get_mut(&existing.id()) {
                body.clone_into(stored);
            }
            Ok(existing.with_body(body))
        })
    }

    async fn delete(&self, post: &Post) -> Result<(), PostRepositoryError> {
        self.with_posts(|posts| {
            posts.rows.remove(&post.id());
            Ok(())
        })
    }
}

//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Each operation checks out a pooled connection and runs exactly one
//! statement. Driver messages are passed through unchanged so clients see the
//! same text the database reported.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{Post, PostId};

use super::models::{NewPostRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    PostRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            PostRepositoryError::connection(info.message())
        }
        other => PostRepositoryError::query(other.to_string()),
    }
}

fn map_lookup_error(id: PostId, error: diesel::result::Error) -> PostRepositoryError {
    match error {
        diesel::result::Error::NotFound => PostRepositoryError::not_found(id),
        other => map_diesel_error(other),
    }
}

fn row_to_post(row: PostRow) -> Post {
    Post::new(PostId::new(row.id), row.body)
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, body: &str) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id: i32 = diesel::insert_into(posts::table)
            .values(&NewPostRow { body })
            .returning(posts::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Post::new(PostId::new(id), body))
    }

    async fn get(&self, id: PostId) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: PostRow = posts::table
            .filter(posts::id.eq(id.get()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .map_err(|err| map_lookup_error(id, err))?;

        Ok(row_to_post(row))
    }

    async fn update(&self, existing: Post, body: &str) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The affected row count is ignored: a row deleted since `existing`
        // was read leaves nothing to update.
        diesel::update(posts::table.filter(posts::id.eq(existing.id().get())))
            .set(posts::body.eq(body))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(existing.with_body(body))
    }

    async fn delete(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(posts::table.filter(posts::id.eq(post.id().get())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_maps_to_tagged_error() {
        let err = map_lookup_error(PostId::new(5), diesel::result::Error::NotFound);
        assert_eq!(err, PostRepositoryError::not_found(PostId::new(5)));
        assert_eq!(err.to_string(), diesel::result::Error::NotFound.to_string());
    }

    #[rstest]
    fn other_errors_keep_driver_text() {
        let err = map_diesel_error(diesel::result::Error::RollbackTransaction);
        assert_eq!(
            err,
            PostRepositoryError::query(diesel::result::Error::RollbackTransaction.to_string())
        );
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, PostRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn rows_convert_to_posts() {
        let post = row_to_post(PostRow {
            id: 8,
            body: "stored".to_owned(),
        });
        assert_eq!(post, Post::new(PostId::new(8), "stored"));
    }
}

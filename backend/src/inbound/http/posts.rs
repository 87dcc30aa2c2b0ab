//! Posts API handlers.
//!
//! ```text
//! POST   /posts      {"body":"Hello"} -> 201 {"id":1,"body":"Hello"}
//! GET    /post/1                      -> 200 {"id":1,"body":"Hello"}
//! PUT    /post/1     {"body":"Bye"}   -> 200 {"id":1,"body":"Bye"}
//! DELETE /post/1                      -> 200 {}
//! ```
//!
//! The `{id}` segment only matches digits; other paths never reach these
//! handlers. PUT and DELETE load the post first, so a missing id fails before
//! any write is attempted.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::PostId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Request body for creating or updating a post.
///
/// A missing `body` field decodes as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostRequest {
    /// New body text.
    #[serde(default)]
    pub body: String,
}

/// Response body for `DELETE /post/{id}`; serialises as `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeleteResponse {}

/// Create a post.
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let post = state
        .posts
        .create(&payload.body)
        .await
        .map_err(|err| state.reject(err))?;
    state.json(StatusCode::CREATED, &post)
}

/// Fetch a post by id.
#[get("/post/{id:[0-9]+}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    id: web::Path<PostId>,
) -> ApiResult<HttpResponse> {
    let post = state
        .posts
        .get(id.into_inner())
        .await
        .map_err(|err| state.reject(err))?;
    state.json(StatusCode::OK, &post)
}

/// Replace the body of an existing post.
#[put("/post/{id:[0-9]+}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    id: web::Path<PostId>,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let existing = state
        .posts
        .get(id.into_inner())
        .await
        .map_err(|err| state.reject(err))?;
    let post = state
        .posts
        .update(existing, &payload.body)
        .await
        .map_err(|err| state.reject(err))?;
    state.json(StatusCode::OK, &post)
}

/// Delete a post.
#[delete("/post/{id:[0-9]+}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    id: web::Path<PostId>,
) -> ApiResult<HttpResponse> {
    let post = state
        .posts
        .get(id.into_inner())
        .await
        .map_err(|err| state.reject(err))?;
    state
        .posts
        .delete(&post)
        .await
        .map_err(|err| state.reject(err))?;
    state.json(StatusCode::OK, &DeleteResponse {})
}

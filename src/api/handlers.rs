use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::backend::BlogStore;
use crate::datamodel::{Blog, BlogId, NewBlog};

fn parse_id(id: &str) -> ApiResult<BlogId> {
    id.parse().map_err(|_| ApiError::MalformedId(id.to_string()))
}

/// Unwraps a JSON body and checks the required fields.
fn parse_blog(payload: Result<Json<NewBlog>, JsonRejection>) -> ApiResult<NewBlog> {
    let Json(blog) = payload?;
    blog.validate()?;
    Ok(blog)
}

#[tracing::instrument(skip_all)]
pub async fn list_blogs<S: BlogStore>(
    State(store): State<Arc<S>>,
) -> ApiResult<Json<Vec<Blog>>> {
    let blogs = store.find_all().await?;
    debug!(count = blogs.len(), "listed blogs");
    Ok(Json(blogs))
}

#[tracing::instrument(skip_all)]
pub async fn create_blog<S: BlogStore>(
    State(store): State<Arc<S>>,
    payload: Result<Json<NewBlog>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Blog>)> {
    let blog = parse_blog(payload)?;
    let blog = store.insert(blog).await?;
    info!(id = %blog.id, title = %blog.title, "created blog");
    Ok((StatusCode::CREATED, Json(blog)))
}

#[tracing::instrument(skip(store))]
pub async fn get_blog<S: BlogStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Blog>> {
    let id = parse_id(&id)?;
    let blog = store.find_by_id(id).await?.ok_or(ApiError::NotFound(id))?;
    Ok(Json(blog))
}

#[tracing::instrument(skip(store, payload))]
pub async fn update_blog<S: BlogStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    payload: Result<Json<NewBlog>, JsonRejection>,
) -> ApiResult<Json<Blog>> {
    let id = parse_id(&id)?;
    let blog = parse_blog(payload)?;
    let blog = store
        .replace(id, blog)
        .await?
        .ok_or(ApiError::NotFound(id))?;
    info!(likes = blog.likes, "updated blog");
    Ok(Json(blog))
}

#[tracing::instrument(skip(store))]
pub async fn delete_blog<S: BlogStore>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    if !store.delete(id).await? {
        return Err(ApiError::NotFound(id));
    }
    info!("deleted blog");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unknown_endpoint() -> ApiError {
    ApiError::UnknownEndpoint
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

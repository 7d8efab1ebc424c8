use crate::server::{
    PostAccess, Result, ServerError, ServerRouter,
    auth::AuthenticatedUser,
    json::{Created, Json},
    query::Query,
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use postboard_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker, PostSearch, PostSearchQuery, UpdatePost},
    user::Role,
};
use postboard_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_get(search_posts)
        .typed_get(get_post)
        .typed_put(update_post)
        .typed_delete(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/search", rejection(ServerError))]
struct SearchPostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct PostPath {
    id: Id<PostMarker>,
}

async fn list_posts(
    PostsPath(): PostsPath,
    State(db): State<Arc<DbClient>>,
    State(access): State<PostAccess>,
    user: Option<AuthenticatedUser>,
) -> Result<Json<Vec<Post>>> {
    let posts = match user {
        // Teachers only see what they wrote themselves.
        Some(user) if user.role() == Role::Teacher => {
            db.fetch_posts_by_author(&user.user_id().to_string())
        }
        Some(_) => db.fetch_posts(),
        None if access.listing_requires_auth => return Err(ServerError::AuthenticationRequired),
        None => db.fetch_posts(),
    };

    debug!(user = ?user, count = posts.len(), "Listing posts");

    Ok(Json(posts))
}

async fn create_post(
    PostsPath(): PostsPath,
    State(db): State<Arc<DbClient>>,
    Json(post): Json<CreatePost>,
) -> Result<Created<Post>> {
    debug!(?post, "Received new post");

    let post = db.create_post(&post)?;
    info!(id = %post.id, "Created post");

    Ok(Created(post))
}

async fn search_posts(
    SearchPostsPath(): SearchPostsPath,
    State(db): State<Arc<DbClient>>,
    Query(query): Query<PostSearchQuery>,
) -> Result<Json<Vec<Post>>> {
    debug!(?query, "Searching posts");

    let search = PostSearch::try_from(&query)?;
    let posts = db.search_posts(&search);
    if posts.is_empty() {
        return Err(ServerError::NoPostsMatched);
    }

    debug!(count = posts.len(), "Found posts");

    Ok(Json(posts))
}

async fn get_post(
    PostPath { id }: PostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<Json<Post>> {
    let post = db.fetch_post(id).ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn update_post(
    PostPath { id }: PostPath,
    State(db): State<Arc<DbClient>>,
    Json(update): Json<UpdatePost>,
) -> Result<Json<Post>> {
    debug!(%id, ?update, "Updating post");

    let post = db
        .update_post(id, update)
        .ok_or(ServerError::PostByIdNotFound(id))?;

    Ok(Json(post))
}

async fn delete_post(
    PostPath { id }: PostPath,
    State(db): State<Arc<DbClient>>,
) -> Result<StatusCode> {
    db.delete_post(id).ok_or(ServerError::PostByIdNotFound(id))?;
    info!(%id, "Deleted post");

    Ok(StatusCode::NO_CONTENT)
}

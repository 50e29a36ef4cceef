use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::models::post::{Post, PostDetailRow};
use crate::structs::post::{NewPost, PostDetail, PostOut, UpdatePost};
use crate::utils::app_error::AppError;
use crate::utils::post::{check_new_post_data, link_tags, tag_ids, tag_names};
use crate::AppState;

/// Detail access is deliberately not gated by the follow graph: any
/// authenticated user may fetch a post by id, whether or not it would show up
/// in their listing.
pub async fn get_post_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<PostDetail>, AppError> {
    if auth_user.is_none() {
        return Err(AppError::Unauthenticated);
    }

    let row = sqlx::query_as::<_, PostDetailRow>(
        "SELECT p.id, p.title, p.content, p.created_at, p.picture, u.username AS author
         FROM posts p JOIN users u ON u.id = p.author_id
         WHERE p.id = ?1",
    )
    .bind(post_id)
    .fetch_optional(&app_state.pool)
    .await?
    .ok_or(AppError::NotFound("No post with this id."))?;

    let tags = tag_names(&app_state.pool, post_id).await?;

    let likes = sqlx::query_scalar::<_, String>(
        "SELECT u.username FROM users u
         JOIN likes l ON l.user_id = u.id
         WHERE l.post_id = ?1 ORDER BY l.id",
    )
    .bind(post_id)
    .fetch_all(&app_state.pool)
    .await?;

    let comments = sqlx::query_scalar::<_, String>(
        "SELECT text FROM comments WHERE post_id = ?1 ORDER BY created_at DESC, id DESC",
    )
    .bind(post_id)
    .fetch_all(&app_state.pool)
    .await?;

    Ok(Json(PostDetail::from_row(row, tags, likes, comments)))
}

async fn fetch_own_post(
    app_state: &AppState,
    requester_id: i64,
    post_id: i64,
) -> Result<Post, AppError> {
    let post = sqlx::query_as::<_, Post>(
        "SELECT id, title, content, created_at, author_id, picture FROM posts WHERE id = ?1",
    )
    .bind(post_id)
    .fetch_optional(&app_state.pool)
    .await?
    .ok_or(AppError::NotFound("No post with this id."))?;

    if post.author_id != requester_id {
        warn!(
            "User {requester_id} tried to mutate post {post_id} owned by {}",
            post.author_id
        );
        return Err(AppError::Forbidden("Only the author may modify a post."));
    }

    Ok(post)
}

/// PUT: full replacement of the mutable fields. `created_at` is set once at
/// creation and never touched here.
pub async fn update_post_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
    Json(update): Json<NewPost>,
) -> Result<Json<PostOut>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let post = fetch_own_post(&app_state, auth_user.id, post_id).await?;

    let title = update.title.trim().to_string();
    let content = update.content.trim().to_string();
    check_new_post_data(auth_user.id, &title, &content)?;

    let mut tx = app_state.pool.begin().await?;

    sqlx::query("UPDATE posts SET title = ?1, content = ?2, picture = ?3 WHERE id = ?4")
        .bind(&title)
        .bind(&content)
        .bind(&update.picture)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM post_tags WHERE post_id = ?1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    link_tags(&mut *tx, post_id, &update.tags).await?;

    tx.commit().await?;

    Ok(Json(PostOut {
        id: post_id,
        title,
        content,
        created_at: post.created_at,
        tags: update.tags,
        picture: update.picture,
    }))
}

/// PATCH: absent fields keep their current value.
pub async fn patch_post_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
    Json(update): Json<UpdatePost>,
) -> Result<Json<PostOut>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let post = fetch_own_post(&app_state, auth_user.id, post_id).await?;

    let title = match &update.title {
        Some(title) => title.trim().to_string(),
        None => post.title,
    };
    let content = match &update.content {
        Some(content) => content.trim().to_string(),
        None => post.content,
    };
    check_new_post_data(auth_user.id, &title, &content)?;

    let picture = update.picture.or(post.picture);

    let mut tx = app_state.pool.begin().await?;

    sqlx::query("UPDATE posts SET title = ?1, content = ?2, picture = ?3 WHERE id = ?4")
        .bind(&title)
        .bind(&content)
        .bind(&picture)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    if let Some(tags) = &update.tags {
        sqlx::query("DELETE FROM post_tags WHERE post_id = ?1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        link_tags(&mut *tx, post_id, tags).await?;
    }

    tx.commit().await?;

    let tags = tag_ids(&app_state.pool, post_id).await?;

    Ok(Json(PostOut {
        id: post_id,
        title,
        content,
        created_at: post.created_at,
        tags,
        picture,
    }))
}

/// Author-only delete with an explicit cascade in one transaction: the post's
/// likes, comments and tag links go with it.
pub async fn delete_post_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    fetch_own_post(&app_state, auth_user.id, post_id).await?;

    let mut tx = app_state.pool.begin().await?;

    sqlx::query("DELETE FROM likes WHERE post_id = ?1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM comments WHERE post_id = ?1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM post_tags WHERE post_id = ?1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM posts WHERE id = ?1")
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;
use time::OffsetDateTime;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::structs::comment::{CommentOut, NewComment};
use crate::utils::app_error::AppError;
use crate::AppState;

/// Adds a comment. The comment's user is always the authenticated requester;
/// a client cannot comment as someone else.
pub async fn comment_post_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
    Json(comment): Json<NewComment>,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Comment attempt without a valid session");
        return Err(AppError::Unauthenticated);
    };

    let text = comment.text.trim();
    if text.is_empty() {
        return Err(AppError::validation("A comment must not be empty."));
    }

    if sqlx::query("SELECT id FROM posts WHERE id = ?1")
        .bind(post_id)
        .fetch_optional(&app_state.pool)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("No post with this id."));
    }

    let created_at = OffsetDateTime::now_utc();

    let comment_id = sqlx::query(
        "INSERT INTO comments (text, created_at, post_id, user_id) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(text)
    .bind(created_at)
    .bind(post_id)
    .bind(auth_user.id)
    .execute(&app_state.pool)
    .await?
    .last_insert_rowid();

    Ok((
        StatusCode::CREATED,
        Json(CommentOut {
            id: comment_id,
            text: text.to_string(),
            created_at,
            post: post_id,
            user: auth_user.id,
        }),
    ))
}

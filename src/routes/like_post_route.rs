use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::extractors::auth_extractor::AuthUser;
use crate::utils::app_error::AppError;
use crate::AppState;

/// Like toggle. An existing like is removed, a missing one is created; the
/// UNIQUE constraint on (post_id, user_id) guarantees at most one like per
/// pair even when two identical requests race, and the whole toggle is one
/// transaction.
pub async fn like_post_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Like attempt without a valid session");
        return Err(AppError::Unauthenticated);
    };

    if sqlx::query("SELECT id FROM posts WHERE id = ?1")
        .bind(post_id)
        .fetch_optional(&app_state.pool)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("No post with this id."));
    }

    let mut tx = app_state.pool.begin().await?;

    let removed = sqlx::query("DELETE FROM likes WHERE post_id = ?1 AND user_id = ?2")
        .bind(post_id)
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let detail = if removed > 0 {
        "You unliked this post"
    } else {
        sqlx::query(
            "INSERT OR IGNORE INTO likes (post_id, user_id, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(post_id)
        .bind(auth_user.id)
        .bind(OffsetDateTime::now_utc())
        .execute(&mut *tx)
        .await?;
        "You liked this post"
    };

    tx.commit().await?;

    info!("User {} toggled like on post {post_id}", auth_user.id);

    Ok(Json(json!({ "detail": detail })))
}

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::extractors::auth_extractor::AuthUser;
use crate::utils::app_error::AppError;
use crate::AppState;

/// Follow toggle: an existing edge is removed, a missing edge is created.
/// Two consecutive calls restore the original state. The delete-then-insert
/// runs in one transaction and the primary key on (follower_id, followed_id)
/// keeps concurrent toggles from ever producing a duplicate edge.
pub async fn follow_user_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Follow attempt without a valid session");
        return Err(AppError::Unauthenticated);
    };

    let username = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_optional(&app_state.pool)
        .await?
        .ok_or(AppError::NotFound("No user with this id."))?;

    let mut tx = app_state.pool.begin().await?;

    let removed = sqlx::query("DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2")
        .bind(auth_user.id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let detail = if removed > 0 {
        format!("You unfollowed user - {username}")
    } else {
        sqlx::query("INSERT OR IGNORE INTO follows (follower_id, followed_id) VALUES (?1, ?2)")
            .bind(auth_user.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        format!("You followed user - {username}")
    };

    tx.commit().await?;

    info!("User {} toggled follow on user {user_id}", auth_user.id);

    Ok(Json(json!({ "detail": detail })))
}

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::extractors::auth_extractor::AuthUser;
use crate::structs::user::{UserDetail, UserSummary};
use crate::utils::app_error::AppError;
use crate::AppState;

#[derive(Deserialize)]
pub struct UserFilterParams {
    pub username: Option<String>,
}

/// Lists every user except the requester, with an optional case-insensitive
/// username substring filter.
pub async fn get_users_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Query(params): Query<UserFilterParams>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let filter = params.username.unwrap_or_default();

    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT u.id, u.username, u.first_name, u.last_name,
                EXISTS(SELECT 1 FROM follows f
                       WHERE f.follower_id = ?1 AND f.followed_id = u.id) AS follow
         FROM users u
         WHERE u.id != ?1 AND (?2 = '' OR instr(lower(u.username), lower(?2)) > 0)
         ORDER BY u.id",
    )
    .bind(auth_user.id)
    .bind(&filter)
    .fetch_all(&app_state.pool)
    .await?;

    Ok(Json(users))
}

pub async fn get_user_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDetail>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let user = sqlx::query_as::<_, UserDetail>(
        "SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.bio, u.picture,
                u.is_staff,
                EXISTS(SELECT 1 FROM follows f
                       WHERE f.follower_id = ?1 AND f.followed_id = u.id) AS follow
         FROM users u WHERE u.id = ?2",
    )
    .bind(auth_user.id)
    .bind(user_id)
    .fetch_optional(&app_state.pool)
    .await?
    .ok_or(AppError::NotFound("No user with this id."))?;

    Ok(Json(user))
}

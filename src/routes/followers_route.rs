use axum::extract::State;
use axum::Json;

use crate::extractors::auth_extractor::AuthUser;
use crate::structs::user::FollowUser;
use crate::utils::app_error::AppError;
use crate::AppState;

pub async fn get_followers_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
) -> Result<Json<Vec<FollowUser>>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let followers = sqlx::query_as::<_, FollowUser>(
        "SELECT u.id, u.username, u.first_name, u.last_name
         FROM users u JOIN follows f ON f.follower_id = u.id
         WHERE f.followed_id = ?1
         ORDER BY u.id",
    )
    .bind(auth_user.id)
    .fetch_all(&app_state.pool)
    .await?;

    Ok(Json(followers))
}

pub async fn get_following_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
) -> Result<Json<Vec<FollowUser>>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let following = sqlx::query_as::<_, FollowUser>(
        "SELECT u.id, u.username, u.first_name, u.last_name
         FROM users u JOIN follows f ON f.followed_id = u.id
         WHERE f.follower_id = ?1
         ORDER BY u.id",
    )
    .bind(auth_user.id)
    .fetch_all(&app_state.pool)
    .await?;

    Ok(Json(following))
}

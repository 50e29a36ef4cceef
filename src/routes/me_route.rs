use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::structs::user::{Profile, UpdateProfile};
use crate::utils::app_error::AppError;
use crate::utils::register::{check_email_address, check_password, check_username, hash_password};
use crate::AppState;

pub async fn get_me_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
) -> Result<Json<Profile>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, email, username, first_name, last_name, bio, picture, is_staff
         FROM users WHERE id = ?1",
    )
    .bind(auth_user.id)
    .fetch_one(&app_state.pool)
    .await?;

    Ok(Json(profile))
}

/// Handles both PUT and PATCH: absent fields keep their current value, a
/// supplied password is validated and re-hashed.
pub async fn update_me_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Json(mut update): Json<UpdateProfile>,
) -> Result<Json<Profile>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    if let Some(username) = update.username.take() {
        let username = username.to_lowercase();
        check_username(&username)?;
        if sqlx::query("SELECT id FROM users WHERE username = ?1 AND id != ?2")
            .bind(&username)
            .bind(auth_user.id)
            .fetch_optional(&app_state.pool)
            .await?
            .is_some()
        {
            warn!("Username `{username}` already used");
            return Err(AppError::Conflict("Username already used."));
        }
        update.username = Some(username);
    }

    if let Some(email) = update.email.take() {
        let email = email.to_lowercase();
        check_email_address(&email)?;
        if sqlx::query("SELECT id FROM users WHERE email = ?1 AND id != ?2")
            .bind(&email)
            .bind(auth_user.id)
            .fetch_optional(&app_state.pool)
            .await?
            .is_some()
        {
            warn!("Email address `{email}` already used");
            return Err(AppError::Conflict("Email address already used."));
        }
        update.email = Some(email);
    }

    let password = match update.password.take() {
        Some(password) => {
            check_password(&password)?;
            Some(hash_password(&password))
        }
        None => None,
    };

    let profile = sqlx::query_as::<_, Profile>(
        "UPDATE users SET
            email = COALESCE(?1, email),
            username = COALESCE(?2, username),
            password = COALESCE(?3, password),
            first_name = COALESCE(?4, first_name),
            last_name = COALESCE(?5, last_name),
            bio = COALESCE(?6, bio),
            picture = COALESCE(?7, picture)
         WHERE id = ?8
         RETURNING id, email, username, first_name, last_name, bio, picture, is_staff",
    )
    .bind(update.email)
    .bind(update.username)
    .bind(password)
    .bind(update.first_name)
    .bind(update.last_name)
    .bind(update.bio)
    .bind(update.picture)
    .bind(auth_user.id)
    .fetch_one(&app_state.pool)
    .await?;

    Ok(Json(profile))
}

/// Deletes the account with an explicit cascade, all inside one transaction:
/// likes and comments on the user's posts, the posts themselves, the user's
/// own likes and comments elsewhere, both directions of the follow relation,
/// and the session token.
pub async fn delete_me_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let mut tx = app_state.pool.begin().await?;

    sqlx::query(
        "DELETE FROM likes WHERE user_id = ?1
         OR post_id IN (SELECT id FROM posts WHERE author_id = ?1)",
    )
    .bind(auth_user.id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "DELETE FROM comments WHERE user_id = ?1
         OR post_id IN (SELECT id FROM posts WHERE author_id = ?1)",
    )
    .bind(auth_user.id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM post_tags WHERE post_id IN (SELECT id FROM posts WHERE author_id = ?1)")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM posts WHERE author_id = ?1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM follows WHERE follower_id = ?1 OR followed_id = ?1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM tokens WHERE user_id = ?1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(auth_user.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::warn;

use crate::structs::login_user::LoginUser;
use crate::utils::app_error::AppError;
use crate::utils::register::hash_password;
use crate::utils::token::generate_token;
use crate::AppState;

#[derive(sqlx::FromRow)]
struct UserForLogin {
    id: i64,
    email: String,
    password: String,
    is_active: bool,
}

/// Checks the credentials and hands out the user's session token, creating it
/// on first login. One token per user; it stays valid until logout.
pub async fn login_route(
    State(app_state): State<AppState>,
    Json(login_user): Json<LoginUser>,
) -> Result<Json<Value>, AppError> {
    let email = login_user.email.to_lowercase();

    let user = sqlx::query_as::<_, UserForLogin>(
        "SELECT id, email, password, is_active FROM users WHERE email = ?1",
    )
    .bind(&email)
    .fetch_optional(&app_state.pool)
    .await?
    .ok_or_else(|| {
        warn!("Login attempt with unknown email `{email}`");
        AppError::BadCredentials("There is no user with this email.")
    })?;

    if user.password != hash_password(&login_user.password) {
        warn!("Incorrect password for `{email}`");
        return Err(AppError::BadCredentials("Incorrect login credentials."));
    }

    if !user.is_active {
        warn!("Login attempt on inactive account `{email}`");
        return Err(AppError::BadCredentials("Account not active."));
    }

    let token = match sqlx::query_scalar::<_, String>("SELECT token FROM tokens WHERE user_id = ?1")
        .bind(user.id)
        .fetch_optional(&app_state.pool)
        .await?
    {
        Some(token) => token,
        None => {
            let token = generate_token();
            sqlx::query("INSERT INTO tokens (user_id, token, created_at) VALUES (?1, ?2, ?3)")
                .bind(user.id)
                .bind(&token)
                .bind(OffsetDateTime::now_utc())
                .execute(&app_state.pool)
                .await?;
            token
        }
    };

    Ok(Json(json!({
        "message": "User logged in successfully",
        "email_address": user.email,
        "token": token,
    })))
}

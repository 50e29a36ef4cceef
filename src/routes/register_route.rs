use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;
use serde_json::json;
use time::OffsetDateTime;
use tracing::warn;

use crate::structs::register_user::RegisterUser;
use crate::utils::app_error::AppError;
use crate::utils::register::{check_register_infos, hash_password};
use crate::AppState;

pub async fn register_route(
    State(app_state): State<AppState>,
    Json(mut register_user): Json<RegisterUser>,
) -> Result<impl IntoResponse, AppError> {
    register_user.username = register_user.username.to_lowercase();
    register_user.email = register_user.email.to_lowercase();
    check_register_infos(&register_user)?;

    //Check if email is already used
    if sqlx::query("SELECT id FROM users WHERE email = ?1")
        .bind(&register_user.email)
        .fetch_optional(&app_state.pool)
        .await?
        .is_some()
    {
        warn!("Email address `{}` already used", register_user.email);
        return Err(AppError::Conflict("Email address already used."));
    }

    //Check if username is already used
    if sqlx::query("SELECT id FROM users WHERE username = ?1")
        .bind(&register_user.username)
        .fetch_optional(&app_state.pool)
        .await?
        .is_some()
    {
        warn!("Username `{}` already used", register_user.username);
        return Err(AppError::Conflict("Username already used."));
    }

    let password = hash_password(&register_user.password);

    //The UNIQUE constraints back up the checks above against concurrent registration
    let result = sqlx::query(
        "INSERT INTO users (email, username, password, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&register_user.email)
    .bind(&register_user.username)
    .bind(&password)
    .bind(OffsetDateTime::now_utc())
    .execute(&app_state.pool)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            AppError::Conflict("Email address or username already used.")
        } else {
            AppError::from(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": result.last_insert_rowid(),
            "email": register_user.email,
            "username": register_user.username,
        })),
    ))
}

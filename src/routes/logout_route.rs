use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::utils::app_error::AppError;
use crate::AppState;

/// Revokes the caller's token. The same token must fail authentication on any
/// later request.
pub async fn logout_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
) -> Result<Json<Value>, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Logout attempt without a valid session");
        return Err(AppError::Unauthenticated);
    };

    sqlx::query("DELETE FROM tokens WHERE user_id = ?1")
        .bind(auth_user.id)
        .execute(&app_state.pool)
        .await?;

    Ok(Json(json!({ "message": "User logged out successfully" })))
}

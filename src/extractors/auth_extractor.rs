use axum::extract::{FromRef, FromRequestParts};
use axum::headers::authorization::Bearer;
use axum::headers::Authorization;
use axum::http::request::Parts;
use axum::{async_trait, TypedHeader};

use crate::{utils::app_error::AppError, AppState};

#[derive(sqlx::FromRow)]
pub struct InnerAuthUser {
    pub id: i64,
    pub username: String,
}

/// Resolved requester identity. `None` means no token was presented, the token
/// is unknown or revoked, or the account is inactive; handlers turn that into
/// an `Unauthenticated` error.
pub struct AuthUser(pub Option<InnerAuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let bearer =
            match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
                Ok(TypedHeader(Authorization(bearer))) => bearer,
                Err(_) => return Ok(AuthUser(None)),
            };

        let user = sqlx::query_as::<_, InnerAuthUser>(
            "SELECT u.id, u.username FROM users u
             JOIN tokens t ON t.user_id = u.id
             WHERE t.token = ?1 AND u.is_active = TRUE",
        )
        .bind(bearer.token())
        .fetch_optional(&app_state.pool)
        .await?;

        Ok(AuthUser(user))
    }
}

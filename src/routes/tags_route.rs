use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;

use crate::extractors::auth_extractor::AuthUser;
use crate::structs::tag::{NewTag, Tag};
use crate::utils::app_error::AppError;
use crate::utils::post::check_tag_name;
use crate::AppState;

pub async fn get_tags_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
) -> Result<Json<Vec<Tag>>, AppError> {
    if auth_user.is_none() {
        return Err(AppError::Unauthenticated);
    }

    let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
        .fetch_all(&app_state.pool)
        .await?;

    Ok(Json(tags))
}

/// Any authenticated user may create tags; names are free text and not
/// required to be unique.
pub async fn create_tag_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Json(new_tag): Json<NewTag>,
) -> Result<impl IntoResponse, AppError> {
    if auth_user.is_none() {
        return Err(AppError::Unauthenticated);
    }

    let name = new_tag.name.trim();
    check_tag_name(name)?;

    let tag_id = sqlx::query("INSERT INTO tags (name) VALUES (?1)")
        .bind(name)
        .execute(&app_state.pool)
        .await?
        .last_insert_rowid();

    Ok((
        StatusCode::CREATED,
        Json(Tag {
            id: tag_id,
            name: name.to_string(),
        }),
    ))
}

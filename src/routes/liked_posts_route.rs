use axum::extract::State;
use axum::Json;

use crate::extractors::auth_extractor::AuthUser;
use crate::models::post::PostSummaryRow;
use crate::structs::post::PostSummary;
use crate::utils::app_error::AppError;
use crate::utils::post::tag_names;
use crate::AppState;

/// Posts the requester has liked, most recently liked first.
pub async fn get_liked_posts_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
) -> Result<Json<Vec<PostSummary>>, AppError> {
    let Some(auth_user) = auth_user else {
        return Err(AppError::Unauthenticated);
    };

    let rows = sqlx::query_as::<_, PostSummaryRow>(
        "SELECT p.id, p.title, p.content, p.created_at, p.picture,
                u.username AS author,
                (SELECT COUNT(*) FROM likes l2 WHERE l2.post_id = p.id) AS likes,
                (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments
         FROM posts p
         JOIN users u ON u.id = p.author_id
         JOIN likes l ON l.post_id = p.id
         WHERE l.user_id = ?1
         ORDER BY l.created_at DESC, l.id DESC",
    )
    .bind(auth_user.id)
    .fetch_all(&app_state.pool)
    .await?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        let tags = tag_names(&app_state.pool, row.id).await?;
        posts.push(PostSummary::from_row(row, tags));
    }

    Ok(Json(posts))
}

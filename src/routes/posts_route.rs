use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use hyper::StatusCode;
use time::OffsetDateTime;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::models::post::PostSummaryRow;
use crate::structs::post::{NewPost, PostFilterParams, PostOut, PostSummary};
use crate::utils::app_error::AppError;
use crate::utils::post::{check_new_post_data, link_tags, tag_names};
use crate::AppState;

/// Lists the posts visible to the requester: their own posts plus the posts of
/// every user they follow, newest first (ties broken by id). A `?tag=` filter
/// keeps only posts with at least one tag whose name contains the filter,
/// case-insensitively. Visibility gates this listing only; detail and
/// mutation are checked elsewhere by the author rule alone.
pub async fn get_posts_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Query(params): Query<PostFilterParams>,
) -> Result<Json<Vec<PostSummary>>, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Unauthenticated post listing attempt");
        return Err(AppError::Unauthenticated);
    };

    let tag_filter = params.tag.unwrap_or_default();

    let rows = sqlx::query_as::<_, PostSummaryRow>(
        "SELECT p.id, p.title, p.content, p.created_at, p.picture,
                u.username AS author,
                (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes,
                (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments
         FROM posts p
         JOIN users u ON u.id = p.author_id
         WHERE (p.author_id = ?1
                OR p.author_id IN (SELECT followed_id FROM follows WHERE follower_id = ?1))
           AND (?2 = '' OR EXISTS (
                SELECT 1 FROM post_tags pt
                JOIN tags t ON t.id = pt.tag_id
                WHERE pt.post_id = p.id AND instr(lower(t.name), lower(?2)) > 0))
         ORDER BY p.created_at DESC, p.id DESC",
    )
    .bind(auth_user.id)
    .bind(&tag_filter)
    .fetch_all(&app_state.pool)
    .await?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        let tags = tag_names(&app_state.pool, row.id).await?;
        posts.push(PostSummary::from_row(row, tags));
    }

    Ok(Json(posts))
}

pub async fn publish_post_route(
    State(app_state): State<AppState>,
    AuthUser(auth_user): AuthUser,
    Json(post): Json<NewPost>,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("User not connected");
        return Err(AppError::Unauthenticated);
    };

    let title = post.title.trim();
    let content = post.content.trim();

    check_new_post_data(auth_user.id, title, content)?;

    let created_at = OffsetDateTime::now_utc();

    let mut tx = app_state.pool.begin().await?;

    let post_id = sqlx::query(
        "INSERT INTO posts (title, content, created_at, author_id, picture)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(title)
    .bind(content)
    .bind(created_at)
    .bind(auth_user.id)
    .bind(&post.picture)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    link_tags(&mut *tx, post_id, &post.tags).await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(PostOut {
            id: post_id,
            title: title.to_string(),
            content: content.to_string(),
            created_at,
            tags: post.tags,
            picture: post.picture,
        }),
    ))
}

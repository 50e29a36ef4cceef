use sqlx::{SqliteConnection, SqlitePool};
use tracing::warn;

use super::app_error::AppError;

/// Tag names attached to a post, in tag-id order.
pub async fn tag_names(pool: &SqlitePool, post_id: i64) -> Result<Vec<String>, AppError> {
    Ok(sqlx::query_scalar::<_, String>(
        "SELECT t.name FROM tags t
         JOIN post_tags pt ON pt.tag_id = t.id
         WHERE pt.post_id = ?1 ORDER BY t.id",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?)
}

pub async fn tag_ids(pool: &SqlitePool, post_id: i64) -> Result<Vec<i64>, AppError> {
    Ok(sqlx::query_scalar::<_, i64>(
        "SELECT tag_id FROM post_tags WHERE post_id = ?1 ORDER BY tag_id",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?)
}

/// Attaches tags to a post, rejecting unknown tag ids. Runs on the caller's
/// transaction so a bad id rolls the whole post write back.
pub async fn link_tags(
    conn: &mut SqliteConnection,
    post_id: i64,
    tag_ids: &[i64],
) -> Result<(), AppError> {
    for tag_id in tag_ids {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE id = ?1")
            .bind(tag_id)
            .fetch_one(&mut *conn)
            .await?;
        if exists == 0 {
            warn!("Unknown tag id {tag_id} on post {post_id}");
            return Err(AppError::validation(format!("Unknown tag id {tag_id}.")));
        }
        sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?1, ?2)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub fn check_new_post_data(auth_user_id: i64, title: &str, content: &str) -> Result<(), AppError> {
    if title.is_empty() || title.len() > 255 {
        warn!(
            "User {} tried to create a post with a title with a wrong length : {}/255",
            auth_user_id,
            title.len()
        );
        return Err(AppError::validation(
            "A post title must contain between 1 and 255 characters.",
        ));
    }

    if content.is_empty() {
        warn!("User {auth_user_id} tried to create a post with an empty content");
        return Err(AppError::validation("A post content must not be empty."));
    }

    Ok(())
}

pub fn check_tag_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.len() > 255 {
        warn!("Wrong tag name length : {}/255", name.len());
        return Err(AppError::validation(
            "A tag name must contain between 1 and 255 characters.",
        ));
    }
    Ok(())
}

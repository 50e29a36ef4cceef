use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::post::{PostDetailRow, PostSummaryRow};

#[derive(Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<i64>,
    pub picture: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<i64>>,
    pub picture: Option<String>,
}

#[derive(Deserialize)]
pub struct PostFilterParams {
    pub tag: Option<String>,
}

/// Echo shape for create/update, mirroring the stored row plus tag ids.
#[derive(Serialize)]
pub struct PostOut {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub tags: Vec<i64>,
    pub picture: Option<String>,
}

/// List item: tag names, author username and counts instead of raw ids.
#[derive(Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub tags: Vec<String>,
    pub picture: Option<String>,
    pub author: String,
    pub likes: i64,
    pub comments: i64,
}

impl PostSummary {
    pub fn from_row(row: PostSummaryRow, tags: Vec<String>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            tags,
            picture: row.picture,
            author: row.author,
            likes: row.likes,
            comments: row.comments,
        }
    }
}

/// Detail shape: likes become the liker usernames, comments their texts.
#[derive(Serialize)]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub tags: Vec<String>,
    pub picture: Option<String>,
    pub author: String,
    pub likes: Vec<String>,
    pub comments: Vec<String>,
}

impl PostDetail {
    pub fn from_row(
        row: PostDetailRow,
        tags: Vec<String>,
        likes: Vec<String>,
        comments: Vec<String>,
    ) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            tags,
            picture: row.picture,
            author: row.author,
            likes,
            comments,
        }
    }
}

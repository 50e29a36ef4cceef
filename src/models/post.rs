use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub author_id: i64,
    pub picture: Option<String>,
}

/// Row shape produced by the listing query: post columns joined with the
/// author username and like/comment counts.
#[derive(sqlx::FromRow)]
pub struct PostSummaryRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub picture: Option<String>,
    pub author: String,
    pub likes: i64,
    pub comments: i64,
}

#[derive(sqlx::FromRow)]
pub struct PostDetailRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub picture: Option<String>,
    pub author: String,
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Deserialize)]
pub struct NewComment {
    pub text: String,
}

#[derive(Serialize)]
pub struct CommentOut {
    pub id: i64,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub post: i64,
    pub user: i64,
}

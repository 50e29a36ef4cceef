use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct NewTag {
    pub name: String,
}

#[derive(sqlx::FromRow, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

use serde::{Deserialize, Serialize};

/// Shape returned by user listings.
#[derive(sqlx::FromRow, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    //Whether the requester follows this user
    pub follow: bool,
}

/// Shape returned by `GET /users/:id`.
#[derive(sqlx::FromRow, Serialize)]
pub struct UserDetail {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub picture: Option<String>,
    pub is_staff: bool,
    pub follow: bool,
}

/// The requester's own profile, returned by `/me`. Never carries the password.
#[derive(sqlx::FromRow, Serialize)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub picture: Option<String>,
    pub is_staff: bool,
}

#[derive(Deserialize)]
pub struct UpdateProfile {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub picture: Option<String>,
}

/// Follower/following listings only need the bare identity.
#[derive(sqlx::FromRow, Serialize)]
pub struct FollowUser {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

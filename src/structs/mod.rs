pub mod comment;
pub mod login_user;
pub mod post;
pub mod register_user;
pub mod tag;
pub mod user;

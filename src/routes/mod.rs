pub mod comment_post_route;
pub mod follow_user_route;
pub mod followers_route;
pub mod like_post_route;
pub mod liked_posts_route;
pub mod login_route;
pub mod logout_route;
pub mod me_route;
pub mod post_route;
pub mod posts_route;
pub mod register_route;
pub mod tags_route;
pub mod users_route;

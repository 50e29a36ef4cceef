pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod structs;
pub mod utils;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use middleware::logger_middleware::logger_middleware;
use routes::comment_post_route::comment_post_route;
use routes::follow_user_route::follow_user_route;
use routes::followers_route::{get_followers_route, get_following_route};
use routes::like_post_route::like_post_route;
use routes::liked_posts_route::get_liked_posts_route;
use routes::login_route::login_route;
use routes::logout_route::logout_route;
use routes::me_route::{delete_me_route, get_me_route, update_me_route};
use routes::post_route::{delete_post_route, get_post_route, patch_post_route, update_post_route};
use routes::posts_route::{get_posts_route, publish_post_route};
use routes::register_route::register_route;
use routes::tags_route::{create_tag_route, get_tags_route};
use routes::users_route::{get_user_route, get_users_route};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/register", post(register_route))
        .route("/login", post(login_route))
        .route("/logout", get(logout_route))
        .route(
            "/me",
            get(get_me_route)
                .put(update_me_route)
                .patch(update_me_route)
                .delete(delete_me_route),
        )
        .route("/users", get(get_users_route))
        .route("/users/:id", get(get_user_route))
        .route("/users/:id/follow", post(follow_user_route))
        .route("/followers", get(get_followers_route))
        .route("/following", get(get_following_route))
        .route("/posts", get(get_posts_route).post(publish_post_route))
        .route(
            "/posts/:id",
            get(get_post_route)
                .put(update_post_route)
                .patch(patch_post_route)
                .delete(delete_post_route),
        )
        .route("/posts/:id/like", post(like_post_route))
        .route("/posts/:id/comment", post(comment_post_route))
        .route("/liked_posts", get(get_liked_posts_route))
        .route("/tags", get(get_tags_route).post(create_tag_route))
        .layer(axum_middleware::from_fn(logger_middleware))
        .with_state(app_state)
}

mod common;

use hyper::{Method, StatusCode};
use serde_json::json;

use common::{create_post, register_and_login, request, setup};

async fn user_id_of(app: &axum::Router, token: &str) -> i64 {
    let (_, me) = request(app, Method::GET, "/me", Some(token), None).await;
    me["id"].as_i64().unwrap()
}

#[tokio::test]
async fn listing_requires_authentication() {
    let (app, _pool) = setup().await;

    let (status, body) = request(&app, Method::GET, "/posts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth");

    let (status, _) = request(&app, Method::GET, "/posts", Some("bogus-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn own_posts_are_always_visible() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;

    create_post(&app, &alice, "First", json!({})).await;
    create_post(&app, &alice, "Second", json!({})).await;

    let (status, posts) = request(&app, Method::GET, "/posts", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn visibility_follows_the_follow_graph() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;
    let alice_id = user_id_of(&app, &alice).await;

    create_post(&app, &alice, "Hello", json!({})).await;

    //Not following yet: alice's post is not discoverable
    let (status, posts) = request(&app, Method::GET, "/posts", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().unwrap().len(), 0);

    request(
        &app,
        Method::POST,
        &format!("/users/{alice_id}/follow"),
        Some(&bob),
        None,
    )
    .await;

    let (_, posts) = request(&app, Method::GET, "/posts", Some(&bob), None).await;
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["title"], "Hello");
    assert_eq!(posts[0]["author"], "alice");

    //Unfollow hides it again
    request(
        &app,
        Method::POST,
        &format!("/users/{alice_id}/follow"),
        Some(&bob),
        None,
    )
    .await;
    let (_, posts) = request(&app, Method::GET, "/posts", Some(&bob), None).await;
    assert_eq!(posts.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn detail_access_is_not_gated_by_follows() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;

    let post_id = create_post(&app, &alice, "Hello", json!({})).await;

    let (status, detail) = request(
        &app,
        Method::GET,
        &format!("/posts/{post_id}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["title"], "Hello");
    assert_eq!(detail["author"], "alice");
    assert_eq!(detail["likes"], json!([]));
    assert_eq!(detail["comments"], json!([]));
}

#[tokio::test]
async fn tag_filter_matches_case_insensitive_substrings() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;

    let (status, travel) = request(
        &app,
        Method::POST,
        "/tags",
        Some(&alice),
        Some(json!({ "name": "Travel" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, food) = request(
        &app,
        Method::POST,
        "/tags",
        Some(&alice),
        Some(json!({ "name": "Food" })),
    )
    .await;

    create_post(&app, &alice, "Trip", json!({ "tags": [travel["id"]] })).await;
    create_post(&app, &alice, "Dinner", json!({ "tags": [food["id"]] })).await;
    create_post(&app, &alice, "Untagged", json!({})).await;

    let (status, posts) = request(&app, Method::GET, "/posts?tag=RAV", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Trip"]);
    assert_eq!(posts[0]["tags"], json!(["Travel"]));

    //The filter narrows the visible set, it never widens it
    let bob = register_and_login(&app, "bob").await;
    let (_, posts) = request(&app, Method::GET, "/posts?tag=RAV", Some(&bob), None).await;
    assert_eq!(posts.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_post_validates_input() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;

    let (status, body) = request(
        &app,
        Method::POST,
        "/posts",
        Some(&alice),
        Some(json!({ "title": "", "content": "Content" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (status, body) = request(
        &app,
        Method::POST,
        "/posts",
        Some(&alice),
        Some(json!({ "title": "Hello", "content": "Content", "tags": [999] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn only_the_author_may_mutate_a_post() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;

    let post_id = create_post(&app, &alice, "Hello", json!({})).await;
    let uri = format!("/posts/{post_id}");

    let update = json!({ "title": "Hacked", "content": "Content" });
    let (status, body) = request(&app, Method::PUT, &uri, Some(&bob), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = request(
        &app,
        Method::PATCH,
        &uri,
        Some(&bob),
        Some(json!({ "title": "Hacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    //The author is allowed
    let (status, body) = request(&app, Method::PUT, &uri, Some(&alice), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Hacked");

    let (status, _) = request(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn patch_keeps_absent_fields_and_created_at() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;

    let post_id = create_post(&app, &alice, "Hello", json!({})).await;
    let uri = format!("/posts/{post_id}");

    let (_, before) = request(&app, Method::GET, &uri, Some(&alice), None).await;

    let (status, body) = request(
        &app,
        Method::PATCH,
        &uri,
        Some(&alice),
        Some(json!({ "title": "Renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["content"], "Content");
    assert_eq!(body["created_at"], before["created_at"]);
}

#[tokio::test]
async fn deleting_a_post_cascades_comments_and_likes() {
    let (app, pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;

    let post_id = create_post(&app, &alice, "Hello", json!({})).await;
    request(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/like"),
        Some(&bob),
        None,
    )
    .await;
    request(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/comment"),
        Some(&bob),
        Some(json!({ "text": "Nice" })),
    )
    .await;

    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/posts/{post_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for table in ["posts", "likes", "comments"] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{table} not cascaded");
    }

    let (status, _) = request(
        &app,
        Method::GET,
        &format!("/posts/{post_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn like_toggle_is_an_involution() {
    let (app, pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;
    let alice_id = user_id_of(&app, &alice).await;

    let post_id = create_post(&app, &alice, "Hello", json!({})).await;
    request(
        &app,
        Method::POST,
        &format!("/users/{alice_id}/follow"),
        Some(&bob),
        None,
    )
    .await;

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/like"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "You liked this post");

    let (_, posts) = request(&app, Method::GET, "/posts", Some(&bob), None).await;
    assert_eq!(posts[0]["likes"], 1);
    let (_, liked) = request(&app, Method::GET, "/liked_posts", Some(&bob), None).await;
    assert_eq!(liked.as_array().unwrap().len(), 1);
    assert_eq!(liked[0]["title"], "Hello");

    let likes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(likes, 1);

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/like"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "You unliked this post");

    let (_, posts) = request(&app, Method::GET, "/posts", Some(&bob), None).await;
    assert_eq!(posts[0]["likes"], 0);
    let (_, liked) = request(&app, Method::GET, "/liked_posts", Some(&bob), None).await;
    assert_eq!(liked.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn like_rows_are_unique_per_user_and_post() {
    let (app, pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;
    let alice_id = user_id_of(&app, &alice).await;

    let post_id = create_post(&app, &alice, "Hello", json!({})).await;
    request(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/like"),
        Some(&alice),
        None,
    )
    .await;

    //A second row for the same (post, user) pair is rejected by the schema,
    //so even a racing duplicate submission cannot double-count
    let err = sqlx::query("INSERT INTO likes (post_id, user_id, created_at) VALUES (?1, ?2, ?3)")
        .bind(post_id)
        .bind(alice_id)
        .bind("2024-01-01T00:00:00Z")
        .execute(&pool)
        .await
        .unwrap_err();
    assert!(err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation()));
}

#[tokio::test]
async fn like_unknown_post_is_not_found() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;

    let (status, _) = request(&app, Method::POST, "/posts/999/like", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn liked_posts_are_ordered_by_latest_like() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;

    let first = create_post(&app, &alice, "First", json!({})).await;
    let second = create_post(&app, &alice, "Second", json!({})).await;

    request(
        &app,
        Method::POST,
        &format!("/posts/{first}/like"),
        Some(&alice),
        None,
    )
    .await;
    request(
        &app,
        Method::POST,
        &format!("/posts/{second}/like"),
        Some(&alice),
        None,
    )
    .await;

    let (_, liked) = request(&app, Method::GET, "/liked_posts", Some(&alice), None).await;
    let titles: Vec<&str> = liked
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

#[tokio::test]
async fn comments_bind_to_the_requester() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;
    let bob = register_and_login(&app, "bob").await;
    let bob_id = user_id_of(&app, &bob).await;

    let post_id = create_post(&app, &alice, "Hello", json!({})).await;

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/comment"),
        Some(&bob),
        Some(json!({ "text": "Nice", "user": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"], bob_id);
    assert_eq!(body["post"], post_id);

    let (_, detail) = request(
        &app,
        Method::GET,
        &format!("/posts/{post_id}"),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(detail["comments"], json!(["Nice"]));
}

#[tokio::test]
async fn comment_validation_and_missing_post() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;
    let post_id = create_post(&app, &alice, "Hello", json!({})).await;

    let (status, body) = request(
        &app,
        Method::POST,
        &format!("/posts/{post_id}/comment"),
        Some(&alice),
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (status, _) = request(
        &app,
        Method::POST,
        "/posts/999/comment",
        Some(&alice),
        Some(json!({ "text": "Nice" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tags_can_be_listed_and_created() {
    let (app, _pool) = setup().await;
    let alice = register_and_login(&app, "alice").await;

    let (status, _) = request(&app, Method::GET, "/tags", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, tag) = request(
        &app,
        Method::POST,
        "/tags",
        Some(&alice),
        Some(json!({ "name": "Travel" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tag["name"], "Travel");

    let (status, tags) = request(&app, Method::GET, "/tags", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags.as_array().unwrap().len(), 1);

    let (status, _) = request(
        &app,
        Method::POST,
        "/tags",
        Some(&alice),
        Some(json!({ "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

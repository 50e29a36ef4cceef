use axum::body::Body;
use axum::Router;
use hyper::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

use chirper::{app, AppState};

/// Fresh router + in-memory database. A single pooled connection keeps the
/// memory database alive for the whole test.
pub async fn setup() -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    (app(AppState { pool: pool.clone() }), pool)
}

pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers `<name>@example.com` / `<name>` and returns a session token.
pub async fn register_and_login(app: &Router, name: &str) -> String {
    let (status, _) = request(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({
            "email": format!("{name}@example.com"),
            "username": name,
            "password": "secret_password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    login(app, name).await
}

pub async fn login(app: &Router, name: &str) -> String {
    let (status, body) = request(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({
            "email": format!("{name}@example.com"),
            "password": "secret_password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_post(app: &Router, token: &str, title: &str, body: Value) -> i64 {
    let mut payload = json!({ "title": title, "content": "Content" });
    payload
        .as_object_mut()
        .unwrap()
        .extend(body.as_object().unwrap().clone());
    let (status, body) = request(app, Method::POST, "/posts", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

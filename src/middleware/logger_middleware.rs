use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::info;

pub async fn logger_middleware(request: Request<Body>, next: Next<Body>) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!("{} {} -> {}", method, uri, response.status());
    response
}

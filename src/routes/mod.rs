pub mod health_handlers;
pub mod video_handlers;

pub use health_handlers::{health, ready};
pub use video_handlers::{create_video, list_videos};

use axum::{
    extract::Request,
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use log::info;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;

/// 组装路由
pub fn build_router(state: Arc<AppState>) -> Router {
    // 创建 CORS 中间件 - 允许所有来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/videos", get(list_videos).post(create_video))
        .with_state(state)
        .layer(middleware::from_fn(log_requests))
        .layer(cors)
}

/// 记录每个请求的方法、路径、状态码和耗时
async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        start.elapsed()
    );
    response
}

//! 存活与就绪探针

use axum::{extract::State, http::StatusCode, Json};
use log::error;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

/// 存活探针
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "video-api" }))
}

/// 就绪探针：存储不可用时返回 503
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let reachable = match state.db_manager.lock() {
        Ok(db_manager) => match db_manager.ping() {
            Ok(()) => true,
            Err(e) => {
                error!("就绪检查失败: {}", e);
                false
            }
        },
        Err(_) => {
            error!("就绪检查失败: database mutex poisoned");
            false
        }
    };

    if reachable {
        (StatusCode::OK, Json(json!({ "ready": true })))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "ready": false })))
    }
}

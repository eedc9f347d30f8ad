use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::errors::{ApiError, ApiResult};
use crate::models::{CreateVideoInput, ListParams, PageResult, VideoRecord};
use crate::services;
use crate::AppState;

/// 分页列出视频，支持标题、标签、时间范围筛选
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<PageResult>> {
    let Query(params) = params.map_err(|e| ApiError::invalid_field("query", e.body_text()))?;

    let db_manager = state.db_manager.lock()?;
    let page = services::list_videos(&db_manager, &params)?;

    Ok(Json(page))
}

/// 新建视频
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateVideoInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<VideoRecord>)> {
    let Json(input) = payload.map_err(|e| ApiError::invalid_field("body", e.body_text()))?;

    let db_manager = state.db_manager.lock()?;
    let video = services::create_video(&db_manager, &input)?;

    Ok((StatusCode::CREATED, Json(video)))
}

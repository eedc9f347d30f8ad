//! 新建视频

use log::info;
use url::Url;
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult, FieldError};
use crate::models::{CreateVideoInput, NewVideo, VideoRecord};
use crate::services::db::{VideoDao, VideoDbManager};
use crate::utils::now_timestamp;

pub const DEFAULT_THUMBNAIL_URL: &str = "https://via.placeholder.com/320x180.webp?text=Video";
pub const DEFAULT_DURATION_SECONDS: i64 = 120;
pub const DEFAULT_VIEWS: i64 = 0;

/// 校验请求并补齐默认值
///
/// id 与创建时间在这里生成。
pub fn prepare_new_video(input: &CreateVideoInput) -> ApiResult<NewVideo> {
    let mut errors = Vec::new();

    let title = input.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        errors.push(FieldError::new("title", "is required"));
    }

    let thumbnail_url = match input.thumbnail_url.as_deref() {
        None => DEFAULT_THUMBNAIL_URL.to_string(),
        Some(raw) => {
            if !is_valid_url(raw) {
                errors.push(FieldError::new("thumbnail_url", "must be a valid http(s) URL"));
            }
            raw.to_string()
        }
    };

    let duration_seconds = input.duration.unwrap_or(DEFAULT_DURATION_SECONDS);
    if duration_seconds < 0 {
        errors.push(FieldError::new("duration", "must be a non-negative integer"));
    }

    let views = input.views.unwrap_or(DEFAULT_VIEWS);
    if views < 0 {
        errors.push(FieldError::new("views", "must be a non-negative integer"));
    }

    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    Ok(NewVideo {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        thumbnail_url,
        created_at: now_timestamp(),
        duration_seconds,
        views,
        tags: normalize_tags(input.tags.as_deref().unwrap_or_default()),
    })
}

/// 去掉首尾空白、丢弃空名并去重，保持首次出现的顺序
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|t| t == tag) {
            normalized.push(tag.to_string());
        }
    }
    normalized
}

fn is_valid_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

/// 创建视频及其标签关联（单个事务）
pub fn create_video(db_manager: &VideoDbManager, input: &CreateVideoInput) -> ApiResult<VideoRecord> {
    let video = prepare_new_video(input)?;
    let created = VideoDao::new(db_manager).create_video(&video)?;
    info!(
        "新建视频 {} \"{}\"，标签 {:?}",
        created.id, created.title, created.tags
    );
    Ok(created)
}

//! 服务端错误类型
//!
//! 所有服务函数返回 [`ApiResult`]，处理器直接用 `?` 把错误转换为 HTTP 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::Serialize;
use serde_json::json;
use std::sync::PoisonError;
use thiserror::Error;

/// 单个字段的校验失败信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求参数不合法，在执行任何查询之前返回
    #[error("VALIDATION_ERROR: {message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    /// 存储层失败，整个操作中止
    #[error("QUERY_ERROR: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(details: Vec<FieldError>) -> Self {
        let message = match details.as_slice() {
            [single] => format!("{}: {}", single.field, single.message),
            _ => "Invalid request".to_string(),
        };
        Self::Validation { message, details }
    }

    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Query(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND_ERROR",
            ApiError::Query(_) => "QUERY_ERROR",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl<T> From<PoisonError<T>> for ApiError {
    fn from(_: PoisonError<T>) -> Self {
        ApiError::Internal("database mutex poisoned".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation { message, details } => {
                warn!("请求校验失败: {}", message);
                json!({
                    "error": {
                        "code": self.code(),
                        "message": message,
                        "statusCode": status.as_u16(),
                        "details": details,
                    }
                })
            }
            ApiError::NotFound(message) => json!({
                "error": {
                    "code": self.code(),
                    "message": message,
                    "statusCode": status.as_u16(),
                }
            }),
            ApiError::Query(_) | ApiError::Internal(_) => {
                // 内部细节只写日志，不返回给调用方
                error!("{}", self);
                json!({
                    "error": {
                        "code": self.code(),
                        "message": "Internal Server Error",
                        "statusCode": status.as_u16(),
                    }
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

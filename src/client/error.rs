use std::time::Duration;
use thiserror::Error;

/// 客户端请求错误
///
/// 超时、网络故障、非成功状态码分别归类，便于界面给出不同提示。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Timeout(_) => "TIMEOUT_ERROR",
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Status { .. } => "HTTP_STATUS_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}

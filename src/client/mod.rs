//! 客户端
//!
//! 带超时的 HTTP 客户端，以及让界面状态与查询参数保持一致的同步控制器。

pub mod api_client;
pub mod error;
pub mod sync;

pub use api_client::{ApiClient, VideoSource, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use sync::{SyncController, SyncPhase, SyncState};

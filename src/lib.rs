//! 视频目录服务
//!
//! 提供按标题、标签、时间范围筛选的分页列表与新建接口，
//! 以及消费这些接口的异步客户端。

pub mod client;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Mutex;

use services::VideoDbManager;

/// 处理器共享的状态
pub struct AppState {
    pub db_manager: Mutex<VideoDbManager>,
}

impl AppState {
    pub fn new(db_manager: VideoDbManager) -> Self {
        Self {
            db_manager: Mutex::new(db_manager),
        }
    }
}

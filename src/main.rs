use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;

use video_catalog::config::AppConfig;
use video_catalog::services::{self, VideoDbManager};
use video_catalog::{logging, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    logging::init(&config)?;

    // 初始化数据库
    let db_manager = VideoDbManager::new(&config.database_path).with_context(|| {
        format!(
            "Failed to initialize database {}",
            config.database_path.display()
        )
    })?;

    // 导入种子数据（可选）
    if let Some(seed_file) = &config.seed_file {
        if let Err(e) = services::seed_from_file(&db_manager, seed_file) {
            warn!("Warning: Failed to seed database: {:#}", e);
        }
    }

    let shared_state = Arc::new(AppState::new(db_manager));
    let app = routes::build_router(shared_state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {}", addr);
    info!("Database: {}", config.database_path.display());

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

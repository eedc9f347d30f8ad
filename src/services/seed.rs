//! 从 JSON 文件导入初始数据
//!
//! 文件可以是记录数组，也可以是 `{"videos": [...]}`。已存在的 id 保持不变。

use anyhow::{bail, Context, Result};
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::models::VideoRecord;
use crate::services::creation::normalize_tags;
use crate::services::db::{VideoDao, VideoDbManager};
use crate::utils::normalize_timestamp;

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    List(Vec<VideoRecord>),
    Wrapped { videos: Vec<VideoRecord> },
}

/// 导入种子文件，返回新增条数
pub fn seed_from_file(db_manager: &VideoDbManager, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("无法读取种子文件 {}", path.display()))?;
    let seed: SeedFile = serde_json::from_str(&raw)
        .with_context(|| format!("种子文件格式错误 {}", path.display()))?;

    let videos = match seed {
        SeedFile::List(videos) | SeedFile::Wrapped { videos } => videos,
    };

    let mut prepared = Vec::with_capacity(videos.len());
    for mut video in videos {
        video.created_at = match normalize_timestamp(&video.created_at) {
            Some(ts) => ts,
            None => bail!("视频 {} 的 created_at 无法解析: {}", video.id, video.created_at),
        };
        if video.duration_seconds < 0 || video.views < 0 {
            bail!("视频 {} 的 duration / views 不能为负数", video.id);
        }
        video.tags = normalize_tags(&video.tags);
        prepared.push(video);
    }

    let inserted = VideoDao::new(db_manager)
        .import_videos(&prepared)
        .context("写入种子数据失败")?;
    info!(
        "种子数据导入完成: {} 条记录，新增 {} 条",
        prepared.len(),
        inserted
    );
    Ok(inserted)
}

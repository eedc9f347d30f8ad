//! 数据库表结构定义
//!
//! 视频表、标签表以及二者的多对多关联表

/// 建表语句
///
/// `created_at` 为固定宽度的 UTC 文本，见 [`crate::utils::format_timestamp`]。
/// 删除视频时级联删除关联行，标签本身保留。
pub const CREATE_TABLES: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS videos (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        thumbnail_url TEXT NOT NULL,
        created_at TEXT NOT NULL,
        duration INTEGER NOT NULL DEFAULT 0 CHECK (duration >= 0),
        views INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0)
    );

    CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT UNIQUE NOT NULL
    );

    CREATE TABLE IF NOT EXISTS video_tags (
        video_id TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
        tag_id INTEGER NOT NULL REFERENCES tags(id),
        PRIMARY KEY (video_id, tag_id)
    );

    CREATE INDEX IF NOT EXISTS idx_videos_created_at ON videos(created_at);
    CREATE INDEX IF NOT EXISTS idx_video_tags_tag ON video_tags(tag_id);
";

/// SQL 查询语句常量
pub mod queries {
    pub const PING: &str = "SELECT 1";

    pub const COUNT_VIDEOS: &str = "SELECT COUNT(*) FROM videos v";

    pub const SELECT_VIDEOS: &str =
        "SELECT v.id, v.title, v.thumbnail_url, v.created_at, v.duration, v.views FROM videos v";

    pub const SELECT_VIDEO_BY_ID: &str =
        "SELECT v.id, v.title, v.thumbnail_url, v.created_at, v.duration, v.views
        FROM videos v
        WHERE v.id = ?1";

    /// 按关联顺序返回标签，保持创建时的展示顺序
    pub const SELECT_TAGS_FOR_VIDEO: &str = "SELECT t.name
        FROM video_tags vt
        JOIN tags t ON t.id = vt.tag_id
        WHERE vt.video_id = ?1
        ORDER BY vt.rowid ASC";

    /// 批量取标签，调用方追加 `WHERE vt.video_id IN (...)`
    pub const SELECT_TAGS_FOR_VIDEOS: &str = "SELECT vt.video_id, t.name
        FROM video_tags vt
        JOIN tags t ON t.id = vt.tag_id";

    pub const INSERT_VIDEO: &str = "INSERT INTO videos
        (id, title, thumbnail_url, created_at, duration, views)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    /// 导入时使用：id 已存在则保持原样
    pub const INSERT_VIDEO_IF_ABSENT: &str = "INSERT OR IGNORE INTO videos
        (id, title, thumbnail_url, created_at, duration, views)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    pub const INSERT_TAG_IF_ABSENT: &str = "INSERT OR IGNORE INTO tags (name) VALUES (?1)";

    pub const SELECT_TAG_ID: &str = "SELECT id FROM tags WHERE name = ?1";

    pub const INSERT_VIDEO_TAG: &str =
        "INSERT OR IGNORE INTO video_tags (video_id, tag_id) VALUES (?1, ?2)";
}

use crate::models::{NewVideo, SortOrder, VideoRecord};
use crate::services::db::connection::VideoDbManager;
use crate::services::db::predicate::Predicate;
use crate::services::db::schema::queries;
use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension, Result, Row};
use std::collections::HashMap;

/// 视频数据访问对象
///
/// 提供视频数据的查询与写入操作
pub struct VideoDao<'a> {
    db_manager: &'a VideoDbManager,
}

impl<'a> VideoDao<'a> {
    /// 创建新的视频数据访问对象
    pub fn new(db_manager: &'a VideoDbManager) -> Self {
        Self { db_manager }
    }

    /// 在同一个读事务中执行多次查询，保证它们看到同一份数据
    pub fn in_read_transaction<T, E>(&self, f: impl FnOnce(&Self) -> std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        E: From<rusqlite::Error>,
    {
        let tx = self.db_manager.conn.unchecked_transaction()?;
        let out = f(self)?;
        tx.commit()?;
        Ok(out)
    }

    /// 统计满足条件的视频总数
    pub fn count_videos(&self, predicate: &Predicate) -> Result<u64> {
        let sql = format!("{} {}", queries::COUNT_VIDEOS, predicate.where_clause());
        let mut stmt = self.db_manager.conn.prepare(&sql)?;
        let total: i64 = stmt.query_row(params_from_iter(predicate.params()), |row| row.get(0))?;
        Ok(total.max(0) as u64)
    }

    /// 获取一页满足条件的视频
    ///
    /// 按创建时间排序，id 作为次级排序保证翻页稳定；最多返回 `limit` 条。
    pub fn fetch_page(
        &self,
        predicate: &Predicate,
        sort: SortOrder,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<VideoRecord>> {
        let direction = sort.as_sql();
        let sql = format!(
            "{} {} ORDER BY v.created_at {}, v.id {} LIMIT ? OFFSET ?",
            queries::SELECT_VIDEOS,
            predicate.where_clause(),
            direction,
            direction
        );

        let mut bound: Vec<Value> = predicate.params().to_vec();
        bound.push(Value::Integer(limit.min(i64::MAX as u64) as i64));
        bound.push(Value::Integer(offset.min(i64::MAX as u64) as i64));

        let mut stmt = self.db_manager.conn.prepare(&sql)?;
        let mut videos = stmt
            .query_map(params_from_iter(bound.iter()), map_video_row)?
            .collect::<Result<Vec<_>>>()?;

        let mut tags = self.tags_for_videos(&videos)?;
        for video in &mut videos {
            video.tags = tags.remove(&video.id).unwrap_or_default();
        }

        Ok(videos)
    }

    /// 一次查询取出整页视频的标签，按关联顺序
    fn tags_for_videos(&self, videos: &[VideoRecord]) -> Result<HashMap<String, Vec<String>>> {
        let mut tags: HashMap<String, Vec<String>> = HashMap::new();
        if videos.is_empty() {
            return Ok(tags);
        }

        let placeholders = vec!["?"; videos.len()].join(", ");
        let sql = format!(
            "{} WHERE vt.video_id IN ({}) ORDER BY vt.rowid ASC",
            queries::SELECT_TAGS_FOR_VIDEOS,
            placeholders
        );
        let mut stmt = self.db_manager.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(videos.iter().map(|v| &v.id)), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (video_id, name) = row?;
            tags.entry(video_id).or_default().push(name);
        }
        Ok(tags)
    }

    /// 根据 id 获取视频
    pub fn get_video_by_id(&self, id: &str) -> Result<Option<VideoRecord>> {
        let video = self
            .db_manager
            .conn
            .query_row(queries::SELECT_VIDEO_BY_ID, [id], map_video_row)
            .optional()?;

        match video {
            Some(mut video) => {
                video.tags = self.tags_for_video(&video.id)?;
                Ok(Some(video))
            }
            None => Ok(None),
        }
    }

    /// 视频的标签，按关联顺序
    pub fn tags_for_video(&self, video_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .db_manager
            .conn
            .prepare_cached(queries::SELECT_TAGS_FOR_VIDEO)?;
        let tag_iter = stmt.query_map([video_id], |row| row.get::<_, String>(0))?;
        let tags = tag_iter.collect::<Result<Vec<_>>>()?;
        Ok(tags)
    }

    /// 写入新视频及其标签关联
    ///
    /// 插入视频、解析标签、建立关联在同一个事务中完成，任一步失败全部回滚。
    pub fn create_video(&self, video: &NewVideo) -> Result<VideoRecord> {
        let tx = self.db_manager.conn.unchecked_transaction()?;
        tx.execute(
            queries::INSERT_VIDEO,
            params![
                video.id,
                video.title,
                video.thumbnail_url,
                video.created_at,
                video.duration_seconds,
                video.views
            ],
        )?;
        attach_tags(&tx, &video.id, &video.tags)?;
        tx.commit()?;

        self.get_video_by_id(&video.id)?
            .ok_or(rusqlite::Error::QueryReturnedNoRows)
    }

    /// 批量导入已有记录，id 已存在的跳过
    ///
    /// 返回实际新增的条数
    pub fn import_videos(&self, videos: &[VideoRecord]) -> Result<usize> {
        let tx = self.db_manager.conn.unchecked_transaction()?;
        let mut inserted = 0;

        for video in videos {
            let changed = tx.execute(
                queries::INSERT_VIDEO_IF_ABSENT,
                params![
                    video.id,
                    video.title,
                    video.thumbnail_url,
                    video.created_at,
                    video.duration_seconds,
                    video.views
                ],
            )?;
            if changed == 0 {
                continue;
            }
            attach_tags(&tx, &video.id, &video.tags)?;
            inserted += 1;
        }

        tx.commit()?;
        Ok(inserted)
    }
}

/// 标签按名称复用或新建，再与视频关联
fn attach_tags(conn: &Connection, video_id: &str, tags: &[String]) -> Result<()> {
    let mut insert_tag = conn.prepare_cached(queries::INSERT_TAG_IF_ABSENT)?;
    let mut select_tag = conn.prepare_cached(queries::SELECT_TAG_ID)?;
    let mut link = conn.prepare_cached(queries::INSERT_VIDEO_TAG)?;

    for name in tags {
        insert_tag.execute([name])?;
        let tag_id: i64 = select_tag.query_row([name], |row| row.get(0))?;
        link.execute(params![video_id, tag_id])?;
    }

    Ok(())
}

fn map_video_row(row: &Row<'_>) -> Result<VideoRecord> {
    Ok(VideoRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        thumbnail_url: row.get(2)?,
        created_at: row.get(3)?,
        duration_seconds: row.get(4)?,
        views: row.get(5)?,
        tags: Vec::new(),
    })
}

//! 视频列表查询
//!
//! 构建筛选条件 → 计数 → 收敛页码 → 取当前页 → 计算页码窗口 → 组装响应。

use log::debug;
use std::time::Instant;

use crate::errors::ApiResult;
use crate::models::{ListParams, PageResult, VideoRecord};
use crate::services::db::{Predicate, VideoDao, VideoDbManager};
use crate::services::filter::build_list_query;
use crate::services::pagination::{self, PageNav};

/// 分页列出视频
///
/// 参数校验失败时不执行任何查询；计数和取数在同一个读事务里完成，
/// 任一查询失败则整体返回错误，不会返回部分结果。
pub fn list_videos(db_manager: &VideoDbManager, raw: &ListParams) -> ApiResult<PageResult> {
    let start = Instant::now();
    let query = build_list_query(raw)?;
    let predicate = Predicate::compile(&query.filter);
    let per_page = query.page.per_page;
    let dao = VideoDao::new(db_manager);

    let result = dao.in_read_transaction(|dao| -> ApiResult<PageResult> {
        let total = dao.count_videos(&predicate)?;
        let total_pages = pagination::total_pages(total, per_page);
        let page = pagination::clamp_page(query.page.page, total_pages);
        let offset = (page - 1) * per_page;
        let items = dao.fetch_page(&predicate, query.sort, offset, per_page)?;

        Ok(assemble(items, total, per_page, PageNav::new(page, total_pages)))
    })?;

    debug!(
        "列表查询: {:?} total={} page={}/{} 耗时 {:?}",
        query.filter,
        result.total,
        result.page,
        result.total_pages,
        start.elapsed()
    );

    Ok(result)
}

fn assemble(items: Vec<VideoRecord>, total: u64, per_page: u64, nav: PageNav) -> PageResult {
    PageResult {
        items,
        total,
        page: nav.page,
        per_page,
        total_pages: nav.total_pages,
        pages: nav.pages,
        has_prev: nav.has_prev,
        has_next: nav.has_next,
        prev_page: nav.prev_page,
        next_page: nav.next_page,
    }
}

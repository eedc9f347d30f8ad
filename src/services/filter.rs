//! 筛选条件构建
//!
//! 把查询字符串里的原始参数转换成类型化的 [`ListQuery`]，不访问数据库。

use chrono::{DateTime, Utc};

use crate::errors::{ApiError, ApiResult, FieldError};
use crate::models::{FilterSpec, ListParams, ListQuery, PageRequest, SortOrder};
use crate::utils::parse_timestamp;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 6;
pub const MAX_PER_PAGE: u64 = 100;

/// 构建列表查询
///
/// - `sort` 只接受 `asc` / `desc`，默认 `desc`
/// - `page` / `perPage` 必须是整数；page 小于 1 按 1 处理，perPage 收敛到 [1, 100]
/// - `from` / `to` 必须是可识别的时间
///
/// 所有字段的错误一并返回。
pub fn build_list_query(raw: &ListParams) -> ApiResult<ListQuery> {
    let mut errors = Vec::new();

    let sort = match present(&raw.sort) {
        None => SortOrder::default(),
        Some(token) => SortOrder::parse(token).unwrap_or_else(|| {
            errors.push(FieldError::new("sort", "must be 'asc' or 'desc'"));
            SortOrder::default()
        }),
    };

    let page = parse_integer("page", present(&raw.page), DEFAULT_PAGE, &mut errors)
        .max(1) as u64;
    let per_page = parse_integer("perPage", present(&raw.per_page), DEFAULT_PER_PAGE, &mut errors)
        .clamp(1, MAX_PER_PAGE as i64) as u64;

    let from = parse_time("from", present(&raw.from), &mut errors);
    let to = parse_time("to", present(&raw.to), &mut errors);

    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    Ok(ListQuery {
        filter: FilterSpec {
            text: present(&raw.q).map(str::to_string),
            tag: present(&raw.tag).map(str::to_string),
            from,
            to,
        },
        sort,
        page: PageRequest { page, per_page },
    })
}

/// 空字符串视为未提供
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_integer(
    field: &str,
    raw: Option<&str>,
    default: u64,
    errors: &mut Vec<FieldError>,
) -> i64 {
    match raw {
        None => default as i64,
        Some(value) => value.trim().parse::<i64>().unwrap_or_else(|_| {
            errors.push(FieldError::new(field, "must be an integer"));
            default as i64
        }),
    }
}

fn parse_time(
    field: &str,
    raw: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<DateTime<Utc>> {
    let value = raw?;
    let parsed = parse_timestamp(value);
    if parsed.is_none() {
        errors.push(FieldError::new(
            field,
            "must be a date (YYYY-MM-DD) or an RFC 3339 timestamp",
        ));
    }
    parsed
}

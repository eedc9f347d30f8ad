//! 时间戳工具
//!
//! `created_at` 统一以 UTC、毫秒精度、`Z` 结尾的 RFC 3339 文本存储，
//! 固定宽度，因此数据库里的字符串比较等价于时间比较。

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// 存储格式只能表示四位年份，超出范围的时间不接受
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// 格式化为存储格式，例如 `2024-01-31T08:00:00.000Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 当前时间的存储格式
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// 解析外部传入的时间
///
/// 支持：
/// - RFC 3339（带时区）
/// - `YYYY-MM-DDTHH:MM[:SS[.fff]]` / `YYYY-MM-DD HH:MM:SS`，按 UTC 处理
/// - `YYYY-MM-DD`，当天零点 UTC
///
/// 年份不在 0..=9999 时返回 `None`。
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    parse_any(raw).filter(|ts| YEAR_RANGE.contains(&ts.year()))
}

fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 把任意支持的时间文本规范化成存储格式
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|ts| format_timestamp(&ts))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 视频记录（对外的 JSON 字段为 snake_case）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub created_at: String,
    #[serde(rename = "duration")]
    pub duration_seconds: i64,
    pub views: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 列表查询的原始参数
///
/// 服务端从查询字符串反序列化，客户端用它来拼接请求。
/// 所有字段都是未经校验的字符串，空字符串等同于未提供。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(
        default,
        rename = "perPage",
        skip_serializing_if = "Option::is_none"
    )]
    pub per_page: Option<String>,
}

impl ListParams {
    /// 生成请求用的查询参数，跳过空值并补齐默认的排序与分页
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let fields = [
            ("q", &self.q),
            ("tag", &self.tag),
            ("from", &self.from),
            ("to", &self.to),
            ("sort", &self.sort),
            ("page", &self.page),
            ("perPage", &self.per_page),
        ];
        for (key, value) in fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }

        let defaults = [
            ("sort", SortOrder::default().as_param().to_string()),
            ("page", crate::services::filter::DEFAULT_PAGE.to_string()),
            ("perPage", crate::services::filter::DEFAULT_PER_PAGE.to_string()),
        ];
        for (key, value) in defaults {
            if !pairs.iter().any(|(k, _)| *k == key) {
                pairs.push((key, value));
            }
        }
        pairs
    }

    /// 保留当前筛选条件，跳转到另一页
    pub fn for_page(&self, page: u64) -> ListParams {
        ListParams {
            page: Some(page.to_string()),
            ..self.clone()
        }
    }
}

/// 按创建时间排序的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortOrder::Ascending),
            "desc" => Some(SortOrder::Descending),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// 规范化后的筛选条件，构建之后不再修改
///
/// 每个字段为 `None` 表示该维度不做限制。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// 标题子串，不区分大小写
    pub text: Option<String>,
    /// 标签名，精确匹配
    pub tag: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// 解析阶段的分页请求：page >= 1，per_page 在 [1, 100]
///
/// page 尚未按总页数收敛，那一步要等拿到 total 之后。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

/// 一次列表请求的完整查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: FilterSpec,
    pub sort: SortOrder,
    pub page: PageRequest,
}

/// 分页响应
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub items: Vec<VideoRecord>,
    pub total: u64,
    /// 收敛后的实际页码
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub pages: Vec<u64>,
    pub has_prev: bool,
    pub has_next: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
}

/// 创建视频的请求体
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateVideoInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
}

/// 校验通过、待写入的视频
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub created_at: String,
    pub duration_seconds: i64,
    pub views: i64,
    /// 已去重，保持首次出现的顺序
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_result_wire_format() {
        let page = PageResult {
            items: vec![VideoRecord {
                id: "v1".into(),
                title: "Intro".into(),
                thumbnail_url: "https://example.com/a.webp".into(),
                created_at: "2024-01-01T00:00:00.000Z".into(),
                duration_seconds: 90,
                views: 3,
                tags: vec!["rust".into()],
            }],
            total: 1,
            page: 1,
            per_page: 6,
            total_pages: 1,
            pages: vec![1],
            has_prev: false,
            has_next: false,
            prev_page: None,
            next_page: None,
        };

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["perPage"], 6);
        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["hasPrev"], false);
        assert!(value.get("prevPage").is_none());
        assert!(value.get("nextPage").is_none());
        assert_eq!(value["items"][0]["thumbnail_url"], "https://example.com/a.webp");
        assert_eq!(value["items"][0]["created_at"], "2024-01-01T00:00:00.000Z");
        assert_eq!(value["items"][0]["duration"], 90);
    }

    #[test]
    fn test_query_pairs_skip_empty_and_fill_defaults() {
        let params = ListParams {
            q: Some("cat".into()),
            tag: Some(String::new()),
            page: Some("3".into()),
            ..Default::default()
        };
        let pairs = params.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("q", "cat".to_string()),
                ("page", "3".to_string()),
                ("sort", "desc".to_string()),
                ("perPage", "6".to_string()),
            ]
        );
    }

    #[test]
    fn test_for_page_keeps_filters() {
        let params = ListParams {
            q: Some("cat".into()),
            sort: Some("asc".into()),
            page: Some("1".into()),
            ..Default::default()
        };
        let next = params.for_page(2);
        assert_eq!(next.q.as_deref(), Some("cat"));
        assert_eq!(next.sort.as_deref(), Some("asc"));
        assert_eq!(next.page.as_deref(), Some("2"));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("asc"), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Descending));
        assert_eq!(SortOrder::parse("DESC"), None);
        assert_eq!(SortOrder::default(), SortOrder::Descending);
    }
}

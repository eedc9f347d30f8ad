//! 筛选条件到 SQL 的编译
//!
//! 计数与分页查询共用同一个 [`Predicate`]，两者的 WHERE 条件完全一致。

use rusqlite::types::Value;

use crate::models::FilterSpec;
use crate::utils::format_timestamp;

/// 编译后的 WHERE 子句及其绑定参数
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    clause: String,
    params: Vec<Value>,
}

impl Predicate {
    /// 从“全部匹配”开始，每个存在的字段追加一个 AND 条件
    pub fn compile(filter: &FilterSpec) -> Self {
        let mut clause = String::from("WHERE 1 = 1");
        let mut params: Vec<Value> = Vec::new();

        if let Some(text) = &filter.text {
            // 两边都按 Unicode 转小写后做子串匹配，输入中的 % 和 _ 按字面处理
            clause.push_str(" AND instr(unicode_lower(v.title), ?) > 0");
            params.push(Value::Text(text.to_lowercase()));
        }

        if let Some(tag) = &filter.tag {
            clause.push_str(
                " AND EXISTS (SELECT 1 FROM video_tags vt JOIN tags t ON t.id = vt.tag_id
                 WHERE vt.video_id = v.id AND t.name = ?)",
            );
            params.push(Value::Text(tag.clone()));
        }

        if let Some(from) = &filter.from {
            clause.push_str(" AND v.created_at >= ?");
            params.push(Value::Text(format_timestamp(from)));
        }

        if let Some(to) = &filter.to {
            clause.push_str(" AND v.created_at <= ?");
            params.push(Value::Text(format_timestamp(to)));
        }

        Self { clause, params }
    }

    pub fn where_clause(&self) -> &str {
        &self.clause
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

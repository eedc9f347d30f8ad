use rusqlite::{functions::FunctionFlags, Connection, Result};
use std::path::Path;

use crate::services::db::schema::{queries, CREATE_TABLES};

/// 数据库连接管理器
///
/// 负责数据库连接的创建、初始化和管理
pub struct VideoDbManager {
    pub(crate) conn: Connection,
}

impl VideoDbManager {
    /// 打开数据库文件并创建表结构（如果不存在）
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::init(Connection::open(db_path)?)
    }

    /// 内存数据库，主要用于测试
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        register_functions(&conn)?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self { conn })
    }

    /// 检查存储是否可用
    pub fn ping(&self) -> Result<()> {
        self.conn.query_row(queries::PING, [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

/// 标题搜索用的 SQL 函数
///
/// SQLite 自带的 `lower` / `LIKE` 只处理 ASCII，`unicode_lower` 按 Unicode 规则转小写。
pub const UNICODE_LOWER: &str = "unicode_lower";

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

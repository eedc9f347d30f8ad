//! 运行配置
//!
//! 先加载 `.env`（若存在），再从环境变量读取。

use anyhow::{anyhow, Result};
use log::LevelFilter;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    /// 启动时导入的 JSON 种子文件
    pub seed_file: Option<PathBuf>,
    /// log4rs 的 YAML 配置文件，未设置时使用内置的控制台输出
    pub log_config: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 4000,
            database_path: PathBuf::from("videos.db"),
            seed_file: None,
            log_config: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意查找函数构建配置，空值视为未设置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: parse_var("HOST", get("HOST"))?.unwrap_or(defaults.host),
            port: parse_var("PORT", get("PORT"))?.unwrap_or(defaults.port),
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            seed_file: get("SEED_FILE").map(PathBuf::from),
            log_config: get("LOG_CONFIG").map(PathBuf::from),
            log_level: parse_var("LOG_LEVEL", get("LOG_LEVEL"))?.unwrap_or(defaults.log_level),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(key: &str, raw: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("invalid value for {}: {:?} ({})", key, value, e))
    })
    .transpose()
}

//! 日志初始化
//!
//! 统一使用 `log` 门面，后端为 log4rs。

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Logger, Root},
    encode::pattern::PatternEncoder,
};

use crate::config::AppConfig;

/// 控制台输出格式，级别带颜色
pub const CONSOLE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}";

/// 初始化全局日志
///
/// 配置了 `LOG_CONFIG` 时读取该 YAML 文件，否则输出到控制台。
pub fn init(config: &AppConfig) -> Result<()> {
    if let Some(path) = &config.log_config {
        log4rs::init_file(path, Default::default())
            .with_context(|| format!("无法加载日志配置 {}", path.display()))?;
        return Ok(());
    }

    log4rs::init_config(console_config(config.log_level)?).context("日志初始化失败")?;
    Ok(())
}

/// 内置的控制台日志配置
pub fn console_config(level: LevelFilter) -> Result<Config> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        // 第三方库的连接细节不需要
        .logger(Logger::builder().build("hyper", LevelFilter::Warn))
        .logger(Logger::builder().build("reqwest", LevelFilter::Warn))
        .build(Root::builder().appender("stdout").build(level))
        .context("日志配置无效")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_config_builds() {
        let config = console_config(LevelFilter::Debug).unwrap();
        assert_eq!(config.root().level(), LevelFilter::Debug);
        assert_eq!(config.appenders().len(), 1);
    }
}

//! # Logging 模块
//!
//! 初始化 tracing 订阅器。日志写到 stderr，stdout 只输出帧。
//!
//! 过滤规则取自 `RUST_LOG`，未设置时使用传入的默认级别。

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 重复调用时保留第一次的订阅器（测试中多次调用不会 panic）。
pub fn init(default_level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 按 `-v` 次数选择默认级别
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

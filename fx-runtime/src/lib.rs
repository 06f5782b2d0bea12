//! # FX Runtime
//!
//! 文字效果引擎的核心运行时库。
//!
//! ## 架构概述
//!
//! `fx-runtime` 是纯逻辑核心，不依赖任何渲染后端。
//! 它通过 **定时器指令** 与宿主层（Host）通信：
//!
//! ```text
//! Host                               Runtime
//!   │                                   │
//!   │──── EngineCommand::Trigger ──────►│ arm()
//!   │◄─── TimerDirective::Register ─────│
//!   │                                   │
//!   │──── 定时器到期 ──────────────────►│ tick()
//!   │◄─── TimerDirective::Keep ─────────│   └─ effect(ctx) -> TextSink
//!   │              ...                  │
//!   │◄─── TimerDirective::Unregister ───│
//! ```
//!
//! ## 核心类型
//!
//! - [`TickerEngine`]：调度引擎
//! - [`TextSink`]：宿主实现的输出端
//! - [`EffectRegistry`]：效果名到效果函数的映射
//! - [`EngineConfig`]：引擎配置
//!
//! ## 使用示例
//!
//! ```ignore
//! use fx_runtime::{EngineConfig, MemorySink, SurfaceKind, TickerEngine, TimerDirective};
//!
//! let config = EngineConfig::new("typewriter", "Hello");
//! let mut engine = TickerEngine::new(config, MemorySink::new(SurfaceKind::FreeType2))?;
//!
//! if let TimerDirective::Register { interval_ms } = engine.arm()? {
//!     loop {
//!         sleep(interval_ms);
//!         if engine.tick()?.is_unregister() {
//!             break;
//!         }
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`command`]：宿主命令与定时器指令
//! - [`config`]：引擎配置
//! - [`effects`]：效果实现与注册表
//! - [`error`]：错误类型定义
//! - [`palette`]：rainbow 调色板
//! - [`runtime`]：调度引擎
//! - [`sink`]：输出端契约
//! - [`state`]：运行状态与效果游标
//! - [`template`]：文字模板
//! - [`text`]：文字来源

pub mod command;
pub mod config;
pub mod effects;
pub mod error;
pub mod palette;
pub mod runtime;
pub mod sink;
pub mod state;
pub mod template;
pub mod text;

// 重导出核心类型
pub use command::{EngineCommand, TimerDirective};
pub use config::EngineConfig;
pub use effects::{EffectContext, EffectEntry, EffectFn, EffectRegistry};
pub use error::{ConfigError, FxError, FxResult, SinkError, TemplateError};
pub use runtime::TickerEngine;
pub use sink::{
    Color, FilterHandle, FilterKind, MemorySink, Position, SinkEvent, SurfaceKind, TextSink,
};
pub use state::{EffectCursor, IDLE_DURATION_MS, RunState};
pub use text::{FILE_ERROR_TEXT, TextSource};

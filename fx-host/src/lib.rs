//! # FX Host
//!
//! 无界面的文字效果宿主。
//!
//! 负责读取配置、把帧输出到终端，并按引擎返回的
//! [`TimerDirective`](fx_runtime::TimerDirective) 维护唯一的定时器。
//!
//! ## 模块结构
//!
//! - [`config`]：宿主配置（JSON）
//! - [`logging`]：日志初始化
//! - [`scheduler`]：单定时器调度器
//! - [`sink`]：终端输出端

pub mod config;
pub mod logging;
pub mod scheduler;
pub mod sink;

pub use config::{AppConfig, HostConfigError, SurfaceConfig};
pub use scheduler::{ClockMode, RunReport, Scheduler, SchedulerError, ScriptedCommand};
pub use sink::TerminalSink;

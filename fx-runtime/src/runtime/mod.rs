//! # Runtime 模块
//!
//! 效果引擎核心，负责倒计时、效果调度和运行结束时的状态重置。
//!
//! ## 模块结构
//!
//! - [`engine`]：核心调度引擎

pub mod engine;

pub use engine::TickerEngine;

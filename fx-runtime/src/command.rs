//! # Command 模块
//!
//! 宿主与引擎之间的两类消息：
//!
//! - [`EngineCommand`]：宿主（热键、按钮）发给引擎的命令
//! - [`TimerDirective`]：引擎返回给宿主的定时器指令
//!
//! 引擎自己不持有定时器。它只告诉宿主“注册一个”“保持”或“注销”，
//! 由宿主的调度器执行。

use serde::{Deserialize, Serialize};

/// 宿主发给引擎的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineCommand {
    /// 触发效果（热键）
    Trigger,
    /// 提前结束当前运行
    Reset,
    /// 预览，与 Trigger 等价
    Preview,
}

/// 引擎返回给宿主的定时器指令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerDirective {
    /// 注册一个周期为 `interval_ms` 的定时器，每次到期调用 `tick()`
    Register { interval_ms: u32 },
    /// 不改变定时器
    Keep,
    /// 注销当前定时器
    Unregister,
}

impl TimerDirective {
    /// 是否要求注销定时器
    pub fn is_unregister(&self) -> bool {
        matches!(self, Self::Unregister)
    }
}

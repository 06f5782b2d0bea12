//! # Effects 模块
//!
//! 所有文字效果的实现。
//!
//! 每个效果是一个无状态函数 [`EffectFn`]：从 [`EffectContext`] 读取文字与游标，
//! 写入 sink，推进游标。效果之间不共享任何隐式状态。
//!
//! ## 模块结构
//!
//! - [`registry`]：效果名到函数的映射
//! - [`basic`]：static / blink / rainbow / loading
//! - [`motion`]：tremor
//! - [`filter`]：scroll / hue / fade（基于滤镜）
//! - [`reveal`]：typewriter / scramble / fastread / erase
//! - [`readout`]：timer / percent（模板替换）

pub mod basic;
pub mod filter;
pub mod motion;
pub mod readout;
pub mod registry;
pub mod reveal;

pub use registry::{EffectEntry, EffectRegistry};

use rand::RngCore;

use crate::error::SinkError;
use crate::sink::{Color, TextSink};
use crate::state::{EffectCursor, RunState};

/// 效果函数
pub type EffectFn = fn(&mut EffectContext<'_>) -> Result<(), SinkError>;

/// 剩余 tick 数不超过此值时，带收尾动作的效果会提前结束整个运行
pub const FINAL_TICKS: i64 = 3;

/// 效果执行一次 tick 所能访问的全部状态
pub struct EffectContext<'a> {
    /// 输出端
    pub sink: &'a mut dyn TextSink,
    /// 效果游标
    pub cursor: &'a mut EffectCursor,
    /// 运行状态（效果可以提前结束运行）
    pub run: &'a mut RunState,
    /// 本次 tick 的文字
    pub text: &'a str,
    /// 刷新间隔
    pub refresh_rate_ms: u32,
    /// 运行总时长
    pub effect_duration_ms: u64,
    /// 随机数源
    pub rng: &'a mut dyn RngCore,
}

impl EffectContext<'_> {
    /// 显示文字
    pub fn show(&mut self, text: &str) -> Result<(), SinkError> {
        self.sink.set_text(text, None)
    }

    /// 带颜色显示文字
    pub fn show_colored(&mut self, text: &str, color: Color) -> Result<(), SinkError> {
        self.sink.set_text(text, Some(color))
    }

    /// 按显示对象约定清空
    pub fn clear(&mut self) -> Result<(), SinkError> {
        self.sink.clear()
    }

    /// 是否进入最后几个 tick
    pub fn in_final_ticks(&self) -> bool {
        let refresh = i64::from(self.refresh_rate_ms.max(1));
        self.run.remaining_duration_ms.div_euclid(refresh) <= FINAL_TICKS
    }

    /// 让本次 tick 成为最后一个 tick
    pub fn finish_early(&mut self) {
        self.run.remaining_duration_ms = 0;
    }

    /// 返回 true 表示这是本次运行中第一次调用（之后都返回 false）
    pub fn take_first_tick(&mut self) -> bool {
        std::mem::replace(&mut self.run.is_first_tick, false)
    }

    /// 剩余时长占总时长的百分比
    ///
    /// 任一项为 0 时返回 0。
    pub fn completion_percent(&self) -> f64 {
        completion_percent(self.effect_duration_ms, self.run.remaining_duration_ms)
    }
}

/// 剩余时长占总时长的百分比：`100 / (total / remaining)`
pub fn completion_percent(total_ms: u64, remaining_ms: i64) -> f64 {
    if total_ms == 0 || remaining_ms == 0 {
        return 0.0;
    }
    100.0 / (total_ms as f64 / remaining_ms as f64)
}

/// 字符右侧补空格到 `width`
pub(crate) fn pad_right(chars: &[char], width: usize) -> String {
    let mut out: String = chars.iter().collect();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(chars.len())));
    out
}

//! # State 模块
//!
//! 定义引擎的运行状态和各效果的游标。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**
//! - 一次运行结束后，所有游标回到 [`EffectCursor::default()`]
//! - 不允许隐式全局状态

use serde::{Deserialize, Serialize};

/// 空闲时的剩余时长
pub const IDLE_DURATION_MS: i64 = 5_000;

/// 引擎的运行状态
///
/// # 状态转换
///
/// ```text
/// Idle    --arm()-->           Running
/// Running --arm()-->           Running（只重置倒计时）
/// Running --剩余时长 <= 0-->    Idle
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    /// 剩余时长，每次 tick 减少一个刷新间隔
    pub remaining_duration_ms: i64,
    /// 是否已有定时器在运行
    pub is_armed: bool,
    /// 当前运行是否还没有 tick 过效果的首次初始化
    pub is_first_tick: bool,
    /// 声音和图层是否已经同步启动
    pub started_sync: bool,
    /// 本次运行绑定的效果名（arm 时确定）
    pub bound_effect: Option<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            remaining_duration_ms: IDLE_DURATION_MS,
            is_armed: false,
            is_first_tick: true,
            started_sync: false,
            bound_effect: None,
        }
    }

    /// 是否处于运行中
    pub fn is_running(&self) -> bool {
        self.is_armed
    }

    /// 回到空闲状态
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// 效果游标
///
/// 每个字段只在运行期间有意义，运行结束时整体重置。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectCursor {
    /// blink 周期位置
    pub blink_index: usize,
    /// rainbow 调色板位置
    pub palette_index: usize,
    /// rainbow 内联语法解析出的文字
    pub rainbow_text: Option<String>,
    /// rainbow 内联语法解析出的颜色
    pub rainbow_palette: Vec<u32>,
    /// loading 点号周期位置
    pub dots_index: usize,
    /// tremor 的“保持 / 跳动”周期位置
    pub tremor_phase: usize,
    /// tremor 上一次跳动的偏移
    pub last_jump: (i32, i32),
    /// typewriter 已显示的字符数
    pub typewriter_index: usize,
    /// scramble 帧序列（首次 tick 生成）
    pub scramble_frames: Option<Vec<String>>,
    /// scramble 下一帧
    pub scramble_index: usize,
    /// fastread 单词（首次 tick 生成）
    pub words: Option<Vec<String>>,
    /// fastread 下一个单词
    pub word_index: usize,
    /// erase 短语（首次 tick 生成）
    pub phrases: Vec<String>,
    /// erase 当前短语
    pub phrase_index: usize,
    /// erase 输入阶段的字符数
    pub erase_index: usize,
    /// erase 删除阶段已删除的字符数
    pub erase_reversal: usize,
}

impl EffectCursor {
    /// 是否处于初始值
    pub fn is_initial(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

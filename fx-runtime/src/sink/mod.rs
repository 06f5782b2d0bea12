//! # Sink 模块
//!
//! 引擎与宿主之间的输出契约。
//!
//! ## 设计原则
//!
//! - 引擎只通过 [`TextSink`] 改变外部世界
//! - 契约尽量窄：文字、位置、滤镜、声音、图层
//! - 不包含任何具体宿主（OBS、终端等）的类型
//!
//! 所有操作返回 `Result<_, SinkError>`。sink 报告的错误属于契约违例，
//! 引擎不吞掉，直接交还宿主。

pub mod memory;

pub use memory::{MemorySink, SinkEvent};

use serde::{Deserialize, Serialize};

use crate::error::SinkError;

/// 文字显示对象的类型
///
/// 不同类型清空文字的方式不同：GDI+ 接受空字符串，
/// FreeType2 在空字符串下会残留上一帧，必须写入单个空格。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// GDI+ 文字源
    GdiPlus,
    /// FreeType2 文字源
    FreeType2,
    /// 未知类型，按 FreeType2 处理
    #[default]
    Unknown,
}

impl SurfaceKind {
    /// 该类型下表示“无内容”的文字
    pub fn blank_text(self) -> &'static str {
        match self {
            Self::GdiPlus => "",
            Self::FreeType2 | Self::Unknown => " ",
        }
    }
}

/// 文字颜色
///
/// `user_supplied` 标记颜色是否来自用户内联调色板，
/// FreeType2 对两种来源的编码不同（见 [`Color::surface_value`]）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// 0xRRGGBB
    pub rgb: u32,
    /// 是否来自用户输入
    pub user_supplied: bool,
}

impl Color {
    /// 内置调色板颜色
    pub fn builtin(rgb: u32) -> Self {
        Self {
            rgb,
            user_supplied: false,
        }
    }

    /// 用户提供的颜色
    pub fn user(rgb: u32) -> Self {
        Self {
            rgb,
            user_supplied: true,
        }
    }

    /// 按显示对象类型编码颜色值
    ///
    /// - GDI+：原样使用
    /// - FreeType2 / 未知：`0xFF` 前缀加十六进制数字；
    ///   用户颜色的十六进制数字串需要先反转
    pub fn surface_value(self, kind: SurfaceKind) -> u32 {
        match kind {
            SurfaceKind::GdiPlus => self.rgb,
            SurfaceKind::FreeType2 | SurfaceKind::Unknown => {
                let digits = format!("{:x}", self.rgb);
                let digits: String = if self.user_supplied {
                    digits.chars().rev().collect()
                } else {
                    digits
                };
                // 最多 8 位十六进制，超出部分截断到低 32 位
                u64::from_str_radix(&format!("ff{digits}"), 16)
                    .map(|v| (v & 0xFFFF_FFFF) as u32)
                    .unwrap_or(self.rgb)
            }
        }
    }
}

/// 显示对象在场景中的位置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 平移
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx as f32,
            y: self.y + dy as f32,
        }
    }
}

/// 引擎会挂载的滤镜种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// 水平滚动
    Scroll,
    /// 色相偏移
    HueShift,
    /// 不透明度
    Fade,
}

impl FilterKind {
    /// 挂载到显示对象上时使用的滤镜名
    pub fn filter_name(self) -> &'static str {
        match self {
            Self::Scroll => "fx_scroll",
            Self::HueShift => "fx_hue",
            Self::Fade => "fx_fade",
        }
    }

    /// 滤镜的主参数键
    pub fn param_key(self) -> &'static str {
        match self {
            Self::Scroll => "speed_x",
            Self::HueShift => "hue_shift",
            Self::Fade => "opacity",
        }
    }

    /// 新建滤镜时写入的初始参数
    pub fn initial_value(self) -> Option<i64> {
        match self {
            Self::Scroll => Some(SCROLL_SPEED),
            Self::HueShift | Self::Fade => None,
        }
    }
}

/// 滚动滤镜的水平速度
pub const SCROLL_SPEED: i64 = 5000;

/// sink 分配的滤镜句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilterHandle(pub u64);

/// 文字输出端
///
/// 宿主实现此 trait，把引擎的输出落到真实的显示对象上。
/// 一个 sink 绑定一个文字显示对象。
pub trait TextSink {
    /// 绑定的显示对象类型
    fn surface_kind(&self) -> SurfaceKind;

    /// 写入文字，可选颜色
    fn set_text(&mut self, text: &str, color: Option<Color>) -> Result<(), SinkError>;

    /// 当前位置；显示对象不在当前场景时返回 `None`
    fn position(&self) -> Result<Option<Position>, SinkError>;

    /// 设置位置
    fn set_position(&mut self, position: Position) -> Result<(), SinkError>;

    /// 确保滤镜存在（不存在则创建），返回句柄；无法挂载时返回 `None`
    fn ensure_filter(&mut self, kind: FilterKind) -> Result<Option<FilterHandle>, SinkError>;

    /// 更新滤镜参数
    fn update_filter(&mut self, handle: FilterHandle, key: &str, value: i64)
    -> Result<(), SinkError>;

    /// 移除滤镜
    fn remove_filter(&mut self, handle: FilterHandle) -> Result<(), SinkError>;

    /// 从头播放媒体源
    fn play_sound(&mut self, source: &str) -> Result<(), SinkError>;

    /// 停止媒体源
    fn stop_sound(&mut self, source: &str) -> Result<(), SinkError>;

    /// 显示或隐藏图层
    fn set_layer_visible(&mut self, layer: &str, visible: bool) -> Result<(), SinkError>;

    /// 按显示对象的约定清空文字
    fn clear(&mut self) -> Result<(), SinkError> {
        let blank = self.surface_kind().blank_text();
        self.set_text(blank, None)
    }
}

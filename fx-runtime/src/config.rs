//! # Config 模块
//!
//! 引擎运行所需的配置。由宿主构造，运行期间引擎只读。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::text::TextSource;

/// 默认刷新间隔（毫秒）
pub const DEFAULT_REFRESH_RATE_MS: u32 = 250;

/// 默认效果时长（毫秒）
pub const DEFAULT_EFFECT_DURATION_MS: u64 = 3_000;

/// 默认效果
pub const DEFAULT_EFFECT: &str = "static";

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 两次 tick 之间的间隔
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u32,

    /// 一次运行的总时长
    #[serde(default = "default_effect_duration_ms")]
    pub effect_duration_ms: u64,

    /// 选中的效果名
    #[serde(default = "default_effect")]
    pub selected_effect: String,

    /// 文字来源
    #[serde(default)]
    pub text: TextSource,

    /// 运行开始时播放的媒体源
    #[serde(default)]
    pub sound_source: Option<String>,

    /// 运行期间显示的图层
    #[serde(default)]
    pub layer_source: Option<String>,
}

fn default_refresh_rate_ms() -> u32 {
    DEFAULT_REFRESH_RATE_MS
}

fn default_effect_duration_ms() -> u64 {
    DEFAULT_EFFECT_DURATION_MS
}

fn default_effect() -> String {
    DEFAULT_EFFECT.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate_ms(),
            effect_duration_ms: default_effect_duration_ms(),
            selected_effect: default_effect(),
            text: TextSource::default(),
            sound_source: None,
            layer_source: None,
        }
    }
}

impl EngineConfig {
    /// 用给定效果与文字创建配置，其余取默认值
    pub fn new(effect: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            selected_effect: effect.into(),
            text: TextSource::inline(text),
            ..Self::default()
        }
    }

    pub fn with_timing(mut self, refresh_rate_ms: u32, effect_duration_ms: u64) -> Self {
        self.refresh_rate_ms = refresh_rate_ms;
        self.effect_duration_ms = effect_duration_ms;
        self
    }

    pub fn with_sound(mut self, source: impl Into<String>) -> Self {
        self.sound_source = Some(source.into());
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer_source = Some(layer.into());
        self
    }

    /// 验证配置
    ///
    /// 效果名是否注册不在这里检查，由 tick 时的解析负责。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_rate_ms == 0 {
            return Err(ConfigError::ZeroRefreshRate);
        }
        if self.selected_effect.trim().is_empty() {
            return Err(ConfigError::EmptyEffect);
        }
        Ok(())
    }
}

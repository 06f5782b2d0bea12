//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (fx.json)
//! 3. 默认值（最低）
//!
//! 时长在文件中以秒为单位，交给引擎前换算为毫秒。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use fx_runtime::{EngineConfig, SurfaceKind, TextSource};

/// 刷新间隔允许的范围（毫秒）
pub const REFRESH_RATE_RANGE_MS: std::ops::RangeInclusive<u32> = 15..=5000;

/// 效果时长允许的范围（秒）
pub const DURATION_RANGE_SECS: std::ops::RangeInclusive<u32> = 1..=3600;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 效果名
    #[serde(default = "default_effect")]
    pub effect: String,

    /// 内联文字（配置了 `file` 时忽略）
    #[serde(default = "default_text")]
    pub text: String,

    /// 从文件读取文字
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// 每个 tick 重新读取文件
    #[serde(default)]
    pub reload: bool,

    /// 刷新间隔（毫秒）
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u32,

    /// 效果时长（秒）
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,

    /// 运行开始时播放的媒体源
    #[serde(default)]
    pub sound_source: Option<String>,

    /// 运行期间显示的图层
    #[serde(default)]
    pub layer_source: Option<String>,

    /// 显示对象配置
    #[serde(default)]
    pub surface: SurfaceConfig,
}

/// 显示对象配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// 显示对象类型，决定清空方式与颜色编码
    #[serde(default)]
    pub kind: SurfaceKind,

    /// 显示对象名称（日志中使用）
    #[serde(default = "default_surface_name")]
    pub name: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            kind: SurfaceKind::default(),
            name: default_surface_name(),
        }
    }
}

// 默认值函数
fn default_effect() -> String {
    fx_runtime::config::DEFAULT_EFFECT.to_string()
}

fn default_text() -> String {
    "default value".to_string()
}

fn default_refresh_rate_ms() -> u32 {
    fx_runtime::config::DEFAULT_REFRESH_RATE_MS
}

fn default_duration_secs() -> u32 {
    3
}

fn default_surface_name() -> String {
    "ticker".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            effect: default_effect(),
            text: default_text(),
            file: None,
            reload: false,
            refresh_rate_ms: default_refresh_rate_ms(),
            duration_secs: default_duration_secs(),
            sound_source: None,
            layer_source: None,
            surface: SurfaceConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    ///
    /// 文件不存在或解析失败时使用默认配置。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                info!(path = %path.display(), "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(error = %e, "使用默认配置");
                Self::default()
            }
        }
    }

    /// 严格读取配置，任何失败都返回错误
    pub fn read(path: impl AsRef<Path>) -> Result<Self, HostConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| HostConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content)
            .map_err(|e| HostConfigError::SerializationFailed(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HostConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HostConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| HostConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    ///
    /// 效果名是否注册不在这里检查：未知效果在运行时报告。
    pub fn validate(&self) -> Result<(), HostConfigError> {
        if !REFRESH_RATE_RANGE_MS.contains(&self.refresh_rate_ms) {
            return Err(HostConfigError::ValidationFailed(format!(
                "refresh_rate_ms 必须在 {} - {} 之间，当前为 {}",
                REFRESH_RATE_RANGE_MS.start(),
                REFRESH_RATE_RANGE_MS.end(),
                self.refresh_rate_ms
            )));
        }

        if !DURATION_RANGE_SECS.contains(&self.duration_secs) {
            return Err(HostConfigError::ValidationFailed(format!(
                "duration_secs 必须在 {} - {} 之间，当前为 {}",
                DURATION_RANGE_SECS.start(),
                DURATION_RANGE_SECS.end(),
                self.duration_secs
            )));
        }

        if self.effect.trim().is_empty() {
            return Err(HostConfigError::ValidationFailed(
                "必须配置 effect（效果名）".to_string(),
            ));
        }

        Ok(())
    }

    /// 文字来源
    pub fn text_source(&self) -> TextSource {
        match &self.file {
            Some(path) => TextSource::file(path.clone(), self.reload),
            None => TextSource::inline(self.text.clone()),
        }
    }

    /// 转换为引擎配置
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            refresh_rate_ms: self.refresh_rate_ms,
            effect_duration_ms: u64::from(self.duration_secs) * 1000,
            selected_effect: self.effect.clone(),
            text: self.text_source(),
            sound_source: self.sound_source.clone(),
            layer_source: self.layer_source.clone(),
        }
    }
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.effect, "static");
        assert_eq!(config.refresh_rate_ms, 250);
        assert_eq!(config.duration_secs, 3);
        assert_eq!(config.surface.kind, SurfaceKind::Unknown);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            effect: "rainbow".to_string(),
            sound_source: Some("ding".to_string()),
            ..AppConfig::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();

        let loaded: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "effect": "timer", "surface": { "kind": "gdi_plus" } }"#)
                .unwrap();
        assert_eq!(config.effect, "timer");
        assert_eq!(config.refresh_rate_ms, 250);
        assert_eq!(config.surface.kind, SurfaceKind::GdiPlus);
        assert_eq!(config.surface.name, "ticker");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.refresh_rate_ms = 10;
        assert!(matches!(
            config.validate(),
            Err(HostConfigError::ValidationFailed(_))
        ));

        config.refresh_rate_ms = 5000;
        assert!(config.validate().is_ok());

        config.duration_secs = 0;
        assert!(config.validate().is_err());

        config.duration_secs = 3600;
        config.effect = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_engine_config() {
        let config = AppConfig {
            effect: "percent".to_string(),
            duration_secs: 5,
            refresh_rate_ms: 100,
            file: Some(PathBuf::from("news.txt")),
            reload: true,
            layer_source: Some("banner".to_string()),
            ..AppConfig::default()
        };
        let engine = config.to_engine_config();
        assert_eq!(engine.effect_duration_ms, 5000);
        assert_eq!(engine.refresh_rate_ms, 100);
        assert_eq!(engine.selected_effect, "percent");
        assert_eq!(engine.text, TextSource::file("news.txt", true));
        assert_eq!(engine.layer_source.as_deref(), Some("banner"));
        assert!(engine.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("missing.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_invalid_json_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fx.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(AppConfig::load(&path), AppConfig::default());
        assert!(matches!(
            AppConfig::read(&path),
            Err(HostConfigError::SerializationFailed(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fx.json");
        let config = AppConfig {
            effect: "erase".to_string(),
            text: "one;two".to_string(),
            ..AppConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path), config);
    }
}

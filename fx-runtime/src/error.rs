//! # Error 模块
//!
//! 定义 fx-runtime 中使用的错误类型。

use thiserror::Error;

/// 输出端（TextSink）错误
///
/// 由宿主实现的 sink 返回。引擎不会尝试恢复，原样向上传递给宿主。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// 找不到绑定的显示对象
    #[error("显示对象 '{name}' 不存在")]
    SurfaceNotFound { name: String },

    /// 滤镜句柄已失效
    #[error("滤镜句柄 {handle} 已失效")]
    StaleFilter { handle: u64 },

    /// 宿主后端报告的其他错误
    #[error("宿主后端错误: {message}")]
    Backend { message: String },
}

/// 模板替换错误
///
/// 只在 timer / percent 效果内部出现，效果会回退为显示原始文本。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    /// `$` 后面既不是标识符也不是 `$` / `{`
    #[error("第 {position} 个字符处的占位符无效")]
    InvalidPlaceholder { position: usize },

    /// 模板引用了未提供的变量
    #[error("模板变量 '{key}' 未提供")]
    MissingKey { key: String },
}

/// 引擎配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 刷新间隔必须大于 0
    #[error("刷新间隔必须大于 0 毫秒")]
    ZeroRefreshRate,

    /// 未选择效果
    #[error("未选择效果")]
    EmptyEffect,
}

/// fx-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    /// 选中的效果没有注册
    #[error("没有名为 '{name}' 的效果")]
    UnknownEffect { name: String },

    /// 输出端错误
    #[error("输出端错误: {0}")]
    Sink(#[from] SinkError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_converts_into_fx_error() {
        let err: FxError = SinkError::SurfaceNotFound {
            name: "caption".to_string(),
        }
        .into();
        assert!(matches!(err, FxError::Sink(SinkError::SurfaceNotFound { .. })));
        assert!(err.to_string().contains("caption"));
    }

    #[test]
    fn test_unknown_effect_message_names_effect() {
        let err = FxError::UnknownEffect {
            name: "doesnotexist".to_string(),
        };
        assert!(err.to_string().contains("doesnotexist"));
    }
}

//! # Text 模块
//!
//! 效果所用文字的来源：直接给出，或从 UTF-8 文件读取。

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// 文件读取失败时显示的文字
pub const FILE_ERROR_TEXT: &str = "error";

/// 文字来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextSource {
    /// 直接给出的文字
    Inline { text: String },
    /// 从文件读取
    ///
    /// `reload` 为 true 时每次取文字都重新读取文件，
    /// 否则只在配置生效时读取一次。
    File { path: PathBuf, reload: bool },
}

impl TextSource {
    pub fn inline(text: impl Into<String>) -> Self {
        Self::Inline { text: text.into() }
    }

    pub fn file(path: impl Into<PathBuf>, reload: bool) -> Self {
        Self::File {
            path: path.into(),
            reload,
        }
    }

    /// 每次取文字时是否需要重新读取
    pub fn is_live(&self) -> bool {
        matches!(self, Self::File { reload: true, .. })
    }

    /// 读取当前文字
    ///
    /// 文件读取失败时返回 [`FILE_ERROR_TEXT`]，不会失败。
    pub fn load(&self) -> String {
        match self {
            Self::Inline { text } => text.clone(),
            Self::File { path, .. } => match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = ?path, error = %e, "读取文字文件失败");
                    FILE_ERROR_TEXT.to_string()
                }
            },
        }
    }
}

impl Default for TextSource {
    fn default() -> Self {
        Self::inline("default value")
    }
}

/// 已解析的文字
///
/// 缓存一次读取的结果；来源为 live 文件时每次 [`current`](Self::current)
/// 都重新读取。
#[derive(Debug, Clone)]
pub struct ResolvedText {
    source: TextSource,
    cached: String,
}

impl ResolvedText {
    pub fn new(source: TextSource) -> Self {
        let cached = source.load();
        Self { source, cached }
    }

    /// 当前文字
    pub fn current(&mut self) -> &str {
        if self.source.is_live() {
            self.cached = self.source.load();
        }
        &self.cached
    }

    pub fn source(&self) -> &TextSource {
        &self.source
    }
}

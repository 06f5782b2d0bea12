//! # Effect Registry
//!
//! 效果名到效果函数的映射。
//! 这是所有效果名称的**唯一来源**：引擎在 tick 时只通过
//! [`EffectRegistry::resolve`] 查找效果。

use std::collections::HashMap;

use crate::effects::{EffectFn, basic, filter, motion, readout, reveal};
use crate::error::FxError;

/// 注册表中的一项
#[derive(Clone, Copy)]
pub struct EffectEntry {
    /// 效果名（大小写敏感）
    pub name: &'static str,
    /// 一句话说明，供宿主展示
    pub summary: &'static str,
    /// 效果函数
    pub advance: EffectFn,
}

impl std::fmt::Debug for EffectEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectEntry")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

/// 内置效果
const BUILTIN: &[EffectEntry] = &[
    EffectEntry {
        name: "static",
        summary: "原样显示文字",
        advance: basic::static_text,
    },
    EffectEntry {
        name: "blink",
        summary: "文字一闪一灭",
        advance: basic::blink,
    },
    EffectEntry {
        name: "rainbow",
        summary: "循环调色板着色，支持 `文字;0xff00ff,0x00ff` 自定义颜色",
        advance: basic::rainbow,
    },
    EffectEntry {
        name: "loading",
        summary: "文字后循环追加点号",
        advance: basic::loading,
    },
    EffectEntry {
        name: "tremor",
        summary: "在 [-100, 100] 范围内随机抖动位置",
        advance: motion::tremor,
    },
    EffectEntry {
        name: "scroll",
        summary: "高速水平滚动（滤镜）",
        advance: filter::scroll,
    },
    EffectEntry {
        name: "hue",
        summary: "随机色相偏移（滤镜）",
        advance: filter::hue,
    },
    EffectEntry {
        name: "fade",
        summary: "随剩余时长淡出（滤镜）",
        advance: filter::fade,
    },
    EffectEntry {
        name: "typewriter",
        summary: "逐字打出",
        advance: reveal::typewriter,
    },
    EffectEntry {
        name: "scramble",
        summary: "随机字符逐个揭示",
        advance: reveal::scramble,
    },
    EffectEntry {
        name: "fastread",
        summary: "每次显示一个单词，用 `;` 分隔",
        advance: reveal::fastread,
    },
    EffectEntry {
        name: "erase",
        summary: "逐字打出再逐字删除，循环 `;` 分隔的短语",
        advance: reveal::erase,
    },
    EffectEntry {
        name: "timer",
        summary: "倒计时模板：`$s` 秒，`$cs` 百分之一秒",
        advance: readout::timer,
    },
    EffectEntry {
        name: "percent",
        summary: "剩余百分比模板：`$pc`",
        advance: readout::percent,
    },
];

/// 旧版效果名
const ALIASES: &[(&str, &str)] = &[("sanic", "scroll"), ("scrmbl", "scramble")];

/// 效果注册表
#[derive(Debug, Clone)]
pub struct EffectRegistry {
    entries: HashMap<&'static str, EffectEntry>,
    /// 保持注册顺序，用于列表展示
    order: Vec<&'static str>,
    aliases: HashMap<&'static str, &'static str>,
}

impl EffectRegistry {
    /// 空注册表
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    /// 包含全部内置效果和旧版别名的注册表
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for entry in BUILTIN {
            registry.register(*entry);
        }
        for (alias, target) in ALIASES {
            registry.alias(alias, target);
        }
        registry
    }

    /// 注册效果；同名效果会被替换
    pub fn register(&mut self, entry: EffectEntry) {
        if self.entries.insert(entry.name, entry).is_none() {
            self.order.push(entry.name);
        }
    }

    /// 为已有效果添加别名
    pub fn alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    /// 查找效果
    pub fn resolve(&self, name: &str) -> Result<EffectFn, FxError> {
        self.entry(name)
            .map(|entry| entry.advance)
            .ok_or_else(|| FxError::UnknownEffect {
                name: name.to_string(),
            })
    }

    /// 查找效果项（别名会被解析为目标效果）
    pub fn entry(&self, name: &str) -> Option<&EffectEntry> {
        let name = self.aliases.get(name).copied().unwrap_or(name);
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// 按注册顺序列出效果（不含别名）
    pub fn entries(&self) -> impl Iterator<Item = &EffectEntry> {
        self.order.iter().filter_map(|name| self.entries.get(name))
    }

    /// 按注册顺序列出效果名（不含别名）
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

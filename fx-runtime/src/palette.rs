//! # Palette 模块
//!
//! rainbow 效果的调色板与内联语法解析。
//!
//! 内联语法：`文字;颜色1,颜色2,...`，颜色为整数字面量
//! （十进制、`0x`、`0o`、`0b`，允许 `_` 分隔）。

use tracing::warn;

/// 默认调色板
pub const DEFAULT_PALETTE: [u32; 5] = [0xFFBE0B, 0xFB5607, 0xFF006E, 0x8338EC, 0x3A86FF];

/// 内联语法的解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct InlinePalette {
    /// 分号前的文字
    pub text: String,
    /// 合法的颜色；为空表示应使用默认调色板
    pub colors: Vec<u32>,
}

/// 解析 `文字;颜色列表`
///
/// 文字中没有 `;` 时返回 `None`。只使用第一个和第二个分号之间的部分作为颜色列表。
pub fn parse_inline(text: &str) -> Option<InlinePalette> {
    let mut parts = text.split(';');
    let head = parts.next()?;
    let entries = parts.next()?;

    let colors = entries
        .split(',')
        .filter_map(|literal| match parse_color_literal(literal) {
            Some(color) => Some(color),
            None => {
                warn!(literal = %literal.trim(), "跳过无效的颜色字面量");
                None
            }
        })
        .collect();

    Some(InlinePalette {
        text: head.to_string(),
        colors,
    })
}

/// 解析单个整数颜色字面量
pub fn parse_color_literal(literal: &str) -> Option<u32> {
    let literal = literal.trim();
    let (digits, radix) = match literal.get(..2).map(|p| p.to_ascii_lowercase()) {
        Some(prefix) if prefix == "0x" => (&literal[2..], 16),
        Some(prefix) if prefix == "0o" => (&literal[2..], 8),
        Some(prefix) if prefix == "0b" => (&literal[2..], 2),
        _ => (literal, 10),
    };

    // 下划线只能出现在数字之间
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__")
    {
        return None;
    }
    // 十进制不允许前导零（"0" 本身除外）
    if radix == 10 && digits.len() > 1 && digits.starts_with('0') && !digits.trim_matches('0').is_empty()
    {
        return None;
    }

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    u32::from_str_radix(&cleaned, radix).ok()
}

//! # 基础效果
//!
//! static / blink / rainbow / loading。
//! 周期性效果都用游标对固定序列取模，不使用无限迭代器。

use crate::effects::EffectContext;
use crate::error::SinkError;
use crate::palette::{DEFAULT_PALETTE, parse_inline};
use crate::sink::Color;

/// blink 周期：显示、清空
const BLINK_CYCLE: [bool; 2] = [true, false];

/// loading 周期
const DOTS: [&str; 4] = ["", ".", "..", "..."];

/// 原样显示
pub fn static_text(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let text = ctx.text;
    ctx.show(text)
}

/// 一闪一灭
pub fn blink(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let visible = BLINK_CYCLE[ctx.cursor.blink_index % BLINK_CYCLE.len()];
    ctx.cursor.blink_index += 1;

    if visible {
        let text = ctx.text;
        ctx.show(text)
    } else {
        ctx.clear()
    }
}

/// 循环调色板着色
///
/// 文字含 `;` 时，首个 tick 解析内联调色板并缓存到本次运行结束。
pub fn rainbow(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    if ctx.take_first_tick() {
        if let Some(inline) = parse_inline(ctx.text) {
            ctx.cursor.rainbow_text = Some(inline.text);
            ctx.cursor.rainbow_palette = inline.colors;
        }
    }

    let index = ctx.cursor.palette_index;
    ctx.cursor.palette_index += 1;

    let palette = &ctx.cursor.rainbow_palette;
    let color = if palette.is_empty() {
        Color::builtin(DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()])
    } else {
        Color::user(palette[index % palette.len()])
    };

    let text = match &ctx.cursor.rainbow_text {
        Some(text) => text.clone(),
        None => ctx.text.to_string(),
    };
    ctx.show_colored(&text, color)
}

/// 文字后追加循环的点号
pub fn loading(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let dots = DOTS[ctx.cursor.dots_index % DOTS.len()];
    ctx.cursor.dots_index += 1;

    let text = format!("{}{}", ctx.text, dots);
    ctx.show(&text)
}

//! # 滤镜效果
//!
//! scroll / hue / fade 都是“文字 + 一个滤镜”的组合：
//!
//! 1. 显示文字
//! 2. 确保滤镜存在（按需创建）
//! 3. 更新滤镜参数
//! 4. 进入最后几个 tick 时移除滤镜，并提前结束整个运行
//!
//! 第 4 步让滤镜不会残留到运行之外。

use std::ops::Range;

use rand::Rng;

use crate::effects::EffectContext;
use crate::error::SinkError;
use crate::sink::{FilterKind, SCROLL_SPEED};

/// 色相偏移范围
pub const HUE_RANGE: Range<i64> = -180..180;

/// 高速水平滚动
pub fn scroll(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    drive_filter(ctx, FilterKind::Scroll, SCROLL_SPEED)
}

/// 随机色相
pub fn hue(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let shift = ctx.rng.gen_range(HUE_RANGE);
    drive_filter(ctx, FilterKind::HueShift, shift)
}

/// 不透明度跟随剩余时长
pub fn fade(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let opacity = ctx.completion_percent() as i64;
    drive_filter(ctx, FilterKind::Fade, opacity)
}

fn drive_filter(
    ctx: &mut EffectContext<'_>,
    kind: FilterKind,
    value: i64,
) -> Result<(), SinkError> {
    let text = ctx.text;
    ctx.show(text)?;

    let handle = ctx.sink.ensure_filter(kind)?;
    if let Some(handle) = handle {
        ctx.sink.update_filter(handle, kind.param_key(), value)?;
    }

    if ctx.in_final_ticks() {
        if let Some(handle) = handle {
            ctx.sink.remove_filter(handle)?;
        }
        ctx.finish_early();
    }
    Ok(())
}

//! # 位移效果
//!
//! tremor：在“保持”和“跳动”两个阶段之间交替。
//!
//! ```text
//! 保持：读取当前位置，撤销上一次跳动的偏移
//! 跳动：读取当前位置，随机偏移 (dx, dy)，dx、dy ∈ [-100, 100] 且非 0
//!       最后几个 tick 不再跳动，并提前结束运行
//! ```
//!
//! 每次都先读取当前位置，所以运行期间用户手动拖动显示对象也不会错位。

use rand::Rng;

use crate::effects::EffectContext;
use crate::error::SinkError;
use crate::sink::TextSink;

/// 单次跳动的最大距离
pub const MAX_JUMP: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TremorPhase {
    Hold,
    Jump,
}

const TREMOR_CYCLE: [TremorPhase; 2] = [TremorPhase::Hold, TremorPhase::Jump];

/// 随机抖动位置
pub fn tremor(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let phase = TREMOR_CYCLE[ctx.cursor.tremor_phase % TREMOR_CYCLE.len()];
    ctx.cursor.tremor_phase += 1;

    let text = ctx.text;
    ctx.show(text)?;

    // 不在当前场景中：只显示文字
    let Some(current) = ctx.sink.position()? else {
        return Ok(());
    };

    match phase {
        TremorPhase::Hold => {
            let (dx, dy) = std::mem::take(&mut ctx.cursor.last_jump);
            if (dx, dy) != (0, 0) {
                ctx.sink.set_position(current.offset(-dx, -dy))?;
            }
        }
        TremorPhase::Jump => {
            if ctx.in_final_ticks() {
                ctx.finish_early();
            } else {
                let dx = random_jump(&mut *ctx.rng);
                let dy = random_jump(&mut *ctx.rng);
                ctx.cursor.last_jump = (dx, dy);
                ctx.sink.set_position(current.offset(dx, dy))?;
            }
        }
    }
    Ok(())
}

/// 撤销尚未恢复的偏移，运行结束时由引擎调用
pub fn restore_offset(sink: &mut dyn TextSink, last_jump: (i32, i32)) -> Result<(), SinkError> {
    let (dx, dy) = last_jump;
    if (dx, dy) == (0, 0) {
        return Ok(());
    }
    if let Some(current) = sink.position()? {
        sink.set_position(current.offset(-dx, -dy))?;
    }
    Ok(())
}

/// [-MAX_JUMP, MAX_JUMP] 中的非零整数，均匀分布
fn random_jump<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    let magnitude = rng.gen_range(1..=MAX_JUMP);
    if rng.gen_bool(0.5) { -magnitude } else { magnitude }
}

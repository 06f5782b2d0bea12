//! # 读数效果
//!
//! timer / percent：把剩余时间代入文字模板（见 [`crate::template`]）。
//!
//! 模板有误时显示原始文字，错误不会离开效果。

use tracing::debug;

use crate::effects::EffectContext;
use crate::error::SinkError;
use crate::template::substitute;

/// 倒计时：`$s` 为整秒，`$cs` 为两位百分之一秒
///
/// 例如剩余 2750 ms 时 `"$s.$cs"` 显示为 `"2.75"`。
pub fn timer(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let remaining = ctx.run.remaining_duration_ms.max(0);
    let seconds = (remaining / 1000).to_string();
    let centis = format!("{:02}", (remaining % 1000) / 10);
    render(ctx, &[("s", &seconds), ("cs", &centis)])
}

/// 剩余百分比：`$pc`，保留两位小数并带 `%`
pub fn percent(ctx: &mut EffectContext<'_>) -> Result<(), SinkError> {
    let percent = format!("{:.2}%", ctx.completion_percent());
    render(ctx, &[("pc", &percent)])
}

fn render(ctx: &mut EffectContext<'_>, vars: &[(&str, &str)]) -> Result<(), SinkError> {
    let template = ctx.text;
    match substitute(template, vars) {
        Ok(text) => ctx.show(&text),
        Err(e) => {
            debug!(error = %e, "模板替换失败，显示原始文字");
            ctx.show(template)
        }
    }
}

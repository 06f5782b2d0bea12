//! # Engine 模块
//!
//! 文字效果调度引擎。
//!
//! ## 执行模型
//!
//! ```text
//! arm()  -> TimerDirective::Register / Keep
//! tick() -> TimerDirective::Keep / Unregister
//! ```
//!
//! 1. 宿主收到 `Trigger` 时调用 `arm()`，按返回的指令注册定时器
//! 2. 定时器每 `refresh_rate_ms` 调用一次 `tick()`
//! 3. `tick()` 执行绑定的效果，扣减剩余时长
//! 4. 剩余时长 <= 0 时清理输出端、重置全部状态，返回 `Unregister`
//!
//! 引擎是单线程的：宿主保证 `tick()` 不会重入。

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, trace, warn};

use crate::command::{EngineCommand, TimerDirective};
use crate::config::EngineConfig;
use crate::effects::{EffectContext, EffectRegistry, motion};
use crate::error::{FxResult, SinkError};
use crate::sink::TextSink;
use crate::state::{EffectCursor, RunState};
use crate::text::ResolvedText;

/// 文字效果调度引擎
///
/// # 使用示例
///
/// ```ignore
/// let mut engine = TickerEngine::new(config, sink)?;
///
/// if let TimerDirective::Register { interval_ms } = engine.arm()? {
///     host.add_timer(interval_ms);
/// }
///
/// // 定时器回调
/// if engine.tick()?.is_unregister() {
///     host.remove_timer();
/// }
/// ```
pub struct TickerEngine<S: TextSink> {
    /// 配置
    config: EngineConfig,
    /// 当前文字
    text: ResolvedText,
    /// 效果注册表
    registry: EffectRegistry,
    /// 运行状态
    state: RunState,
    /// 效果游标
    cursor: EffectCursor,
    /// 输出端
    sink: S,
    /// 随机数源
    rng: StdRng,
}

impl<S: TextSink> TickerEngine<S> {
    /// 创建引擎，使用内置效果和系统熵随机源
    pub fn new(config: EngineConfig, sink: S) -> FxResult<Self> {
        Self::with_rng(config, sink, StdRng::from_entropy())
    }

    /// 创建使用固定随机种子的引擎（随机效果可复现）
    pub fn with_seed(config: EngineConfig, sink: S, seed: u64) -> FxResult<Self> {
        Self::with_rng(config, sink, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, sink: S, rng: StdRng) -> FxResult<Self> {
        config.validate()?;
        Ok(Self {
            text: ResolvedText::new(config.text.clone()),
            config,
            registry: EffectRegistry::builtin(),
            state: RunState::new(),
            cursor: EffectCursor::default(),
            sink,
            rng,
        })
    }

    /// 替换效果注册表
    pub fn with_registry(mut self, registry: EffectRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// 触发效果
    ///
    /// 总是把剩余时长重置为 `effect_duration_ms`。
    /// 只有空闲时才要求宿主注册定时器；运行中再次调用返回 `Keep`，
    /// 不会出现第二个定时器。
    ///
    /// 新运行的同步启动失败时回到空闲状态：宿主收不到 `Register`，
    /// 引擎也不能停留在运行中。
    pub fn arm(&mut self) -> FxResult<TimerDirective> {
        self.state.remaining_duration_ms =
            i64::try_from(self.config.effect_duration_ms).unwrap_or(i64::MAX);

        let directive = if self.state.is_armed {
            debug!(
                remaining_ms = self.state.remaining_duration_ms,
                "已在运行，只重置倒计时"
            );
            TimerDirective::Keep
        } else {
            self.state.is_armed = true;
            self.state.bound_effect = Some(self.config.selected_effect.clone());
            info!(
                effect = %self.config.selected_effect,
                duration_ms = self.config.effect_duration_ms,
                refresh_ms = self.config.refresh_rate_ms,
                "开始运行"
            );
            TimerDirective::Register {
                interval_ms: self.config.refresh_rate_ms,
            }
        };

        if let Err(e) = self.synchronized_start() {
            if matches!(directive, TimerDirective::Register { .. }) {
                warn!(error = %e, "同步启动失败，取消本次运行");
                self.state.reset();
                self.cursor.reset();
            }
            return Err(e.into());
        }
        Ok(directive)
    }

    /// 定时器回调
    ///
    /// 未知效果或输出端出错都会立即结束本次运行并返回错误
    /// （[`FxError::UnknownEffect`](crate::FxError::UnknownEffect) / `FxError::Sink`）；
    /// 此时引擎已回到空闲状态，宿主应注销定时器。
    pub fn tick(&mut self) -> FxResult<TimerDirective> {
        if !self.state.is_armed {
            debug!("引擎空闲，忽略过期的 tick");
            return Ok(TimerDirective::Unregister);
        }

        let name = self
            .state
            .bound_effect
            .clone()
            .unwrap_or_else(|| self.config.selected_effect.clone());

        let advance = match self.registry.resolve(&name) {
            Ok(advance) => advance,
            Err(e) => {
                error!(effect = %name, "效果未注册，结束本次运行");
                self.state.remaining_duration_ms = 0;
                self.terminate()?;
                return Err(e);
            }
        };

        let mut ctx = EffectContext {
            sink: &mut self.sink,
            cursor: &mut self.cursor,
            run: &mut self.state,
            text: self.text.current(),
            refresh_rate_ms: self.config.refresh_rate_ms,
            effect_duration_ms: self.config.effect_duration_ms,
            rng: &mut self.rng,
        };
        if let Err(e) = advance(&mut ctx) {
            error!(effect = %name, error = %e, "效果输出失败，结束本次运行");
            if let Err(cleanup) = self.terminate() {
                warn!(error = %cleanup, "结束运行时清理失败");
            }
            return Err(e.into());
        }

        self.state.remaining_duration_ms -= i64::from(self.config.refresh_rate_ms);
        trace!(
            effect = %name,
            remaining_ms = self.state.remaining_duration_ms,
            "tick"
        );

        if self.state.remaining_duration_ms <= 0 {
            self.terminate()?;
            return Ok(TimerDirective::Unregister);
        }
        Ok(TimerDirective::Keep)
    }

    /// 提前结束：下一次 tick 走正常的结束流程
    pub fn reset_duration(&mut self) {
        debug!("重置剩余时长");
        self.state.remaining_duration_ms = 0;
    }

    /// 处理宿主命令
    pub fn handle(&mut self, command: EngineCommand) -> FxResult<TimerDirective> {
        match command {
            EngineCommand::Trigger | EngineCommand::Preview => self.arm(),
            EngineCommand::Reset => {
                self.reset_duration();
                Ok(TimerDirective::Keep)
            }
        }
    }

    /// 替换配置
    ///
    /// 重新读取文字，并停止新配置的媒体源。
    /// 正在进行的运行保持原来绑定的效果。
    pub fn reconfigure(&mut self, config: EngineConfig) -> FxResult<()> {
        config.validate()?;
        self.text = ResolvedText::new(config.text.clone());
        self.config = config;
        if let Some(sound) = &self.config.sound_source {
            self.sink.stop_sound(sound)?;
        }
        Ok(())
    }

    /// 运行开始时播放声音、显示图层，每次运行只做一次
    fn synchronized_start(&mut self) -> Result<(), SinkError> {
        if self.state.started_sync {
            return Ok(());
        }
        self.state.started_sync = true;

        if let Some(sound) = &self.config.sound_source {
            self.sink.play_sound(sound)?;
        }
        if let Some(layer) = &self.config.layer_source {
            self.sink.set_layer_visible(layer, true)?;
        }
        Ok(())
    }

    /// 结束本次运行
    ///
    /// 先重置状态再操作输出端，输出端出错时引擎也已回到空闲。
    fn terminate(&mut self) -> Result<(), SinkError> {
        let last_jump = self.cursor.last_jump;
        let effect = self.state.bound_effect.take();
        self.state.reset();
        self.cursor.reset();

        motion::restore_offset(&mut self.sink, last_jump)?;
        self.sink.clear()?;
        if let Some(layer) = &self.config.layer_source {
            self.sink.set_layer_visible(layer, false)?;
        }

        info!(effect = ?effect, "运行结束");
        Ok(())
    }

    /// 当前配置
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 运行状态
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// 效果游标
    pub fn cursor(&self) -> &EffectCursor {
        &self.cursor
    }

    /// 效果注册表
    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// 是否在运行中
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// 剩余时长
    pub fn remaining_ms(&self) -> i64 {
        self.state.remaining_duration_ms
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

//! # Scheduler 模块
//!
//! 单定时器调度器，按 [`TimerDirective`] 驱动 [`TickerEngine`]。
//!
//! ## 时钟
//!
//! - [`ClockMode::Virtual`]：不等待，时间直接跳到下一个事件（测试、预览）
//! - [`ClockMode::Realtime`]：按真实时间 sleep
//!
//! ## 事件顺序
//!
//! 同一时刻先执行脚本命令，再执行定时器 tick。
//! 定时器和命令都耗尽时结束。

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info};

use fx_runtime::{EngineCommand, FxError, TextSink, TickerEngine, TimerDirective};

/// 时钟模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    #[default]
    Virtual,
    Realtime,
}

/// 在指定时刻下发的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedCommand {
    pub at_ms: u64,
    pub command: EngineCommand,
}

impl ScriptedCommand {
    pub fn new(at_ms: u64, command: EngineCommand) -> Self {
        Self { at_ms, command }
    }
}

/// 调度错误
#[derive(Debug, Error, PartialEq)]
pub enum SchedulerError {
    /// 已有定时器时再次注册
    #[error("定时器已注册（间隔 {interval_ms} ms）")]
    TimerAlreadyRegistered { interval_ms: u32 },

    /// 引擎错误
    #[error(transparent)]
    Engine(#[from] FxError),
}

/// 一次调度的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// 执行的 tick 数
    pub ticks: usize,
    /// 下发的命令数（含初始命令）
    pub commands: usize,
    /// 结束时的时钟
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    interval_ms: u32,
    next_due_ms: u64,
}

enum Event {
    Command(EngineCommand),
    Tick,
}

/// 单定时器调度器
#[derive(Debug, Default)]
pub struct Scheduler {
    mode: ClockMode,
    now_ms: u64,
    timer: Option<Timer>,
    /// 按时刻排序
    pending: VecDeque<ScriptedCommand>,
}

impl Scheduler {
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// 添加脚本命令
    pub fn with_commands(mut self, commands: impl IntoIterator<Item = ScriptedCommand>) -> Self {
        let mut all: Vec<_> = self.pending.drain(..).chain(commands).collect();
        all.sort_by_key(|c| c.at_ms);
        self.pending = all.into();
        self
    }

    /// 当前时钟
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// 是否有活动的定时器
    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// 执行引擎返回的定时器指令
    pub fn apply(&mut self, directive: TimerDirective) -> Result<(), SchedulerError> {
        match directive {
            TimerDirective::Register { interval_ms } => {
                if let Some(timer) = self.timer {
                    return Err(SchedulerError::TimerAlreadyRegistered {
                        interval_ms: timer.interval_ms,
                    });
                }
                debug!(interval_ms, "注册定时器");
                self.timer = Some(Timer {
                    interval_ms,
                    next_due_ms: self.now_ms + u64::from(interval_ms),
                });
            }
            TimerDirective::Keep => {}
            TimerDirective::Unregister => {
                debug!("注销定时器");
                self.timer = None;
            }
        }
        Ok(())
    }

    /// 下发初始命令并运行到定时器和脚本命令都耗尽
    pub fn run<S: TextSink>(
        &mut self,
        engine: &mut TickerEngine<S>,
        initial: EngineCommand,
    ) -> Result<RunReport, SchedulerError> {
        let mut report = RunReport::default();

        let directive = engine.handle(initial)?;
        report.commands += 1;
        self.apply(directive)?;

        while let Some((at_ms, event)) = self.next_event() {
            self.advance_to(at_ms);
            match event {
                Event::Command(command) => {
                    info!(at_ms, command = ?command, "下发命令");
                    let directive = engine.handle(command)?;
                    report.commands += 1;
                    self.apply(directive)?;
                }
                Event::Tick => {
                    report.ticks += 1;
                    match engine.tick() {
                        Ok(directive) => {
                            if let Some(timer) = &mut self.timer {
                                timer.next_due_ms += u64::from(timer.interval_ms);
                            }
                            self.apply(directive)?;
                        }
                        Err(e) => {
                            error!(error = %e, at_ms, "tick 失败，注销定时器");
                            self.timer = None;
                            return Err(e.into());
                        }
                    }
                }
            }
        }

        report.elapsed_ms = self.now_ms;
        info!(
            ticks = report.ticks,
            elapsed_ms = report.elapsed_ms,
            "调度结束"
        );
        Ok(report)
    }

    fn next_event(&mut self) -> Option<(u64, Event)> {
        let command_at = self.pending.front().map(|c| c.at_ms);
        let tick_at = self.timer.map(|t| t.next_due_ms);

        match (command_at, tick_at) {
            (Some(c), Some(t)) if c <= t => self.pop_command(),
            (Some(_), None) => self.pop_command(),
            (_, Some(t)) => Some((t, Event::Tick)),
            (None, None) => None,
        }
    }

    fn pop_command(&mut self) -> Option<(u64, Event)> {
        self.pending
            .pop_front()
            .map(|c| (c.at_ms.max(self.now_ms), Event::Command(c.command)))
    }

    fn advance_to(&mut self, at_ms: u64) {
        if at_ms <= self.now_ms {
            return;
        }
        if self.mode == ClockMode::Realtime {
            thread::sleep(Duration::from_millis(at_ms - self.now_ms));
        }
        self.now_ms = at_ms;
    }
}

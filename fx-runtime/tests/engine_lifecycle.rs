//! # 引擎生命周期集成测试
//!
//! 测试 arm → tick → terminate 的完整链路。
//! 所有测试使用 MemorySink，不依赖真实的显示对象。

use fx_runtime::{
    Color, EffectRegistry, EngineCommand, EngineConfig, FILE_ERROR_TEXT, FilterHandle,
    FilterKind, FxError, IDLE_DURATION_MS, MemorySink, Position, SinkError, SinkEvent,
    SurfaceKind, TextSink, TextSource, TickerEngine, TimerDirective,
};

fn engine_with(config: EngineConfig) -> TickerEngine<MemorySink> {
    let sink = MemorySink::new(SurfaceKind::FreeType2).with_position(Position::new(200.0, 200.0));
    TickerEngine::with_seed(config, sink, 42).unwrap()
}

/// 一直 tick 到引擎要求注销定时器，返回 tick 次数
fn run_to_end(engine: &mut TickerEngine<MemorySink>) -> usize {
    let mut ticks = 0;
    loop {
        ticks += 1;
        assert!(ticks < 10_000, "运行没有结束");
        if engine.tick().unwrap().is_unregister() {
            return ticks;
        }
    }
}

/// 每个效果跑完后，游标和运行状态都回到初始值
#[test]
fn test_every_effect_resets_state_on_completion() {
    let registry = EffectRegistry::builtin();
    for name in registry.names() {
        let config = EngineConfig::new(name, "ab;0x10 cd").with_timing(250, 3000);
        let mut engine = engine_with(config);

        engine.arm().unwrap();
        run_to_end(&mut engine);

        assert!(!engine.is_running(), "{name}: 仍在运行");
        assert!(engine.cursor().is_initial(), "{name}: 游标未重置");
        assert_eq!(engine.remaining_ms(), IDLE_DURATION_MS, "{name}");
        assert!(engine.state().is_first_tick, "{name}");
        assert!(!engine.state().started_sync, "{name}");
        assert_eq!(engine.sink().filter_count(), 0, "{name}: 滤镜残留");
        assert_eq!(
            engine.sink().current_position(),
            Some(Position::new(200.0, 200.0)),
            "{name}: 位置未恢复"
        );
        assert_eq!(engine.sink().text(), " ", "{name}: 未清空");
    }
}

#[test]
fn test_countdown_decreases_by_refresh_rate() {
    let config = EngineConfig::new("percent", "$pc").with_timing(250, 3000);
    let mut engine = engine_with(config);

    engine.arm().unwrap();
    assert_eq!(engine.remaining_ms(), 3000);
    engine.tick().unwrap();
    assert_eq!(engine.remaining_ms(), 2750);
    engine.tick().unwrap();
    assert_eq!(engine.remaining_ms(), 2500);

    // 第二个 tick 在剩余 2750 时计算：100 / (3000 / 2750)
    assert_eq!(engine.sink().frames(), vec!["100.00%", "91.67%"]);
}

#[test]
fn test_natural_expiry_tick_count() {
    let config = EngineConfig::new("static", "x").with_timing(250, 3000);
    let mut engine = engine_with(config);
    engine.arm().unwrap();
    assert_eq!(run_to_end(&mut engine), 12);
}

#[test]
fn test_typewriter_shows_full_text_after_n_ticks() {
    let text = "Rustacean";
    let config = EngineConfig::new("typewriter", text).with_timing(100, 10_000);
    let mut engine = engine_with(config);
    engine.arm().unwrap();

    let n = text.chars().count();
    for k in 1..=n {
        engine.tick().unwrap();
        let expected = format!("{:<width$}", &text[..k], width = n);
        assert_eq!(engine.sink().text(), expected, "tick {k}");
    }
    assert_eq!(engine.sink().text(), text);
}

#[test]
fn test_blink_parity() {
    let config = EngineConfig::new("blink", "hey").with_timing(100, 10_000);
    let mut engine = engine_with(config);
    engine.arm().unwrap();

    for tick in 0..10 {
        engine.tick().unwrap();
        let expected = if tick % 2 == 0 { "hey" } else { " " };
        assert_eq!(engine.sink().text(), expected, "tick {tick}");
    }
}

#[test]
fn test_rainbow_cycle_returns_after_five() {
    let config = EngineConfig::new("rainbow", "hue").with_timing(100, 10_000);
    let mut engine = engine_with(config);
    engine.arm().unwrap();

    for _ in 0..6 {
        engine.tick().unwrap();
    }
    let colors = engine.sink().colors();
    assert_eq!(colors[0], colors[5]);
    assert_ne!(colors[0], colors[1]);
}

#[test]
fn test_unknown_effect_terminates_run() {
    let config = EngineConfig::new("doesnotexist", "x").with_timing(250, 3000);
    let mut engine = engine_with(config);

    assert!(matches!(
        engine.arm().unwrap(),
        TimerDirective::Register { .. }
    ));
    let err = engine.tick().unwrap_err();
    assert_eq!(
        err,
        FxError::UnknownEffect {
            name: "doesnotexist".to_string()
        }
    );
    assert!(!engine.is_running());
    assert!(engine.cursor().is_initial());
    assert_eq!(engine.remaining_ms(), IDLE_DURATION_MS);

    // 之后过期的 tick 不会再报错
    assert_eq!(engine.tick().unwrap(), TimerDirective::Unregister);
}

#[test]
fn test_reentrant_arm_registers_single_timer() {
    let mut config = EngineConfig::new("static", "x").with_timing(250, 3000);
    let mut engine = engine_with(config.clone());

    let first = engine.arm().unwrap();
    engine.tick().unwrap();

    config.effect_duration_ms = 5000;
    engine.reconfigure(config).unwrap();
    let second = engine.arm().unwrap();

    let registrations = [first, second]
        .iter()
        .filter(|d| matches!(d, TimerDirective::Register { .. }))
        .count();
    assert_eq!(registrations, 1);
    assert_eq!(engine.remaining_ms(), 5000);
}

#[test]
fn test_rearm_without_tick() {
    let config = EngineConfig::new("static", "x").with_timing(250, 3000);
    let mut engine = engine_with(config);

    assert_eq!(
        engine.arm().unwrap(),
        TimerDirective::Register { interval_ms: 250 }
    );
    assert_eq!(engine.arm().unwrap(), TimerDirective::Keep);
    assert_eq!(engine.remaining_ms(), 3000);
}

#[test]
fn test_reset_stops_on_next_tick() {
    let config = EngineConfig::new("scroll", "x").with_timing(250, 60_000);
    let mut engine = engine_with(config);
    engine.arm().unwrap();
    engine.tick().unwrap();
    assert!(engine.sink().filter(FilterKind::Scroll).is_some());

    engine.handle(EngineCommand::Reset).unwrap();
    assert_eq!(engine.tick().unwrap(), TimerDirective::Unregister);
    assert!(!engine.is_running());
    assert_eq!(engine.sink().filter_count(), 0);
}

#[test]
fn test_sound_and_layer_start_once_per_run() {
    let config = EngineConfig::new("static", "x")
        .with_timing(250, 1000)
        .with_sound("ding")
        .with_layer("overlay");
    let mut engine = engine_with(config);

    engine.arm().unwrap();
    engine.arm().unwrap();
    assert!(engine.sink().is_playing("ding"));
    assert!(engine.sink().is_layer_visible("overlay"));

    run_to_end(&mut engine);
    assert!(!engine.sink().is_layer_visible("overlay"));

    let starts = engine
        .sink()
        .events()
        .iter()
        .filter(|e| matches!(e, SinkEvent::SoundStarted(_)))
        .count();
    assert_eq!(starts, 1);

    // 下一次运行重新同步
    engine.arm().unwrap();
    let starts = engine
        .sink()
        .events()
        .iter()
        .filter(|e| matches!(e, SinkEvent::SoundStarted(_)))
        .count();
    assert_eq!(starts, 2);
}

#[test]
fn test_reconfigure_stops_sound() {
    let config = EngineConfig::new("static", "x").with_sound("ding");
    let mut engine = engine_with(config.clone());
    engine.arm().unwrap();
    assert!(engine.sink().is_playing("ding"));

    engine.reconfigure(config).unwrap();
    assert!(!engine.sink().is_playing("ding"));
}

#[test]
fn test_gdiplus_cleared_with_empty_string() {
    let config = EngineConfig::new("static", "x").with_timing(250, 500);
    let mut engine =
        TickerEngine::with_seed(config, MemorySink::new(SurfaceKind::GdiPlus), 1).unwrap();
    engine.arm().unwrap();
    run_to_end(&mut engine);
    assert_eq!(engine.sink().text(), "");
}

#[test]
fn test_tremor_reset_mid_jump_restores_position() {
    let base = Position::new(200.0, 200.0);
    let config = EngineConfig::new("tremor", "x").with_timing(250, 60_000);
    let mut engine = engine_with(config);
    engine.arm().unwrap();

    // 保持、跳动
    engine.tick().unwrap();
    engine.tick().unwrap();
    assert_ne!(engine.sink().current_position(), Some(base));

    engine.reset_duration();
    run_to_end(&mut engine);
    assert_eq!(engine.sink().current_position(), Some(base));
}

#[test]
fn test_missing_file_shows_sentinel() {
    let config = EngineConfig {
        text: TextSource::file("/no/such/file.txt", true),
        ..EngineConfig::new("static", "")
    };
    let mut engine = engine_with(config);
    engine.arm().unwrap();
    engine.tick().unwrap();
    assert_eq!(engine.sink().text(), FILE_ERROR_TEXT);
}

#[test]
fn test_scramble_restarts_each_run() {
    let config = EngineConfig::new("scramble", "abcdef").with_timing(100, 300);
    let mut engine = engine_with(config);

    engine.arm().unwrap();
    run_to_end(&mut engine);
    let first: Vec<String> = engine
        .sink_mut()
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            SinkEvent::Text { text, .. } => Some(text),
            _ => None,
        })
        .collect();

    engine.arm().unwrap();
    engine.tick().unwrap();
    assert_eq!(engine.cursor().scramble_index, 1);
    assert_eq!(first.len(), 4); // 3 帧 + 清空
}

/// 可以按需让写文字或播放声音失败的输出端
struct FailingSink {
    inner: MemorySink,
    fail_text: bool,
    fail_sound: bool,
}

impl FailingSink {
    fn new() -> Self {
        Self {
            inner: MemorySink::new(SurfaceKind::FreeType2),
            fail_text: false,
            fail_sound: false,
        }
    }
}

fn backend(message: &str) -> SinkError {
    SinkError::Backend {
        message: message.to_string(),
    }
}

impl TextSink for FailingSink {
    fn surface_kind(&self) -> SurfaceKind {
        self.inner.surface_kind()
    }

    fn set_text(&mut self, text: &str, color: Option<Color>) -> Result<(), SinkError> {
        if self.fail_text {
            return Err(backend("text"));
        }
        self.inner.set_text(text, color)
    }

    fn position(&self) -> Result<Option<Position>, SinkError> {
        self.inner.position()
    }

    fn set_position(&mut self, position: Position) -> Result<(), SinkError> {
        self.inner.set_position(position)
    }

    fn ensure_filter(&mut self, kind: FilterKind) -> Result<Option<FilterHandle>, SinkError> {
        self.inner.ensure_filter(kind)
    }

    fn update_filter(
        &mut self,
        handle: FilterHandle,
        key: &str,
        value: i64,
    ) -> Result<(), SinkError> {
        self.inner.update_filter(handle, key, value)
    }

    fn remove_filter(&mut self, handle: FilterHandle) -> Result<(), SinkError> {
        self.inner.remove_filter(handle)
    }

    fn play_sound(&mut self, source: &str) -> Result<(), SinkError> {
        if self.fail_sound {
            return Err(backend("sound"));
        }
        self.inner.play_sound(source)
    }

    fn stop_sound(&mut self, source: &str) -> Result<(), SinkError> {
        self.inner.stop_sound(source)
    }

    fn set_layer_visible(&mut self, layer: &str, visible: bool) -> Result<(), SinkError> {
        self.inner.set_layer_visible(layer, visible)
    }
}

#[test]
fn test_failed_sync_start_leaves_engine_idle() {
    let config = EngineConfig::new("static", "x")
        .with_timing(250, 1000)
        .with_sound("ding");
    let mut sink = FailingSink::new();
    sink.fail_sound = true;
    let mut engine = TickerEngine::with_seed(config, sink, 1).unwrap();

    let err = engine.arm().unwrap_err();
    assert_eq!(err, FxError::Sink(backend("sound")));
    assert!(!engine.is_running());
    assert!(!engine.state().started_sync);
    assert_eq!(engine.remaining_ms(), IDLE_DURATION_MS);

    // 输出端恢复后可以重新开始，并再次注册定时器
    engine.sink_mut().fail_sound = false;
    assert_eq!(
        engine.arm().unwrap(),
        TimerDirective::Register { interval_ms: 250 }
    );
    assert!(engine.sink().inner.is_playing("ding"));
}

#[test]
fn test_failed_tick_output_terminates_run() {
    let config = EngineConfig::new("typewriter", "abc").with_timing(250, 3000);
    let mut engine = TickerEngine::with_seed(config, FailingSink::new(), 1).unwrap();

    engine.arm().unwrap();
    engine.tick().unwrap();
    assert_eq!(engine.cursor().typewriter_index, 1);

    engine.sink_mut().fail_text = true;
    let err = engine.tick().unwrap_err();
    assert_eq!(err, FxError::Sink(backend("text")));
    assert!(!engine.is_running());
    assert!(engine.cursor().is_initial());
    assert_eq!(engine.remaining_ms(), IDLE_DURATION_MS);

    // 宿主已注销定时器：下一次触发必须重新注册
    engine.sink_mut().fail_text = false;
    assert_eq!(
        engine.arm().unwrap(),
        TimerDirective::Register { interval_ms: 250 }
    );
    engine.tick().unwrap();
    assert_eq!(engine.sink().inner.text(), "a  ");
}

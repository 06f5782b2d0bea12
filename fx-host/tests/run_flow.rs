//! 配置 → 引擎 → 调度器 → 终端输出 的端到端测试

use std::fs;

use fx_host::{AppConfig, ClockMode, Scheduler, ScriptedCommand, TerminalSink};
use fx_runtime::{EngineCommand, FILE_ERROR_TEXT, SurfaceKind, TickerEngine};

fn run_config(config: &AppConfig, commands: Vec<ScriptedCommand>) -> Vec<String> {
    config.validate().unwrap();
    let sink = TerminalSink::new(&config.surface.name, config.surface.kind, Vec::new());
    let mut engine = TickerEngine::with_seed(config.to_engine_config(), sink, 11).unwrap();

    Scheduler::new(ClockMode::Virtual)
        .with_commands(commands)
        .run(&mut engine, EngineCommand::Trigger)
        .unwrap();

    let out = String::from_utf8(engine.into_sink().into_writer()).unwrap();
    out.lines().map(str::to_string).collect()
}

#[test]
fn test_typewriter_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fx.json");
    fs::write(
        &path,
        r#"{
            "effect": "typewriter",
            "text": "abc",
            "refresh_rate_ms": 100,
            "duration_secs": 1,
            "surface": { "kind": "gdi_plus", "name": "title" }
        }"#,
    )
    .unwrap();

    let config = AppConfig::load(&path);
    let lines = run_config(&config, Vec::new());

    assert_eq!(lines.len(), 11);
    assert_eq!(&lines[..4], ["a  ", "ab ", "abc", "abc"]);
    // GDI+ 用空字符串清空
    assert_eq!(lines.last().map(String::as_str), Some(""));
}

#[test]
fn test_reset_command_stops_run() {
    let config = AppConfig {
        effect: "blink".to_string(),
        text: "on".to_string(),
        refresh_rate_ms: 100,
        duration_secs: 60,
        ..AppConfig::default()
    };
    let lines = run_config(&config, vec![ScriptedCommand::new(350, EngineCommand::Reset)]);

    // tick 100..=400，最后一行是清空
    assert_eq!(lines, ["on", " ", "on", " ", " "]);
}

#[test]
fn test_reloaded_file_is_read_each_tick() {
    let dir = tempfile::tempdir().unwrap();
    let text_path = dir.path().join("news.txt");
    fs::write(&text_path, "breaking").unwrap();

    let config = AppConfig {
        effect: "static".to_string(),
        file: Some(text_path),
        reload: true,
        refresh_rate_ms: 500,
        duration_secs: 1,
        ..AppConfig::default()
    };
    let lines = run_config(&config, Vec::new());
    assert_eq!(lines, ["breaking", "breaking", " "]);
}

#[test]
fn test_missing_file_shows_error_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        file: Some(dir.path().join("gone.txt")),
        refresh_rate_ms: 1000,
        duration_secs: 1,
        ..AppConfig::default()
    };
    let lines = run_config(&config, Vec::new());
    assert_eq!(lines[0], FILE_ERROR_TEXT);
}

#[test]
fn test_timer_counts_down_in_frames() {
    let config = AppConfig {
        effect: "timer".to_string(),
        text: "$s.$cs".to_string(),
        refresh_rate_ms: 250,
        duration_secs: 1,
        surface: fx_host::SurfaceConfig {
            kind: SurfaceKind::FreeType2,
            name: "clock".to_string(),
        },
        ..AppConfig::default()
    };
    let lines = run_config(&config, Vec::new());
    assert_eq!(lines, ["1.00", "0.75", "0.50", "0.25", " "]);
}

#[test]
fn test_retrigger_after_expiry_runs_again() {
    let config = AppConfig {
        effect: "static".to_string(),
        text: "x".to_string(),
        refresh_rate_ms: 500,
        duration_secs: 1,
        ..AppConfig::default()
    };
    let lines = run_config(&config, vec![ScriptedCommand::new(5000, EngineCommand::Trigger)]);
    assert_eq!(lines, ["x", "x", " ", "x", "x", " "]);
}

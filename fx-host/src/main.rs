//! # fx-host
//!
//! 在终端里运行文字效果。
//!
//! ## 用法
//!
//! ```bash
//! # 使用配置文件
//! cargo run -p fx-host -- run --config fx.json
//!
//! # 命令行覆盖
//! cargo run -p fx-host -- run --effect typewriter --text "Hello" --duration 2
//! cargo run -p fx-host -- run --effect timer --text '$s.$cs' --realtime
//! cargo run -p fx-host -- run --effect scroll --reset-at 1200
//!
//! # 列出效果 / 生成默认配置
//! cargo run -p fx-host -- effects
//! cargo run -p fx-host -- init-config fx.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use fx_host::{AppConfig, ClockMode, Scheduler, ScriptedCommand, TerminalSink, logging};
use fx_runtime::{EffectRegistry, EngineCommand, SurfaceKind, TickerEngine};

#[derive(Parser)]
#[command(name = "fx-host")]
#[command(about = "文字效果宿主 - 在终端中逐帧输出效果")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 日志详细程度（-v debug，-vv trace）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行一次效果
    Run(RunArgs),

    /// 列出已注册的效果
    Effects,

    /// 生成默认配置文件
    InitConfig {
        /// 输出路径
        path: PathBuf,

        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// 配置文件（默认：fx.json，不存在时使用默认配置）
    #[arg(short, long, default_value = "fx.json")]
    config: PathBuf,

    /// 效果名
    #[arg(short, long)]
    effect: Option<String>,

    /// 内联文字
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// 从文件读取文字
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// 每个 tick 重新读取文件
    #[arg(long, requires = "file")]
    reload: bool,

    /// 效果时长（秒）
    #[arg(short, long)]
    duration: Option<u32>,

    /// 刷新间隔（毫秒）
    #[arg(short, long)]
    refresh: Option<u32>,

    /// 运行开始时播放的媒体源
    #[arg(long)]
    sound: Option<String>,

    /// 运行期间显示的图层
    #[arg(long)]
    layer: Option<String>,

    /// 显示对象类型
    #[arg(long, value_enum)]
    surface: Option<SurfaceArg>,

    /// 随机种子（随机效果可复现）
    #[arg(long)]
    seed: Option<u64>,

    /// 在指定毫秒时提前结束
    #[arg(long, value_name = "MS")]
    reset_at: Vec<u64>,

    /// 在指定毫秒时再次触发
    #[arg(long, value_name = "MS")]
    retrigger_at: Vec<u64>,

    /// 按真实时间等待
    #[arg(long)]
    realtime: bool,

    /// 每帧后输出颜色值
    #[arg(long)]
    colors: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SurfaceArg {
    Gdiplus,
    Freetype2,
    Unknown,
}

impl From<SurfaceArg> for SurfaceKind {
    fn from(arg: SurfaceArg) -> Self {
        match arg {
            SurfaceArg::Gdiplus => SurfaceKind::GdiPlus,
            SurfaceArg::Freetype2 => SurfaceKind::FreeType2,
            SurfaceArg::Unknown => SurfaceKind::Unknown,
        }
    }
}

impl RunArgs {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut AppConfig) {
        if let Some(effect) = &self.effect {
            config.effect = effect.clone();
        }
        if let Some(text) = &self.text {
            config.text = text.clone();
            config.file = None;
        }
        if let Some(file) = &self.file {
            config.file = Some(file.clone());
            config.reload = self.reload;
        }
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(refresh) = self.refresh {
            config.refresh_rate_ms = refresh;
        }
        if let Some(sound) = &self.sound {
            config.sound_source = Some(sound.clone());
        }
        if let Some(layer) = &self.layer {
            config.layer_source = Some(layer.clone());
        }
        if let Some(surface) = self.surface {
            config.surface.kind = surface.into();
        }
    }

    fn scripted_commands(&self) -> Vec<ScriptedCommand> {
        let resets = self
            .reset_at
            .iter()
            .map(|&at| ScriptedCommand::new(at, EngineCommand::Reset));
        let triggers = self
            .retrigger_at
            .iter()
            .map(|&at| ScriptedCommand::new(at, EngineCommand::Trigger));
        resets.chain(triggers).collect()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(logging::level_for_verbosity(cli.verbose));

    if let Err(e) = real_main(cli) {
        error!("{e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Effects => {
            list_effects();
            Ok(())
        }
        Commands::InitConfig { path, force } => init_config(&path, force),
    }
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load(&args.config);
    args.apply(&mut config);
    config.validate()?;

    let registry = EffectRegistry::builtin();
    if !registry.contains(&config.effect) {
        anyhow::bail!(
            "未知效果: {}（可用：{}）",
            config.effect,
            registry.names().collect::<Vec<_>>().join(", ")
        );
    }

    let sink = TerminalSink::stdout(config.surface.name.clone(), config.surface.kind)
        .with_colors(args.colors);
    let engine_config = config.to_engine_config();
    let mut engine = match args.seed {
        Some(seed) => TickerEngine::with_seed(engine_config, sink, seed)?,
        None => TickerEngine::new(engine_config, sink)?,
    };

    let mode = if args.realtime {
        ClockMode::Realtime
    } else {
        ClockMode::Virtual
    };
    let mut scheduler = Scheduler::new(mode).with_commands(args.scripted_commands());

    let report = scheduler
        .run(&mut engine, EngineCommand::Trigger)
        .with_context(|| format!("效果 {} 运行失败", config.effect))?;

    info!(
        effect = %config.effect,
        ticks = report.ticks,
        frames = engine.sink().frame_count(),
        elapsed_ms = report.elapsed_ms,
        "完成"
    );
    Ok(())
}

fn list_effects() {
    let registry = EffectRegistry::builtin();
    for entry in registry.entries() {
        println!("{:<12} {}", entry.name, entry.summary);
    }
}

fn init_config(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("文件已存在: {}（使用 --force 覆盖）", path.display());
    }
    AppConfig::default().save(path)?;
    info!(path = %path.display(), "已生成默认配置");
    Ok(())
}

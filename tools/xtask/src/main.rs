//! # xtask - 开发辅助工具
//!
//! ## 命令
//!
//! - `check-all`: 依次运行 fmt、clippy、test
//! - `config-check`: 检查宿主配置文件（JSON 格式、取值范围、效果名）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use fx_host::AppConfig;
use fx_runtime::EffectRegistry;
use walkdir::WalkDir;

/// check-all 的步骤，按顺序执行，任一步失败即停止
const CHECK_STEPS: &[&[&str]] = &[
    &["fmt", "--all", "--", "--check"],
    &["clippy", "--workspace", "--all-targets"],
    &["test", "--workspace"],
];

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let result = match args.next().as_deref() {
        Some("check-all") => check_all(),
        Some("config-check") => config_check(args.next().as_deref()),
        Some(other) => Err(anyhow::anyhow!(
            "未知命令: {other}（可用：check-all, config-check）"
        )),
        None => {
            eprintln!("用法: cargo xtask <check-all | config-check [path]>");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xtask error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn check_all() -> anyhow::Result<()> {
    for step in CHECK_STEPS {
        let line = format!("cargo {}", step.join(" "));
        eprintln!("\n==> {line}");
        let status = Command::new("cargo").args(*step).status()?;
        if !status.success() {
            anyhow::bail!("{line} 失败（{status}）");
        }
    }
    Ok(())
}

//=============================================================================
// config-check 命令实现
//=============================================================================

/// 单个文件的检查结果
#[derive(Default)]
struct FileReport {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// 执行配置检查
fn config_check(path: Option<&str>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_config_files(&path)
            } else {
                anyhow::bail!("路径不存在: {}", p);
            }
        }
        None => {
            let default = PathBuf::from("fx.json");
            if !default.exists() {
                anyhow::bail!("默认配置文件不存在: fx.json\n请指定配置路径");
            }
            vec![default]
        }
    };

    if files.is_empty() {
        eprintln!("未找到配置文件（.json）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个配置文件...\n", files.len());

    let registry = EffectRegistry::builtin();
    let mut error_count = 0;
    let mut warn_count = 0;

    for file in &files {
        let report = check_config_file(file, &registry);
        for e in &report.errors {
            eprintln!("[ERROR] {}: {}", file.display(), e);
        }
        for w in &report.warnings {
            eprintln!("[WARN] {}: {}", file.display(), w);
        }
        error_count += report.errors.len();
        warn_count += report.warnings.len();
    }

    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个配置文件", files.len());
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
        anyhow::bail!("配置检查发现错误");
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }

    Ok(())
}

/// 收集目录下的所有 JSON 文件
fn collect_config_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// 检查单个配置文件
fn check_config_file(file: &Path, registry: &EffectRegistry) -> FileReport {
    let mut report = FileReport::default();

    let config = match AppConfig::read(file) {
        Ok(c) => c,
        Err(e) => {
            report.errors.push(e.to_string());
            return report;
        }
    };

    if let Err(e) = config.validate() {
        report.errors.push(e.to_string());
    }

    if !registry.contains(&config.effect) {
        report.errors.push(format!("未知效果: {}", config.effect));
    }

    if let Some(text_file) = &config.file {
        // 相对路径按配置文件所在目录解析
        let resolved = file
            .parent()
            .map(|dir| dir.join(text_file))
            .unwrap_or_else(|| text_file.clone());
        if !resolved.exists() && !text_file.exists() {
            report
                .warnings
                .push(format!("文字文件不存在: {}", text_file.display()));
        }
    }

    if config.reload && config.file.is_none() {
        report
            .warnings
            .push("reload 仅在配置了 file 时生效".to_string());
    }

    report
}

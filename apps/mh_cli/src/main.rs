// apps/mh_cli/src/main.rs

//! MariHydro 多相相系统命令行界面
//!
//! 读取 JSON 相系统配置，在一维测试网格上构造相系统，
//! 用于检查配置、列出相对与子模型，以及试算曳力局部消元。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::FmtSubscriber;

/// MariHydro 多相相系统命令行工具
#[derive(Parser)]
#[command(name = "mh_cli")]
#[command(author = "MariHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MariHydro Euler-Euler phase system", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
    /// 显示相、相对与子模型
    Info(commands::info::InfoArgs),
    /// 试算局部消元
    Eliminate(commands::eliminate::EliminateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // try_init 同时安装 log → tracing 桥接，库内 log 记录经此输出
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish()
        .try_init()?;

    // 执行命令
    match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Eliminate(args) => commands::eliminate::execute(args),
    }
}

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use exam_navigator::app::{App, Command};
use exam_navigator::config::Config;
use exam_navigator::utils::logging;

/// 试卷答题 / 录入命令行工具
#[derive(Debug, Parser)]
#[command(name = "exam-navigator", version)]
struct Cli {
    /// TOML 配置文件（环境变量仍会覆盖其中的值）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env()?,
    };
    if cli.verbose {
        config.verbose_logging = true;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    App::initialize(config)?.run(cli.command).await
}

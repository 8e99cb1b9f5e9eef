mod assess;
mod cli;
mod config;
mod engine;
mod scanner;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// ABAP SQL Diagnostics Tool
///
/// CLI 工具：检查 SELECT 的 ORDER BY / SORT 规则
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 输出 JSON 格式 (默认输出人类可读的 Markdown)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 🛰️ 目录扫描 - 全项目 SELECT 规则检查
    Scan {
        /// 项目路径
        #[arg(short, long, default_value = ".")]
        path: String,

        /// 显示完整结果（含修复建议）
        #[arg(long)]
        full: bool,

        /// 扫描配置文件 (YAML)
        #[arg(long)]
        config: Option<String>,
    },

    /// 🔍 单文件分析
    Analyze {
        /// 文件路径
        #[arg(short, long)]
        file: String,
    },

    /// 📋 批量评估 - 读取代码单元列表 JSON，输出附加 findings 的同一列表
    Assess {
        /// 单元列表 JSON 文件（缺省时读 stdin）
        #[arg(short, long)]
        file: Option<String>,
    },

    /// ℹ️ 引擎状态
    Status,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志（输出到 stderr，避免干扰 stdout 的结果输出）
    let level = args.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    cli::handle_command(args.command, args.json)
}

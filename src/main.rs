//! Lingr Notifier 主程序入口
//!
//! 构建完成后将构建结果发送到Lingr聊天室

use anyhow::{Context, Result};
use clap::Parser;
use lingr_notifier::cli::{command_for, Args, Command};
use lingr_notifier::logging::LoggingSystem;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let _logging_system =
        LoggingSystem::setup_logging(args.log_config()).context("初始化日志系统失败")?;

    debug!("Lingr Notifier v{} 启动", lingr_notifier::VERSION);

    // 执行命令，失败时以非零状态退出，由CI服务器将该步骤标记为失败
    if let Err(e) = command_for(&args.command).execute(&args).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

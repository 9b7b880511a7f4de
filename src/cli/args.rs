//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::build::BuildResult;
use crate::config::SettingsSubmission;
use crate::logging::LogConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lingr Notifier - 将CI构建结果发送到Lingr聊天室
#[derive(Parser, Debug, Clone)]
#[command(
    name = "lingr-notifier",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "LINGR_NOTIFIER_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "LINGR_NOTIFIER_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否以JSON格式输出日志
    #[arg(long, help = "以JSON格式输出日志")]
    pub json_log: bool,

    /// 日志文件路径，同时输出到控制台和文件
    #[arg(
        long,
        value_name = "FILE",
        help = "日志文件路径",
        env = "LINGR_NOTIFIER_LOG_FILE"
    )]
    pub log_file: Option<PathBuf>,

    /// 模块级别日志，可重复指定
    #[arg(
        long = "log-module",
        value_name = "TARGET=LEVEL",
        help = "模块日志级别，例如 reqwest=warn",
        value_parser = parse_module_level
    )]
    pub log_modules: Vec<(String, LogLevel)>,

    /// 是否启用详细输出
    #[arg(short, long, help = "启用详细输出")]
    pub verbose: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// 解析 `模块=级别` 形式的参数
fn parse_module_level(raw: &str) -> Result<(String, LogLevel), String> {
    let (target, level) = raw
        .split_once('=')
        .ok_or_else(|| format!("格式应为 TARGET=LEVEL: {raw}"))?;

    let target = target.trim();
    if target.is_empty() {
        return Err(format!("模块名不能为空: {raw}"));
    }

    let level = LogLevel::from_str(level.trim(), true)?;
    Ok((target.to_string(), level))
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 发送构建结果通知（构建完成后由CI服务器调用）
    Notify {
        /// 项目名称
        #[arg(long, value_name = "NAME", help = "项目名称", env = "JOB_NAME")]
        project: String,

        /// 构建编号
        #[arg(
            long,
            value_name = "NUMBER",
            help = "构建编号",
            env = "BUILD_NUMBER",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        build_number: u64,

        /// 构建结果
        #[arg(
            long,
            value_name = "RESULT",
            help = "构建结果（SUCCESS/FAILURE/UNSTABLE/ABORTED/NOT_BUILT）",
            env = "BUILD_RESULT"
        )]
        result: BuildResult,

        /// 当前请求URL，用于推断CI服务器URL
        #[arg(
            long,
            value_name = "URL",
            help = "当前请求URL，用于推断CI服务器URL",
            env = "BUILD_URL"
        )]
        request_url: Option<String>,
    },

    /// 保存通知设置
    Configure(ConfigureArgs),

    /// 查看当前配置
    Show {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 测试通知功能
    TestNotification {
        /// 测试消息内容
        #[arg(short, long, default_value = "这是一条测试消息", help = "测试消息内容")]
        message: String,

        /// 当前请求URL，用于推断CI服务器URL
        #[arg(
            long,
            value_name = "URL",
            help = "当前请求URL，用于推断CI服务器URL",
            env = "BUILD_URL"
        )]
        request_url: Option<String>,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 设置参数
///
/// 两个布尔开关未指定时视为关闭
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigureArgs {
    /// Lingr用户名
    #[arg(long, value_name = "NAME", help = "Lingr用户名")]
    pub user_name: Option<String>,

    /// Lingr密码
    #[arg(
        long,
        value_name = "PASSWORD",
        help = "Lingr密码",
        env = "LINGR_NOTIFIER_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Lingr应用密钥
    #[arg(long, value_name = "KEY", help = "Lingr应用密钥")]
    pub app_key: Option<String>,

    /// 目标房间
    #[arg(long, value_name = "ROOM", help = "目标房间")]
    pub room: Option<String>,

    /// 只在构建未成功时通知
    #[arg(long, help = "只在构建未成功时通知")]
    pub notify_only_on_failure: bool,

    /// 在消息中附带CI服务器URL
    #[arg(long, help = "在消息中附带CI服务器URL")]
    pub include_url: bool,

    /// 站点级配置的CI服务器URL
    #[arg(
        long,
        value_name = "URL",
        help = "站点级配置的CI服务器URL",
        env = "LINGR_NOTIFIER_SITE_URL"
    )]
    pub site_url: Option<String>,
}

impl ConfigureArgs {
    /// 转换为设置提交
    pub fn to_submission(&self) -> SettingsSubmission {
        SettingsSubmission {
            user_name: self.user_name.clone(),
            password: self.password.clone(),
            app_key: self.app_key.clone(),
            room: self.room.clone(),
            notify_only_on_failure: self.notify_only_on_failure.then_some(true),
            include_url: self.include_url.then_some(true),
        }
    }
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::get_default_config_path)
    }

    /// 是否启用详细输出
    pub fn is_verbose(&self) -> bool {
        self.verbose || matches!(self.log_level, LogLevel::Debug)
    }

    /// 根据命令行参数生成日志配置
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone().into(),
            file_path: self.log_file.clone(),
            console: true,
            json_format: self.json_log,
            module_levels: self
                .log_modules
                .iter()
                .map(|(target, level)| (target.clone(), level.clone().into()))
                .collect(),
        }
    }
}

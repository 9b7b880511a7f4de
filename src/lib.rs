//! Lingr Notifier - CI构建结果通知工具
//!
//! 构建完成后由CI服务器调用，将一行构建状态发送到Lingr聊天室：
//! - 可配置只在构建未成功时通知
//! - 可在消息中附带CI服务器URL，未配置时首次使用自动推断
//! - TOML配置文件持久化
//! - 结构化日志记录

pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notification;

// 重新导出主要类型
pub use build::{BuildOutcome, BuildResult};
pub use config::{NotifierConfig, SettingsSubmission};
pub use error::LingrNotifierError;
pub use notification::{ChatClient, Dispatch, Notifier};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

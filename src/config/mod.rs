//! 配置管理模块
//!
//! 提供配置文件读写、管理端设置应用和服务器URL推断功能

pub mod server_url;
pub mod store;
pub mod types;

// 重新导出主要类型
pub use server_url::{resolve_server_url, RequestContext};
pub use store::{get_default_config_path, ConfigStore, TomlConfigStore};
pub use types::{NotifierConfig, SettingsSubmission};

//! 配置数据结构定义
//!
//! 定义通知器的持久化配置以及管理端提交的设置项

use serde::{Deserialize, Serialize};

/// 通知器配置
///
/// 进程启动时加载一次，之后只在管理端保存设置或首次推断服务器URL时修改
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotifierConfig {
    /// Lingr用户名
    pub user_name: Option<String>,
    /// Lingr密码
    pub password: Option<String>,
    /// Lingr应用密钥
    pub app_key: Option<String>,
    /// 目标房间
    pub room: Option<String>,
    /// 是否只在构建未成功时通知
    #[serde(default)]
    pub notify_only_on_failure: bool,
    /// 是否在消息末尾附带CI服务器URL
    #[serde(default)]
    pub include_url: bool,
    /// CI服务器对外访问的根URL，未设置时在首次使用时推断
    pub server_url: Option<String>,
    /// Lingr API 根地址
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            user_name: None,
            password: None,
            app_key: None,
            room: None,
            notify_only_on_failure: false,
            include_url: false,
            server_url: None,
            api_url: default_api_url(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

/// 管理端提交的设置项
///
/// 未出现的字段为 `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSubmission {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub app_key: Option<String>,
    pub room: Option<String>,
    pub notify_only_on_failure: Option<bool>,
    pub include_url: Option<bool>,
}

// 默认值函数
fn default_api_url() -> String {
    "http://lingr.com/api".to_string()
}
fn default_timeout() -> u64 {
    30
}

impl NotifierConfig {
    /// 应用管理端提交的设置
    ///
    /// 两个布尔开关先重置为 false 再覆盖提交值；其余字段未提交时保留原值。
    /// 服务器URL每次都从站点配置重新解析，站点未配置时清空，等待首次使用时推断。
    ///
    /// # 参数
    /// * `submission` - 提交的设置项
    /// * `site_url` - 站点级配置中的CI服务器URL
    pub fn apply_settings(&mut self, submission: SettingsSubmission, site_url: Option<String>) {
        self.notify_only_on_failure = false;
        self.include_url = false;

        if let Some(user_name) = submission.user_name {
            self.user_name = Some(user_name);
        }
        if let Some(password) = submission.password {
            self.password = Some(password);
        }
        if let Some(app_key) = submission.app_key {
            self.app_key = Some(app_key);
        }
        if let Some(room) = submission.room {
            self.room = Some(room);
        }
        if let Some(notify_only_on_failure) = submission.notify_only_on_failure {
            self.notify_only_on_failure = notify_only_on_failure;
        }
        if let Some(include_url) = submission.include_url {
            self.include_url = include_url;
        }

        self.server_url = site_url.filter(|url| !url.trim().is_empty());
    }

    /// 返回隐藏密码后的配置副本，用于展示和日志
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if masked.password.is_some() {
            masked.password = Some("********".to_string());
        }
        masked
    }
}

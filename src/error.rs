//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Lingr Notifier 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum LingrNotifierError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置序列化错误
    #[error("配置序列化失败: {0}")]
    SerializeError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// URL格式错误
    #[error("无效的URL: {0}")]
    InvalidUrl(String),
}

/// 通知错误类型
///
/// 两类错误都原样返回给调用方，不做本地重试
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// 会话认证失败（用户名、密码或 app key 错误，或认证请求无法完成）
    #[error("Lingr认证失败: {0}")]
    AuthenticationFailure(String),

    /// 房间消息投递失败
    #[error("Lingr消息投递失败: {0}")]
    DeliveryFailure(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, LingrNotifierError>;

//! 通知分发模块
//!
//! 每次构建完成时调用一次：判断是否需要通知，认证后向房间发送一行状态消息

use crate::build::BuildOutcome;
use crate::config::NotifierConfig;
use crate::error::NotificationError;
use crate::logging::LoggingSystem;
use crate::notification::client::{ChatClient, Credentials};
use std::sync::Arc;
use tracing::debug;

/// 分发结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// 成功构建且配置为只通知失败，未发送
    Skipped,
    /// 已发送的消息
    Sent { message: String },
}

/// 通知分发器
pub struct Notifier {
    /// 聊天客户端
    client: Arc<dyn ChatClient>,
}

impl Notifier {
    /// 创建新的通知分发器
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    /// 发送构建结果通知
    ///
    /// 不重试，认证和投递错误原样返回
    ///
    /// # 参数
    /// * `config` - 通知器配置
    /// * `outcome` - 构建结果
    ///
    /// # 返回
    /// * `Result<Dispatch, NotificationError>` - 分发结果
    pub async fn notify(
        &self,
        config: &NotifierConfig,
        outcome: &BuildOutcome,
    ) -> Result<Dispatch, NotificationError> {
        if config.notify_only_on_failure && outcome.result.is_success() {
            debug!(
                project = %outcome.project_name,
                build = outcome.build_number,
                "构建成功且只通知失败，跳过通知"
            );
            return Ok(Dispatch::Skipped);
        }

        let message = format_message(config, outcome);
        let room = config.room.clone().unwrap_or_default();

        let result = self.send(config, &room, &message).await;
        LoggingSystem::notification_log(
            &outcome.project_name,
            &room,
            result.is_ok(),
            result.as_ref().err().map(|e| e.to_string()).as_deref(),
        );
        result?;

        Ok(Dispatch::Sent { message })
    }

    /// 认证并向房间发送任意文本
    pub async fn send(
        &self,
        config: &NotifierConfig,
        room: &str,
        text: &str,
    ) -> Result<(), NotificationError> {
        let session = self.client.create_session(&credentials(config)).await?;
        self.client.say(&session, room, text).await
    }
}

/// 从配置中取出认证信息，缺失字段按空字符串处理，由服务端拒绝
pub fn credentials(config: &NotifierConfig) -> Credentials {
    Credentials {
        user_name: config.user_name.clone().unwrap_or_default(),
        password: config.password.clone().unwrap_or_default(),
        app_key: config.app_key.clone().unwrap_or_default(),
    }
}

/// 格式化通知消息
///
/// 格式固定为 `<结果>:<项目> #<编号> - <URL>`，未启用附带URL时URL为空
pub fn format_message(config: &NotifierConfig, outcome: &BuildOutcome) -> String {
    let url = if config.include_url {
        config.server_url.as_deref().unwrap_or_default()
    } else {
        ""
    };

    format!(
        "{}:{} #{} - {}",
        outcome.result, outcome.project_name, outcome.build_number, url
    )
}

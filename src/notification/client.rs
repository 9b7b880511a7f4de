//! 聊天客户端模块
//!
//! 定义会话认证和房间消息投递的trait

use crate::error::NotificationError;
use async_trait::async_trait;

/// 聊天服务认证信息
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// 用户名
    pub user_name: String,
    /// 密码
    pub password: String,
    /// 应用密钥
    pub app_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"********")
            .field("app_key", &"********")
            .finish()
    }
}

/// 已认证的会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    /// 会话标识
    pub id: String,
    /// 服务端返回的昵称
    pub nickname: Option<String>,
}

/// 聊天客户端trait
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// 创建认证会话
    ///
    /// # 参数
    /// * `credentials` - 认证信息
    ///
    /// # 返回
    /// * `Result<ChatSession, NotificationError>` - 会话，失败时为 `AuthenticationFailure`
    async fn create_session(
        &self,
        credentials: &Credentials,
    ) -> Result<ChatSession, NotificationError>;

    /// 向房间发送消息
    ///
    /// # 参数
    /// * `session` - 已认证的会话
    /// * `room` - 房间标识
    /// * `text` - 消息内容
    ///
    /// # 返回
    /// * `Result<(), NotificationError>` - 失败时为 `DeliveryFailure`
    async fn say(
        &self,
        session: &ChatSession,
        room: &str,
        text: &str,
    ) -> Result<(), NotificationError>;
}

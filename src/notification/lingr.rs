//! Lingr客户端模块
//!
//! 通过Lingr HTTP API创建会话并向房间发送消息

use crate::config::NotifierConfig;
use crate::error::NotificationError;
use crate::notification::client::{ChatClient, ChatSession, Credentials};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// Lingr API 响应
#[derive(Debug, Deserialize)]
struct LingrResponse {
    status: String,
    session: Option<String>,
    nickname: Option<String>,
    code: Option<String>,
    detail: Option<String>,
}

impl LingrResponse {
    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn error_detail(&self) -> String {
        match (&self.code, &self.detail) {
            (Some(code), Some(detail)) => format!("{code}: {detail}"),
            (Some(code), None) => code.clone(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => format!("status={}", self.status),
        }
    }
}

/// Lingr客户端
pub struct LingrClient {
    /// HTTP客户端
    client: Client,
    /// API根地址
    api_url: String,
}

impl LingrClient {
    /// 创建新的Lingr客户端
    ///
    /// # 参数
    /// * `api_url` - API根地址，例如 `http://lingr.com/api`
    /// * `timeout` - 请求超时时间
    ///
    /// # 返回
    /// * `Result<Self>` - 客户端实例
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("创建HTTP客户端失败")?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 根据通知器配置创建客户端
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// 提交表单到指定接口并解析响应
    async fn post_form(
        &self,
        endpoint: &str,
        form: &[(&str, &str)],
    ) -> std::result::Result<LingrResponse, String> {
        let url = format!("{}/{}", self.api_url, endpoint);
        debug!("请求Lingr接口: {}", url);

        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| format!("请求 {endpoint} 失败: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Lingr接口返回错误: {} - {}", status, text);
            return Err(format!("{endpoint} 返回HTTP {status}"));
        }

        response
            .json::<LingrResponse>()
            .await
            .map_err(|e| format!("解析 {endpoint} 响应失败: {e}"))
    }
}

#[async_trait]
impl ChatClient for LingrClient {
    async fn create_session(
        &self,
        credentials: &Credentials,
    ) -> std::result::Result<ChatSession, NotificationError> {
        let form = [
            ("user", credentials.user_name.as_str()),
            ("password", credentials.password.as_str()),
            ("app_key", credentials.app_key.as_str()),
        ];

        let response = self
            .post_form("session/create", &form)
            .await
            .map_err(NotificationError::AuthenticationFailure)?;

        if !response.is_ok() {
            return Err(NotificationError::AuthenticationFailure(
                response.error_detail(),
            ));
        }

        let id = response.session.clone().ok_or_else(|| {
            NotificationError::AuthenticationFailure("响应中缺少session".to_string())
        })?;

        info!(user = %credentials.user_name, "Lingr会话创建成功");
        Ok(ChatSession {
            id,
            nickname: response.nickname,
        })
    }

    async fn say(
        &self,
        session: &ChatSession,
        room: &str,
        text: &str,
    ) -> std::result::Result<(), NotificationError> {
        let mut form = vec![("session", session.id.as_str()), ("room", room), ("text", text)];
        if let Some(nickname) = session.nickname.as_deref() {
            form.push(("nickname", nickname));
        }

        let response = self
            .post_form("room/say", &form)
            .await
            .map_err(NotificationError::DeliveryFailure)?;

        if !response.is_ok() {
            return Err(NotificationError::DeliveryFailure(response.error_detail()));
        }

        info!(room = %room, "Lingr消息发送成功");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let client = LingrClient::new("http://lingr.com/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.api_url, "http://lingr.com/api");
    }

    #[test]
    fn test_error_detail_formats() {
        let response: LingrResponse = serde_json::from_str(
            r#"{"status":"error","code":"invalid_user_credentials","detail":"invalid user credentials"}"#,
        )
        .unwrap();

        assert!(!response.is_ok());
        assert_eq!(
            response.error_detail(),
            "invalid_user_credentials: invalid user credentials"
        );

        let response: LingrResponse = serde_json::from_str(r#"{"status":"error"}"#).unwrap();
        assert_eq!(response.error_detail(), "status=error");
    }
}

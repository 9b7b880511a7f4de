//! CI服务器URL解析
//!
//! 服务器URL未配置时，从当前请求上下文推断并持久化

use crate::config::store::ConfigStore;
use crate::config::types::NotifierConfig;
use crate::error::{ConfigError, Result};
use reqwest::Url;
use tracing::{debug, info};

/// 请求上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// 协议（http/https）
    pub scheme: String,
    /// 主机名
    pub host: String,
    /// 端口，协议默认端口时为 `None`
    pub port: Option<u16>,
    /// 上下文路径，不含末尾 `/`，部署在根路径时为空
    pub context_path: String,
}

impl RequestContext {
    /// 从请求URL构造上下文
    ///
    /// # 参数
    /// * `raw` - 请求URL，例如构建页面地址
    ///
    /// # 返回
    /// * `Result<Self>` - 请求上下文或URL错误
    pub fn from_url(raw: &str) -> Result<Self> {
        let url =
            Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(format!("{raw}: {e}")))?;

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| ConfigError::InvalidUrl(format!("{raw}: 缺少主机名")))?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            // Url::port 对协议默认端口返回 None
            port: url.port(),
            context_path: context_path(url.path()),
        })
    }

    /// 推断CI服务器根URL
    pub fn infer_server_url(&self) -> String {
        match self.port {
            Some(port) if !is_default_port(&self.scheme, port) => format!(
                "{}://{}:{}{}/",
                self.scheme, self.host, port, self.context_path
            ),
            _ => format!("{}://{}{}/", self.scheme, self.host, self.context_path),
        }
    }
}

/// 从请求路径中取出上下文路径
///
/// 构建页面地址形如 `<根路径>job/<项目>/<编号>/`，取第一个 `/job/` 之前的部分
fn context_path(path: &str) -> String {
    let prefix = match path.find("/job/") {
        Some(index) => &path[..index],
        None => path,
    };
    prefix.trim_end_matches('/').to_string()
}

fn is_default_port(scheme: &str, port: u16) -> bool {
    matches!((scheme, port), ("http", 80) | ("https", 443))
}

/// 确保服务器URL已解析
///
/// 已配置时不做任何事；未配置且有请求上下文时推断、写回配置并持久化。
///
/// # 返回
/// * `Result<bool>` - 本次是否进行了推断
pub async fn resolve_server_url<S>(
    store: &S,
    config: &mut NotifierConfig,
    request: Option<&RequestContext>,
) -> Result<bool>
where
    S: ConfigStore + ?Sized,
{
    let resolved = config
        .server_url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());
    if resolved {
        return Ok(false);
    }

    let Some(request) = request else {
        debug!("服务器URL未配置且没有请求上下文，跳过推断");
        return Ok(false);
    };

    let inferred = request.infer_server_url();
    info!(server_url = %inferred, "推断CI服务器URL");

    config.server_url = Some(inferred);
    store.save(config).await?;

    Ok(true)
}

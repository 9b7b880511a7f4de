//! 配置存储实现
//!
//! 提供TOML配置文件的读取、写入和默认路径解析

use crate::config::types::NotifierConfig;
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "lingr-notifier.toml";

/// 配置存储trait，定义配置持久化接口
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// 加载配置，配置文件不存在时返回默认配置
    ///
    /// # 返回
    /// * `Result<NotifierConfig>` - 加载的配置或错误
    async fn load(&self) -> Result<NotifierConfig>;

    /// 保存配置
    ///
    /// # 参数
    /// * `config` - 要保存的配置
    ///
    /// # 返回
    /// * `Result<()>` - 保存结果
    async fn save(&self, config: &NotifierConfig) -> Result<()>;
}

/// TOML配置存储实现
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    /// 配置文件路径
    path: PathBuf,
}

impl TomlConfigStore {
    /// 创建新的TOML配置存储
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 配置文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载已存在的配置文件，文件不存在时返回错误
    pub async fn load_existing(&self) -> Result<NotifierConfig> {
        if !self.path.exists() {
            return Err(ConfigError::FileNotFound {
                path: self.path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        let config = parse_config(&content)?;

        log::info!("成功加载配置文件: {}", self.path.display());
        log::debug!("配置内容: {:?}", config.masked());

        Ok(config)
    }
}

#[async_trait]
impl ConfigStore for TomlConfigStore {
    async fn load(&self) -> Result<NotifierConfig> {
        if !self.path.exists() {
            log::debug!("配置文件不存在，使用默认配置: {}", self.path.display());
            return Ok(NotifierConfig::default());
        }

        self.load_existing().await
    }

    async fn save(&self, config: &NotifierConfig) -> Result<()> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        // 创建目录（如果不存在）
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, content).await?;

        log::info!("配置已保存: {}", self.path.display());
        Ok(())
    }
}

/// 解析TOML配置内容
pub fn parse_config(content: &str) -> Result<NotifierConfig> {
    let config: NotifierConfig = toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?;
    Ok(config)
}

/// 获取默认配置文件路径
///
/// 优先使用当前目录下的 `lingr-notifier.toml`，否则使用用户配置目录
pub fn get_default_config_path() -> PathBuf {
    if Path::new(CONFIG_FILE_NAME).exists() {
        return PathBuf::from(CONFIG_FILE_NAME);
    }

    dirs::config_dir()
        .map(|config_dir| config_dir.join("lingr-notifier").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

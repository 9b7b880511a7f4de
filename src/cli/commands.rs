//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::build::BuildOutcome;
use crate::cli::args::{Args, Commands, ConfigureArgs, OutputFormat};
use crate::config::{
    resolve_server_url, ConfigStore, NotifierConfig, RequestContext, TomlConfigStore,
};
use crate::error::Result;
use crate::notification::{Dispatch, LingrClient, Notifier};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 根据参数选择命令处理器
pub fn command_for(command: &Commands) -> Box<dyn Command> {
    match command {
        Commands::Notify { .. } => Box::new(NotifyCommand),
        Commands::Configure(_) => Box::new(ConfigureCommand),
        Commands::Show { .. } => Box::new(ShowCommand),
        Commands::TestNotification { .. } => Box::new(TestNotificationCommand),
        Commands::Version { .. } => Box::new(VersionCommand),
    }
}

/// 解析请求上下文，URL无效时只记录警告
fn parse_request_context(request_url: Option<&str>) -> Option<RequestContext> {
    let raw = request_url.filter(|url| !url.trim().is_empty())?;
    match RequestContext::from_url(raw) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            warn!("忽略无效的请求URL: {}", e);
            None
        }
    }
}

/// 加载配置并在首次使用时推断服务器URL
async fn load_resolved_config<S>(store: &S, request_url: Option<&str>) -> Result<NotifierConfig>
where
    S: ConfigStore + ?Sized,
{
    let mut config = store.load().await?;
    let request = parse_request_context(request_url);
    resolve_server_url(store, &mut config, request.as_ref()).await?;
    Ok(config)
}

/// 处理一次构建完成事件
///
/// # 参数
/// * `store` - 配置存储
/// * `outcome` - 构建结果
/// * `request_url` - 当前请求URL
///
/// # 返回
/// * `Result<Dispatch>` - 分发结果
pub async fn dispatch_build<S>(
    store: &S,
    outcome: &BuildOutcome,
    request_url: Option<&str>,
) -> Result<Dispatch>
where
    S: ConfigStore + ?Sized,
{
    let config = load_resolved_config(store, request_url).await?;

    let client = LingrClient::from_config(&config)?;
    let notifier = Notifier::new(Arc::new(client));

    Ok(notifier.notify(&config, outcome).await?)
}

/// 通知命令
pub struct NotifyCommand;

#[async_trait]
impl Command for NotifyCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Notify {
            project,
            build_number,
            result,
            request_url,
        } = &args.command
        {
            let store = TomlConfigStore::new(args.get_config_path());
            let outcome = BuildOutcome::new(project.clone(), *build_number, *result);

            match dispatch_build(&store, &outcome, request_url.as_deref()).await? {
                Dispatch::Skipped => info!("{} #{} 构建成功，未发送通知", project, build_number),
                Dispatch::Sent { message } => info!("已发送通知: {}", message),
            }
        }
        Ok(())
    }
}

/// 设置命令
pub struct ConfigureCommand;

#[async_trait]
impl Command for ConfigureCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Configure(configure) = &args.command {
            let store = TomlConfigStore::new(args.get_config_path());
            let config = self.save_settings(&store, configure).await?;

            println!("设置已保存: {}", store.path().display());
            if args.is_verbose() {
                print_config(&config.masked());
            }
        }
        Ok(())
    }
}

impl ConfigureCommand {
    /// 应用提交的设置并持久化
    pub async fn save_settings<S>(
        &self,
        store: &S,
        configure: &ConfigureArgs,
    ) -> Result<NotifierConfig>
    where
        S: ConfigStore + ?Sized,
    {
        let mut config = store.load().await?;
        config.apply_settings(configure.to_submission(), configure.site_url.clone());
        store.save(&config).await?;

        info!(
            room = config.room.as_deref().unwrap_or(""),
            notify_only_on_failure = config.notify_only_on_failure,
            include_url = config.include_url,
            "通知设置已更新"
        );
        Ok(config)
    }
}

/// 查看配置命令
pub struct ShowCommand;

#[async_trait]
impl Command for ShowCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Show { format } = &args.command {
            let store = TomlConfigStore::new(args.get_config_path());
            let config = store.load_existing().await?.masked();

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Text => {
                    println!("配置文件: {}", store.path().display());
                    print_config(&config);
                }
            }
        }
        Ok(())
    }
}

fn print_config(config: &NotifierConfig) {
    let or_unset = |value: &Option<String>| {
        value.clone().unwrap_or_else(|| "(未设置)".to_string())
    };

    println!("  用户名: {}", or_unset(&config.user_name));
    println!("  密码: {}", or_unset(&config.password));
    println!("  应用密钥: {}", or_unset(&config.app_key));
    println!("  房间: {}", or_unset(&config.room));
    println!("  只通知失败: {}", config.notify_only_on_failure);
    println!("  附带URL: {}", config.include_url);
    println!("  服务器URL: {}", or_unset(&config.server_url));
    println!("  API地址: {}", config.api_url);
}

/// 测试通知命令
pub struct TestNotificationCommand;

#[async_trait]
impl Command for TestNotificationCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::TestNotification {
            message,
            request_url,
        } = &args.command
        {
            let store = TomlConfigStore::new(args.get_config_path());
            let config = load_resolved_config(&store, request_url.as_deref()).await?;
            let room = config.room.clone().unwrap_or_default();

            let client = LingrClient::from_config(&config)?;
            let notifier = Notifier::new(Arc::new(client));

            println!("📤 发送测试消息到房间 {room}...");
            let text = format!(
                "[{}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                message
            );
            match notifier.send(&config, &room, &text).await {
                Ok(()) => println!("✅ 测试消息发送成功"),
                Err(e) => {
                    println!("❌ 测试消息发送失败: {e}");
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Version { format } = &args.command {
            match format {
                OutputFormat::Json => {
                    let version_info = serde_json::json!({
                        "name": crate::APP_NAME,
                        "version": crate::VERSION,
                        "description": crate::APP_DESCRIPTION
                    });
                    println!("{}", serde_json::to_string_pretty(&version_info)?);
                }
                OutputFormat::Text => {
                    println!("{} v{}", crate::APP_NAME, crate::VERSION);
                    println!("{}", crate::APP_DESCRIPTION);
                }
            }
        }
        Ok(())
    }
}

//! 构建完成通知流程测试
//!
//! 从配置文件加载、服务器URL推断到 Lingr API 调用的完整流程

use lingr_notifier::build::{BuildOutcome, BuildResult};
use lingr_notifier::cli::args::{Args, Commands, ConfigureArgs};
use lingr_notifier::cli::commands::ConfigureCommand;
use lingr_notifier::cli::{command_for, dispatch_build, Command};
use lingr_notifier::config::{ConfigStore, NotifierConfig, TomlConfigStore};
use lingr_notifier::notification::Dispatch;
use mockito::{Matcher, Mock, ServerGuard};
use tempfile::TempDir;

async fn mock_session(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("POST", "/session/create")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","session":"s-1"}"#)
        .expect(hits)
        .create_async()
        .await
}

async fn mock_say(server: &mut ServerGuard, text: &str, hits: usize) -> Mock {
    server
        .mock("POST", "/room/say")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("room".into(), "ci-room".into()),
            Matcher::UrlEncoded("text".into(), text.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok"}"#)
        .expect(hits)
        .create_async()
        .await
}

async fn store_with(dir: &TempDir, config: NotifierConfig) -> TomlConfigStore {
    let store = TomlConfigStore::new(dir.path().join("config.toml"));
    store.save(&config).await.unwrap();
    store
}

fn base_config(api_url: String) -> NotifierConfig {
    NotifierConfig {
        user_name: Some("builder".to_string()),
        password: Some("secret".to_string()),
        app_key: Some("app-key".to_string()),
        room: Some("ci-room".to_string()),
        api_url,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_first_use_infers_and_reuses_server_url() {
    let mut server = mockito::Server::new_async().await;
    let session = mock_session(&mut server, 2).await;
    let say = mock_say(
        &mut server,
        "FAILURE:build-core #42 - http://ci.example.com/",
        2,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        NotifierConfig {
            include_url: true,
            ..base_config(server.url())
        },
    )
    .await;
    let outcome = BuildOutcome::new("build-core", 42, BuildResult::Failure);

    let first = dispatch_build(
        &store,
        &outcome,
        Some("http://ci.example.com/job/build-core/42/"),
    )
    .await
    .unwrap();
    assert_eq!(
        first,
        Dispatch::Sent {
            message: "FAILURE:build-core #42 - http://ci.example.com/".to_string()
        }
    );

    let persisted = store.load().await.unwrap();
    assert_eq!(persisted.server_url.as_deref(), Some("http://ci.example.com/"));

    // 第二次调用不再重新推断
    dispatch_build(&store, &outcome, Some("http://other.example.com:8080/"))
        .await
        .unwrap();
    let persisted = store.load().await.unwrap();
    assert_eq!(persisted.server_url.as_deref(), Some("http://ci.example.com/"));

    session.assert_async().await;
    say.assert_async().await;
}

#[tokio::test]
async fn test_success_skipped_without_outbound_calls() {
    let mut server = mockito::Server::new_async().await;
    let session = mock_session(&mut server, 0).await;

    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        NotifierConfig {
            notify_only_on_failure: true,
            ..base_config(server.url())
        },
    )
    .await;
    let outcome = BuildOutcome::new("build-core", 43, BuildResult::Success);

    let dispatch = dispatch_build(&store, &outcome, None).await.unwrap();

    assert_eq!(dispatch, Dispatch::Skipped);
    session.assert_async().await;
}

#[tokio::test]
async fn test_notify_command_fails_on_rejected_credentials() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/session/create")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"error","code":"invalid_user_credentials"}"#)
        .create_async()
        .await;
    let say = mock_say(&mut server, "UNSTABLE:build-core #44 - ", 0).await;

    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, base_config(server.url())).await;

    let args = Args {
        config: Some(store.path().to_path_buf()),
        log_level: lingr_notifier::cli::args::LogLevel::Info,
        json_log: false,
        log_file: None,
        log_modules: Vec::new(),
        verbose: false,
        command: Commands::Notify {
            project: "build-core".to_string(),
            build_number: 44,
            result: BuildResult::Unstable,
            request_url: None,
        },
    };

    let err = command_for(&args.command).execute(&args).await.unwrap_err();

    assert!(err.to_string().contains("invalid_user_credentials"), "{err}");
    say.assert_async().await;
}

#[tokio::test]
async fn test_settings_save_then_notify_uses_new_room_settings() {
    let mut server = mockito::Server::new_async().await;
    let session = mock_session(&mut server, 1).await;
    let say = mock_say(
        &mut server,
        "ABORTED:build-core #45 - https://ci.example.org/",
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        NotifierConfig {
            room: Some("old-room".to_string()),
            notify_only_on_failure: true,
            ..base_config(server.url())
        },
    )
    .await;

    let configure = ConfigureArgs {
        room: Some("ci-room".to_string()),
        include_url: true,
        site_url: Some("https://ci.example.org/".to_string()),
        ..Default::default()
    };
    let saved = ConfigureCommand
        .save_settings(&store, &configure)
        .await
        .unwrap();
    assert!(!saved.notify_only_on_failure);

    let outcome = BuildOutcome::new("build-core", 45, BuildResult::Aborted);
    dispatch_build(&store, &outcome, None).await.unwrap();

    session.assert_async().await;
    say.assert_async().await;
}

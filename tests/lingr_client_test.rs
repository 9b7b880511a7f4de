//! Lingr客户端测试
//!
//! 使用 mockito 模拟 Lingr HTTP API

use lingr_notifier::error::NotificationError;
use lingr_notifier::notification::{ChatClient, ChatSession, Credentials, LingrClient};
use mockito::Matcher;
use std::time::Duration;

fn credentials() -> Credentials {
    Credentials {
        user_name: "builder".to_string(),
        password: "secret".to_string(),
        app_key: "app-key".to_string(),
    }
}

fn client_for(server: &mockito::Server) -> LingrClient {
    LingrClient::new(server.url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_create_session_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/session/create")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user".into(), "builder".into()),
            Matcher::UrlEncoded("password".into(), "secret".into()),
            Matcher::UrlEncoded("app_key".into(), "app-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","session":"abc123","nickname":"builder"}"#)
        .expect(1)
        .create_async()
        .await;

    let session = client_for(&server)
        .create_session(&credentials())
        .await
        .unwrap();

    assert_eq!(session.id, "abc123");
    assert_eq!(session.nickname.as_deref(), Some("builder"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_session_rejected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/session/create")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status":"error","code":"invalid_app_key","detail":"app key is invalid"}"#,
        )
        .create_async()
        .await;

    let err = client_for(&server)
        .create_session(&credentials())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        NotificationError::AuthenticationFailure("invalid_app_key: app key is invalid".to_string())
    );
}

#[tokio::test]
async fn test_create_session_http_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/session/create")
        .with_status(500)
        .create_async()
        .await;

    let err = client_for(&server)
        .create_session(&credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, NotificationError::AuthenticationFailure(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_create_session_missing_session_id() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/session/create")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .create_session(&credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, NotificationError::AuthenticationFailure(_)));
}

#[tokio::test]
async fn test_say_posts_message_to_room() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/room/say")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("session".into(), "abc123".into()),
            Matcher::UrlEncoded("room".into(), "ci-room".into()),
            Matcher::UrlEncoded(
                "text".into(),
                "FAILURE:build-core #42 - http://ci.example.com/".into(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","message":{"id":"1"}}"#)
        .expect(1)
        .create_async()
        .await;

    let session = ChatSession {
        id: "abc123".to_string(),
        nickname: None,
    };
    client_for(&server)
        .say(
            &session,
            "ci-room",
            "FAILURE:build-core #42 - http://ci.example.com/",
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_say_failure_is_delivery_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/room/say")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"error","code":"invalid_room","detail":"room not found"}"#)
        .create_async()
        .await;

    let session = ChatSession {
        id: "abc123".to_string(),
        nickname: None,
    };
    let err = client_for(&server)
        .say(&session, "nowhere", "hello")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        NotificationError::DeliveryFailure("invalid_room: room not found".to_string())
    );
}

//! 通知模块
//!
//! 提供Lingr聊天客户端和构建结果通知分发功能

pub mod client;
pub mod dispatcher;
pub mod lingr;

// 重新导出主要类型
pub use client::{ChatClient, ChatSession, Credentials};
pub use dispatcher::{format_message, Dispatch, Notifier};
pub use lingr::LingrClient;

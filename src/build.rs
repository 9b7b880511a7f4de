//! 构建结果模块
//!
//! 定义CI服务器在构建完成时传入的构建信息

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 构建结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    /// 构建成功
    Success,
    /// 构建失败
    Failure,
    /// 构建不稳定（如测试失败）
    Unstable,
    /// 构建被中止
    Aborted,
    /// 未构建
    NotBuilt,
}

impl BuildResult {
    /// 所有构建结果
    pub const ALL: [BuildResult; 5] = [
        BuildResult::Success,
        BuildResult::Failure,
        BuildResult::Unstable,
        BuildResult::Aborted,
        BuildResult::NotBuilt,
    ];

    /// 消息中使用的状态名称
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Failure => "FAILURE",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::Aborted => "ABORTED",
            BuildResult::NotBuilt => "NOT_BUILT",
        }
    }

    /// 是否为成功构建
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success)
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 构建结果解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("未知的构建结果: {0}，支持: SUCCESS, FAILURE, UNSTABLE, ABORTED, NOT_BUILT")]
pub struct ParseBuildResultError(String);

impl FromStr for BuildResult {
    type Err = ParseBuildResultError;

    /// 不区分大小写，`-` 与 `_` 等价
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        BuildResult::ALL
            .into_iter()
            .find(|result| result.as_str() == normalized)
            .ok_or_else(|| ParseBuildResultError(s.to_string()))
    }
}

/// 一次构建完成事件携带的信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// 项目名称
    pub project_name: String,
    /// 构建编号
    pub build_number: u64,
    /// 构建结果
    pub result: BuildResult,
}

impl BuildOutcome {
    pub fn new(project_name: impl Into<String>, build_number: u64, result: BuildResult) -> Self {
        Self {
            project_name: project_name.into(),
            build_number,
            result,
        }
    }
}

//! 面试错误类型与恢复动作
//!
//! 与 RecoveryEngine 配合：根据 InterviewError 决定重试提示 / 回退启发式评估 / 换新问题。
//! 任何错误都不会让面试中断。

use thiserror::Error;

use crate::llm::LlmError;

/// 面试过程中可能出现的错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterviewError {
    /// 缺少问题或回答
    #[error("Missing question or answer")]
    InvalidInput,

    /// 推理服务不可达（未配置、网络、非成功响应、超时）
    #[error("Remote evaluator unavailable: {0}")]
    RemoteUnavailable(String),

    /// 推理服务返回无法解析的内容
    #[error("Malformed evaluator response: {0}")]
    MalformedResponse(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<LlmError> for InterviewError {
    fn from(err: LlmError) -> Self {
        InterviewError::RemoteUnavailable(err.to_string())
    }
}

/// 恢复引擎根据错误类型给出的建议动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// 请候选人重新作答上一题
    RetryPrompt,
    /// 本轮改用启发式评估，调用方无感知
    FallbackToHeuristic,
    /// 放弃当前请求，给出一个新问题让面试继续
    FreshQuestion,
}

//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / Groq / Mock）实现 LlmClient：complete（非流式）。

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::memory::Message;

/// 调用推理服务时的失败
#[derive(Error, Debug)]
pub enum LlmError {
    /// 服务返回非成功状态或传输失败
    #[error("API error: {0}")]
    Api(String),

    /// 请求构造失败
    #[error("Request error: {0}")]
    Request(String),

    /// 超过配置的请求超时
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// LLM 客户端 trait
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成，返回首条回复文本
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// 模型名，仅用于日志
    fn model_name(&self) -> &str {
        "unknown"
    }
}

//! Alex - 自适应技能面试后端
//!
//! 模块划分：
//! - **agent**: 无头入口（start / evaluate 动作 → 状态码 + JSON）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型与恢复
//! - **interview**: 信号、结束判定、启发式 / 远程评估、控制器、开场与总结
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Groq / Mock）
//! - **memory**: 面试对话历史与聊天消息
//! - **observability**: 日志初始化

pub mod agent;
pub mod config;
pub mod core;
pub mod interview;
pub mod llm;
pub mod memory;
pub mod observability;

pub use interview::{EvaluationResult, InterviewController, InterviewPhase};
pub use memory::{ConversationEntry, ConversationHistory};

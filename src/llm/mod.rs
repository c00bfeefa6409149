//! LLM 层：客户端抽象与实现（OpenAI 兼容 / Groq / Mock）

pub mod groq;
pub mod mock;
pub mod openai;
pub mod traits;

pub use groq::{create_groq_client, resolve_api_key, GROQ_BASE_URL, GROQ_DEFAULT_MODEL};
pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, SamplingParams};
pub use traits::{LlmClient, LlmError};

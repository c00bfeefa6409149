//! Groq API 客户端（OpenAI 兼容格式）
//!
//! - Base URL: https://api.groq.com/openai/v1
//! - 默认模型: llama-3.3-70b-versatile

use crate::config::LlmSection;
use crate::llm::{OpenAiClient, SamplingParams};

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// 解析 API Key：配置 > 环境变量 `GROQ_API_KEY`；空字符串视为未配置
pub fn resolve_api_key(llm: &LlmSection) -> Option<String> {
    llm.api_key
        .clone()
        .or_else(|| std::env::var("GROQ_API_KEY").ok())
        .filter(|k| !k.trim().is_empty())
}

/// 按配置创建 Groq 客户端；provider 不是 groq 或没有 API Key 时返回 None（此时走启发式评估，不算错误）
pub fn create_groq_client(llm: &LlmSection) -> Option<OpenAiClient> {
    if !llm.provider.trim().eq_ignore_ascii_case("groq") {
        tracing::info!(provider = %llm.provider, "Remote provider disabled");
        return None;
    }
    let api_key = resolve_api_key(llm)?;
    let base_url = llm.base_url.as_deref().unwrap_or(GROQ_BASE_URL);

    Some(
        OpenAiClient::new(Some(base_url), &llm.model, &api_key).with_sampling(SamplingParams {
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            top_p: llm.top_p,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmClient;

    #[test]
    fn test_explicit_key_wins() {
        let llm = LlmSection {
            api_key: Some("gsk-config".into()),
            ..LlmSection::default()
        };
        assert_eq!(resolve_api_key(&llm).as_deref(), Some("gsk-config"));
        let client = create_groq_client(&llm).unwrap();
        assert_eq!(client.model_name(), GROQ_DEFAULT_MODEL);
    }

    #[test]
    fn test_other_provider_disables_remote() {
        let llm = LlmSection {
            provider: "heuristic".into(),
            api_key: Some("gsk-config".into()),
            ..LlmSection::default()
        };
        assert!(create_groq_client(&llm).is_none());

        let upper = LlmSection {
            provider: "Groq".into(),
            api_key: Some("gsk-config".into()),
            ..LlmSection::default()
        };
        assert!(create_groq_client(&upper).is_some());
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        let llm = LlmSection {
            api_key: Some("   ".into()),
            ..LlmSection::default()
        };
        if std::env::var("GROQ_API_KEY").is_err() {
            assert!(resolve_api_key(&llm).is_none());
            assert!(create_groq_client(&llm).is_none());
        }
    }
}

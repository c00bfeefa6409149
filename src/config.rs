//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `INTERVIEWER__*` 覆盖（双下划线表示嵌套，如 `INTERVIEWER__LLM__MODEL=...`）。
//! 推理服务的 API Key 另可通过 `GROQ_API_KEY` 提供，见 `llm::groq`。

use std::path::PathBuf;

use serde::Deserialize;

use crate::interview::TerminationPolicy;
use crate::llm::GROQ_DEFAULT_MODEL;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub llm: LlmSection,
    pub interview: InterviewSection,
}

/// [app] 段：应用名、Web 监听地址
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    /// interviewer-web 监听地址
    pub bind_addr: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "alex".to_string(),
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// [llm] 段：后端、模型、采样参数与超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 目前仅支持 groq（OpenAI 兼容端点均可通过 base_url 接入）；其他值关闭远程评估
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    /// 未设置时读取 GROQ_API_KEY；都没有则使用启发式评估
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: GROQ_DEFAULT_MODEL.to_string(),
            base_url: None,
            api_key: None,
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 0.9,
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmTimeoutsSection {
    /// 单次推理请求超时（秒），超时等同于服务不可用
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self { request: 30 }
    }
}

/// [interview] 段：结束判定阈值
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterviewSection {
    pub max_questions: usize,
    pub struggling_min_questions: usize,
    pub struggling_average: f64,
    pub disengaged_min_questions: usize,
    pub disengaged_streak: usize,
    pub low_pattern_min_questions: usize,
    pub low_pattern_average: f64,
}

impl Default for InterviewSection {
    fn default() -> Self {
        let p = TerminationPolicy::default();
        Self {
            max_questions: p.max_questions,
            struggling_min_questions: p.struggling_min_questions,
            struggling_average: p.struggling_average,
            disengaged_min_questions: p.disengaged_min_questions,
            disengaged_streak: p.disengaged_streak,
            low_pattern_min_questions: p.low_pattern_min_questions,
            low_pattern_average: p.low_pattern_average,
        }
    }
}

impl InterviewSection {
    pub fn termination_policy(&self) -> TerminationPolicy {
        TerminationPolicy {
            max_questions: self.max_questions,
            struggling_min_questions: self.struggling_min_questions,
            struggling_average: self.struggling_average,
            disengaged_min_questions: self.disengaged_min_questions,
            disengaged_streak: self.disengaged_streak,
            low_pattern_min_questions: self.low_pattern_min_questions,
            low_pattern_average: self.low_pattern_average,
        }
    }
}

/// 从 config 目录加载配置，环境变量 INTERVIEWER__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 INTERVIEWER__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("INTERVIEWER")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

//! 短期记忆：面试对话历史
//!
//! ConversationHistory 由调用方持有并按时间顺序追加；控制器只读不写。
//! Message / Role 为发往推理服务的聊天消息格式。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::interview::EvaluationResult;

/// 未分类时使用的话题
pub const DEFAULT_TOPIC: &str = "general";

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 一轮已完成的问答（创建后不再修改）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawEntry")]
pub struct ConversationEntry {
    pub question: String,
    /// 缺失视为「未作答」
    pub answer: Option<String>,
    pub score: f64,
    /// 前端回传时字段名为 currentTopic
    pub topic: String,
}

/// 前端回传的历史条目：字段可能缺失、为 null 或类型不符，统一在这里宽松解析
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    score: Option<Value>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    current_topic: Option<String>,
}

impl From<RawEntry> for ConversationEntry {
    fn from(raw: RawEntry) -> Self {
        // 数字或数字字符串，其余（null、缺失、无法解析）记 0
        let score = match raw.score {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        // 两个键都有时优先 topic，为空再看 currentTopic
        let topic = [raw.topic, raw.current_topic]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

        Self {
            question: raw.question.unwrap_or_default(),
            answer: raw.answer,
            score,
            topic,
        }
    }
}

impl ConversationEntry {
    pub fn new(
        question: impl Into<String>,
        answer: Option<String>,
        score: f64,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer,
            score,
            topic: topic.into(),
        }
    }

    /// 话题为空时回落到 general
    pub fn topic(&self) -> &str {
        let t = self.topic.trim();
        if t.is_empty() {
            DEFAULT_TOPIC
        } else {
            t
        }
    }

    /// 分数限制在 [0, 10]；NaN 视为 0
    pub fn clamped_score(&self) -> f64 {
        if self.score.is_nan() {
            0.0
        } else {
            self.score.clamp(0.0, 10.0)
        }
    }
}

/// 面试历史：插入顺序即时间顺序，只追加不删改
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    entries: Vec<ConversationEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    /// 用「上一题 + 回答」与本轮评估结果（分数、话题）组成新条目并追加
    pub fn record(&mut self, question: &str, answer: Option<&str>, result: &EvaluationResult) {
        self.push(ConversationEntry::new(
            question,
            answer.map(String::from),
            result.score,
            result.current_topic.clone(),
        ));
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// 最近 n 条（不足 n 条时返回全部）
    pub fn recent(&self, n: usize) -> &[ConversationEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ConversationEntry>> for ConversationHistory {
    fn from(entries: Vec<ConversationEntry>) -> Self {
        Self { entries }
    }
}

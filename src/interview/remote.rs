//! 远程评估：把评分与决策交给外部推理服务
//!
//! 失败分两类：传输失败 → RemoteUnavailable；回复中找不到可解析的 JSON → MalformedResponse。
//! 解析成功后逐字段补默认值，部分缺失的回复会被修复而不是丢弃。
//! 这一层不复核结束判定，由控制器统一兜底。

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::core::InterviewError;
use crate::interview::{
    prompt, EvaluationResult, InterviewPhase, TerminationPolicy, TurnSignals, CLOSING_STATEMENT,
};
use crate::llm::LlmClient;
use crate::memory::{ConversationHistory, DEFAULT_TOPIC};

const DEFAULT_FEEDBACK: &str = "Let me continue with the next question.";
const DEFAULT_NEXT_QUESTION: &str = "Can you tell me about your general Excel experience?";
const DEFAULT_REASONING: &str = "AI evaluation";

pub struct RemoteEvaluator {
    llm: Arc<dyn LlmClient>,
    policy: TerminationPolicy,
}

impl RemoteEvaluator {
    pub fn new(llm: Arc<dyn LlmClient>, policy: TerminationPolicy) -> Self {
        Self { llm, policy }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        history: &ConversationHistory,
        signals: &TurnSignals,
    ) -> Result<EvaluationResult, InterviewError> {
        let messages = prompt::build_messages(question, answer, history, signals, &self.policy);
        tracing::debug!(model = self.llm.model_name(), "Requesting remote evaluation");

        let content = self.llm.complete(&messages).await?;
        parse_evaluation(&content)
    }
}

/// 找到第一个可解析的顶层 JSON 对象（跳过前后说明文字；识别字符串内的括号与转义）
///
/// 某个 `{` 起始的片段不是合法 JSON（如 `score {0-10}`）时，从下一个 `{` 继续查找。
pub fn extract_json_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .filter_map(|(start, _)| balanced_object_at(text, start))
        .find(|candidate| {
            serde_json::from_str::<Value>(candidate).is_ok_and(|v| v.is_object())
        })
}

/// 从 start 处的 `{` 开始，返回与之配对的 `}` 为止的片段
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// 解析推理服务回复并补全字段
pub fn parse_evaluation(content: &str) -> Result<EvaluationResult, InterviewError> {
    let json = extract_json_object(content).ok_or_else(|| {
        InterviewError::MalformedResponse(format!("no JSON object in response: {}", preview(content)))
    })?;

    let value: Value = serde_json::from_str(json)
        .map_err(|e| InterviewError::MalformedResponse(format!("{}: {}", e, preview(json))))?;
    let obj = value
        .as_object()
        .ok_or_else(|| InterviewError::MalformedResponse("response is not an object".into()))?;

    let should_continue = bool_field(obj, "shouldContinue").unwrap_or(true);
    // 结束时缺失的下一题补结束语，而不是继续提问
    let next_question = text_field(obj, "nextQuestion").unwrap_or_else(|| {
        if should_continue {
            DEFAULT_NEXT_QUESTION.to_string()
        } else {
            CLOSING_STATEMENT.to_string()
        }
    });

    Ok(EvaluationResult {
        score: number_field(obj, "score").unwrap_or(0.0),
        feedback: text_field(obj, "feedback").unwrap_or_else(|| DEFAULT_FEEDBACK.to_string()),
        next_question,
        should_continue,
        reasoning: text_field(obj, "reasoning").unwrap_or_else(|| DEFAULT_REASONING.to_string()),
        current_topic: text_field(obj, "currentTopic").unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
        interview_phase: text_field(obj, "interviewPhase")
            .and_then(|p| InterviewPhase::parse(&p))
            .unwrap_or(InterviewPhase::Middle),
    })
}

fn preview(s: &str) -> String {
    s.chars().take(120).collect()
}

/// 非空字符串字段
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// 数字或数字字符串；NaN / 无穷视为缺失
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let n = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// 布尔或 "true"/"false"；只有缺失或无法识别时才取默认
fn bool_field(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

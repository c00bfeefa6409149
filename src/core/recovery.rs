//! 错误恢复引擎
//!
//! 根据 InterviewError 类型返回 RecoveryAction，并给出可直接返回给前端的「安全继续」负载。

use serde_json::{json, Value};

use crate::core::{InterviewError, RecoveryAction};

const RETRY_FEEDBACK: &str = "No response received. Please provide an answer to continue.";
const RETRY_QUESTION: &str = "Can you try answering the previous question?";
const FRESH_FEEDBACK: &str = "There was a technical issue. Let me ask you a fresh question.";
const FRESH_QUESTION: &str =
    "Can you explain what Excel functions you use most frequently in your work?";

/// 语义化错误恢复：将错误映射为动作，保证每条错误路径都能继续面试
#[derive(Debug, Default)]
pub struct RecoveryEngine;

impl RecoveryEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, err: &InterviewError) -> RecoveryAction {
        match err {
            InterviewError::InvalidInput => RecoveryAction::RetryPrompt,
            InterviewError::RemoteUnavailable(_) | InterviewError::MalformedResponse(_) => {
                RecoveryAction::FallbackToHeuristic
            }
            InterviewError::InvalidAction(_) | InterviewError::Config(_) => {
                RecoveryAction::FreshQuestion
            }
        }
    }

    /// 重试提示的 (feedback, nextQuestion)
    pub fn retry_prompt(&self) -> (&'static str, &'static str) {
        (RETRY_FEEDBACK, RETRY_QUESTION)
    }

    /// 错误负载：{error, score: 0, feedback, nextQuestion, shouldContinue: true}
    pub fn error_payload(&self, err: &InterviewError) -> Value {
        let (error, feedback, next_question) = match self.handle(err) {
            RecoveryAction::RetryPrompt => (err.to_string(), RETRY_FEEDBACK, RETRY_QUESTION),
            RecoveryAction::FallbackToHeuristic | RecoveryAction::FreshQuestion => (
                "Internal server error".to_string(),
                FRESH_FEEDBACK,
                FRESH_QUESTION,
            ),
        };
        json!({
            "error": error,
            "score": 0,
            "feedback": feedback,
            "nextQuestion": next_question,
            "shouldContinue": true,
        })
    }
}

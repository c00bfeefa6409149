//! 面试评估结果与阶段

use std::fmt;

use serde::{Deserialize, Serialize};

/// 面试阶段；concluding 当且仅当 should_continue = false
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewPhase {
    Beginning,
    Middle,
    Concluding,
}

impl InterviewPhase {
    /// 未结束时的阶段：前两题为 beginning，之后为 middle
    pub fn for_question_count(question_count: usize) -> Self {
        if question_count < 3 {
            InterviewPhase::Beginning
        } else {
            InterviewPhase::Middle
        }
    }

    /// 宽松解析（大小写不敏感）；无法识别返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginning" => Some(InterviewPhase::Beginning),
            "middle" => Some(InterviewPhase::Middle),
            "concluding" => Some(InterviewPhase::Concluding),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewPhase::Beginning => "beginning",
            InterviewPhase::Middle => "middle",
            InterviewPhase::Concluding => "concluding",
        }
    }
}

impl fmt::Display for InterviewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 控制器对一轮问答的输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// 0..=10
    pub score: f64,
    pub feedback: String,
    /// 下一题，或结束语
    pub next_question: String,
    pub should_continue: bool,
    pub reasoning: String,
    pub current_topic: String,
    pub interview_phase: InterviewPhase,
}

impl EvaluationResult {
    pub fn is_concluding(&self) -> bool {
        !self.should_continue
    }
}

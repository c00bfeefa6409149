//! 结束判定：何时必须结束面试，以及结束时的语气
//!
//! 同一个 TerminationPolicy 同时用于启发式评估、远程提示词中的规则描述和控制器兜底检查。

use std::fmt;

use crate::interview::{EvaluationResult, InterviewPhase, TurnSignals};

/// 结束时的下一题位置改为这句结束语
pub const CLOSING_STATEMENT: &str = "That concludes our Excel assessment. Let me prepare your comprehensive evaluation and learning recommendations.";

/// 平均分低于 3.0 时的结束语气
pub const SUPPORTIVE_CLOSING: &str = "Excel isn't everyone's strong area, and that's perfectly okay. Let me help you understand where you might start your learning journey.";

pub const PROFESSIONAL_CLOSING: &str =
    "I have a clear picture of your current level and can provide you with targeted recommendations.";

/// 候选人主动要求结束 / 出报告
pub const END_REQUEST_PHRASES: &[&str] = &[
    "gimme report",
    "give me the report",
    "give me my report",
    "pass me",
    "end the interview",
];

/// 语气分界线：低于此平均分用鼓励语气
const SUPPORTIVE_AVERAGE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// 达到题数上限
    QuestionLimit,
    /// 明显吃力
    Struggling,
    /// 连续敷衍
    Disengaged,
    /// 持续低分
    LowPerformance,
    /// 候选人要求结束
    CandidateRequested,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationReason::QuestionLimit => "question limit reached",
            TerminationReason::Struggling => "candidate struggling",
            TerminationReason::Disengaged => "minimal responses",
            TerminationReason::LowPerformance => "low performance pattern",
            TerminationReason::CandidateRequested => "candidate requested report",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerminationPolicy {
    pub max_questions: usize,
    pub struggling_min_questions: usize,
    pub struggling_average: f64,
    pub disengaged_min_questions: usize,
    pub disengaged_streak: usize,
    pub low_pattern_min_questions: usize,
    pub low_pattern_average: f64,
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self {
            max_questions: 8,
            struggling_min_questions: 5,
            struggling_average: 2.0,
            disengaged_min_questions: 5,
            disengaged_streak: 3,
            low_pattern_min_questions: 6,
            low_pattern_average: 3.0,
        }
    }
}

impl TerminationPolicy {
    /// 按优先级检查；返回第一个成立的原因
    pub fn check(&self, signals: &TurnSignals, answer: &str) -> Option<TerminationReason> {
        let n = signals.question_count;
        let avg = signals.average_score;

        if n >= self.max_questions {
            Some(TerminationReason::QuestionLimit)
        } else if n >= self.struggling_min_questions && avg < self.struggling_average {
            Some(TerminationReason::Struggling)
        } else if signals.consecutive_minimal >= self.disengaged_streak
            && n >= self.disengaged_min_questions
        {
            Some(TerminationReason::Disengaged)
        } else if n >= self.low_pattern_min_questions && avg < self.low_pattern_average {
            Some(TerminationReason::LowPerformance)
        } else if requests_end(answer) {
            Some(TerminationReason::CandidateRequested)
        } else {
            None
        }
    }

    /// 结束语气：平均分低于 3.0 用鼓励语气，否则用专业语气
    pub fn closing_tone(&self, average_score: f64) -> &'static str {
        if average_score < SUPPORTIVE_AVERAGE {
            SUPPORTIVE_CLOSING
        } else {
            PROFESSIONAL_CLOSING
        }
    }

    /// 构造结束结果：反馈追加结束语气，下一题替换为结束语
    pub fn conclude(
        &self,
        feedback: &str,
        score: f64,
        topic: &str,
        signals: &TurnSignals,
        reason: TerminationReason,
    ) -> EvaluationResult {
        let tone = self.closing_tone(signals.average_score);
        let feedback = if feedback.trim().is_empty() {
            tone.to_string()
        } else {
            format!("{} {}", feedback.trim_end(), tone)
        };

        EvaluationResult {
            score,
            feedback,
            next_question: CLOSING_STATEMENT.to_string(),
            should_continue: false,
            reasoning: format!(
                "Alex ended interview ({}): Q{}, Avg: {:.1}, Consecutive minimal: {}",
                reason, signals.question_count, signals.average_score, signals.consecutive_minimal
            ),
            current_topic: topic.to_string(),
            interview_phase: InterviewPhase::Concluding,
        }
    }
}

/// 回答中包含「出报告 / 结束」之类的请求
pub fn requests_end(answer: &str) -> bool {
    let lower = answer.to_lowercase();
    END_REQUEST_PHRASES.iter().any(|p| lower.contains(p))
}

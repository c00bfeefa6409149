//! 启发式评估：无外部依赖的本地评分与追问选择
//!
//! 评分按关键词优先级匹配（先命中先得）；随后检查结束判定，未结束时按自适应规则选下一题。
//! 相同输入的分数与话题恒定，只有反馈话术会在模板间轮换。

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::interview::phrases::{FeedbackBranch, PhraseBank, PhrasePicker, RandomPicker};
use crate::interview::{EvaluationResult, InterviewPhase, TerminationPolicy, TurnSignals};
use crate::memory::DEFAULT_TOPIC;

pub const FUNDAMENTALS_QUESTION: &str = "Let's try something fundamental: Can you tell me what you think the SUM function does in Excel, even if you're not sure about the syntax?";
pub const ADVANCED_FOLLOW_UP: &str = "That's solid! Now, how would you handle errors in Excel formulas, like when a VLOOKUP can't find a match?";
pub const PRACTICAL_QUESTION: &str = "Let's try a practical scenario: If you had sales data in Excel, how would you calculate the total for just one specific product category?";
pub const EXPERIENCE_QUESTION: &str = "Can you describe a time when you used Excel to solve a real problem, even if it was something simple like tracking expenses?";

const BASICS_NOTE: &str = "Let me ask something more basic to understand your starting point.";

const NO_ANSWER_PHRASES: &[&str] = &["don't know", "don’t know", "no idea"];
const BASIC_FORMULA_CUES: &[&str] = &["sum", "average", "formula"];
const ADVANCED_CUES: &[&str] = &["vlookup", "pivot", "index"];
const ANALYSIS_CUES: &[&str] = &["binary search", "systematic", "efficient"];

/// 超过该长度且未命中关键词时，视为「较详细」
const DETAILED_ANSWER_CHARS: usize = 20;

/// 一个回答的分类结果（与追问路由无关）
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub score: f64,
    pub topic: String,
    pub branch: FeedbackBranch,
}

fn bare_token(s: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z]{1,3}$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

pub struct HeuristicEvaluator {
    policy: TerminationPolicy,
    picker: Arc<dyn PhrasePicker>,
}

impl HeuristicEvaluator {
    pub fn new(policy: TerminationPolicy) -> Self {
        Self {
            policy,
            picker: Arc::new(RandomPicker),
        }
    }

    pub fn with_picker(mut self, picker: Arc<dyn PhrasePicker>) -> Self {
        self.picker = picker;
        self
    }

    /// 关键词评分（大小写不敏感，基于去首尾空白后的回答）
    pub fn classify(answer: &str) -> Classification {
        let lower = answer.trim().to_lowercase();
        let len = lower.chars().count();

        let (score, topic, branch) = if contains_any(&lower, NO_ANSWER_PHRASES)
            || lower == "nope"
            || lower == "no"
            || len < 4
            || bare_token(&lower)
        {
            (0.0, DEFAULT_TOPIC, FeedbackBranch::Minimal)
        } else if contains_any(&lower, BASIC_FORMULA_CUES) {
            (4.0, "basic_formulas", FeedbackBranch::BasicFormulas)
        } else if contains_any(&lower, ADVANCED_CUES) {
            (6.0, "advanced_functions", FeedbackBranch::AdvancedFunctions)
        } else if contains_any(&lower, ANALYSIS_CUES) {
            (7.0, "data_analysis", FeedbackBranch::DataAnalysis)
        } else if len > DETAILED_ANSWER_CHARS {
            (3.0, DEFAULT_TOPIC, FeedbackBranch::Detailed)
        } else {
            (1.0, DEFAULT_TOPIC, FeedbackBranch::Vague)
        };

        Classification {
            score,
            topic: topic.to_string(),
            branch,
        }
    }

    pub fn evaluate(&self, _question: &str, answer: &str, signals: &TurnSignals) -> EvaluationResult {
        let Classification {
            score,
            topic,
            branch,
        } = Self::classify(answer);
        let mut feedback = PhraseBank::feedback(branch, self.picker.as_ref());

        if let Some(reason) = self.policy.check(signals, answer) {
            tracing::info!(%reason, question = signals.question_count, "Heuristic evaluator concluding interview");
            return self.policy.conclude(&feedback, score, &topic, signals, reason);
        }

        let n = signals.question_count;
        let (next_question, next_topic) = if signals.average_score < 2.0 && n >= 3 {
            feedback = format!("{} {}", feedback, BASICS_NOTE);
            (FUNDAMENTALS_QUESTION, "basic_concepts")
        } else if score >= 6.0 && topic != "advanced_functions" {
            (ADVANCED_FOLLOW_UP, "advanced_functions")
        } else if score >= 3.0 && n <= 5 {
            (PRACTICAL_QUESTION, "practical_application")
        } else {
            (EXPERIENCE_QUESTION, "experience_based")
        };

        EvaluationResult {
            score,
            feedback,
            next_question: next_question.to_string(),
            should_continue: true,
            reasoning: format!(
                "Alex fallback: Q{}, Score: {}, Avg: {:.1}",
                n, score, signals.average_score
            ),
            current_topic: next_topic.to_string(),
            interview_phase: InterviewPhase::for_question_count(n),
        }
    }
}

//! 远程评估提示词
//!
//! 人设、规则与输出格式以声明方式写给推理服务；结束阈值从共享的 TerminationPolicy 渲染，保证与本地判定一致。

use crate::interview::{TerminationPolicy, TurnSignals};
use crate::memory::{ConversationHistory, Message};

pub const SYSTEM_PROMPT: &str = "You are Alex, an expert Excel interviewer with a supportive personality. You conduct efficient, intelligent interviews and make smart decisions about when to continue vs conclude. Always respond with valid JSON only.";

/// 提示词中附带的最近问答条数
pub const HISTORY_CONTEXT_TURNS: usize = 3;

/// 话题停留上限（仅作为对推理服务的软提示）
pub const MAX_TURNS_PER_TOPIC: usize = 3;

/// 对话历史片段；历史为空时返回空串
fn history_context(history: &ConversationHistory) -> String {
    let recent = history.recent(HISTORY_CONTEXT_TURNS);
    if recent.is_empty() {
        return String::new();
    }
    let exchanges = recent
        .iter()
        .map(|e| {
            format!(
                "Q: {}\nA: {}\nScore: {}/10\nTopic: {}",
                e.question,
                e.answer.as_deref().unwrap_or(""),
                e.clamped_score(),
                e.topic()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "\n\nCONVERSATION HISTORY (Recent {} exchanges):\n{}",
        recent.len(),
        exchanges
    )
}

fn interview_rules(policy: &TerminationPolicy) -> String {
    format!(
        r#"INTERVIEW RULES:
1. **CONCLUDE INTERVIEW IF:**
   - {max}+ questions asked (hard limit for efficiency)
   - Candidate clearly struggling (average < {struggle_avg:.1} after {struggle_n}+ questions)
   - {streak}+ consecutive minimal responses ("nope", "idk", single letters) after {disengaged_n}+ questions
   - Consistently low performance (average < {low_avg:.1} after {low_n}+ questions)
   - Candidate requests to end or asks for report

2. **ALEX'S PERSONALITY:**
   - Supportive for struggling candidates: "I can see Excel isn't your strong area yet, and that's perfectly okay."
   - Professional but encouraging: "I appreciate you working through this with me."
   - Decisive: End interviews efficiently when pattern is clear
   - Honest but kind: Provide constructive feedback

3. **TOPIC CLASSIFICATION:**
   - Assign specific topics: "vlookup", "basic_formulas", "data_analysis", "pivot_tables", "advanced_functions", "basic_concepts"
   - Don't stay on same topic more than {per_topic} questions
   - For struggling candidates, focus on "basic_concepts" and "simple_formulas"

4. **ADAPTIVE QUESTIONING:**
   - High performers (7+): Challenge with advanced scenarios
   - Medium performers (4-6): Build on strengths, fill gaps
   - Low performers (<4): Very basic concepts, encourage learning
   - Minimal responders: Conclude gracefully with guidance

5. **INTERVIEW EFFICIENCY:**
   - For very low performers: {struggle_n}-{low_n} questions maximum
   - For clear patterns: Don't over-test
   - Always end with constructive guidance"#,
        max = policy.max_questions,
        struggle_avg = policy.struggling_average,
        struggle_n = policy.struggling_min_questions,
        streak = policy.disengaged_streak,
        disengaged_n = policy.disengaged_min_questions,
        low_avg = policy.low_pattern_average,
        low_n = policy.low_pattern_min_questions,
        per_topic = MAX_TURNS_PER_TOPIC,
    )
}

const RESPONSE_FORMAT: &str = r#"RESPOND WITH VALID JSON ONLY:
{
  "score": <0-10 number>,
  "feedback": "<Alex's supportive, specific feedback (2-3 sentences)>",
  "nextQuestion": "<Next question OR conclusion message>",
  "shouldContinue": <true/false - be decisive>,
  "reasoning": "<Brief decision rationale>",
  "currentTopic": "<specific topic classification>",
  "interviewPhase": "<beginning/middle/concluding>"
}

EXAMPLE ALEX RESPONSES:
- Struggling candidate: "I can see you're honest about your current Excel level, which I appreciate. Let's focus on where you might start your learning journey."
- Good performer: "That's a solid understanding! Let me explore your knowledge in a different area."
- Conclusion: "Based on our conversation, I have a clear picture of your Excel skills. Let me provide you with a comprehensive assessment."

Be Alex - supportive, professional, and efficiently decisive about interview management."#;

/// 组装用户提示词
pub fn build_prompt(
    question: &str,
    answer: &str,
    history: &ConversationHistory,
    signals: &TurnSignals,
    policy: &TerminationPolicy,
) -> String {
    format!(
        "You are Alex, a friendly but professional Excel interviewer. You have a warm, encouraging personality and conduct efficient, intelligent interviews.\n\n\
CURRENT SITUATION:\n\
- Question #{}\n\
- Current Question: {}\n\
- Candidate's Answer: {}\n\
- Average Score So Far: {:.1}/10\n\
- Consecutive Minimal Responses: {}\n\
- Topics Explored: {}\n\
{}\n\n{}\n\n{}",
        signals.question_count,
        question,
        answer,
        signals.average_score,
        signals.consecutive_minimal,
        signals.topics_label(),
        history_context(history),
        interview_rules(policy),
        RESPONSE_FORMAT,
    )
}

/// system + user 两条消息
pub fn build_messages(
    question: &str,
    answer: &str,
    history: &ConversationHistory,
    signals: &TurnSignals,
    policy: &TerminationPolicy,
) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(build_prompt(question, answer, history, signals, policy)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ConversationEntry, Role};

    #[test]
    fn test_prompt_without_history() {
        let history = ConversationHistory::new();
        let signals = TurnSignals::from_history(&history);
        let prompt = build_prompt("What is VLOOKUP?", "a lookup", &history, &signals, &TerminationPolicy::default());
        assert!(prompt.contains("- Question #1"));
        assert!(prompt.contains("Average Score So Far: 0.0/10"));
        assert!(!prompt.contains("CONVERSATION HISTORY"));
        assert!(prompt.contains("8+ questions asked"));
        assert!(prompt.contains("\"interviewPhase\""));
    }

    #[test]
    fn test_prompt_includes_only_recent_history() {
        let history: ConversationHistory = (1..=5)
            .map(|i| ConversationEntry::new(format!("question {i}"), Some(format!("answer {i}")), 4.0, "vlookup"))
            .collect::<Vec<_>>()
            .into();
        let signals = TurnSignals::from_history(&history);
        let prompt = build_prompt("Q", "A", &history, &signals, &TerminationPolicy::default());
        assert!(prompt.contains("Recent 3 exchanges"));
        assert!(!prompt.contains("question 2"));
        assert!(prompt.contains("question 3"));
        assert!(prompt.contains("Topic: vlookup"));
        assert!(prompt.contains("Topics Explored: vlookup"));
    }

    #[test]
    fn test_thresholds_follow_policy() {
        let policy = TerminationPolicy {
            max_questions: 12,
            ..TerminationPolicy::default()
        };
        let history = ConversationHistory::new();
        let signals = TurnSignals::from_history(&history);
        let messages = build_messages("Q", "A", &history, &signals, &policy);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[1].content.contains("12+ questions asked"));
    }
}

//! 面试控制器：校验输入、选择评估策略、失败回退、统一兜底
//!
//! 配置了远程评估时优先调用（带超时），任何失败都换成启发式评估的结果，调用方无感知。
//! 无论哪个评估器给出结果，都会经过同一套结束判定与输出规整。

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::core::{InterviewError, RecoveryEngine};
use crate::interview::phrases::PhrasePicker;
use crate::interview::{
    EvaluationResult, HeuristicEvaluator, InterviewPhase, RemoteEvaluator, TerminationPolicy,
    TurnSignals, CLOSING_STATEMENT,
};
use crate::llm::{create_groq_client, LlmClient, LlmError};
use crate::memory::{ConversationHistory, DEFAULT_TOPIC};

const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct InterviewController {
    heuristic: HeuristicEvaluator,
    remote: Option<RemoteEvaluator>,
    policy: TerminationPolicy,
    remote_timeout: Duration,
    recovery: RecoveryEngine,
}

impl InterviewController {
    /// 仅启发式评估
    pub fn new(policy: TerminationPolicy) -> Self {
        Self {
            heuristic: HeuristicEvaluator::new(policy.clone()),
            remote: None,
            policy,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
            recovery: RecoveryEngine::new(),
        }
    }

    /// 按配置构建：有 API Key 时接入 Groq，否则只用启发式评估
    pub fn from_config(cfg: &AppConfig) -> Self {
        let policy = cfg.interview.termination_policy();
        let controller = Self::new(policy)
            .with_timeout(Duration::from_secs(cfg.llm.timeouts.request.max(1)));

        match create_groq_client(&cfg.llm) {
            Some(client) => {
                tracing::info!(model = %cfg.llm.model, "Remote evaluator enabled");
                controller.with_remote(Arc::new(client))
            }
            None => {
                tracing::info!("No API key configured, using heuristic evaluator");
                controller
            }
        }
    }

    pub fn with_remote(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.remote = Some(RemoteEvaluator::new(llm, self.policy.clone()));
        self
    }

    pub fn with_picker(mut self, picker: Arc<dyn PhrasePicker>) -> Self {
        self.heuristic = self.heuristic.with_picker(picker);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// 评估一轮；缺少问题或回答时返回 InvalidInput（由调用方决定如何呈现）
    pub async fn try_evaluate(
        &self,
        question: Option<&str>,
        answer: Option<&str>,
        history: &ConversationHistory,
    ) -> Result<EvaluationResult, InterviewError> {
        let question = non_empty(question).ok_or(InterviewError::InvalidInput)?;
        let answer = non_empty(answer).ok_or(InterviewError::InvalidInput)?;

        let signals = TurnSignals::from_history(history);
        tracing::debug!(
            question_count = signals.question_count,
            average_score = signals.average_score,
            consecutive_minimal = signals.consecutive_minimal,
            topics = %signals.topics_label(),
            "Turn signals"
        );

        let result = match &self.remote {
            Some(remote) => match self.call_remote(remote, question, answer, history, &signals).await {
                Ok(result) => result,
                Err(err) => {
                    let action = self.recovery.handle(&err);
                    tracing::warn!(
                        model = remote.model_name(),
                        error = %err,
                        ?action,
                        "Remote evaluation failed, falling back to heuristic"
                    );
                    self.heuristic.evaluate(question, answer, &signals)
                }
            },
            None => self.heuristic.evaluate(question, answer, &signals),
        };

        let result = self.enforce(result, &signals, answer);
        if result.is_concluding() {
            tracing::info!(
                question_count = signals.question_count,
                score = result.score,
                "Interview concluding"
            );
        }
        Ok(result)
    }

    /// 永不失败的评估：输入缺失时返回重试提示
    pub async fn evaluate(
        &self,
        question: Option<&str>,
        answer: Option<&str>,
        history: &ConversationHistory,
    ) -> EvaluationResult {
        match self.try_evaluate(question, answer, history).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "Evaluation input rejected");
                self.retry_result(history)
            }
        }
    }

    async fn call_remote(
        &self,
        remote: &RemoteEvaluator,
        question: &str,
        answer: &str,
        history: &ConversationHistory,
        signals: &TurnSignals,
    ) -> Result<EvaluationResult, InterviewError> {
        match tokio::time::timeout(
            self.remote_timeout,
            remote.evaluate(question, answer, history, signals),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.remote_timeout).into()),
        }
    }

    /// 输出规整与结束兜底：分数限幅、话题非空、阶段与 should_continue 一致
    fn enforce(
        &self,
        mut result: EvaluationResult,
        signals: &TurnSignals,
        answer: &str,
    ) -> EvaluationResult {
        result.score = if result.score.is_nan() {
            0.0
        } else {
            result.score.clamp(0.0, 10.0)
        };
        if result.current_topic.trim().is_empty() {
            result.current_topic = DEFAULT_TOPIC.to_string();
        }

        if result.should_continue {
            if let Some(reason) = self.policy.check(signals, answer) {
                tracing::info!(%reason, "Termination policy overrides evaluator");
                return self.policy.conclude(
                    &result.feedback,
                    result.score,
                    &result.current_topic,
                    signals,
                    reason,
                );
            }
            if result.interview_phase == InterviewPhase::Concluding {
                result.interview_phase = InterviewPhase::for_question_count(signals.question_count);
            }
        } else {
            result.interview_phase = InterviewPhase::Concluding;
            if result.next_question.trim().is_empty() {
                result.next_question = CLOSING_STATEMENT.to_string();
            }
        }
        result
    }

    fn retry_result(&self, history: &ConversationHistory) -> EvaluationResult {
        let (feedback, next_question) = self.recovery.retry_prompt();
        EvaluationResult {
            score: 0.0,
            feedback: feedback.to_string(),
            next_question: next_question.to_string(),
            should_continue: true,
            reasoning: InterviewError::InvalidInput.to_string(),
            current_topic: DEFAULT_TOPIC.to_string(),
            interview_phase: InterviewPhase::for_question_count(history.len() + 1),
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::phrases::FixedPicker;
    use crate::llm::MockLlmClient;
    use crate::memory::ConversationEntry;

    fn heuristic_only() -> InterviewController {
        InterviewController::new(TerminationPolicy::default()).with_picker(Arc::new(FixedPicker(0)))
    }

    fn with_mock(mock: MockLlmClient) -> (InterviewController, Arc<MockLlmClient>) {
        let mock = Arc::new(mock);
        let controller = heuristic_only().with_remote(mock.clone());
        (controller, mock)
    }

    fn history_of(scores: &[f64]) -> ConversationHistory {
        scores
            .iter()
            .map(|s| ConversationEntry::new("Q", Some("a reasonable answer".into()), *s, "general"))
            .collect::<Vec<_>>()
            .into()
    }

    fn assert_valid(r: &EvaluationResult) {
        assert!((0.0..=10.0).contains(&r.score));
        assert_eq!(!r.should_continue, r.interview_phase == InterviewPhase::Concluding);
        assert!(!r.current_topic.is_empty());
    }

    #[tokio::test]
    async fn test_missing_question_is_invalid_input() {
        let controller = heuristic_only();
        let history = ConversationHistory::new();
        let err = controller
            .try_evaluate(None, Some("I use SUM"), &history)
            .await
            .unwrap_err();
        assert_eq!(err, InterviewError::InvalidInput);

        let r = controller.evaluate(None, Some("I use SUM"), &history).await;
        assert_eq!(r.score, 0.0);
        assert!(r.should_continue);
        assert_eq!(r.next_question, "Can you try answering the previous question?");
        assert_valid(&r);
    }

    #[tokio::test]
    async fn test_blank_answer_skips_remote() {
        let (controller, mock) = with_mock(MockLlmClient::new());
        let r = controller.evaluate(Some("Q"), Some("   "), &ConversationHistory::new()).await;
        assert!(r.should_continue);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_result_is_used() {
        let (controller, mock) = with_mock(MockLlmClient::new().with_reply(
            r#"Here you go: {"score": 9, "feedback": "Excellent", "nextQuestion": "How about XLOOKUP?", "shouldContinue": true, "reasoning": "strong", "currentTopic": "vlookup", "interviewPhase": "beginning"}"#,
        ));
        let r = controller
            .evaluate(Some("Q"), Some("INDEX/MATCH with exact match"), &ConversationHistory::new())
            .await;
        assert_eq!(mock.calls(), 1);
        assert_eq!(r.score, 9.0);
        assert_eq!(r.current_topic, "vlookup");
        assert_eq!(r.next_question, "How about XLOOKUP?");
        assert_valid(&r);
    }

    #[tokio::test]
    async fn test_remote_failure_matches_heuristic() {
        let history = history_of(&[4.0, 6.0]);
        let answer = "I'd build a pivot table by region";

        let (controller, _) =
            with_mock(MockLlmClient::new().with_error(LlmError::Api("500 Internal Server Error".into())));
        let fallback = controller.evaluate(Some("Q"), Some(answer), &history).await;
        let heuristic = heuristic_only().evaluate(Some("Q"), Some(answer), &history).await;
        assert_eq!(fallback, heuristic);
        assert_valid(&fallback);
    }

    #[tokio::test]
    async fn test_malformed_remote_falls_back() {
        let (controller, _) = with_mock(MockLlmClient::new().with_reply("Sorry, I can't answer in JSON."));
        let r = controller
            .evaluate(Some("Q"), Some("I use VLOOKUP and pivot tables daily"), &ConversationHistory::new())
            .await;
        assert_eq!(r.score, 6.0);
        assert!(r.reasoning.starts_with("Alex fallback"));
    }

    #[tokio::test]
    async fn test_remote_timeout_falls_back() {
        let (controller, _) = with_mock(MockLlmClient::new().with_delay(Duration::from_millis(200)));
        let controller = controller.with_timeout(Duration::from_millis(20));
        let err = controller
            .call_remote(
                controller.remote.as_ref().unwrap(),
                "Q",
                "nope",
                &ConversationHistory::new(),
                &TurnSignals::from_history(&ConversationHistory::new()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::RemoteUnavailable(msg) if msg.contains("timed out")));

        let r = controller
            .evaluate(Some("Q"), Some("nope"), &ConversationHistory::new())
            .await;
        assert_eq!(r.score, 0.0);
        assert!(r.reasoning.starts_with("Alex fallback"));
    }

    #[tokio::test]
    async fn test_remote_score_clamped_and_phase_fixed() {
        let (controller, _) = with_mock(MockLlmClient::new().with_reply(
            r#"{"score": 14, "shouldContinue": true, "currentTopic": "  ", "interviewPhase": "concluding"}"#,
        ));
        let r = controller
            .evaluate(Some("Q"), Some("a fine answer"), &ConversationHistory::new())
            .await;
        assert_eq!(r.score, 10.0);
        assert_eq!(r.current_topic, DEFAULT_TOPIC);
        assert_eq!(r.interview_phase, InterviewPhase::Beginning);
        assert_valid(&r);
    }

    #[tokio::test]
    async fn test_remote_stop_forces_concluding_phase() {
        let (controller, _) = with_mock(MockLlmClient::new().with_reply(
            r#"{"score": 5, "shouldContinue": false, "interviewPhase": "middle"}"#,
        ));
        let r = controller
            .evaluate(Some("Q"), Some("a fine answer"), &ConversationHistory::new())
            .await;
        assert!(!r.should_continue);
        assert_eq!(r.interview_phase, InterviewPhase::Concluding);
    }

    #[tokio::test]
    async fn test_remote_stop_without_next_question_closes() {
        for reply in [
            r#"{"score": 5, "shouldContinue": false}"#,
            r#"{"score": 5, "shouldContinue": false, "nextQuestion": "   "}"#,
        ] {
            let (controller, _) = with_mock(MockLlmClient::new().with_reply(reply));
            let r = controller
                .evaluate(Some("Q"), Some("a fine answer"), &ConversationHistory::new())
                .await;
            assert!(!r.should_continue);
            assert_eq!(r.interview_phase, InterviewPhase::Concluding);
            assert_eq!(r.next_question, CLOSING_STATEMENT, "{reply}");
        }
    }

    #[test]
    fn test_enforce_fills_blank_closing() {
        let controller = heuristic_only();
        let signals = TurnSignals::from_history(&ConversationHistory::new());
        let result = EvaluationResult {
            score: 4.0,
            feedback: "Thanks.".into(),
            next_question: String::new(),
            should_continue: false,
            reasoning: "done".into(),
            current_topic: "general".into(),
            interview_phase: InterviewPhase::Middle,
        };
        let r = controller.enforce(result, &signals, "a fine answer");
        assert_eq!(r.next_question, CLOSING_STATEMENT);
        assert_eq!(r.interview_phase, InterviewPhase::Concluding);
    }

    #[tokio::test]
    async fn test_policy_overrides_remote_at_limit() {
        let (controller, _) = with_mock(MockLlmClient::new().with_reply(
            r#"{"score": 8, "feedback": "Nice.", "nextQuestion": "One more?", "shouldContinue": true}"#,
        ));
        let r = controller
            .evaluate(Some("Q"), Some("I use VLOOKUP"), &history_of(&[7.0; 7]))
            .await;
        assert!(!r.should_continue);
        assert_eq!(r.next_question, CLOSING_STATEMENT);
        assert!(r.feedback.starts_with("Nice."));
        assert_valid(&r);
    }

    #[tokio::test]
    async fn test_always_concludes_after_limit() {
        let controller = heuristic_only();
        for extra in 0..4 {
            let scores = vec![9.0; 7 + extra];
            let r = controller
                .evaluate(Some("Q"), Some("efficient and systematic"), &history_of(&scores))
                .await;
            assert!(!r.should_continue, "history len {}", scores.len());
        }
    }
}

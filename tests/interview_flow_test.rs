//! 面试流程集成测试：从开场到结束的完整会话

use std::sync::Arc;

use interviewer::agent::{handle_request, ApiRequest};
use interviewer::interview::policy::SUPPORTIVE_CLOSING;
use interviewer::interview::{
    start_session, FixedPicker, HeuristicEvaluator, InterviewController, InterviewPhase,
    InterviewSummary, TerminationPolicy, CLOSING_STATEMENT,
};
use interviewer::llm::{LlmError, MockLlmClient};
use interviewer::memory::{ConversationEntry, ConversationHistory};

fn controller() -> InterviewController {
    InterviewController::new(TerminationPolicy::default()).with_picker(Arc::new(FixedPicker(0)))
}

fn history_of(scores: &[f64]) -> ConversationHistory {
    scores
        .iter()
        .enumerate()
        .map(|(i, s)| ConversationEntry::new(format!("Q{}", i + 1), Some("I'm not sure".into()), *s, "general"))
        .collect::<Vec<_>>()
        .into()
}

#[tokio::test]
async fn test_full_session_is_bounded() {
    let controller = controller();
    let mut history = ConversationHistory::new();
    let mut question = start_session().question;
    let answers = [
        "I would use VLOOKUP with FALSE for exact match",
        "Wrap it in IFERROR so missing employees show Not Found",
        "A SUMIF over the category column",
        "I'd be systematic and filter first",
        "Pivot tables grouped by month",
        "INDEX and MATCH when the key isn't in the first column",
        "An average of the filtered range",
        "Conditional formatting on outliers, then review them",
        "one more answer that should never be asked for",
    ];

    let mut turns = 0;
    for answer in answers {
        let result = controller.evaluate(Some(question.as_str()), Some(answer), &history).await;
        turns += 1;
        assert!((0.0..=10.0).contains(&result.score));
        assert_eq!(!result.should_continue, result.interview_phase == InterviewPhase::Concluding);

        history.record(&question, Some(answer), &result);
        if !result.should_continue {
            assert_eq!(result.next_question, CLOSING_STATEMENT);
            break;
        }
        question = result.next_question;
    }

    assert_eq!(turns, 8);
    assert_eq!(history.len(), 8);
    let summary = InterviewSummary::from_history(&history);
    assert_eq!(summary.questions_answered, 8);
    assert!(summary.average_score >= 3.0);
}

#[tokio::test]
async fn test_seven_low_scores_conclude_at_question_eight() {
    let result = controller()
        .evaluate(Some("Q8"), Some("I'd probably ask a colleague"), &history_of(&[1.0; 7]))
        .await;
    assert!(!result.should_continue);
    assert_eq!(result.interview_phase, InterviewPhase::Concluding);
}

#[tokio::test]
async fn test_struggling_average_concludes_at_question_five() {
    // 4 条历史、平均 1.5，本轮为第 5 题
    let history = history_of(&[1.0, 2.0, 2.0, 1.0]);
    let result = controller()
        .evaluate(Some("Q5"), Some("I'd probably ask a colleague"), &history)
        .await;
    assert!(!result.should_continue);
    assert!(result.reasoning.contains("Q5"));
}

fn history_with_answers(turns: &[(&str, f64)]) -> ConversationHistory {
    turns
        .iter()
        .enumerate()
        .map(|(i, (a, s))| ConversationEntry::new(format!("Q{}", i + 1), Some(a.to_string()), *s, "general"))
        .collect::<Vec<_>>()
        .into()
}

#[tokio::test]
async fn test_three_minimal_answers_conclude_at_question_five() {
    // 平均 2.0，不触发「吃力」规则，只因连续敷衍结束
    let history = history_with_answers(&[
        ("I use VLOOKUP and pivot tables", 7.0),
        ("idk", 1.0),
        ("nope", 0.0),
        ("no", 0.0),
    ]);
    let result = controller().evaluate(Some("Q5"), Some("hmm"), &history).await;
    assert!(!result.should_continue);
    assert_eq!(result.next_question, CLOSING_STATEMENT);
    assert!(result.reasoning.contains("minimal responses"), "{}", result.reasoning);
    assert!(result.reasoning.contains("Consecutive minimal: 3"));
    assert!(result.feedback.ends_with(SUPPORTIVE_CLOSING));

    let two_minimal = history_with_answers(&[
        ("I use VLOOKUP and pivot tables", 7.0),
        ("I'd filter the rows first", 1.0),
        ("nope", 0.0),
        ("no", 0.0),
    ]);
    let result = controller().evaluate(Some("Q5"), Some("hmm"), &two_minimal).await;
    assert!(result.should_continue);
}

#[tokio::test]
async fn test_low_average_concludes_at_question_six() {
    // 平均 2.4：高于「吃力」线 2.0，低于持续低分线 3.0
    let history = history_of(&[2.0, 3.0, 2.0, 3.0, 2.0]);
    let result = controller()
        .evaluate(Some("Q6"), Some("I'd probably ask a colleague"), &history)
        .await;
    assert!(!result.should_continue);
    assert_eq!(result.interview_phase, InterviewPhase::Concluding);
    assert!(result.reasoning.contains("low performance pattern"), "{}", result.reasoning);
    assert!(result.reasoning.contains("Q6"));
    assert!(result.feedback.ends_with(SUPPORTIVE_CLOSING));

    // 同样的平均分在第 5 题时继续
    let result = controller()
        .evaluate(Some("Q5"), Some("I'd probably ask a colleague"), &history_of(&[2.0, 3.0, 2.0, 3.0]))
        .await;
    assert!(result.should_continue);
}

#[tokio::test]
async fn test_explicit_report_request_concludes_early() {
    let result = controller()
        .evaluate(Some("Q2"), Some("honestly just gimme report"), &history_of(&[6.0]))
        .await;
    assert!(!result.should_continue);
    assert!(result.feedback.contains("targeted recommendations"));
}

#[tokio::test]
async fn test_heuristic_scores_are_deterministic() {
    let history = history_of(&[3.0, 4.0]);
    for answer in ["nope", "I use VLOOKUP and pivot tables daily", "efficient search", "hmm maybe"] {
        let first = HeuristicEvaluator::classify(answer);
        let a = InterviewController::new(TerminationPolicy::default())
            .evaluate(Some("Q"), Some(answer), &history)
            .await;
        let b = InterviewController::new(TerminationPolicy::default())
            .evaluate(Some("Q"), Some(answer), &history)
            .await;
        assert_eq!(a.score, first.score);
        assert_eq!(a.score, b.score);
        assert_eq!(a.current_topic, b.current_topic);
    }
}

#[tokio::test]
async fn test_remote_outage_is_invisible_to_caller() {
    let mock = Arc::new(
        MockLlmClient::new()
            .with_error(LlmError::Api("502 Bad Gateway".into()))
            .with_reply("{\"score\": 7, \"feedback\": \"Good\", \"shouldContinue\": true}"),
    );
    let controller = controller().with_remote(mock.clone());

    let req = ApiRequest {
        action: Some("evaluate".into()),
        question: Some("How would you use VLOOKUP?".into()),
        answer: Some("I use VLOOKUP and pivot tables daily".into()),
        conversation_history: ConversationHistory::new(),
    };
    let first = handle_request(&controller, req.clone()).await;
    assert_eq!(first.status, 200);
    assert_eq!(first.body["score"], 6.0);

    let second = handle_request(&controller, req).await;
    assert_eq!(second.status, 200);
    assert_eq!(second.body["score"], 7.0);
    assert_eq!(mock.calls(), 2);
}

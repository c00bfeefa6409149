//! Headless 入口：处理前端的 start / evaluate 动作
//!
//! 供 HTTP、控制台等前端调用：请求体 → (状态码, JSON)。任何错误都带「安全继续」的负载，不会让面试中断。

use serde::Deserialize;
use serde_json::Value;

use crate::core::{InterviewError, RecoveryEngine};
use crate::interview::{start_session, InterviewController};
use crate::memory::ConversationHistory;

/// 前端请求体
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub conversation_history: ConversationHistory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn from_error(err: &InterviewError) -> Self {
        let status = match err {
            InterviewError::InvalidInput => 400,
            _ => 500,
        };
        Self {
            status,
            body: RecoveryEngine::new().error_payload(err),
        }
    }
}

/// 处理已解析的请求
pub async fn handle_request(controller: &InterviewController, req: ApiRequest) -> ApiResponse {
    let action = req.action.as_deref().unwrap_or_default();
    tracing::info!(action, "Handling request");

    let outcome = match action {
        "start" => serde_json::to_value(start_session())
            .map_err(|e| InterviewError::Config(e.to_string())),
        "evaluate" => {
            tracing::debug!(
                history_len = req.conversation_history.len(),
                "Evaluating answer"
            );
            controller
                .try_evaluate(
                    req.question.as_deref(),
                    req.answer.as_deref(),
                    &req.conversation_history,
                )
                .await
                .and_then(|r| {
                    serde_json::to_value(r).map_err(|e| InterviewError::Config(e.to_string()))
                })
        }
        other => Err(InterviewError::InvalidAction(other.to_string())),
    };

    match outcome {
        Ok(body) => ApiResponse::ok(body),
        Err(err) => {
            tracing::warn!(error = %err, "Request failed");
            ApiResponse::from_error(&err)
        }
    }
}

/// 处理原始请求体；空体视为 {}，无法解析时按内部错误返回
pub async fn handle_body(controller: &InterviewController, body: &str) -> ApiResponse {
    let body = if body.trim().is_empty() { "{}" } else { body };
    match serde_json::from_str::<ApiRequest>(body) {
        Ok(req) => handle_request(controller, req).await,
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable request body");
            ApiResponse::from_error(&InterviewError::InvalidAction(format!("bad request body: {e}")))
        }
    }
}

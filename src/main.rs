//! Alex 控制台面试
//!
//! 入口：初始化日志与配置、构建控制器，在终端里逐题问答，直到控制器给出结束，最后打印总结。

use anyhow::Context;
use interviewer::config::{load_config, AppConfig};
use interviewer::interview::{start_session, InterviewController, InterviewSummary};
use interviewer::memory::ConversationHistory;
use interviewer::observability;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    let controller = InterviewController::from_config(&cfg);

    let start = start_session();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("{}\n\n", start.message).as_bytes())
        .await
        .context("Failed to write to stdout")?;

    let mut history = ConversationHistory::new();
    let mut question = start.question;

    loop {
        stdout
            .write_all(format!("Alex: {}\n> ", question).as_bytes())
            .await
            .context("Failed to write to stdout")?;
        stdout.flush().await.context("Failed to flush stdout")?;

        let Some(answer) = lines.next_line().await.context("Failed to read answer")? else {
            tracing::info!("Input closed, ending session");
            break;
        };

        let result = controller
            .evaluate(Some(question.as_str()), Some(answer.as_str()), &history)
            .await;

        stdout
            .write_all(format!("\n[{:.1}/10] {}\n\n", result.score, result.feedback).as_bytes())
            .await
            .context("Failed to write to stdout")?;

        // 输入为空时只提示重答，不计入历史
        if answer.trim().is_empty() {
            continue;
        }

        history.record(&question, Some(answer.as_str()), &result);
        if !result.should_continue {
            stdout
                .write_all(format!("Alex: {}\n\n", result.next_question).as_bytes())
                .await
                .context("Failed to write to stdout")?;
            break;
        }
        question = result.next_question;
    }

    let summary = InterviewSummary::from_history(&history);
    stdout
        .write_all(summary.to_string().as_bytes())
        .await
        .context("Failed to write summary")?;
    if let Some(t) = summary.weakest_topic() {
        stdout
            .write_all(format!("Suggested focus: {}\n", t.topic).as_bytes())
            .await
            .context("Failed to write summary")?;
    }

    Ok(())
}

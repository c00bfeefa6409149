//! 每轮由历史派生的共享信号：题号、平均分、连续敷衍回答数、已覆盖话题
//!
//! 启发式评估、远程提示词与结束判定都只读这一份信号，避免各处各算一遍。

use std::collections::BTreeSet;

use crate::memory::{ConversationEntry, ConversationHistory};

/// 视为敷衍 / 放弃作答的回答
pub const DISENGAGEMENT_TOKENS: &[&str] = &[
    "nope",
    "idk",
    "no",
    "i don't know",
    "ope",
    "mope",
    "nlo",
    "gimme report",
];

/// 统计连续敷衍回答时回看的条数
const MINIMAL_WINDOW: usize = 3;

/// 少于该字符数的回答视为敷衍
const MINIMAL_ANSWER_CHARS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct TurnSignals {
    /// 本轮是第几题（历史长度 + 1）
    pub question_count: usize,
    /// 历史平均分；历史为空时为 0
    pub average_score: f64,
    /// 最近 3 条中敷衍回答的数量
    pub consecutive_minimal: usize,
    pub topics_explored: BTreeSet<String>,
}

impl TurnSignals {
    pub fn from_history(history: &ConversationHistory) -> Self {
        let entries = history.entries();

        let average_score = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(ConversationEntry::clamped_score).sum::<f64>() / entries.len() as f64
        };

        let consecutive_minimal = history
            .recent(MINIMAL_WINDOW)
            .iter()
            .filter(|e| is_minimal_answer(e.answer.as_deref()))
            .count();

        let topics_explored = entries.iter().map(|e| e.topic().to_string()).collect();

        Self {
            question_count: entries.len() + 1,
            average_score,
            consecutive_minimal,
            topics_explored,
        }
    }

    /// 已覆盖话题，逗号分隔（用于提示词与日志）
    pub fn topics_label(&self) -> String {
        self.topics_explored
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 回答为空、过短或属于敷衍词表
pub fn is_minimal_answer(answer: Option<&str>) -> bool {
    let normalized = answer.unwrap_or_default().trim().to_lowercase();
    normalized.chars().count() < MINIMAL_ANSWER_CHARS
        || DISENGAGEMENT_TOKENS.contains(&normalized.as_str())
}

//! 开场：固定的自我介绍、第一题与初始状态

use serde::{Deserialize, Serialize};

pub const OPENING_MESSAGE: &str = "Hi! I'm Alex, your AI Excel interviewer. I'll be conducting a comprehensive interview to assess your Excel skills across various areas including formulas, data analysis, pivot tables, and problem-solving approaches. \n\nThis will be a conversational interview where I'll adapt questions based on your responses, ask follow-ups when needed, and provide a detailed assessment at the end. The interview typically takes 8-12 questions. Ready to begin?";

pub const FIRST_QUESTION: &str = "Let's start with a foundational question: Can you walk me through how you would use VLOOKUP to find employee salaries from a separate table? Please explain your approach step-by-step, including how you'd handle cases where an employee isn't found.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    pub topics_explored: Vec<String>,
    pub current_depth: String,
    pub question_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStart {
    pub message: String,
    pub question: String,
    pub conversation_state: ConversationState,
}

pub fn start_session() -> SessionStart {
    SessionStart {
        message: OPENING_MESSAGE.to_string(),
        question: FIRST_QUESTION.to_string(),
        conversation_state: ConversationState {
            topics_explored: Vec::new(),
            current_depth: "basic".to_string(),
            question_count: 1,
        },
    }
}

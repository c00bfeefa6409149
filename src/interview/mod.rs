//! 面试层：信号、结束判定、启发式 / 远程评估、控制器、开场与总结

pub mod bootstrap;
pub mod controller;
pub mod heuristic;
pub mod phrases;
pub mod policy;
pub mod prompt;
pub mod remote;
pub mod report;
pub mod signals;
pub mod types;

pub use bootstrap::{start_session, ConversationState, SessionStart};
pub use controller::InterviewController;
pub use heuristic::{Classification, HeuristicEvaluator};
pub use phrases::{FeedbackBranch, FixedPicker, PhraseBank, PhrasePicker, RandomPicker};
pub use policy::{TerminationPolicy, TerminationReason, CLOSING_STATEMENT};
pub use remote::RemoteEvaluator;
pub use report::{InterviewSummary, SkillBand, TopicScore};
pub use signals::TurnSignals;
pub use types::{EvaluationResult, InterviewPhase};

//! 核心层：错误类型与恢复

pub mod error;
pub mod recovery;

pub use error::{InterviewError, RecoveryAction};
pub use recovery::RecoveryEngine;

//! 反馈话术：按评分分支分组的模板，以及可注入的随机源
//!
//! 同一分支的反馈在几条模板间轮换，避免逐字重复；测试中注入 FixedPicker 以固定输出。

use rand::Rng;

/// 启发式评分命中的分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackBranch {
    /// 不会 / 过短
    Minimal,
    BasicFormulas,
    AdvancedFunctions,
    DataAnalysis,
    /// 未命中关键词但回答较详细
    Detailed,
    /// 未命中关键词且较简略
    Vague,
}

/// 在 len 个候选中选一个下标
pub trait PhrasePicker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// 默认：线程随机数
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl PhrasePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            0
        } else {
            rand::thread_rng().gen_range(0..len)
        }
    }
}

/// 固定下标（越界时取模），用于测试
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl PhrasePicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.0 % len
        }
    }
}

const MINIMAL: &[&str] = &[
    "I appreciate your honesty about your Excel level, but I was hoping for at least an attempt to explain the concept.",
    "Thanks for being straightforward with me, but I was hoping for at least an attempt to explain the concept.",
    "I can see you're trying to work through this, but I was hoping for at least an attempt to explain the concept.",
];

const BASIC_FORMULAS: &[&str] = &[
    "Based on our conversation so far, you show some familiarity with Excel basics. That's a good starting point.",
    "You clearly know your way around the basic formulas. That's a good starting point.",
];

const ADVANCED_FUNCTIONS: &[&str] = &[
    "Good! You're familiar with some important Excel functions. I can see you have practical experience.",
    "Nice, those are functions people rely on every day. It sounds like you've used them in practice.",
];

const DATA_ANALYSIS: &[&str] = &[
    "Excellent analytical thinking! You understand search concepts well, which translates nicely to Excel.",
    "That's a structured way to attack the problem, and it carries over well to working with data in Excel.",
];

const DETAILED: &[&str] = &[
    "I appreciate the detailed response. Let me explore your Excel knowledge further.",
    "Thanks for walking me through that. Let me dig a little deeper into your Excel knowledge.",
];

const VAGUE: &[&str] = &[
    "I can see you're trying to work through this, but I'd like to see more specific details in your explanations.",
    "Thanks for the answer, but I'd like to see more specific details in your explanations.",
];

/// 话术库
#[derive(Debug, Default, Clone, Copy)]
pub struct PhraseBank;

impl PhraseBank {
    pub fn templates(branch: FeedbackBranch) -> &'static [&'static str] {
        match branch {
            FeedbackBranch::Minimal => MINIMAL,
            FeedbackBranch::BasicFormulas => BASIC_FORMULAS,
            FeedbackBranch::AdvancedFunctions => ADVANCED_FUNCTIONS,
            FeedbackBranch::DataAnalysis => DATA_ANALYSIS,
            FeedbackBranch::Detailed => DETAILED,
            FeedbackBranch::Vague => VAGUE,
        }
    }

    pub fn feedback(branch: FeedbackBranch, picker: &dyn PhrasePicker) -> String {
        let templates = Self::templates(branch);
        let idx = picker.pick(templates.len()).min(templates.len() - 1);
        templates[idx].to_string()
    }
}

//! 面试总结：按历史汇总总分、各话题平均分与水平档位

use std::fmt;

use serde::Serialize;

use crate::memory::ConversationHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillBand {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillBand {
    pub fn from_average(average: f64) -> Self {
        if average < 3.0 {
            SkillBand::Beginner
        } else if average < 6.0 {
            SkillBand::Intermediate
        } else {
            SkillBand::Advanced
        }
    }
}

impl fmt::Display for SkillBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkillBand::Beginner => "beginner",
            SkillBand::Intermediate => "intermediate",
            SkillBand::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicScore {
    pub topic: String,
    pub questions: usize,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    pub questions_answered: usize,
    pub average_score: f64,
    pub band: SkillBand,
    /// 按首次出现顺序
    pub topics: Vec<TopicScore>,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

impl InterviewSummary {
    pub fn from_history(history: &ConversationHistory) -> Self {
        let mut totals: Vec<(String, usize, f64)> = Vec::new();
        for entry in history.entries() {
            let score = entry.clamped_score();
            match totals.iter_mut().find(|(t, _, _)| t == entry.topic()) {
                Some((_, n, sum)) => {
                    *n += 1;
                    *sum += score;
                }
                None => totals.push((entry.topic().to_string(), 1, score)),
            }
        }

        let answered = history.len();
        let average = if answered == 0 {
            0.0
        } else {
            history.entries().iter().map(|e| e.clamped_score()).sum::<f64>() / answered as f64
        };

        Self {
            questions_answered: answered,
            average_score: round1(average),
            band: SkillBand::from_average(average),
            topics: totals
                .into_iter()
                .map(|(topic, questions, sum)| TopicScore {
                    topic,
                    questions,
                    average: round1(sum / questions as f64),
                })
                .collect(),
        }
    }

    /// 平均分最高的话题；并列时取先出现的
    pub fn strongest_topic(&self) -> Option<&TopicScore> {
        self.topics
            .iter()
            .fold(None, |best: Option<&TopicScore>, t| match best {
                Some(b) if b.average >= t.average => Some(b),
                _ => Some(t),
            })
    }

    /// 平均分最低的话题；并列时取先出现的
    pub fn weakest_topic(&self) -> Option<&TopicScore> {
        self.topics
            .iter()
            .fold(None, |worst: Option<&TopicScore>, t| match worst {
                Some(w) if w.average <= t.average => Some(w),
                _ => Some(t),
            })
    }
}

impl fmt::Display for InterviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Questions answered: {} | Average score: {:.1}/10 | Level: {}",
            self.questions_answered, self.average_score, self.band
        )?;
        for t in &self.topics {
            writeln!(f, "  - {}: {:.1}/10 over {} question(s)", t.topic, t.average, t.questions)?;
        }
        Ok(())
    }
}

//! Ephemeral per-round state: answer bookkeeping and the question cursor.
//!
//! A `RoundState` is created when a round starts and discarded when it
//! ends; nothing in here survives to the durable profile. Answering is a
//! two-step exchange mirroring the UI flow: the player selects an answer,
//! then after the acknowledgement delay the selection is resolved into
//! score, streak, and history updates.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::question::Question;

/// Outcome recorded for one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMark {
    Correct,
    Incorrect,
}

/// Per-question history stored inline for a standard 8-question round.
pub type AnswerHistory = SmallVec<[AnswerMark; 8]>;
/// Elapsed seconds per answered question, parallel to the history.
pub type AnswerTimes = SmallVec<[f32; 8]>;

/// Result of resolving a selected answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerResolution {
    pub correct: bool,
    /// Set when the in-round correct streak just hit a milestone and a
    /// bonus aid is waiting to be claimed.
    pub aid_reward_earned: bool,
}

/// Ephemeral state for one round in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    questions: Vec<Question>,
    /// 1-based position of the current question.
    pub current_index: usize,
    pub score: u32,
    /// In-round consecutive-correct streak; unrelated to the daily streak.
    pub streak: u32,
    pub total_answered: u32,
    /// `round(score / total_answered * 100)`, 0 before the first answer.
    pub accuracy: u32,
    pub selected_answer: Option<usize>,
    resolved: bool,
    pub answer_history: AnswerHistory,
    pub answer_times: AnswerTimes,
    /// Options narrowed out for the current question only.
    pub disabled_answers: Vec<usize>,
    /// Hint text surfaced by the reveal aid for the current question.
    pub hint: Option<String>,
    /// Milestone aid reward waiting to be claimed.
    pub pending_aid_reward: bool,
}

impl RoundState {
    /// Start a round over an already-shuffled batch.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 1,
            score: 0,
            streak: 0,
            total_answered: 0,
            accuracy: 0,
            selected_answer: None,
            resolved: false,
            answer_history: AnswerHistory::new(),
            answer_times: AnswerTimes::new(),
            disabled_answers: Vec::new(),
            hint: None,
            pending_aid_reward: false,
        }
    }

    /// Number of questions in the round.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// True for a round built over an empty batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question under the cursor, if any remain.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index.checked_sub(1)?)
    }

    /// Whether the cursor sits on the final question.
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// Whether every question has been answered and resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_answered as usize >= self.questions.len()
    }

    /// Record the player's selection and elapsed answer time.
    ///
    /// Returns false without change when an answer is already pending for
    /// the current question (double-submission guard) or the index is out
    /// of range.
    pub fn select_answer(&mut self, answer_index: usize, elapsed_secs: f32) -> bool {
        if self.selected_answer.is_some() || self.resolved {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        if answer_index >= question.statements.len() {
            return false;
        }
        self.selected_answer = Some(answer_index);
        self.answer_times.push(elapsed_secs.max(0.0));
        true
    }

    /// Resolve the pending selection into score, streak, accuracy, and
    /// history updates. Called after the UI acknowledgement delay.
    ///
    /// Returns `None` when no selection is pending or the question was
    /// already resolved.
    pub fn resolve_answer(&mut self, milestone_interval: u32) -> Option<AnswerResolution> {
        if self.resolved {
            return None;
        }
        let selected = self.selected_answer?;
        let correct = self
            .current_question()
            .is_some_and(|q| selected == q.correct_answer);

        self.total_answered += 1;
        if correct {
            self.score += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.accuracy = accuracy_pct(self.score, self.total_answered);
        self.answer_history.push(if correct {
            AnswerMark::Correct
        } else {
            AnswerMark::Incorrect
        });
        self.resolved = true;

        let aid_reward_earned =
            correct && milestone_interval > 0 && self.streak % milestone_interval == 0;
        if aid_reward_earned {
            self.pending_aid_reward = true;
        }
        Some(AnswerResolution {
            correct,
            aid_reward_earned,
        })
    }

    /// Advance the cursor to the next question, clearing per-question
    /// state (selection, narrowed options, hint).
    ///
    /// Returns false when the current question is unresolved or the round
    /// has no further questions.
    pub fn advance(&mut self) -> bool {
        if !self.resolved || self.is_last_question() {
            return false;
        }
        self.current_index += 1;
        self.selected_answer = None;
        self.resolved = false;
        self.disabled_answers.clear();
        self.hint = None;
        true
    }

    /// Whether the current question's answer has been resolved.
    #[must_use]
    pub const fn is_answer_resolved(&self) -> bool {
        self.resolved
    }

    /// Clear the milestone reward flag once the bonus aid is claimed.
    pub const fn clear_aid_reward(&mut self) {
        self.pending_aid_reward = false;
    }

    /// Total time spent answering, in seconds.
    #[must_use]
    pub fn total_time_secs(&self) -> f32 {
        self.answer_times.iter().sum()
    }
}

/// Accuracy percentage rounded to the nearest point.
#[must_use]
pub fn accuracy_pct(score: u32, total_answered: u32) -> u32 {
    if total_answered == 0 {
        return 0;
    }
    let pct = f64::from(score) / f64::from(total_answered) * 100.0;
    pct.round() as u32
}

//! Question shape and answer-position shuffling.
//!
//! Provider output fixes the fabricated statement at whatever index the
//! generator chose; the shuffler guarantees answer-position unpredictability
//! with a uniform index permutation while preserving correctness.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::STATEMENTS_PER_QUESTION;

/// One challenge: four statements, exactly one of them fabricated.
///
/// `correct_answer` is the index of the fabricated statement, i.e. the
/// position the player must pick to score the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub statements: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

impl Question {
    /// Whether the question has the expected shape for shuffling and play.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.statements.len() == STATEMENTS_PER_QUESTION
            && self.correct_answer < self.statements.len()
    }
}

/// Shuffle one question's statements with a uniform permutation,
/// remapping `correct_answer` to the fabricated statement's new position.
///
/// Malformed questions (wrong statement count, index out of range) pass
/// through unchanged rather than erroring.
#[must_use]
pub fn shuffle_question<R: Rng + ?Sized>(rng: &mut R, question: &Question) -> Question {
    if !question.is_well_formed() {
        return question.clone();
    }
    let mut order: Vec<usize> = (0..question.statements.len()).collect();
    order.shuffle(rng);
    let statements = order
        .iter()
        .map(|&i| question.statements[i].clone())
        .collect();
    let correct_answer = order
        .iter()
        .position(|&i| i == question.correct_answer)
        .unwrap_or(question.correct_answer);
    Question {
        statements,
        correct_answer,
        explanation: question.explanation.clone(),
    }
}

/// Shuffle every question in a batch independently.
#[must_use]
pub fn shuffle_batch<R: Rng + ?Sized>(rng: &mut R, batch: &[Question]) -> Vec<Question> {
    batch.iter().map(|q| shuffle_question(rng, q)).collect()
}

//! Deterministic scripted stand-in for the generative content backend.
//!
//! Produces plausible-shaped question batches from a seeded RNG so whole
//! sessions replay identically for a given seed. An optional flaky mode
//! fails the next batch call on demand, letting the harness exercise the
//! empty-batch retry path.

use mirage_game::{BatchRequest, ContentProvider, DailyContent, OnboardingProfile, Question};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("scripted provider outage")]
pub struct Outage;

pub struct ScriptedProvider {
    rng: ChaCha8Rng,
    fail_next_batch: bool,
}

const SUBJECTS: &[&str] = &[
    "the excavation record",
    "a 1968 survey",
    "the standard reference text",
    "a widely cited chronicle",
    "the expedition log",
    "recent measurements",
];

impl ScriptedProvider {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            fail_next_batch: false,
        }
    }

    /// Make the next `generate_batch` call fail once.
    pub const fn arm_failure(&mut self) {
        self.fail_next_batch = true;
    }

    fn question(&mut self, topic: &str, index: usize) -> Question {
        let fabricated = self.rng.gen_range(0..4);
        let statements = (0..4)
            .map(|slot| {
                let subject = SUBJECTS[self.rng.gen_range(0..SUBJECTS.len())];
                if slot == fabricated {
                    format!("According to {subject}, {topic} claim {index}.{slot} (fabricated)")
                } else {
                    format!("According to {subject}, {topic} claim {index}.{slot}")
                }
            })
            .collect();
        Question {
            statements,
            correct_answer: fabricated,
            explanation: format!("Claim {index}.{fabricated} has no source behind it."),
        }
    }
}

impl ContentProvider for ScriptedProvider {
    type Error = Outage;

    fn generate_batch(&mut self, request: &BatchRequest<'_>) -> Result<Vec<Question>, Self::Error> {
        if self.fail_next_batch {
            self.fail_next_batch = false;
            return Err(Outage);
        }
        Ok((0..request.batch_size)
            .map(|i| self.question(request.topic, i))
            .collect())
    }

    fn post_round_summary(
        &mut self,
        topic: &str,
        _theme: &str,
        _onboarding: &OnboardingProfile,
    ) -> Result<DailyContent, Self::Error> {
        Ok(DailyContent {
            topic: topic.to_string(),
            key_takeaway: format!("Every claim about {topic} deserves a source."),
            deeper_dive: format!(
                "Today's round drew on {topic}. The fabricated statements were built to \
                 mimic the cadence of the true ones; only their sourcing gave them away."
            ),
            keywords: vec![topic.to_string(), "source criticism".to_string()],
        })
    }

    fn hint(&mut self, _question: &Question, topic: &str) -> Result<String, Self::Error> {
        Ok(format!(
            "One {topic} statement cites a source that does not exist."
        ))
    }
}

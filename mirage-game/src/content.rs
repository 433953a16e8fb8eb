//! Content provider seam: question batches, hints, and post-round
//! summaries.
//!
//! The generative backend is an external collaborator. The session
//! controller never lets its failures escape: a failed batch normalizes to
//! an empty batch, a failed summary to a fixed fallback payload, and a
//! failed hint to canned hint text.

use serde::{Deserialize, Serialize};

use crate::constants::{DEEPER_DIVE_FALLBACK, TAKEAWAY_FALLBACK};
use crate::profile::OnboardingProfile;
use crate::question::Question;

/// Parameters for one batch generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequest<'a> {
    pub topic: &'a str,
    pub theme: &'a str,
    pub level: u32,
    pub streak: u32,
    pub batch_size: usize,
    pub onboarding: &'a OnboardingProfile,
}

/// Post-round educational payload, cached per calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContent {
    pub topic: String,
    pub key_takeaway: String,
    pub deeper_dive: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl DailyContent {
    /// Fixed payload substituted when the provider fails; round completion
    /// must never block on content generation.
    #[must_use]
    pub fn fallback(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            key_takeaway: TAKEAWAY_FALLBACK.to_string(),
            deeper_dive: DEEPER_DIVE_FALLBACK.to_string(),
            keywords: Vec::new(),
        }
    }
}

/// Generative content backend.
///
/// Implementations wrap whatever service produces questions and prose;
/// the core only sees this trait. Errors crossing this boundary are
/// recovered locally by the session controller, never propagated as
/// fatal.
pub trait ContentProvider {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce an ordered batch of questions for one round.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails; the caller treats this
    /// the same as an empty batch.
    fn generate_batch(&mut self, request: &BatchRequest<'_>) -> Result<Vec<Question>, Self::Error>;

    /// Produce the post-round summary payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails; the caller substitutes
    /// [`DailyContent::fallback`].
    fn post_round_summary(
        &mut self,
        topic: &str,
        theme: &str,
        onboarding: &OnboardingProfile,
    ) -> Result<DailyContent, Self::Error>;

    /// Produce a textual hint for the reveal aid.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails; the caller substitutes
    /// canned hint text.
    fn hint(&mut self, question: &Question, topic: &str) -> Result<String, Self::Error>;
}

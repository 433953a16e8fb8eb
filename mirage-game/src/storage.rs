//! Persistence seam for the profile blob and the dated daily-content
//! cache.
//!
//! Platform shells (web local storage, mobile preferences) implement
//! [`ProfileStore`]; the in-memory implementation backs tests and the
//! tester binary.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::constants::{DAILY_CONTENT_KEY_PREFIX, PLAYER_PROFILE_KEY};
use crate::content::DailyContent;
use crate::profile::PlayerProfile;

/// Blob key under which the single player profile lives.
#[must_use]
pub const fn profile_key() -> &'static str {
    PLAYER_PROFILE_KEY
}

/// Blob key for one day's cached post-round content.
#[must_use]
pub fn daily_content_key(date: NaiveDate) -> String {
    format!("{DAILY_CONTENT_KEY_PREFIX}{}", date.format("%Y-%m-%d"))
}

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait ProfileStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the player profile, if one has been created.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be read or parsed.
    fn load_profile(&self) -> Result<Option<PlayerProfile>, Self::Error>;

    /// Persist the player profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn save_profile(&self, profile: &PlayerProfile) -> Result<(), Self::Error>;

    /// Delete the player profile (progress reset).
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be removed.
    fn remove_profile(&self) -> Result<(), Self::Error>;

    /// Load the cached content for a calendar day, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be read or parsed.
    fn load_daily_content(&self, date: NaiveDate) -> Result<Option<DailyContent>, Self::Error>;

    /// Cache one day's post-round content.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn save_daily_content(&self, date: NaiveDate, content: &DailyContent)
    -> Result<(), Self::Error>;
}

/// In-memory key-value store over JSON blobs, mirroring the shape of a
/// browser's local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// True when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn get<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, serde_json::Error> {
        self.entries
            .borrow()
            .get(key)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
    }

    fn put<T: serde::Serialize>(&self, key: String, value: &T) -> Result<(), serde_json::Error> {
        let raw = serde_json::to_string(value)?;
        self.entries.borrow_mut().insert(key, raw);
        Ok(())
    }
}

impl ProfileStore for MemoryStore {
    type Error = serde_json::Error;

    fn load_profile(&self) -> Result<Option<PlayerProfile>, Self::Error> {
        self.get(profile_key())
    }

    fn save_profile(&self, profile: &PlayerProfile) -> Result<(), Self::Error> {
        self.put(profile_key().to_string(), profile)
    }

    fn remove_profile(&self) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(profile_key());
        Ok(())
    }

    fn load_daily_content(&self, date: NaiveDate) -> Result<Option<DailyContent>, Self::Error> {
        self.get(&daily_content_key(date))
    }

    fn save_daily_content(
        &self,
        date: NaiveDate,
        content: &DailyContent,
    ) -> Result<(), Self::Error> {
        self.put(daily_content_key(date), content)
    }
}

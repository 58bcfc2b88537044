// src/services/profile_service.rs
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{error, info, warn};
use regex::Regex;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::user::UserProfile;
use crate::repositories::ArtApi;

pub const LOAD_FAILED: &str = "Failed to load profile data";
pub const SAVE_FAILED: &str = "Failed to update profile";
pub const SIGN_IN_REQUIRED: &str = "Please sign in to view your profile.";
/// How long the "saved" indicator stays up.
pub const SUCCESS_VISIBLE_SECS: i64 = 3;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{10,15}$").expect("phone pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileValidationError {
    #[error("First name and last name are required")]
    MissingName,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
}

/// Names must be non-blank; a phone, when given, must be 10-15 digits with an
/// optional leading `+` once whitespace is removed.
pub fn validate_profile(profile: &UserProfile) -> Result<(), ProfileValidationError> {
    if profile.first_name.trim().is_empty() || profile.last_name.trim().is_empty() {
        return Err(ProfileValidationError::MissingName);
    }
    if !profile.phone.is_empty() {
        let compact: String = profile.phone.chars().filter(|c| !c.is_whitespace()).collect();
        if !PHONE_RE.is_match(&compact) {
            return Err(ProfileValidationError::InvalidPhone);
        }
    }
    Ok(())
}

pub fn dummy_profile() -> UserProfile {
    UserProfile {
        email: "user@example.com".into(),
        first_name: "Arjun".into(),
        last_name: "Sharma".into(),
        phone: "+91 9876543210".into(),
        age: "28".into(),
        state: "Karnataka".into(),
        address: "123 MG Road, Bengaluru, Karnataka 560001".into(),
    }
}

/// Profile kept in process memory behind a fixed artificial delay. Never
/// touches the network.
#[derive(Clone)]
pub struct OfflineProfile {
    profile: Arc<Mutex<UserProfile>>,
    delay: Duration,
}

impl OfflineProfile {
    pub fn new(delay: Duration) -> Self {
        Self {
            profile: Arc::new(Mutex::new(dummy_profile())),
            delay,
        }
    }

    async fn load(&self) -> UserProfile {
        tokio::time::sleep(self.delay).await;
        self.profile.lock().await.clone()
    }

    async fn store(&self, profile: UserProfile) {
        tokio::time::sleep(self.delay).await;
        *self.profile.lock().await = profile;
    }
}

#[derive(Clone)]
pub enum ProfileSource {
    Live(Arc<dyn ArtApi>),
    Offline(OfflineProfile),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Rejected locally; nothing was sent.
    Invalid(ProfileValidationError),
    /// No cached email to key the update; nothing was sent.
    SignedOut,
    NotEditing,
    Failed,
}

/// Profile page state: the confirmed profile, an optional edit draft, the
/// inline error and the time of the last successful save.
pub struct ProfileManager {
    source: ProfileSource,
    email: Option<String>,
    profile: Option<UserProfile>,
    draft: Option<UserProfile>,
    error: Option<String>,
    saved_at: Option<DateTime<Utc>>,
}

impl ProfileManager {
    pub fn new(source: ProfileSource, email: Option<&str>) -> Self {
        Self {
            source,
            email: email.map(str::to_string),
            profile: None,
            draft: None,
            error: None,
            saved_at: None,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn draft(&self) -> Option<&UserProfile> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut UserProfile> {
        self.draft.as_mut()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self) {
        self.error = None;
        match &self.source {
            ProfileSource::Offline(store) => {
                self.profile = Some(store.load().await);
            }
            ProfileSource::Live(api) => {
                let Some(email) = self.email.as_deref() else {
                    self.error = Some(SIGN_IN_REQUIRED.to_string());
                    return;
                };
                match api.get_profile(email).await {
                    Ok(profile) => self.profile = Some(profile),
                    Err(e) if e.is_server_reported() => {
                        warn!("Profile lookup for {} refused: {}", email, e);
                        self.error = Some(e.display_message(LOAD_FAILED));
                    }
                    Err(e) => {
                        error!("Error fetching profile for {}: {}", email, e);
                        self.error = Some(e.display_message(LOAD_FAILED));
                    }
                }
            }
        }
    }

    /// Starts editing a copy of the confirmed profile.
    pub fn begin_edit(&mut self) {
        if let Some(profile) = &self.profile {
            self.draft = Some(profile.clone());
            self.error = None;
        }
    }

    /// Throws the draft away; the confirmed profile is shown again.
    pub fn cancel_edit(&mut self) {
        self.draft = None;
        self.error = None;
    }

    pub async fn save(&mut self) -> SaveOutcome {
        let Some(draft) = self.draft.clone() else {
            return SaveOutcome::NotEditing;
        };
        if let Err(invalid) = validate_profile(&draft) {
            self.error = Some(invalid.to_string());
            return SaveOutcome::Invalid(invalid);
        }
        self.error = None;

        let result = match &self.source {
            ProfileSource::Offline(store) => {
                store.store(draft.clone()).await;
                Ok(())
            }
            ProfileSource::Live(api) => {
                let Some(email) = self.email.as_deref() else {
                    warn!("Profile save attempted without a cached email");
                    self.error = Some(SIGN_IN_REQUIRED.to_string());
                    return SaveOutcome::SignedOut;
                };
                api.update_profile(email, &draft).await
            }
        };

        match result {
            Ok(()) => {
                info!("Profile updated");
                self.profile = Some(draft);
                self.draft = None;
                self.saved_at = Some(Utc::now());
                SaveOutcome::Saved
            }
            Err(e) if e.is_server_reported() => {
                warn!("Profile update refused: {}", e);
                self.error = Some(e.display_message(SAVE_FAILED));
                SaveOutcome::Failed
            }
            Err(e) => {
                error!("Error updating profile: {}", e);
                self.error = Some(e.display_message(SAVE_FAILED));
                SaveOutcome::Failed
            }
        }
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Restores the save time carried across a redirect.
    pub fn restore_saved_at(&mut self, at: DateTime<Utc>) {
        self.saved_at = Some(at);
    }

    pub fn success_visible(&self, now: DateTime<Utc>) -> bool {
        match self.saved_at {
            Some(at) => now >= at && now - at < TimeDelta::seconds(SUCCESS_VISIBLE_SECS),
            None => false,
        }
    }
}

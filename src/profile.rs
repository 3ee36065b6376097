//! User identity and favorites: first-run bootstrap, onboarding and settings.

use log::{info, warn};
use std::fmt;

use crate::catalog::FilterCatalog;
use crate::error::PrefsError;
use crate::layout::FormFactor;
use crate::prefs::{self, PreferenceStore};
use crate::source::MealSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Avatar {
    #[default]
    Pfp1,
    Pfp2,
    Pfp3,
    Pfp4,
    Pfp5,
}

impl Avatar {
    pub const ALL: [Avatar; 5] = [
        Avatar::Pfp1,
        Avatar::Pfp2,
        Avatar::Pfp3,
        Avatar::Pfp4,
        Avatar::Pfp5,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Avatar::Pfp1 => "pfp1",
            Avatar::Pfp2 => "pfp2",
            Avatar::Pfp3 => "pfp3",
            Avatar::Pfp4 => "pfp4",
            Avatar::Pfp5 => "pfp5",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|avatar| avatar.as_str() == id)
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub avatar: Avatar,
    pub favorite_category: String,
    pub favorite_area: String,
}

impl UserProfile {
    /// Missing values read as empty strings and the first avatar.
    pub fn load<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        let avatar = match store.get(prefs::USER_PFP) {
            Some(id) => Avatar::parse(&id).unwrap_or_else(|| {
                warn!("Unknown avatar {id:?}, using {}", Avatar::default());
                Avatar::default()
            }),
            None => Avatar::default(),
        };

        UserProfile {
            name: store.get(prefs::USER_NAME).unwrap_or_default(),
            avatar,
            favorite_category: store.get(prefs::FAVORITE_CATEGORY).unwrap_or_default(),
            favorite_area: store.get(prefs::FAVORITE_AREA).unwrap_or_default(),
        }
    }

    pub fn save_identity<S: PreferenceStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), PrefsError> {
        store.set(prefs::USER_NAME, &self.name)?;
        store.set(prefs::USER_PFP, self.avatar.as_str())
    }

    pub fn save_favorites<S: PreferenceStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), PrefsError> {
        store.set(prefs::FAVORITE_CATEGORY, &self.favorite_category)?;
        store.set(prefs::FAVORITE_AREA, &self.favorite_area)
    }

    /// Writes all four keys one after another. A failure part-way leaves the earlier
    /// keys written.
    pub fn save<S: PreferenceStore + ?Sized>(&self, store: &mut S) -> Result<(), PrefsError> {
        self.save_identity(store)?;
        self.save_favorites(store)
    }
}

/// True only once onboarding has been finished.
pub fn onboarding_complete<S: PreferenceStore + ?Sized>(store: &S) -> bool {
    store.get(prefs::ONBOARDING_COMPLETE).as_deref() == Some("true")
}

/// First-run defaults plus a refresh of the cached option catalog.
pub async fn initialize_storage<M, S>(source: &M, store: &mut S)
where
    M: MealSource,
    S: PreferenceStore + ?Sized,
{
    let defaults = [(prefs::IS_MOBILE, "true"), (prefs::ONBOARDING_COMPLETE, "false")];

    for (key, value) in defaults {
        if store.get(key).is_none() {
            if let Err(e) = store.set(key, value) {
                warn!("Failed to initialize {key}: {e}");
            }
        }
    }

    if let Some(catalog) = FilterCatalog::refresh(source, store).await {
        info!(
            "Cached {} categories and {} areas",
            catalog.categories.len(),
            catalog.areas.len()
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Welcome,
    Identity,
    Preferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Step(OnboardingStep),
    Complete,
}

/// Three-step first-run flow. Identity is saved when leaving its step; favorites and the
/// completion flag when finishing.
pub struct Onboarding {
    step: OnboardingStep,
    pub profile: UserProfile,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self::new()
    }
}

impl Onboarding {
    pub fn new() -> Self {
        Onboarding {
            step: OnboardingStep::Welcome,
            profile: UserProfile::default(),
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn next<S: PreferenceStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<Progress, PrefsError> {
        self.step = match self.step {
            OnboardingStep::Welcome => OnboardingStep::Identity,
            OnboardingStep::Identity => {
                self.profile.save_identity(store)?;
                OnboardingStep::Preferences
            }
            OnboardingStep::Preferences => {
                self.profile.save_favorites(store)?;
                store.set_flag(prefs::ONBOARDING_COMPLETE, true)?;
                info!("Onboarding complete for {:?}", self.profile.name);
                return Ok(Progress::Complete);
            }
        };
        Ok(Progress::Step(self.step))
    }

    pub fn back(&mut self) {
        self.step = match self.step {
            OnboardingStep::Welcome | OnboardingStep::Identity => OnboardingStep::Welcome,
            OnboardingStep::Preferences => OnboardingStep::Identity,
        };
    }
}

/// Settings screen: the stored profile plus the options its pickers offer.
pub struct Settings {
    pub profile: UserProfile,
    pub catalog: FilterCatalog,
}

impl Settings {
    pub fn open<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        Settings {
            profile: UserProfile::load(store),
            catalog: FilterCatalog::cached_or_fallback(store),
        }
    }

    pub fn save<S: PreferenceStore + ?Sized>(&self, store: &mut S) -> Result<(), PrefsError> {
        self.profile.save(store)
    }

    pub fn switch_layout<S: PreferenceStore + ?Sized>(
        store: &mut S,
        form_factor: FormFactor,
    ) -> Result<(), PrefsError> {
        form_factor.save(store)
    }
}

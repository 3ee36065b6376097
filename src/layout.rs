use log::warn;

use crate::error::PrefsError;
use crate::prefs::{self, PreferenceStore};

/// Compact (mobile) or wide (desktop) layout. Only display caps depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFactor {
    Compact,
    Wide,
}

impl FormFactor {
    /// Maximum number of search results shown.
    pub fn result_cap(self) -> usize {
        match self {
            FormFactor::Compact => 8,
            FormFactor::Wide => 12,
        }
    }

    /// Number of meals shown in the home category feed.
    pub fn feed_size(self) -> usize {
        match self {
            FormFactor::Compact => 2,
            FormFactor::Wide => 4,
        }
    }

    /// Stored layout preference. Compact unless `isMobile` is exactly `"false"`.
    pub fn from_store<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        match store.get_flag(prefs::IS_MOBILE) {
            Some(false) => FormFactor::Wide,
            _ => FormFactor::Compact,
        }
    }

    pub fn save<S: PreferenceStore + ?Sized>(self, store: &mut S) -> Result<(), PrefsError> {
        store.set_flag(prefs::IS_MOBILE, self == FormFactor::Compact)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "mobile" | "compact" => Some(FormFactor::Compact),
            "desktop" | "wide" | "web" => Some(FormFactor::Wide),
            other => {
                warn!("Unknown layout {other:?}");
                None
            }
        }
    }
}

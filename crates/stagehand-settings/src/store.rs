//! Shared runtime settings with interior locking.
//!
//! The store hands out value copies rather than guards, so a reader never
//! observes a half-written record and never holds the lock across host calls.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use stagehand_core::settings::ObjectDefaults;

use crate::loader::{self, SettingsError};

/// Mutex-guarded [`ObjectDefaults`] shared between the load path and the
/// systems that consume the defaults at spawn time.
#[derive(Debug, Default)]
pub struct SettingsStore {
    current: Mutex<ObjectDefaults>,
}

impl SettingsStore {
    /// Store seeded with `defaults`, sanitized on the way in.
    pub fn new(defaults: ObjectDefaults) -> SettingsStore {
        SettingsStore {
            current: Mutex::new(defaults.sanitized()),
        }
    }

    /// Replace the current defaults with whatever `path` holds. A missing
    /// file resets to the built-in defaults; a malformed file leaves the
    /// store untouched.
    pub fn load(&self, path: &Path) -> Result<(), SettingsError> {
        let loaded = loader::load_or_default(path)?;
        *self.lock() = loaded;
        Ok(())
    }

    /// Value copy of the current defaults.
    pub fn snapshot(&self) -> ObjectDefaults {
        *self.lock()
    }

    /// Swap in new defaults, sanitizing on the way in.
    pub fn replace(&self, defaults: ObjectDefaults) {
        *self.lock() = defaults.sanitized();
    }

    /// Persist the current defaults to `path`.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let snapshot = self.snapshot();
        loader::save_defaults(path, &snapshot)
    }

    fn lock(&self) -> MutexGuard<'_, ObjectDefaults> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

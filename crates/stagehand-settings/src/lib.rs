pub mod loader;
pub mod store;

pub use loader::{SettingsError, load_defaults, load_or_default, save_defaults};
pub use store::SettingsStore;

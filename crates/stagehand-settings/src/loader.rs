//! Reads and writes spawn defaults as a settings file.
//!
//! Provides format detection (TOML/RON) and tolerant deserialization: a
//! malformed value inside the file degrades to its default with a warning,
//! and the assembled record is validated as a whole before use. Only an
//! unreadable or unparseable file is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stagehand_core::color::Rgba;
use stagehand_core::settings::{ObjectDefaults, SpawnKind};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while reading or writing a settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The file has an extension we don't support.
    #[error("unsupported format for settings file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// The file exists but is not valid TOML/RON.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The defaults could not be encoded in the requested format.
    #[error("serialize error for {file}: {detail}")]
    Serialize { file: PathBuf, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

fn detect_format(path: &Path) -> Result<Format, SettingsError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(Format::Toml),
        Some("ron") => Ok(Format::Ron),
        _ => Err(SettingsError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Raw schema
// ===========================================================================

/// On-disk shape. Every key is optional; absent keys keep their defaults.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawSettings {
    spawn_kind: Option<String>,
    color: Option<[f32; 4]>,
    scale: Option<f32>,
}

impl RawSettings {
    fn from_defaults(defaults: &ObjectDefaults) -> RawSettings {
        RawSettings {
            spawn_kind: Some(defaults.spawn_kind.to_string()),
            color: Some([
                defaults.color.r,
                defaults.color.g,
                defaults.color.b,
                defaults.color.a,
            ]),
            scale: Some(defaults.scale),
        }
    }

    /// Per-key application onto the safe defaults. A value that fails to
    /// parse keeps the default for just that key; the assembled record is
    /// then validated as a whole.
    fn validate(self, origin: &Path) -> ObjectDefaults {
        let mut defaults = ObjectDefaults::default();

        if let Some(raw) = self.spawn_kind {
            match SpawnKind::parse(&raw) {
                Some(kind) => defaults.spawn_kind = kind,
                None => log::warn!(
                    "settings key 'spawn_kind': invalid value '{raw}' in {}; using default",
                    origin.display()
                ),
            }
        }
        if let Some([r, g, b, a]) = self.color {
            defaults.color = Rgba::new(r, g, b, a);
        }
        if let Some(scale) = self.scale {
            defaults.scale = scale;
        }

        if !defaults.is_valid() {
            log::warn!(
                "invalid values in {}; falling back to safe defaults",
                origin.display()
            );
            defaults.apply_safe_defaults();
        }
        defaults
    }
}

// ===========================================================================
// Loading and saving
// ===========================================================================

/// Read defaults from `path`, detecting the format from the extension.
pub fn load_defaults(path: &Path) -> Result<ObjectDefaults, SettingsError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    let raw: RawSettings = match format {
        Format::Toml => toml::from_str(&content).map_err(|e| SettingsError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })?,
        Format::Ron => ron::from_str(&content).map_err(|e| SettingsError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })?,
    };

    Ok(raw.validate(path))
}

/// Like [`load_defaults`], but a missing file quietly yields the defaults.
/// Any other failure still surfaces.
pub fn load_or_default(path: &Path) -> Result<ObjectDefaults, SettingsError> {
    if !path.exists() {
        log::info!("no settings file at {}; using defaults", path.display());
        return Ok(ObjectDefaults::default());
    }
    load_defaults(path)
}

/// Write `defaults` to `path` in the format its extension names.
pub fn save_defaults(path: &Path, defaults: &ObjectDefaults) -> Result<(), SettingsError> {
    let format = detect_format(path)?;
    let raw = RawSettings::from_defaults(defaults);

    let content = match format {
        Format::Toml => toml::to_string_pretty(&raw).map_err(|e| SettingsError::Serialize {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })?,
        Format::Ron => ron::ser::to_string_pretty(&raw, ron::ser::PrettyConfig::default())
            .map_err(|e| SettingsError::Serialize {
                file: path.to_path_buf(),
                detail: e.to_string(),
            })?,
    };

    std::fs::write(path, content)?;
    Ok(())
}

// ===========================================================================
// Tests
// ===========================================================================

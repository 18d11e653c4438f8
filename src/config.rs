//! Badge configuration
//!
//! A badge is configured from three layers: per-invocation overrides, the
//! persisted settings file, and hardcoded defaults. Persisted settings may live
//! in one of several files left behind by older releases; the first non-empty
//! one wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default number of stars drawn
pub const DEFAULT_STAR_COUNT: u8 = 5;

/// Smallest number of stars a badge may draw
pub const MIN_STAR_COUNT: u8 = 1;

/// Largest number of stars a badge may draw
pub const MAX_STAR_COUNT: u8 = 10;

/// Default fill colour of the stars
pub const DEFAULT_STAR_COLOR: &str = "#E9966F";

/// Default text and icon colour
pub const DEFAULT_ACCENT_COLOR: &str = "#1E2A3A";

/// Default cache lifetime (12 hours)
pub const DEFAULT_CACHE_MINUTES: u64 = 720;

/// Current settings file, followed by files written by earlier releases
pub const SETTINGS_FILES: [&str; 3] = [
    "settings.json",
    "rating-options.json",
    "stoke-gbp-rating.json",
];

/// Errors that can occur when loading or saving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing a settings file failed
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Settings could not be encoded
    #[error("failed to encode settings: {0}")]
    Json(#[from] serde_json::Error),

    /// No platform configuration directory is available
    #[error("could not determine a configuration directory")]
    NoConfigDir,
}

/// Validates a `#rgb` or `#rrggbb` colour, returning it trimmed
pub fn sanitize_hex_color(color: &str) -> Option<String> {
    let color = color.trim();
    let digits = color.strip_prefix('#')?;
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    valid.then(|| color.to_string())
}

/// Fully resolved configuration for one badge render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeConfig {
    pub place_id: String,
    pub api_key: String,
    /// Number of stars drawn, always within `[1, 10]`
    pub star_count: u8,
    pub star_color: String,
    pub accent_color: String,
    /// Cache lifetime in minutes; 0 disables caching
    pub cache_minutes: u64,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            place_id: String::new(),
            api_key: String::new(),
            star_count: DEFAULT_STAR_COUNT,
            star_color: DEFAULT_STAR_COLOR.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            cache_minutes: DEFAULT_CACHE_MINUTES,
        }
    }
}

impl BadgeConfig {
    /// Resolves settings against the defaults, sanitizing every field
    ///
    /// Strings are trimmed, negative numbers are taken by absolute value, the
    /// star count is clamped and invalid colours fall back to the defaults.
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();

        let star_count = settings
            .stars
            .map(|stars| {
                stars
                    .unsigned_abs()
                    .clamp(u64::from(MIN_STAR_COUNT), u64::from(MAX_STAR_COUNT)) as u8
            })
            .unwrap_or(defaults.star_count);

        Self {
            place_id: settings.place_id.as_deref().unwrap_or("").trim().to_string(),
            api_key: settings.api_key.as_deref().unwrap_or("").trim().to_string(),
            star_count,
            star_color: settings
                .star_color
                .as_deref()
                .and_then(sanitize_hex_color)
                .unwrap_or(defaults.star_color),
            accent_color: settings
                .accent_color
                .as_deref()
                .and_then(sanitize_hex_color)
                .unwrap_or(defaults.accent_color),
            cache_minutes: settings
                .cache_minutes
                .map(i64::unsigned_abs)
                .unwrap_or(defaults.cache_minutes),
        }
    }

    /// Resolves per-invocation overrides over persisted settings
    pub fn resolve(persisted: &Settings, overrides: &Settings) -> Self {
        Self::from_settings(&persisted.clone().merge(overrides))
    }
}

/// One layer of badge settings; unset fields defer to the layer below
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_minutes: Option<i64>,
}

impl Settings {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies `overrides` on top of `self`; set fields in `overrides` win
    pub fn merge(self, overrides: &Settings) -> Settings {
        Settings {
            api_key: overrides.api_key.clone().or(self.api_key),
            place_id: overrides.place_id.clone().or(self.place_id),
            stars: overrides.stars.or(self.stars),
            star_color: overrides.star_color.clone().or(self.star_color),
            accent_color: overrides.accent_color.clone().or(self.accent_color),
            cache_minutes: overrides.cache_minutes.or(self.cache_minutes),
        }
    }

    /// Returns a fully populated, sanitized copy suitable for saving
    pub fn sanitize(&self) -> Settings {
        Settings::from(&BadgeConfig::from_settings(self))
    }
}

impl From<&BadgeConfig> for Settings {
    fn from(config: &BadgeConfig) -> Self {
        Settings {
            api_key: Some(config.api_key.clone()),
            place_id: Some(config.place_id.clone()),
            stars: Some(i64::from(config.star_count)),
            star_color: Some(config.star_color.clone()),
            accent_color: Some(config.accent_color.clone()),
            cache_minutes: Some(i64::try_from(config.cache_minutes).unwrap_or(i64::MAX)),
        }
    }
}

/// Reads and writes persisted settings
///
/// `sources` is ordered: the first entry is the current settings file and the
/// one written by `save`; the rest are legacy files consulted only when every
/// earlier source is missing or empty.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    sources: Vec<PathBuf>,
}

impl SettingsStore {
    /// Uses the platform configuration directory (`~/.config/gbp-badge/` on Linux)
    pub fn new() -> Result<Self, ConfigError> {
        let project_dirs = ProjectDirs::from("", "", "gbp-badge").ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::in_dir(project_dirs.config_dir()))
    }

    /// Uses the standard settings file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::with_sources(SETTINGS_FILES.iter().map(|name| dir.join(name)).collect())
    }

    /// Uses an explicit, ordered list of sources
    pub fn with_sources(sources: Vec<PathBuf>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Path written by `save`
    pub fn primary(&self) -> Option<&Path> {
        self.sources.first().map(PathBuf::as_path)
    }

    /// Loads the first non-empty source
    ///
    /// Missing files and files that do not hold a settings object are skipped.
    /// Returns empty settings when no source has any.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        for path in &self.sources {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            match serde_json::from_str::<Settings>(&content) {
                Ok(settings) if !settings.is_empty() => {
                    debug!(path = %path.display(), "loaded badge settings");
                    return Ok(settings);
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable settings file");
                }
            }
        }

        Ok(Settings::default())
    }

    /// Sanitizes and writes settings to the primary source
    pub fn save(&self, settings: &Settings) -> Result<Settings, ConfigError> {
        let path = self.primary().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no settings source configured")
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let sanitized = settings.sanitize();
        fs::write(path, serde_json::to_string_pretty(&sanitized)?)?;
        Ok(sanitized)
    }
}

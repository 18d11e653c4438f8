//! Command-line interface for the rating badge
//!
//! This module parses CLI arguments using clap and drives the pipeline:
//! persisted settings and per-invocation overrides are resolved into a badge
//! configuration, the rating is fetched through the on-disk cache, and the
//! rendered markup is returned for printing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, warn};

use crate::badge::{enqueue_badge_style, BadgeRenderer, BADGE_CSS};
use crate::cache::CacheManager;
use crate::config::{BadgeConfig, ConfigError, Settings, SettingsStore};
use crate::data::{PlacesClient, RatingProvider};

/// Error types for the command-line surface
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or saving settings failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// GBP Badge - render a Google rating badge as HTML
#[derive(Parser, Debug)]
#[command(name = "gbp-badge")]
#[command(about = "Render a Google Business Profile rating badge")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for the default `render` action
    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the badge markup (default)
    Render(RenderArgs),
    /// Save persisted badge settings
    Configure(ConfigureArgs),
    /// Print the badge stylesheet
    Style,
}

/// Badge attributes; each one overrides the persisted setting of the same name
#[derive(Args, Debug, Clone, Default)]
pub struct BadgeArgs {
    /// Google Place ID of the business
    #[arg(long)]
    pub place_id: Option<String>,

    /// Places API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Number of stars to draw (1-10)
    #[arg(long, allow_negative_numbers = true)]
    pub stars: Option<i64>,

    /// Hex colour of the filled star area
    #[arg(long, value_name = "HEX")]
    pub star_color: Option<String>,

    /// Hex colour of the icon and text
    #[arg(long, value_name = "HEX")]
    pub accent_color: Option<String>,

    /// Minutes to cache a successful lookup (0 disables caching)
    #[arg(long, allow_negative_numbers = true)]
    pub cache_minutes: Option<i64>,
}

impl BadgeArgs {
    /// Converts the given flags into an override layer
    pub fn to_settings(&self) -> Settings {
        Settings {
            api_key: self.api_key.clone(),
            place_id: self.place_id.clone(),
            stars: self.stars,
            star_color: self.star_color.clone(),
            accent_color: self.accent_color.clone(),
            cache_minutes: self.cache_minutes,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    #[command(flatten)]
    pub badge: BadgeArgs,

    /// Prepend the badge stylesheet in a <style> element
    #[arg(long)]
    pub with_style: bool,

    /// Directory holding settings.json and legacy settings files
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Directory for cached ratings
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Places Details endpoint to query
    #[arg(long, value_name = "URL", hide = true)]
    pub endpoint: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub badge: BadgeArgs,

    /// Directory holding settings.json and legacy settings files
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

fn settings_store(config_dir: Option<&Path>) -> Result<SettingsStore, CliError> {
    match config_dir {
        Some(dir) => Ok(SettingsStore::in_dir(dir)),
        None => Ok(SettingsStore::new()?),
    }
}

/// Runs the parsed command and returns what should be printed
pub async fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        None => render(cli.render).await,
        Some(Command::Render(args)) => render(args).await,
        Some(Command::Configure(args)) => configure(args),
        Some(Command::Style) => Ok(BADGE_CSS.to_string()),
    }
}

/// Resolves configuration, fetches the rating and renders the badge
pub async fn render(args: RenderArgs) -> Result<String, CliError> {
    let persisted = settings_store(args.config_dir.as_deref())?.load()?;
    let config = BadgeConfig::resolve(&persisted, &args.badge.to_settings());
    debug!(
        stars = config.star_count,
        cache_minutes = config.cache_minutes,
        "resolved badge configuration"
    );

    let mut client = PlacesClient::new()?;
    if let Some(endpoint) = args.endpoint {
        client = client.with_base_url(endpoint);
    }

    let cache = match args.cache_dir {
        Some(dir) => Some(CacheManager::with_dir(dir)),
        None => CacheManager::new(),
    };
    let mut provider = RatingProvider::new(client);
    match cache {
        Some(cache) => provider = provider.with_cache(Arc::new(cache)),
        None => warn!("no cache directory available; ratings will not be cached"),
    }

    let outcome = provider
        .fetch(&config.place_id, &config.api_key, config.cache_minutes)
        .await;
    let badge = BadgeRenderer::new().render(&outcome, &config);

    if args.with_style {
        if let Some(css) = enqueue_badge_style() {
            return Ok(format!("<style id=\"gbp-badge-css\">{}</style>{}", css, badge));
        }
    }
    Ok(badge)
}

/// Sanitizes the given attributes over the current settings and saves them
pub fn configure(args: ConfigureArgs) -> Result<String, CliError> {
    let store = settings_store(args.config_dir.as_deref())?;
    let merged = store.load()?.merge(&args.badge.to_settings());
    let saved = store.save(&merged)?;
    Ok(serde_json::to_string_pretty(&saved).map_err(ConfigError::from)?)
}

//! GBP Badge Library
//!
//! Fetches a Google Business Profile rating through a TTL cache and renders it
//! as an accessible star badge.

pub mod badge;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;

pub use badge::BadgeRenderer;
pub use config::BadgeConfig;
pub use data::{ErrorKind, FetchOutcome, RatingProvider, RatingResult};

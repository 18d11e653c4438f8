//! Core data models for the rating badge
//!
//! This module contains the rating snapshot returned by the Places API, the
//! typed outcome of a fetch, and the error taxonomy used to describe why a
//! fetch failed.

pub mod places;

pub use places::{PlacesClient, RatingProvider};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest rating the Places API reports
pub const MAX_RATING: f64 = 5.0;

/// Rating snapshot for a single place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingResult {
    /// Average rating, between 0 and 5
    pub rating: f64,
    /// Total number of user ratings
    pub review_count: u64,
}

impl RatingResult {
    /// Creates a rating snapshot, clamping the rating into `[0, 5]`
    pub fn new(rating: f64, review_count: u64) -> Self {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, MAX_RATING)
        } else {
            0.0
        };
        Self {
            rating,
            review_count,
        }
    }
}

/// Reasons a rating fetch can fail
///
/// None of these are fatal: the renderer shows the same "unavailable" badge for
/// all of them. The distinct kind is kept so operators can tell them apart in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Place id or API key is empty
    #[error("place id or API key is not configured")]
    MissingConfig,

    /// The request never produced a response
    #[error("request to the Places API failed")]
    TransportError,

    /// The API answered with a status other than 200
    #[error("Places API returned a non-200 HTTP status")]
    HttpError,

    /// The response body is not a JSON object
    #[error("failed to parse Places API response")]
    ParseError,

    /// The API reported a status other than "OK"
    #[error("Places API reported an error status")]
    ApiStatusError,

    /// Rating or review count missing from the response
    #[error("Places API response is missing rating data")]
    IncompleteData,
}

/// Result of resolving rating data for a place
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchOutcome {
    Success(RatingResult),
    Failure(ErrorKind),
}

impl FetchOutcome {
    /// Returns the rating snapshot on success
    pub fn rating(&self) -> Option<&RatingResult> {
        match self {
            FetchOutcome::Success(result) => Some(result),
            FetchOutcome::Failure(_) => None,
        }
    }

    /// Returns the failure kind, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::Failure(kind) => Some(*kind),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

impl From<Result<RatingResult, ErrorKind>> for FetchOutcome {
    fn from(result: Result<RatingResult, ErrorKind>) -> Self {
        match result {
            Ok(rating) => FetchOutcome::Success(rating),
            Err(kind) => FetchOutcome::Failure(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_result_clamps_out_of_range_values() {
        assert_eq!(RatingResult::new(7.2, 10).rating, 5.0);
        assert_eq!(RatingResult::new(-1.0, 10).rating, 0.0);
        assert_eq!(RatingResult::new(f64::NAN, 10).rating, 0.0);
        assert_eq!(RatingResult::new(4.3, 10).rating, 4.3);
    }

    #[test]
    fn test_outcome_accessors() {
        let success = FetchOutcome::Success(RatingResult::new(4.7, 238));
        assert!(success.is_success());
        assert_eq!(success.rating().map(|r| r.review_count), Some(238));
        assert!(success.error_kind().is_none());

        let failure = FetchOutcome::Failure(ErrorKind::HttpError);
        assert!(!failure.is_success());
        assert!(failure.rating().is_none());
        assert_eq!(failure.error_kind(), Some(ErrorKind::HttpError));
    }

    #[test]
    fn test_outcome_from_result() {
        let outcome: FetchOutcome = Err(ErrorKind::ParseError).into();
        assert_eq!(outcome, FetchOutcome::Failure(ErrorKind::ParseError));
    }

    #[test]
    fn test_error_kind_display() {
        assert!(ErrorKind::MissingConfig.to_string().contains("not configured"));
        assert!(ErrorKind::HttpError.to_string().contains("non-200"));
    }

    #[test]
    fn test_rating_result_serialization() {
        let json = serde_json::to_string(&RatingResult::new(4.5, 12)).unwrap();
        assert!(json.contains("\"rating\":4.5"));
        assert!(json.contains("\"review_count\":12"));
    }
}

//! Google Places Details API client
//!
//! Fetches the average rating and review count for a place and resolves them
//! through a cache store, mapping every failure onto an [`ErrorKind`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::{ErrorKind, FetchOutcome, RatingResult};
use crate::cache::{cache_key, CacheStore, RATING_NAMESPACE};

/// Places Details endpoint
pub const PLACES_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

/// Fields requested from the Details endpoint
const DETAILS_FIELDS: &str = "rating,user_ratings_total";

/// Hard timeout for a single Details request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the Places Details endpoint
#[derive(Debug, Clone)]
pub struct PlacesClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Endpoint URL (allows override for testing)
    base_url: String,
}

impl PlacesClient {
    /// Creates a client for the public Places endpoint with the 15 second timeout
    pub fn new() -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(http_client))
    }

    /// Creates a client around a preconfigured HTTP client
    pub fn with_client(http_client: Client) -> Self {
        Self {
            http_client,
            base_url: PLACES_DETAILS_URL.to_string(),
        }
    }

    /// Points the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues one Details request for `place_id`
    ///
    /// # Returns
    /// * `Ok(RatingResult)` - rating and review count for the place
    /// * `Err(ErrorKind)` - the first check the response failed
    pub async fn fetch_details(
        &self,
        place_id: &str,
        api_key: &str,
    ) -> Result<RatingResult, ErrorKind> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAILS_FIELDS),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the API key
                warn!(error = %e.without_url(), "Places API request failed");
                ErrorKind::TransportError
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "Places API returned non-200 status");
            return Err(ErrorKind::HttpError);
        }

        let body = response.text().await.map_err(|e| {
            warn!(error = %e.without_url(), "failed to read Places API response body");
            ErrorKind::TransportError
        })?;

        parse_details(&body)
    }
}

/// Parses a Details response body into a rating snapshot
///
/// Checks run in order: the body must be JSON, a non-null `status` field must
/// be `"OK"`, `result.rating` must be present and truthy, and
/// `result.user_ratings_total` must be present and non-null. A body that is
/// not an object has no `result` and fails the field checks.
pub fn parse_details(body: &str) -> Result<RatingResult, ErrorKind> {
    let data: Value = serde_json::from_str(body).map_err(|_| ErrorKind::ParseError)?;

    if let Some(status) = data.get("status").filter(|s| !s.is_null()) {
        if status.as_str() != Some("OK") {
            debug!(status = %status, "Places API reported error status");
            return Err(ErrorKind::ApiStatusError);
        }
    }

    let result = data.get("result");
    let rating = result
        .and_then(|r| r.get("rating"))
        .filter(|v| is_truthy(v))
        .ok_or(ErrorKind::IncompleteData)?;
    let total = result
        .and_then(|r| r.get("user_ratings_total"))
        .filter(|v| !v.is_null())
        .ok_or(ErrorKind::IncompleteData)?;

    Ok(RatingResult::new(coerce_f64(rating), coerce_u64(total)))
}

/// Loose truthiness: null, false, zero, "", "0" and empty arrays are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Numeric value of a loosely typed field; strings use their leading number
fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => leading_number(s),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(_) => 1.0,
    }
}

fn coerce_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| saturate_u64(coerce_f64(value))),
        _ => saturate_u64(coerce_f64(value)),
    }
}

/// Truncates toward zero; negatives and NaN become 0
fn saturate_u64(value: f64) -> u64 {
    if value > 0.0 {
        value as u64
    } else {
        0
    }
}

/// Parses the longest numeric prefix of `s` (`"4.5 stars"` -> 4.5), or 0
fn leading_number(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        mantissa_digits += fraction_end - fraction_start;
        if mantissa_digits > 0 {
            end = fraction_end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

/// Resolves rating data through an optional cache before calling the API
#[derive(Clone)]
pub struct RatingProvider {
    client: PlacesClient,
    cache: Option<Arc<dyn CacheStore>>,
    namespace: String,
}

impl std::fmt::Debug for RatingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingProvider")
            .field("client", &self.client)
            .field("cached", &self.cache.is_some())
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl RatingProvider {
    /// Creates a provider without a cache; every fetch goes to the network
    pub fn new(client: PlacesClient) -> Self {
        Self {
            client,
            cache: None,
            namespace: RATING_NAMESPACE.to_string(),
        }
    }

    /// Attaches a cache store
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Uses a different cache key namespace, for badge variants sharing a store
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Resolves the rating for a place
    ///
    /// # Behavior
    /// - Empty (after trimming) place id or API key fails with `MissingConfig`
    ///   without touching the cache or the network
    /// - With `cache_minutes > 0`, a live cache entry is returned as is; the
    ///   key is derived from the place id only
    /// - Otherwise a single request is made; successes are cached for
    ///   `cache_minutes`, failures never are
    pub async fn fetch(&self, place_id: &str, api_key: &str, cache_minutes: u64) -> FetchOutcome {
        let place_id = place_id.trim();
        let api_key = api_key.trim();

        if place_id.is_empty() || api_key.is_empty() {
            warn!("rating badge is missing a place id or API key");
            return FetchOutcome::Failure(ErrorKind::MissingConfig);
        }

        let key = cache_key(&self.namespace, place_id);
        let cache = self.cache.as_ref().filter(|_| cache_minutes > 0);

        if let Some(cache) = cache {
            if let Some(value) = cache.get(&key) {
                match serde_json::from_value::<RatingResult>(value) {
                    Ok(result) => {
                        debug!(place_id, "rating cache hit");
                        return FetchOutcome::Success(result);
                    }
                    Err(e) => debug!(place_id, error = %e, "ignoring unreadable cache entry"),
                }
            } else {
                debug!(place_id, "rating cache miss");
            }
        }

        match self.client.fetch_details(place_id, api_key).await {
            Ok(result) => {
                if let Some(cache) = cache {
                    match serde_json::to_value(result) {
                        Ok(value) => cache.set(&key, value, cache_minutes.saturating_mul(60)),
                        Err(e) => warn!(error = %e, "failed to serialize rating for cache"),
                    }
                }
                FetchOutcome::Success(result)
            }
            Err(kind) => {
                warn!(place_id, error = %kind, kind = ?kind, "rating fetch failed");
                FetchOutcome::Failure(kind)
            }
        }
    }
}

//! Partial-star geometry and markup
//!
//! Each of the `N` stars covers `5 / N` rating points. A star is drawn as a
//! grey background shape with a coloured copy on top, clipped to the fraction
//! of its span the rating reaches.

use std::sync::atomic::{AtomicU64, Ordering};

use super::format::{escape_html, format_percent};
use crate::data::MAX_RATING;

/// Background colour of unfilled star area
pub const STAR_BACKGROUND_COLOR: &str = "#4d5d72";

/// SVG path of a five-pointed star in a 24x24 viewBox
pub const STAR_PATH: &str =
    "M12 17.27L18.18 21l-1.64-7.03L22 9.24l-7.19-.62L12 2 9.19 8.62 2 9.24l5.46 4.73L5.82 21z";

/// Source of clip-region ids
///
/// Every call must return an id not handed out before, so badges rendered onto
/// the same page never share a clipPath id.
pub trait ClipIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

static NEXT_PROCESS_CLIP_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide monotonic ids
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessClipIds;

impl ClipIdGenerator for ProcessClipIds {
    fn next_id(&self) -> String {
        format!(
            "gbp-badge-clip-{}",
            NEXT_PROCESS_CLIP_ID.fetch_add(1, Ordering::Relaxed)
        )
    }
}

/// Monotonic ids scoped to one generator, starting at 1
#[derive(Debug, Default)]
pub struct SequentialClipIds {
    next: AtomicU64,
}

impl SequentialClipIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipIdGenerator for SequentialClipIds {
    fn next_id(&self) -> String {
        format!("gbp-badge-clip-{}", self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Computes how much of each star is filled for `rating`
///
/// The returned fractions are all within `[0, 1]` and, weighted by the span of
/// a star, add up to the rating.
pub fn star_fill_fractions(rating: f64, star_count: u8) -> Vec<f64> {
    let rating = if rating.is_finite() { rating.max(0.0) } else { 0.0 };
    let star_count = star_count.max(1);
    let per_star = MAX_RATING / f64::from(star_count);

    (0..star_count)
        .map(|i| {
            let star_start = f64::from(i) * per_star;
            ((rating - star_start) / per_star).clamp(0.0, 1.0)
        })
        .collect()
}

/// Renders the star sequence; `clip_base` prefixes the per-star clipPath ids
pub fn stars_markup(rating: f64, star_count: u8, star_color: &str, clip_base: &str) -> String {
    let star_path = escape_html(STAR_PATH);
    let star_color = escape_html(star_color);
    let mut markup = String::new();

    for (i, fraction) in star_fill_fractions(rating, star_count).into_iter().enumerate() {
        let clip_id = escape_html(&format!("{}-{}", clip_base, i));

        markup.push_str(r#"<svg class="gbp-badge-star" viewBox="0 0 24 24" aria-hidden="true" focusable="false">"#);
        markup.push_str(&format!(
            r#"<defs><clipPath id="{}"><rect x="0" y="0" width="{}%" height="100%" /></clipPath></defs>"#,
            clip_id,
            escape_html(&format_percent(fraction))
        ));
        markup.push_str(&format!(
            r#"<path class="gbp-badge-star-bg" d="{}" fill="{}" />"#,
            star_path, STAR_BACKGROUND_COLOR
        ));
        markup.push_str(&format!(
            r#"<path class="gbp-badge-star-fill" d="{}" fill="{}" clip-path="url(#{})" />"#,
            star_path, star_color, clip_id
        ));
        markup.push_str("</svg>");
    }

    markup
}

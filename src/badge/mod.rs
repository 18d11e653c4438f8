//! Rating badge markup
//!
//! Turns a fetch outcome and a badge configuration into a self-contained
//! HTML/SVG fragment: a Google icon, a row of partially filled stars and a
//! short text summary, wrapped in an element exposed to assistive technology
//! as a single image with a descriptive label.

pub mod format;
pub mod stars;
pub mod style;

pub use stars::{star_fill_fractions, ClipIdGenerator, ProcessClipIds, SequentialClipIds};
pub use style::{enqueue_badge_style, StyleRegistry, BADGE_CSS};

use std::sync::Arc;

use crate::config::BadgeConfig;
use crate::data::FetchOutcome;
use format::{escape_html, format_rating, group_thousands};

/// Text shown in place of the summary when no rating is available
pub const UNAVAILABLE_TEXT: &str = "Reviews unavailable";

/// Accessible label used when no rating is available
pub const UNAVAILABLE_LABEL: &str = "Google rating: Reviews unavailable";

const GOOGLE_ICON_SVG: &str = concat!(
    r#"<svg class="gbp-badge-google-icon" viewBox="0 0 24 24" aria-hidden="true" focusable="false">"#,
    r#"<path fill="currentColor" d="M21.6 12.227c0-.74-.066-1.45-.19-2.14H12v4.05h5.44a4.65 4.65 0 0 1-2.02 3.05v2.53h3.27c1.92-1.77 3-4.38 3-7.49z" />"#,
    r#"<path fill="currentColor" d="M12 22c2.7 0 4.96-.9 6.62-2.43l-3.27-2.53c-.91.61-2.07.97-3.35.97-2.58 0-4.77-1.74-5.55-4.07H2.97v2.56A9.99 9.99 0 0 0 12 22z" />"#,
    r#"<path fill="currentColor" d="M6.45 13.94a6.004 6.004 0 0 1 0-3.88V7.5H2.97a10 10 0 0 0 0 8.99l3.48-2.55z" />"#,
    r#"<path fill="currentColor" d="M12 6.38c1.47 0 2.79.5 3.83 1.47l2.86-2.86C16.96 2.92 14.7 2 12 2a9.99 9.99 0 0 0-9.03 5.5l3.48 2.56C7.23 8.12 9.42 6.38 12 6.38z" />"#,
    "</svg>",
);

/// Renders badges; the only state is the source of clip-region ids
#[derive(Clone)]
pub struct BadgeRenderer {
    clip_ids: Arc<dyn ClipIdGenerator>,
}

impl Default for BadgeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BadgeRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeRenderer").finish_non_exhaustive()
    }
}

impl BadgeRenderer {
    /// Creates a renderer drawing clip ids from the process-wide counter
    pub fn new() -> Self {
        Self::with_clip_ids(Arc::new(ProcessClipIds))
    }

    /// Creates a renderer with a specific clip id source
    pub fn with_clip_ids(clip_ids: Arc<dyn ClipIdGenerator>) -> Self {
        Self { clip_ids }
    }

    /// Renders the badge for `outcome`
    ///
    /// Failures of any kind produce the same "unavailable" badge with empty
    /// stars; the failure kind itself never appears in the markup.
    pub fn render(&self, outcome: &FetchOutcome, config: &BadgeConfig) -> String {
        let (rating, review_count) = match outcome.rating() {
            Some(result) => (result.rating, result.review_count),
            None => (0.0, 0),
        };

        let (aria_label, text_markup) = if outcome.is_success() {
            let formatted_rating = format_rating(rating);
            let formatted_total = group_thousands(review_count);
            let reviews_text = if review_count == 1 {
                format!("{} Google review", formatted_total)
            } else {
                format!("{} Google reviews", formatted_total)
            };
            let summary_text = format!("out of 5 from {}", reviews_text);

            (
                format!(
                    "Google rating: {} out of 5 from {} reviews",
                    formatted_rating, formatted_total
                ),
                format!(
                    r#"<span class="gbp-badge-text"><strong>{}</strong> {}</span>"#,
                    escape_html(&formatted_rating),
                    escape_html(&summary_text)
                ),
            )
        } else {
            (
                UNAVAILABLE_LABEL.to_string(),
                format!(
                    r#"<span class="gbp-badge-text">{}</span>"#,
                    escape_html(UNAVAILABLE_TEXT)
                ),
            )
        };

        let clip_base = self.clip_ids.next_id();
        let stars_markup =
            stars::stars_markup(rating, config.star_count, &config.star_color, &clip_base);

        let mut badge = format!(
            r#"<div class="gbp-badge" style="color:{};" role="img" aria-label="{}">"#,
            escape_html(&config.accent_color),
            escape_html(&aria_label)
        );
        badge.push_str(r#"<span class="gbp-badge-visual" aria-hidden="true">"#);
        badge.push_str(r#"<span class="gbp-badge-icon-wrap">"#);
        badge.push_str(GOOGLE_ICON_SVG);
        badge.push_str("</span>");
        badge.push_str(r#"<span class="gbp-badge-stars">"#);
        badge.push_str(&stars_markup);
        badge.push_str("</span>");
        badge.push_str(&text_markup);
        badge.push_str("</span>");
        badge.push_str("</div>");
        badge
    }
}

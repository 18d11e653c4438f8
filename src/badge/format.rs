//! Text helpers for badge markup: escaping and number formatting

/// Escapes a value for use in HTML text or a double- or single-quoted attribute
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Formats a count with comma thousands separators (`12345` -> `12,345`)
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Rounds half away from zero to one decimal and always prints that decimal
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", (rating * 10.0).round() / 10.0)
}

/// Formats a 0-1 fraction as a percentage with at most two decimals
pub fn format_percent(fraction: f64) -> String {
    let percent = (fraction * 10_000.0).round() / 100.0;
    // Avoid printing "-0"
    let percent = if percent == 0.0 { 0.0 } else { percent };
    format!("{}", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(238), "238");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(12345), "12,345");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(4.7), "4.7");
        assert_eq!(format_rating(4.0), "4.0");
        assert_eq!(format_rating(4.25), "4.3");
        assert_eq!(format_rating(4.94), "4.9");
        assert_eq!(format_rating(4.96), "5.0");
        assert_eq!(format_rating(0.0), "0.0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(1.0), "100");
        assert_eq!(format_percent(0.0), "0");
        assert_eq!(format_percent(0.5), "50");
        assert_eq!(format_percent(1.0 / 3.0), "33.33");
        assert_eq!(format_percent(0.499_999_999_9), "50");
    }
}

use crate::models::parse_frappe_datetime;

/// Format a metric value for display.
/// Whole numbers drop the decimal part; fractions keep up to two places.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.2}", value);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format a percentage as shown under a metric tile, e.g. `40%` or `12.5%`.
pub fn format_percentage(percentage: f64) -> String {
    format!("{}%", format_value(percentage))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a Frappe datetime string to a more readable format
pub fn format_datetime(date: &str) -> String {
    if let Some(dt) = parse_frappe_datetime(date) {
        dt.format("%b %d, %Y %H:%M").to_string()
    } else if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y %H:%M").to_string()
    } else {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(120.0), "120");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(33.333), "33.33");
        assert_eq!(format_value(-4.0), "-4");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(40.0), "40%");
        assert_eq!(format_percentage(2.25), "2.25%");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2024-04-02 09:15:00"), "Apr 02, 2024 09:15");
        assert_eq!(format_datetime("not a date"), "not a date");
    }
}

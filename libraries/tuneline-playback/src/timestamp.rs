//! Timestamp formatting for elapsed and total time labels

/// Label shown while the backend is loading
pub const LOADING_TIMESTAMP: &str = "00:00";

/// Label shown for an unknown time
pub const INVALID_TIMESTAMP: &str = "--:--";

/// Format seconds as `MM:SS`, or `H:MM:SS` past the hour
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return INVALID_TIMESTAMP.to_string();
    }

    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Text for a timestamp label, or `None` when timestamps are hidden
pub fn timestamp_label(seconds: f64, loading: bool, show: bool) -> Option<String> {
    if !show {
        return None;
    }
    if loading {
        return Some(LOADING_TIMESTAMP.to_string());
    }
    Some(format_time(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(9.99), "00:09");
        assert_eq!(format_time(75.0), "01:15");
        assert_eq!(format_time(3599.0), "59:59");
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(7384.0), "2:03:04");
    }

    #[test]
    fn invalid_times() {
        assert_eq!(format_time(f64::NAN), "--:--");
        assert_eq!(format_time(f64::INFINITY), "--:--");
        assert_eq!(format_time(-4.0), "00:00");
    }

    #[test]
    fn labels() {
        assert_eq!(timestamp_label(42.0, false, false), None);
        assert_eq!(timestamp_label(42.0, true, true).as_deref(), Some("00:00"));
        assert_eq!(timestamp_label(42.0, false, true).as_deref(), Some("00:42"));
        assert_eq!(timestamp_label(f64::NAN, false, true).as_deref(), Some("--:--"));
    }
}

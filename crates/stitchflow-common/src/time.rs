//! Wall-clock helpers. Presence timestamps are milliseconds since the Unix epoch.

use chrono::{DateTime, Utc};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_epoch_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Render an epoch-millisecond timestamp as RFC 3339 for logs.
pub fn format_epoch_ms(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_after_2024() {
        // 2024-01-01T00:00:00Z
        assert!(now_epoch_ms() > 1_704_067_200_000);
    }

    #[test]
    fn format_epoch_ms_rfc3339() {
        assert_eq!(format_epoch_ms(0), "1970-01-01T00:00:00+00:00");
        assert_eq!(
            format_epoch_ms(1_704_067_200_000),
            "2024-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn format_out_of_range_falls_back_to_number() {
        assert_eq!(format_epoch_ms(u64::MAX), u64::MAX.to_string());
    }
}

use chrono::{DateTime, TimeZone, Utc};

/// Epoch seconds (possibly fractional) as stored in `frauds.timestamp`.
/// Out-of-range or non-finite values yield `None`.
pub fn epoch_seconds_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_seconds_keep_millis() {
        let instant = epoch_seconds_to_utc(1_760_000_000.25).expect("instant");
        assert_eq!(instant.timestamp(), 1_760_000_000);
        assert_eq!(instant.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn nonsense_values_are_rejected() {
        assert!(epoch_seconds_to_utc(f64::NAN).is_none());
        assert!(epoch_seconds_to_utc(f64::INFINITY).is_none());
        assert!(epoch_seconds_to_utc(1e300).is_none());
    }
}

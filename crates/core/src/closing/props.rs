//! Property-based tests for the business-day clock.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use proptest::prelude::*;

use super::clock::BusinessDayClock;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every instant falls inside the window of its own business day.
    #[test]
    fn prop_instant_inside_its_window(
        cutoff in 0u32..24,
        minutes in 0i64..(366 * 24 * 60),
    ) {
        let clock = BusinessDayClock::new(cutoff, chrono_tz::America::Argentina::Buenos_Aires).unwrap();
        let base: DateTime<Utc> = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let at = base + Duration::minutes(minutes);

        let day = clock.business_day(at);
        let window = clock.window(day).unwrap();
        prop_assert!(window.contains(at), "{at} not in {window:?}");
    }

    /// Before the cutoff the business day is the previous local date.
    #[test]
    fn prop_before_cutoff_is_previous_day(
        cutoff in 1u32..24,
        minutes in 0i64..(366 * 24 * 60),
    ) {
        let tz = chrono_tz::America::Argentina::Buenos_Aires;
        let clock = BusinessDayClock::new(cutoff, tz).unwrap();
        let base: DateTime<Utc> = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let at = base + Duration::minutes(minutes);
        let local = at.with_timezone(&tz);

        let expected = if local.hour() < cutoff {
            local.date_naive().pred_opt().unwrap()
        } else {
            local.date_naive()
        };
        prop_assert_eq!(clock.business_day(at), expected);
    }
}

use chrono::{DateTime, Datelike, Duration, TimeZone};
use std::fmt;

/// Monthly accounting window requested from the traffic endpoint.
///
/// Traffic is only published for completed hours, so the month is taken from
/// the instant one hour before "now". The upper bound is always day 31, which
/// the provider accepts as "end of month" for every month length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    pub fn publication_lag() -> Duration {
        Duration::hours(1)
    }

    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let shifted = now.clone() - Self::publication_lag();
        Self {
            year: shifted.year(),
            month: shifted.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn from(&self) -> String {
        format!("{}-01", self)
    }

    pub fn to(&self) -> String {
        format!("{}-31", self)
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_mid_month_window() {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let period = BillingPeriod::containing(&now);
        assert_eq!(period.from(), "2026-10-01");
        assert_eq!(period.to(), "2026-10-31");
    }

    #[test]
    fn test_first_hour_of_month_uses_previous_month() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 30, 0).unwrap();
        let period = BillingPeriod::containing(&now);
        assert_eq!(period.from(), "2026-02-01");
        // Literal day 31 even for February.
        assert_eq!(period.to(), "2026-02-31");
    }

    #[test]
    fn test_new_year_rolls_back_to_december() {
        let now = Utc.with_ymd_and_hms(2027, 1, 1, 0, 59, 59).unwrap();
        let period = BillingPeriod::containing(&now);
        assert_eq!(period.year(), 2026);
        assert_eq!(period.month(), 12);
    }

    #[test]
    fn test_exactly_one_hour_in_stays_in_month() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 1, 0, 0).unwrap();
        assert_eq!(BillingPeriod::containing(&now).to_string(), "2026-05");
    }

    #[test]
    fn test_window_follows_local_offset() {
        // 00:30 local after the shift, but still May 31st in UTC.
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 6, 1, 1, 30, 0).unwrap();
        assert_eq!(BillingPeriod::containing(&now).to_string(), "2026-06");
    }
}

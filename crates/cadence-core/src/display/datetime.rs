//! Date, time and duration display utilities.

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};

/// A wrapper around `Timestamp` that formats it in the system timezone.
///
/// # Format
///
/// `YYYY-MM-DD HH:MM TZ`, 24-hour clock, zero-padded.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}

/// Seconds rendered as `m:ss`.
///
/// ```rust
/// use cadence_core::display::Countdown;
///
/// assert_eq!(Countdown(125).to_string(), "2:05");
/// assert_eq!(Countdown(9).to_string(), "0:09");
/// ```
pub struct Countdown(pub u32);

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Recency of a step, from the fractional days since it was last performed.
pub struct DaysAgo(pub Option<f64>);

impl fmt::Display for DaysAgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "never performed"),
            Some(days) if days <= 0.0 => write!(f, "performed today"),
            Some(days) if days < 1.5 => write!(f, "performed 1 day ago"),
            Some(days) => write!(f, "performed {} days ago", days.round() as u64),
        }
    }
}

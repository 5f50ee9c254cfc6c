//! Calendar date utilities without timezone dependencies.
//!
//! Post dates are plain UTC days stored as ISO `YYYY-MM-DD` strings,
//! so a full datetime stack would be dead weight here.

use anyhow::{Result, bail};
use std::time::{SystemTime, UNIX_EPOCH};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar date in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Parse from "YYYY-MM-DD" format
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        if bytes[7] != b'-' {
            return None;
        }
        let day = parse_u8(&bytes[8..10])?;

        let date = Self::new(year, month, day);
        date.validate().ok()?;
        Some(date)
    }

    /// The current date in UTC.
    pub fn today() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_days_since_epoch((secs / 86_400) as i64)
    }

    // Howard Hinnant's civil-from-days algorithm
    fn from_days_since_epoch(days: i64) -> Self {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self::new(year as u16, month as u8, day as u8)
    }

    pub fn validate(&self) -> Result<()> {
        let Self { year, month, day } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }
        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }

        Ok(())
    }

    #[inline]
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Format as ISO 8601, the storage representation.
    ///
    /// Returns: `YYYY-MM-DD`
    pub fn to_iso(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// Format for display on post pages.
    ///
    /// Returns: `Mon. DD, YYYY`, e.g. `Jun. 15, 2024`
    pub fn display(self) -> String {
        format!(
            "{}. {:02}, {:04}",
            MONTHS[(self.month - 1) as usize],
            self.day,
            self.year
        )
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Date::parse("2024-06-15"), Some(Date::new(2024, 6, 15)));
        assert_eq!(Date::parse("2000-02-29"), Some(Date::new(2000, 2, 29)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Date::parse("2024-6-15"), None);
        assert_eq!(Date::parse("2024/06/15"), None);
        assert_eq!(Date::parse("2024-13-01"), None);
        assert_eq!(Date::parse("2023-02-29"), None);
        assert_eq!(Date::parse("2024-06-15T10:00:00Z"), None);
        assert_eq!(Date::parse(""), None);
    }

    #[test]
    fn test_validate_day_bounds() {
        assert!(Date::new(2024, 4, 31).validate().is_err());
        assert!(Date::new(2024, 1, 0).validate().is_err());
        assert!(Date::new(2024, 2, 29).validate().is_ok());
        assert!(Date::new(1900, 2, 29).validate().is_err()); // divisible by 100 but not 400
    }

    #[test]
    fn test_from_days_since_epoch() {
        assert_eq!(Date::from_days_since_epoch(0), Date::new(1970, 1, 1));
        assert_eq!(Date::from_days_since_epoch(19_889), Date::new(2024, 6, 15));
        // leap day
        assert_eq!(Date::from_days_since_epoch(19_782), Date::new(2024, 2, 29));
    }

    #[test]
    fn test_to_iso_zero_pads() {
        assert_eq!(Date::new(2024, 6, 5).to_iso(), "2024-06-05");
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Date::new(2024, 6, 15).display(), "Jun. 15, 2024");
        assert_eq!(Date::new(2025, 12, 1).display(), "Dec. 01, 2025");
    }

    #[test]
    fn test_today_is_plausible() {
        let today = Date::today();
        assert!(today.validate().is_ok());
        assert!(today.year >= 2024);
    }
}

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate};

/// End of the timeline; no placement may run past it.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Canonical storage key for a calendar day. Built from the local date
/// components, never from a UTC serialization, so the key cannot drift
/// a day across timezone offsets.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Compare calendar components only; time of day is ignored.
pub fn is_same_day(a: &DateTime<FixedOffset>, b: &DateTime<FixedOffset>) -> bool {
    a.date_naive() == b.date_naive()
}

pub fn is_today(date: NaiveDate) -> bool {
    date == Local::now().date_naive()
}

/// "00:00" through "23:00", one label per timeline row.
pub fn hour_labels() -> Vec<String> {
    (0..24).map(|h| format!("{h:02}:00")).collect()
}

/// Weekday index with Sunday = 0, matching the recurring-day encoding.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Parse "HH:MM" into a fractional hour-of-day ("10:30" -> 10.5).
pub fn parse_hhmm(hhmm: &str) -> Option<f64> {
    let (h, m) = hhmm.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h >= 24 || m >= 60 {
        return None;
    }
    Some(h as f64 + m as f64 / 60.0)
}

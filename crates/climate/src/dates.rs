//! Calendar date helpers shared by the db layer and the query service.
//!
//! The dataset stores dates as `YYYY-MM-DD` text, which sorts the same way as
//! the calendar, so every range filter is issued against that string form.

use time::{format_description::FormatItem, macros::format_description, Date, Month};

/// `YYYY-MM-DD`, the only date format accepted on the wire and in storage.
pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Serde adapter writing dates as `YYYY-MM-DD`.
pub mod serde_iso_date {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_date(&raw).map_err(D::Error::custom)
    }
}

pub fn parse_iso_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, ISO_DATE)
}

pub fn format_iso_date(date: Date) -> String {
    // ISO_DATE only has year/month/day components, all of which a Date carries
    date.format(ISO_DATE).unwrap_or_else(|_| {
        format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        )
    })
}

/// Start of the trailing-year window ending at `latest`.
///
/// Month and day are kept and the year drops by one. A Feb 29 anchor has no
/// counterpart in the previous year and resolves to Feb 28.
pub fn trailing_year_anchor(latest: Date) -> Date {
    let year = latest.year() - 1;
    Date::from_calendar_date(year, latest.month(), latest.day())
        .or_else(|_| Date::from_calendar_date(year, Month::February, 28))
        .unwrap_or(latest)
}

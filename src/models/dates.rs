//! Date handling for display and form input.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    // Date-times carry the date in their first ten characters.
    let head = raw.get(..10).unwrap_or(raw);
    Date::parse(head, format_description!("[year]-[month]-[day]")).ok()
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` and `YYYY-MM-DD HH:MM[:SS]`.
/// The wall-clock time is kept as written, offsets are not converted.
pub fn parse_datetime(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(PrimitiveDateTime::new(parsed.date(), parsed.time()));
    }

    let normalized = raw.replacen(' ', "T", 1);
    // Drop fractional seconds and anything after the seconds field.
    let head = normalized.get(..19).unwrap_or(&normalized);
    let wire = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(parsed) = PrimitiveDateTime::parse(head, wire) {
        return Some(parsed);
    }
    let minutes = format!("{}:00", normalized.get(..16).unwrap_or(&normalized));
    PrimitiveDateTime::parse(&minutes, wire).ok()
}

/// `2025-03-01` -> `01/03/2025`; anything else is returned verbatim.
pub fn display_date(raw: &str) -> String {
    parse_date(raw)
        .and_then(|date| date.format(format_description!("[day]/[month]/[year]")).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// `2025-03-01T09:30:00Z` -> `01/03/2025 09:30`; anything else is returned verbatim.
pub fn display_datetime(raw: &str) -> String {
    parse_datetime(raw)
        .and_then(|dt| {
            dt.format(format_description!("[day]/[month]/[year] [hour]:[minute]"))
                .ok()
        })
        .unwrap_or_else(|| raw.to_string())
}

/// Backend value converted to what the form field shows.
pub fn datetime_for_input(raw: &str) -> String {
    parse_datetime(raw)
        .and_then(|dt| {
            dt.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
                .ok()
        })
        .unwrap_or_else(|| raw.to_string())
}

pub fn date_for_input(raw: &str) -> String {
    parse_date(raw)
        .and_then(|date| date.format(format_description!("[year]-[month]-[day]")).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Form input converted to the value sent to the backend.
pub fn datetime_for_wire(input: &str) -> Option<String> {
    parse_datetime(input).and_then(|dt| {
        dt.format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
            .ok()
    })
}

/// Local date, or UTC when the local offset cannot be determined.
pub fn today() -> String {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_dates_day_first() {
        assert_eq!(display_date("2025-03-01"), "01/03/2025");
        assert_eq!(display_date("2025-03-01T10:00:00Z"), "01/03/2025");
        assert_eq!(display_date("someday"), "someday");
    }

    #[test]
    fn displays_datetimes_without_seconds() {
        assert_eq!(display_datetime("2025-03-01T09:30:00Z"), "01/03/2025 09:30");
        assert_eq!(display_datetime("2025-03-01T09:30:45.123456-05:00"), "01/03/2025 09:30");
        assert_eq!(display_datetime("2025-03-01T09:30"), "01/03/2025 09:30");
        assert_eq!(display_datetime("2025-03-01 09:30:12"), "01/03/2025 09:30");
        assert_eq!(display_datetime(""), "");
        assert_eq!(display_datetime("tomorrow"), "tomorrow");
    }

    #[test]
    fn converts_between_input_and_wire() {
        assert_eq!(datetime_for_input("2025-03-01T09:30:00Z"), "2025-03-01 09:30");
        assert_eq!(
            datetime_for_wire("2025-03-01 09:30").as_deref(),
            Some("2025-03-01T09:30:00")
        );
        assert_eq!(datetime_for_wire("01/03/2025"), None);
        assert_eq!(date_for_input("2025-03-01"), "2025-03-01");
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_datetime("2025-03-01 25:00").is_none());
        assert!(parse_date(&today()).is_some());
    }
}

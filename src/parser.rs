//! Holds date and time parsers.

use jiff::Zoned;
use tracing::debug;

use crate::{
    AFGHAN_MONTHS, IRANIAN_MONTHS, JALALI_MONTHS,
    date::JalaliDate,
    error::{Error, Result},
};

/// Parse a free-text Gregorian date with `parse_datetime`.
///
/// Relative inputs ("yesterday", "+3 days") are resolved against `now` which is also where the
/// timezone of the result comes from. If ommited, a new `now` will be called.
pub fn parse_datetime(s: &str, now: Option<Zoned>) -> Result<Zoned> {
    let now = now.unwrap_or_else(Zoned::now);
    let tz = now.time_zone().clone();
    let parsed = parse_datetime::parse_datetime_at_date(now.clone(), s.trim())
        .or_else(|_| parse_datetime::parse_datetime(s.trim()))?;
    debug!(input = s, %parsed, "parsed gregorian date");
    Ok(parsed.with_time_zone(tz))
}

/// Parse a Jalali date as `Y/M/D` or `Y-M-D`, optionally followed by a time `H:M[:S]`.
///
/// The time is separated by a space or a `T`. The month may be given as a number or a name (see
/// [`parse_month`]). The result carries no timezone.
pub fn parse_jalali(s: &str) -> Result<JalaliDate> {
    let input = s.trim();
    let syntax = |reason| Error::Parse {
        input: s.to_owned(),
        reason,
    };

    // a `T` only separates the time when a digit follows, "Tir" is a month
    let split = input.split_once(' ').or_else(|| {
        input
            .split_once('T')
            .filter(|(_, time)| time.starts_with(|c: char| c.is_ascii_digit()))
    });
    let (date, time) = match split {
        Some((date, time)) => (date, Some(time.trim())),
        None => (input, None),
    };

    let mut fields = date.split(['/', '-']);
    let (Some(year), Some(month), Some(day), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(syntax("expected year, month and day"));
    };

    let year = year.parse().map_err(|_| syntax("invalid year"))?;
    let month = parse_month(month).map_err(syntax)?;
    let day = day.parse().map_err(|_| syntax("invalid day"))?;

    let (hour, minute, second) = match time {
        None => (0, 0, 0),
        Some(time) => parse_time(time).ok_or_else(|| syntax("expected a time as HH:MM[:SS]"))?,
    };

    let parsed = JalaliDate::from_parts(year, month, day, hour, minute, second, None)?;
    debug!(input = s, %parsed, "parsed jalali date");
    Ok(parsed)
}

/// Parse "HH:MM" or "HH:MM:SS" without checking the ranges.
fn parse_time(s: &str) -> Option<(u8, u8, u8)> {
    let mut fields = s.split(':');
    let hour = fields.next()?.parse().ok()?;
    let minute = fields.next()?.parse().ok()?;
    let second = match fields.next() {
        Some(second) => second.parse().ok()?,
        None => 0,
    };
    fields.next().is_none().then_some((hour, minute, second))
}

/// Index of the only name starting with `key`, ignoring ASCII case.
///
/// Ambiguous ("m" for Mordad and Mehr) and empty keys match nothing.
fn unique_prefix(names: &[&str], key: &str) -> Option<usize> {
    if key.is_empty() {
        return None;
    }

    let mut found = names.iter().enumerate().filter(|(_, name)| {
        name.get(..key.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(key))
    });
    match (found.next(), found.next()) {
        (Some((i, _)), None) => Some(i),
        _ => None,
    }
}

/// A month number in 1..=12.
fn parse_month_numeric(s: &str) -> Option<u8> {
    s.parse().ok().filter(|month| (1..=12).contains(month))
}

/// Parse a month as a number (1..=12), a unique prefix of its English name ("mehr", "Far") or its
/// full Persian name (Iranian or Afghan).
pub fn parse_month(s: &str) -> Result<u8, &'static str> {
    // month is 1 based but index is 0 based
    let position = |names: &[&str; 12]| names.iter().position(|name| *name == s);

    parse_month_numeric(s)
        .or_else(|| unique_prefix(&JALALI_MONTHS, s).map(|i| i as u8 + 1))
        .or_else(|| position(&IRANIAN_MONTHS).map(|i| i as u8 + 1))
        .or_else(|| position(&AFGHAN_MONTHS).map(|i| i as u8 + 1))
        .ok_or("invalid month (\"mehr\" or number where Farvardin is 1, up to 12)")
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, tz::TimeZone};

    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("1"), Ok(1));
        assert_eq!(parse_month("07"), Ok(7));
        assert_eq!(parse_month("12"), Ok(12));
        assert!(parse_month("0").is_err());
        assert!(parse_month("13").is_err());

        assert_eq!(parse_month("farvardin"), Ok(1));
        assert_eq!(parse_month("Mehr"), Ok(7));
        assert_eq!(parse_month("me"), Ok(7));
        assert_eq!(parse_month("MO"), Ok(5));
        assert_eq!(parse_month("esf"), Ok(12));
        assert!(parse_month("m").is_err(), "ambiguous between Mordad and Mehr");
        assert!(parse_month("a").is_err(), "ambiguous between Aban and Azar");
        assert!(parse_month("mehrr").is_err());

        assert_eq!(parse_month("اسفند"), Ok(12));
        assert_eq!(parse_month("میزان"), Ok(7));
        assert!(parse_month("").is_err());
    }

    #[test]
    fn test_unique_prefix() {
        assert_eq!(unique_prefix(&JALALI_MONTHS, "KH"), Some(2));
        assert_eq!(unique_prefix(&JALALI_MONTHS, "Dey"), Some(9));
        assert_eq!(unique_prefix(&JALALI_MONTHS, "d"), Some(9));
        assert_eq!(unique_prefix(&JALALI_MONTHS, "s"), Some(5));
        assert_eq!(unique_prefix(&JALALI_MONTHS, "b"), Some(10));
        assert_eq!(unique_prefix(&JALALI_MONTHS, "o"), Some(1));
        assert_eq!(unique_prefix(&JALALI_MONTHS, "ma"), None);
    }

    #[test]
    fn test_parse_jalali() {
        assert_eq!(
            parse_jalali("1404/07/12").unwrap(),
            JalaliDate::new(1404, 7, 12).unwrap()
        );
        assert_eq!(
            parse_jalali(" 1397-1-25 ").unwrap(),
            JalaliDate::new(1397, 1, 25).unwrap()
        );
        assert_eq!(
            parse_jalali("1404/mehr/12").unwrap(),
            JalaliDate::new(1404, 7, 12).unwrap()
        );
        assert_eq!(
            parse_jalali("1404-Tir-01").unwrap(),
            JalaliDate::new(1404, 4, 1).unwrap()
        );
        assert_eq!(
            parse_jalali("1401/06/31 23:05").unwrap(),
            JalaliDate::from_parts(1401, 6, 31, 23, 5, 0, None).unwrap()
        );
        assert_eq!(
            parse_jalali("1401-06-31T23:05:09").unwrap(),
            JalaliDate::from_parts(1401, 6, 31, 23, 5, 9, None).unwrap()
        );
    }

    #[test]
    fn test_parse_jalali_errors() {
        for input in [
            "",
            "1404",
            "1404/07",
            "1404/07/12/1",
            "year/07/12",
            "1404/07/day",
            "1404/07/12 25",
            "1404/07/12 10:00:00:00",
        ] {
            assert!(
                matches!(parse_jalali(input), Err(Error::Parse { .. })),
                "{input:?}"
            );
        }

        assert!(matches!(
            parse_jalali("1396/12/30"),
            Err(Error::InvalidRange { field: "day", .. })
        ));
        assert!(matches!(
            parse_jalali("1404/07/12 24:60"),
            Err(Error::InvalidRange {
                field: "minute",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_datetime() {
        let now = date(2025, 10, 4)
            .at(12, 0, 0, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap();

        let parsed = parse_datetime("2025-05-21", Some(now.clone())).unwrap();
        assert_eq!(parsed.date(), date(2025, 5, 21));
        assert_eq!(parsed.time_zone(), &TimeZone::UTC);

        let parsed = parse_datetime("yesterday", Some(now.clone())).unwrap();
        assert_eq!(parsed.date(), date(2025, 10, 3));

        assert!(matches!(
            parse_datetime("%%%", Some(now)),
            Err(Error::FreeText(_))
        ));
    }
}

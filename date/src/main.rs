//! Holds a `date`-like program for the Jalali calendar.
//!
//! Prints the current (or given) date and time in Jalali, optionally shifted by whole years,
//! months and days with the calendar-aware arithmetic of [`jalali::JalaliDate`].
//!
//! Differences with `date`:
//! - the output is fixed to `YYYY-MM-DD HH:MM:SS` or a long form with names (`--names`)
//! - no support for `set`, `resolution` or custom formats
//! - parsing free-text Gregorian dates is done with `parse_datetime` so its limitations apply

use std::{cmp::Ordering, io::BufRead};

use jalali::{JalaliDate, clap_helper::Parse, parser::parse_datetime};
use jiff::{Timestamp, Zoned, tz::TimeZone};
use tracing::debug;

mod arg_parser;
mod logging;

use arg_parser::{Args, Reader, Shift, When};

/// How a resulting date is printed.
#[derive(Debug, Clone, Copy, Default)]
struct Output {
    gregorian: bool,
    names: Option<jalali::MonthNames>,
}

impl Output {
    fn render(&self, date: &JalaliDate) -> jalali::Result<String> {
        if self.gregorian {
            return Ok(date.to_datetime()?.strftime("%Y-%m-%d %H:%M:%S").to_string());
        }
        Ok(match self.names {
            Some(names) => names.long_form(date),
            None => date.to_string(),
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse();
    logging::init(config.debug);

    let output = Output {
        gregorian: config.gregorian,
        names: config.names,
    };
    debug!(
        ?output,
        shift = ?config.shift,
        timezone = ?config.timezone.iana_name(),
        "configured"
    );

    // The rest of the program is the actual logic.
    let date = match config.when {
        When::Reader(reader) => {
            if file_apply(reader, config.timezone, config.shift, output)? {
                return Ok(());
            } else {
                return Err("failed to parse all lines".into());
            }
        }
        When::Jalali(v) => v,
        When::Given(v) => JalaliDate::from_zoned(&v)?,
        When::Now => JalaliDate::now_in(config.timezone)?,
        When::Reference(path_buf) => {
            let time = std::fs::File::open(path_buf)?.metadata()?.modified()?;
            JalaliDate::from_zoned(&Timestamp::try_from(time)?.to_zoned(config.timezone))?
        }
    };
    debug!(basis = %date, "resolved basis");

    println!("{}", output.render(&apply_shift(date, config.shift)?)?);

    Ok(())
}

/// Shift by years, then months, then days. Negative counts subtract and zero is skipped.
fn apply_shift(date: JalaliDate, shift: Shift) -> jalali::Result<JalaliDate> {
    if shift.is_zero() {
        return Ok(date);
    }

    let date = match shift.years.cmp(&0) {
        Ordering::Greater => date.add_years(shift.years)?,
        Ordering::Less => date.sub_years(shift.years.saturating_neg())?,
        Ordering::Equal => date,
    };
    let date = match shift.months.cmp(&0) {
        Ordering::Greater => date.add_months(shift.months)?,
        Ordering::Less => date.sub_months(shift.months.saturating_neg())?,
        Ordering::Equal => date,
    };
    let date = match shift.days.cmp(&0) {
        Ordering::Greater => date.add_days(shift.days)?,
        Ordering::Less => date.sub_days(shift.days.saturating_neg())?,
        Ordering::Equal => date,
    };

    debug!(shifted = %date, "applied shift");
    Ok(date)
}

/// Parse each line in a stream as with --date and display each resulting date.
///
/// Errors if the file or stream fails to open or yield lines. Prints an error for each line that
/// fails to parse, convert or shift.
///
/// Returns false if any line failed.
fn file_apply(
    reader: Reader,
    timezone: TimeZone,
    shift: Shift,
    output: Output,
) -> std::io::Result<bool> {
    let read: Box<dyn std::io::Read> = match reader {
        Reader::Stdin => Box::new(std::io::stdin()),
        Reader::File(path) => Box::new(std::fs::File::open(path)?),
    };
    let buf_reader = std::io::BufReader::new(read);

    let mut ok = true;
    let now = Zoned::now().with_time_zone(timezone);
    for line in buf_reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let rendered = parse_datetime(&line, Some(now.clone()))
            .and_then(|zoned| JalaliDate::from_zoned(&zoned))
            .and_then(|date| apply_shift(date, shift))
            .and_then(|date| output.render(&date));
        match rendered {
            Ok(v) => println!("{v}"),
            Err(e) => {
                eprintln!("invalid date {line:?}: {e}");
                ok = false;
            }
        };
    }

    Ok(ok)
}

#[cfg(test)]
mod tests {
    use jalali::MonthNames;

    use super::*;

    fn jalali(year: i32, month: u8, day: u8) -> JalaliDate {
        JalaliDate::new(year, month, day).unwrap()
    }

    #[test]
    fn test_render() {
        let date = jalali(1404, 7, 12).at(8, 5, 0).unwrap();
        assert_eq!(
            Output::default().render(&date).unwrap(),
            "1404-07-12 08:05:00"
        );
        let gregorian = Output {
            gregorian: true,
            ..Default::default()
        };
        assert_eq!(gregorian.render(&date).unwrap(), "2025-10-04 08:05:00");
        let names = Output {
            names: Some(MonthNames::English),
            ..Default::default()
        };
        assert_eq!(
            names.render(&date).unwrap(),
            "Saturday 12 Mehr 1404 08:05:00"
        );
    }

    #[test]
    fn test_apply_shift() {
        let date = jalali(1403, 12, 30);
        assert_eq!(apply_shift(date.clone(), Shift::default()).unwrap(), date);
        assert_eq!(
            apply_shift(
                date.clone(),
                Shift {
                    years: 1,
                    ..Default::default()
                }
            )
            .unwrap(),
            jalali(1404, 12, 29)
        );
        assert_eq!(
            apply_shift(
                jalali(1404, 7, 12),
                Shift {
                    years: -1,
                    months: 1,
                    days: -12,
                }
            )
            .unwrap(),
            jalali(1403, 7, 30)
        );
        assert_eq!(
            apply_shift(
                jalali(1404, 7, 12),
                Shift {
                    days: 20,
                    ..Default::default()
                }
            )
            .unwrap(),
            jalali(1404, 8, 2)
        );
    }

    #[test]
    fn test_apply_shift_out_of_range() {
        assert!(
            apply_shift(
                jalali(1404, 1, 1),
                Shift {
                    years: i32::MIN,
                    ..Default::default()
                }
            )
            .is_err()
        );
    }

    #[test]
    fn test_file_apply() {
        let path = std::env::temp_dir().join(format!("jalali-date-{}.txt", std::process::id()));
        std::fs::write(&path, "2025-10-04\n\n2025-03-21\n").unwrap();
        let ok = file_apply(
            Reader::File(path.clone()),
            TimeZone::UTC,
            Shift::default(),
            Output::default(),
        )
        .unwrap();
        assert!(ok);

        std::fs::write(&path, "2025-10-04\n%%%\n").unwrap();
        let ok = file_apply(
            Reader::File(path.clone()),
            TimeZone::UTC,
            Shift::default(),
            Output::default(),
        )
        .unwrap();
        assert!(!ok);

        std::fs::remove_file(&path).unwrap();
        assert!(
            file_apply(
                Reader::File(path),
                TimeZone::UTC,
                Shift::default(),
                Output::default()
            )
            .is_err()
        );
    }
}

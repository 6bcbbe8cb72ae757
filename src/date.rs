//! Holds the Jalali date value type and its calendar-aware arithmetic.
//!
//! Month and year arithmetic stays inside Jalali and clamps the day of month to the length of the
//! target month. Day and sub-day arithmetic is delegated to [`jiff`] since the length of a day
//! does not depend on the calendar.

use std::{cmp::Ordering, fmt};

use jiff::{Span, Timestamp, Zoned, civil, tz::TimeZone};
use tracing::trace;

use crate::{
    engine,
    error::{Error, Result},
};

/// Length of a month given if the year is leap; months after 12 are treated as 12.
const fn month_length(month: u8, leap: bool) -> u8 {
    match month {
        ..=6 => 31,
        7..=11 => 30,
        _ if leap => 30,
        _ => 29,
    }
}

/// Limit the day to the length of the month, the only clamping month and year arithmetic does.
const fn clamp_day(day: u8, month: u8, leap: bool) -> u8 {
    let max = month_length(month, leap);
    if day > max { max } else { day }
}

/// Fail with [`Error::InvalidRange`] unless `min <= value <= max`.
fn check(
    field: &'static str,
    value: impl Into<i64>,
    min: impl Into<i64>,
    max: impl Into<i64>,
) -> Result<()> {
    let (value, min, max) = (value.into(), min.into(), max.into());
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_range(field, value, min, max))
    }
}

/// Fail with [`Error::InvalidArgument`] unless the count is at least 1.
fn expect_positive(operation: &'static str, count: i32) -> Result<()> {
    if count >= 1 {
        Ok(())
    } else {
        Err(Error::InvalidArgument {
            operation,
            value: count.into(),
        })
    }
}

/// A valid Jalali date and time of day, optionally attached to a timezone.
///
/// This is an immutable value: every operation returns a new instance. The timezone is not
/// interpreted here, it is handed to [`jiff`] whenever the date goes through the Gregorian side.
#[derive(Debug, Clone, PartialEq)]
pub struct JalaliDate {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    time_zone: Option<TimeZone>,
    /// Cached from the engine at construction.
    leap: bool,
    /// Saturday based, cached from the Gregorian weekday at construction.
    weekday: u8,
}

impl JalaliDate {
    /// The first year accepted by the constructors.
    pub const MIN_YEAR: i32 = 1000;

    /// The last year accepted by the constructors.
    pub const MAX_YEAR: i32 = 3000;

    /// The largest hour accepted, 24 being the end of the day.
    pub const MAX_HOUR: u8 = 24;

    /// Create a date at midnight without a timezone.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        Self::from_parts(year, month, day, 0, 0, 0, None)
    }

    /// Create a date from all of its fields.
    ///
    /// Nothing is normalized, any field out of its range fails with [`Error::InvalidRange`]. The
    /// day must fit in the month of that year (day 30 of month 12 only in leap years).
    pub fn from_parts(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        time_zone: Option<TimeZone>,
    ) -> Result<Self> {
        check("year", year, Self::MIN_YEAR, Self::MAX_YEAR)?;
        check("month", month, 1, 12)?;
        let leap = engine::is_leap_jalali_year(year)?;
        check("day", day, 1, month_length(month, leap))?;
        check("hour", hour, 0, Self::MAX_HOUR)?;
        check("minute", minute, 0, 59)?;
        check("second", second, 0, 59)?;

        let (gy, gm, gd) = engine::to_gregorian(year, month.into(), day.into())?;
        let sunday_based = civil::Date::new(gy as i16, gm as i8, gd as i8)?
            .weekday()
            .to_sunday_zero_offset();

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            time_zone,
            leap,
            weekday: (sunday_based as u8 + 1) % 7,
        })
    }

    /// The same date at another time of day.
    pub fn at(&self, hour: u8, minute: u8, second: u8) -> Result<Self> {
        Self::from_parts(
            self.year,
            self.month,
            self.day,
            hour,
            minute,
            second,
            self.time_zone.clone(),
        )
    }

    /// The same wall clock date and time attached to the given timezone.
    pub fn with_time_zone(&self, time_zone: TimeZone) -> Self {
        Self {
            time_zone: Some(time_zone),
            ..self.clone()
        }
    }

    /// Another date keeping the time of day and timezone of this one.
    fn with_ymd(&self, year: i32, month: u8, day: u8) -> Result<Self> {
        Self::from_parts(
            year,
            month,
            day,
            self.hour,
            self.minute,
            self.second,
            self.time_zone.clone(),
        )
    }

    fn from_gregorian(datetime: civil::DateTime, time_zone: Option<TimeZone>) -> Result<Self> {
        let (year, month, day) = engine::to_jalali(
            datetime.year().into(),
            datetime.month().into(),
            datetime.day().into(),
        )?;
        // the engine only gives back months 1..=12 and days 1..=31
        Self::from_parts(
            year,
            month as u8,
            day as u8,
            datetime.hour() as u8,
            datetime.minute() as u8,
            datetime.second() as u8,
            time_zone,
        )
    }

    /// Convert a Gregorian date and time (sub-second precision is dropped).
    pub fn from_datetime(datetime: civil::DateTime) -> Result<Self> {
        Self::from_gregorian(datetime, None)
    }

    /// Convert a Gregorian date at midnight.
    pub fn from_date(date: civil::Date) -> Result<Self> {
        Self::from_datetime(date.to_datetime(civil::Time::midnight()))
    }

    /// Convert a zoned Gregorian date and time, keeping its timezone.
    pub fn from_zoned(zoned: &Zoned) -> Result<Self> {
        Self::from_gregorian(zoned.datetime(), Some(zoned.time_zone().clone()))
    }

    /// The current date and time in the system timezone.
    pub fn now() -> Result<Self> {
        Self::from_zoned(&Zoned::now())
    }

    /// The current date and time in the given timezone.
    pub fn now_in(time_zone: TimeZone) -> Result<Self> {
        Self::from_zoned(&Zoned::now().with_time_zone(time_zone))
    }

    /// The Gregorian date of this day.
    pub fn to_date(&self) -> Result<civil::Date> {
        let (gy, gm, gd) = engine::to_gregorian(self.year, self.month.into(), self.day.into())?;
        // years 1000..=3000 are well within `i16` after conversion
        Ok(civil::Date::new(gy as i16, gm as i8, gd as i8)?)
    }

    /// The Gregorian date and time, hour 24 being the midnight of the next day.
    pub fn to_datetime(&self) -> Result<civil::DateTime> {
        let datetime = self.to_date()?.to_datetime(civil::Time::new(
            (self.hour % 24) as i8,
            self.minute as i8,
            self.second as i8,
            0,
        )?);

        if self.hour == Self::MAX_HOUR {
            Ok(datetime.checked_add(Span::new().days(1))?)
        } else {
            Ok(datetime)
        }
    }

    /// The Gregorian date and time in this timezone, or the system timezone if none is attached.
    pub fn to_zoned(&self) -> Result<Zoned> {
        let time_zone = self.time_zone.clone().unwrap_or_else(TimeZone::system);
        Ok(self.to_datetime()?.to_zoned(time_zone)?)
    }

    /// Seconds since the Unix epoch (see [`Self::to_zoned`] for the timezone used).
    pub fn timestamp(&self) -> Result<i64> {
        Ok(self.to_zoned()?.timestamp().as_second())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn time_zone(&self) -> Option<&TimeZone> {
        self.time_zone.as_ref()
    }

    /// All the fields as `(year, month, day, hour, minute, second)`.
    pub fn fields(&self) -> (i32, u8, u8, u8, u8, u8) {
        (
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }

    /// Is this year 366 days long.
    pub fn is_leap_year(&self) -> bool {
        self.leap
    }

    /// Number of days in this month.
    pub fn month_length(&self) -> u8 {
        month_length(self.month, self.leap)
    }

    /// Number of days in the given month (1..=12) of this year.
    pub fn days_of(&self, month: u8) -> Result<u8> {
        check("month", month, 1, 12)?;
        Ok(month_length(month, self.leap))
    }

    /// Day of the year (1..=366).
    pub fn day_of_year(&self) -> u16 {
        (1..self.month)
            .map(|month| u16::from(month_length(month, self.leap)))
            .sum::<u16>()
            + u16::from(self.day)
    }

    /// Day of the week where Saturday is 0 and Friday is 6.
    pub fn day_of_week(&self) -> u8 {
        self.weekday
    }

    /// Week of the month (1..=6) for Saturday based weeks.
    pub fn week_of_month(&self) -> u8 {
        (self.day + 5 - self.weekday) / 7 + 1
    }

    /// Is this the given day of week (Saturday is 0).
    pub fn is_day_of_week(&self, day_of_week: u8) -> Result<bool> {
        check("day of week", day_of_week, 0, 6)?;
        Ok(self.weekday == day_of_week)
    }

    /// Is this a Saturday.
    pub fn is_start_of_week(&self) -> bool {
        self.weekday == 0
    }

    /// Is this a Friday.
    pub fn is_end_of_week(&self) -> bool {
        self.weekday == 6
    }

    /// The Saturday of this week at the same time of day.
    pub fn first_day_of_week(&self) -> Result<Self> {
        self.sub_days(self.weekday.into())
    }

    pub fn first_day_of_month(&self) -> Result<Self> {
        self.with_ymd(self.year, self.month, 1)
    }

    pub fn first_day_of_year(&self) -> Result<Self> {
        self.with_ymd(self.year, 1, 1)
    }

    /// Apply a span on the Gregorian side and convert back.
    ///
    /// With a timezone the span is applied to the zoned value so days keep the wall clock and
    /// smaller units follow the real elapsed time.
    fn shift(&self, span: Span) -> Result<Self> {
        match &self.time_zone {
            Some(time_zone) => {
                let zoned = self
                    .to_datetime()?
                    .to_zoned(time_zone.clone())?
                    .checked_add(span)?;
                Self::from_zoned(&zoned)
            }
            None => Self::from_datetime(self.to_datetime()?.checked_add(span)?),
        }
    }

    pub fn add_days(&self, days: i64) -> Result<Self> {
        self.shift(Span::new().try_days(days)?)
    }

    pub fn sub_days(&self, days: i64) -> Result<Self> {
        self.shift(Span::new().try_days(days)?.negate())
    }

    pub fn add_hours(&self, hours: i64) -> Result<Self> {
        self.shift(Span::new().try_hours(hours)?)
    }

    pub fn sub_hours(&self, hours: i64) -> Result<Self> {
        self.shift(Span::new().try_hours(hours)?.negate())
    }

    pub fn add_minutes(&self, minutes: i64) -> Result<Self> {
        self.shift(Span::new().try_minutes(minutes)?)
    }

    pub fn sub_minutes(&self, minutes: i64) -> Result<Self> {
        self.shift(Span::new().try_minutes(minutes)?.negate())
    }

    pub fn add_seconds(&self, seconds: i64) -> Result<Self> {
        self.shift(Span::new().try_seconds(seconds)?)
    }

    pub fn sub_seconds(&self, seconds: i64) -> Result<Self> {
        self.shift(Span::new().try_seconds(seconds)?.negate())
    }

    /// Move to the given year, clamping day 30 of month 12 when that year is not leap.
    fn with_year(&self, year: i64) -> Result<Self> {
        check("year", year, Self::MIN_YEAR, Self::MAX_YEAR)?;
        let year = year as i32;
        let leap = engine::is_leap_jalali_year(year)?;
        self.with_ymd(year, self.month, clamp_day(self.day, self.month, leap))
    }

    /// Add whole years (at least 1).
    pub fn add_years(&self, years: i32) -> Result<Self> {
        expect_positive("add_years", years)?;
        self.with_year(i64::from(self.year) + i64::from(years))
    }

    /// Subtract whole years (at least 1).
    pub fn sub_years(&self, years: i32) -> Result<Self> {
        expect_positive("sub_years", years)?;
        self.with_year(i64::from(self.year) - i64::from(years))
    }

    /// Add months (at least 1), clamping the day to the length of the resulting month.
    ///
    /// Whole years are added first, then each remaining month is walked with the day clamped to
    /// the length of the next month. So the 31st of month 6 becomes the 30th of month 7 rather
    /// than spilling into month 8. The walk stays in Jalali fields, the time of day and timezone
    /// are carried over untouched.
    pub fn add_months(&self, months: i32) -> Result<Self> {
        expect_positive("add_months", months)?;

        let date = match months / 12 {
            0 => self.clone(),
            years => self.add_years(years)?,
        };

        let (mut year, mut month, mut day) = (date.year, date.month, date.day);
        let mut leap = date.leap;
        for _ in 0..months % 12 {
            if month == 12 {
                year += 1;
                month = 1;
                leap = engine::is_leap_jalali_year(year)?;
            } else {
                month += 1;
            }
            day = clamp_day(day, month, leap);
        }

        date.with_ymd(year, month, day)
    }

    /// Subtract months (at least 1), clamping the day to the length of the resulting month.
    ///
    /// Inside the same year the month is set directly. Otherwise the whole years are subtracted,
    /// then one more year, and the remaining distance is walked forward with
    /// [`Self::add_months`] so the day is clamped the same way as there.
    pub fn sub_months(&self, months: i32) -> Result<Self> {
        expect_positive("sub_months", months)?;

        let target = i64::from(self.month) - i64::from(months);
        if target >= 1 {
            let month = target as u8;
            return self.with_ymd(self.year, month, clamp_day(self.day, month, self.leap));
        }

        let years = (target / 12).abs();
        let date = match years {
            0 => self.clone(),
            years => self.sub_years(years as i32)?,
        };

        // distance from the same month one year earlier, always in -11..=11
        let forward = 12 - (target % 12).abs() - i64::from(date.month);
        trace!(date = %self, months, years, forward, "resolving month subtraction");

        let date = date.sub_years(1)?;
        match forward.cmp(&0) {
            Ordering::Greater => date.add_months(forward as i32),
            Ordering::Equal => Ok(date),
            // stays inside the year so it takes the direct branch
            Ordering::Less => date.sub_months(-forward as i32),
        }
    }

    pub fn next_day(&self) -> Result<Self> {
        self.add_days(1)
    }

    pub fn previous_day(&self) -> Result<Self> {
        self.sub_days(1)
    }

    pub fn next_week(&self) -> Result<Self> {
        self.add_days(7)
    }

    pub fn last_week(&self) -> Result<Self> {
        self.sub_days(7)
    }

    pub fn next_month(&self) -> Result<Self> {
        self.add_months(1)
    }

    pub fn last_month(&self) -> Result<Self> {
        self.sub_months(1)
    }

    /// The day of this date and the current day, both in this timezone (or the system timezone).
    fn day_and_today(&self) -> Result<(civil::Date, civil::Date)> {
        let zoned = self.to_zoned()?;
        let today = Zoned::now().with_time_zone(zoned.time_zone().clone());
        Ok((zoned.date(), today.date()))
    }

    /// Is this the same day as today in this timezone (or the system timezone).
    pub fn is_today(&self) -> Result<bool> {
        let (day, today) = self.day_and_today()?;
        Ok(day == today)
    }

    /// Is this the day after today.
    pub fn is_tomorrow(&self) -> Result<bool> {
        let (day, today) = self.day_and_today()?;
        Ok(day == today.tomorrow()?)
    }

    /// Is this the day before today.
    pub fn is_yesterday(&self) -> Result<bool> {
        let (day, today) = self.day_and_today()?;
        Ok(day == today.yesterday()?)
    }

    /// Is this instant after now.
    pub fn is_future(&self) -> Result<bool> {
        Ok(self.to_zoned()?.timestamp() > Timestamp::now())
    }

    /// Is this instant before now.
    pub fn is_past(&self) -> Result<bool> {
        Ok(self.to_zoned()?.timestamp() < Timestamp::now())
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Dates are only comparable when they carry the same timezone (or none at all).
///
/// Use [`JalaliDate::timestamp`] to compare instants across timezones.
impl PartialOrd for JalaliDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.time_zone != other.time_zone {
            return None;
        }
        Some(self.fields().cmp(&other.fields()))
    }
}

impl TryFrom<civil::Date> for JalaliDate {
    type Error = Error;

    fn try_from(value: civil::Date) -> Result<Self> {
        Self::from_date(value)
    }
}

impl TryFrom<civil::DateTime> for JalaliDate {
    type Error = Error;

    fn try_from(value: civil::DateTime) -> Result<Self> {
        Self::from_datetime(value)
    }
}

impl TryFrom<&Zoned> for JalaliDate {
    type Error = Error;

    fn try_from(value: &Zoned) -> Result<Self> {
        Self::from_zoned(value)
    }
}

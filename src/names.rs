//! Holds the naming configuration for months and weekdays.
//!
//! The naming is a plain value passed to each call so that no global state decides which names
//! are printed.

use crate::{
    AFGHAN_MONTHS, IRANIAN_MONTHS, JALALI_MONTHS, PERSIAN_WEEKDAYS, WEEKDAYS, date::JalaliDate,
};

/// Which set of names to use for Jalali months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MonthNames {
    /// Persian names used in Iran (Farvardin, Ordibehesht, ...).
    #[default]
    Iranian,
    /// Zodiac names used in Afghanistan (Hamal, Sawr, ...).
    Afghan,
    /// English transliteration of the Iranian names.
    English,
}

impl MonthNames {
    /// All the month names of this naming, Farvardin first.
    pub const fn month_names(&self) -> &'static [&'static str; 12] {
        match self {
            MonthNames::Iranian => &IRANIAN_MONTHS,
            MonthNames::Afghan => &AFGHAN_MONTHS,
            MonthNames::English => &JALALI_MONTHS,
        }
    }

    /// All the weekday names of this naming, Saturday first.
    pub const fn weekday_names(&self) -> &'static [&'static str; 7] {
        match self {
            MonthNames::Iranian | MonthNames::Afghan => &PERSIAN_WEEKDAYS,
            MonthNames::English => &WEEKDAYS,
        }
    }

    /// Name of the month (1..=12).
    pub fn month_name(&self, month: u8) -> Option<&'static str> {
        let index = usize::from(month).checked_sub(1)?;
        self.month_names().get(index).copied()
    }

    /// First 3 characters of the month name (1..=12).
    pub fn short_month_name(&self, month: u8) -> Option<String> {
        self.month_name(month).map(|name| name.chars().take(3).collect())
    }

    /// Name of the weekday where Saturday is 0 (see [`JalaliDate::day_of_week`]).
    pub fn weekday_name(&self, day_of_week: u8) -> Option<&'static str> {
        self.weekday_names().get(usize::from(day_of_week)).copied()
    }

    /// Render the date in a long human form, "weekday day month year HH:MM:SS".
    pub fn long_form(&self, date: &JalaliDate) -> String {
        // fields of a valid date always have names
        let weekday = self.weekday_name(date.day_of_week()).unwrap_or_default();
        let month = self.month_name(date.month()).unwrap_or_default();
        format!(
            "{weekday} {} {month} {} {:02}:{:02}:{:02}",
            date.day(),
            date.year(),
            date.hour(),
            date.minute(),
            date.second(),
        )
    }
}

//! Jalali (solar hijri) calendar conversion and date arithmetic.
//!
//! - [`engine`] converts between Gregorian, Jalali and the Julian Day Number.
//! - [`date::JalaliDate`] is a validated Jalali date and time with calendar-aware arithmetic, using
//!   [`jiff`] as its Gregorian counterpart.
//! - [`names`] selects month and weekday names explicitly per call.
pub mod clap_helper;
pub mod date;
pub mod engine;
pub mod error;
pub mod names;
pub mod parser;

pub use date::JalaliDate;
pub use error::{Error, Result};
pub use names::MonthNames;

/// Saturday based weekdays in English (the Jalali week starts on Saturday).
pub const WEEKDAYS: [&str; 7] = [
    "Saturday",
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
];

/// [`WEEKDAYS`] abbreviations to 3 letters.
pub const WEEKDAYS_ABB: [&str; 7] = abbr_strarr(WEEKDAYS);

/// Saturday based weekdays in Persian.
pub const PERSIAN_WEEKDAYS: [&str; 7] = [
    "شنبه",
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنج‌شنبه",
    "جمعه",
];

/// Jalali months in English.
// Note to future self: these are popular, known and accepted, officially and non-officially.
// do NOT change!
pub const JALALI_MONTHS: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

/// [`JALALI_MONTHS`] abbreviations to 3 letters.
pub const JALALI_MONTHS_ABB: [&str; 12] = abbr_strarr(JALALI_MONTHS);

/// Jalali months as named in Iran.
pub const IRANIAN_MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Jalali months as named in Afghanistan (zodiac names).
pub const AFGHAN_MONTHS: [&str; 12] = [
    "حمل",
    "ثور",
    "جوزا",
    "سرطان",
    "اسد",
    "سنبله",
    "میزان",
    "عقرب",
    "قوس",
    "جدی",
    "دلو",
    "حوت",
];

/// Abbreviate to 3 letters.
const fn abbr_strarr<const N: usize>(original: [&str; N]) -> [&str; N] {
    const CHARS: usize = 3;

    let mut v = [""; N];
    let mut i = 0;
    while i < original.len() {
        assert!(
            original[i].is_ascii() && original[i].len() >= CHARS,
            "automatic abbrevations only work with ASCII strings with enough length",
        );

        // a way around Index not being in const
        v[i] = match original[i].as_bytes().first_chunk::<CHARS>() {
            // ASCII was asserted so any split is on a char boundary
            Some(chunk) => unsafe { core::str::from_utf8_unchecked(chunk.as_slice()) },
            None => panic!("length was asserted"),
        };
        i += 1;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviations() {
        assert_eq!(WEEKDAYS_ABB, ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!(JALALI_MONTHS_ABB[0], "Far");
        assert_eq!(JALALI_MONTHS_ABB[11], "Esf");
    }
}

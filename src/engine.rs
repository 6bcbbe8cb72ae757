//! Holds the conversions between Gregorian, Jalali and the Julian Day Number.
//!
//! Every function here is a pure integer transform. The Julian Day Number (JDN) is the pivot
//! between the two calendars: both sides convert to and from it and never to each other directly.
//!
//! The leap rule of Jalali is the break-point variant of the 33-year cycle: the history is split
//! into runs (see [`BREAKS`]) and inside each run the simple cycle holds. See
//! <http://www.astro.uni.torun.pl/~kb/Papers/EMP/PersianC-EMP.htm> for the derivation.
//!
//! All divisions truncate toward zero which is what the formulas below are tuned for.

use crate::error::{Error, Result};

/// A Julian Day Number (noon referenced day index).
pub type Jdn = i64;

/// A raw (year, month, day) triple without any checks.
pub type Ymd = (i32, i32, i32);

/// Jalali years at which the 33-year cycle is re-aligned (last one is exclusive).
pub const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324, 2394,
    2456, 3178,
];

/// The first Jalali year the engine supports.
pub const MIN_YEAR: i32 = BREAKS[0];

/// The last Jalali year the engine supports.
pub const MAX_YEAR: i32 = BREAKS[BREAKS.len() - 1] - 1;

/// Difference of Jalali and Gregorian year numbers at the Jalali new year.
const YEAR_OFFSET: i32 = 621;

/// Days in Jalali months 1 to 6 together.
const FIRST_HALF_DAYS: i64 = 186;

/// What the break-point algorithm knows about a single Jalali year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearInfo {
    /// Years passed since the last leap year (0 to 4, 0 is a leap year).
    leap: i32,
    /// Gregorian year in which this Jalali year starts.
    pub gregorian_year: i32,
    /// Day of March in [`Self::gregorian_year`] on which the 1st of Farvardin falls.
    pub march_day: i32,
}

impl YearInfo {
    /// Is this a 366-day year.
    pub const fn is_leap(&self) -> bool {
        self.leap == 0
    }

    /// Was the year right before this one a leap year.
    const fn follows_leap(&self) -> bool {
        self.leap == 1
    }
}

/// Convert a Gregorian date to a JDN.
///
/// Valid from the 1st of March -100100 onward. Month and day are not
/// checked, overflowing values simply roll over.
pub const fn gregorian_to_jdn(gy: i32, gm: i32, gd: i32) -> Jdn {
    let (gy, gm, gd) = (gy as i64, gm as i64, gd as i64);
    let shift = (gm - 8) / 6;
    (gy + shift + 100100) * 1461 / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd - 34840408
        - (gy + 100100 + shift) / 100 * 3 / 4
        + 752
}

/// Convert a JDN to a Gregorian date, the inverse of [`gregorian_to_jdn`].
pub const fn jdn_to_gregorian(jdn: Jdn) -> Ymd {
    let mut j = 4 * jdn + 139361631;
    j += (4 * jdn + 183187720) / 146097 * 3 / 4 * 4 - 3908;
    let i = j % 1461 / 4 * 5 + 308;

    let gd = i % 153 / 5 + 1;
    let gm = i / 153 % 12 + 1;
    let gy = j / 1461 - 100100 + (8 - gm) / 6;

    (gy as i32, gm as i32, gd as i32)
}

/// Run the break-point algorithm for the given Jalali year.
///
/// Fails with [`Error::OutOfRange`] outside of [`MIN_YEAR`] and [`MAX_YEAR`].
pub fn jalali_calendar_info(jy: i32) -> Result<YearInfo> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&jy) {
        return Err(Error::OutOfRange { year: jy });
    }

    let gy = jy + YEAR_OFFSET;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;

    // count the leap days of every run fully passed before `jy`
    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + jump % 33 / 4;
        jp = jm;
    }

    // years passed in the run containing `jy`
    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march_day = 20 + leap_j - leap_g;

    // close to the next break, count against the cycle that the next run will continue
    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }

    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Ok(YearInfo {
        leap,
        gregorian_year: gy,
        march_day,
    })
}

/// Is the given Jalali year a leap year (366 days).
pub fn is_leap_jalali_year(jy: i32) -> Result<bool> {
    jalali_calendar_info(jy).map(|info| info.is_leap())
}

/// Number of days in the given month of the given Jalali year.
///
/// Months after 12 are treated as 12, the month is not checked otherwise.
pub fn jalali_month_length(jy: i32, jm: i32) -> Result<i32> {
    Ok(match jm {
        ..=6 => 31,
        7..=11 => 30,
        _ if is_leap_jalali_year(jy)? => 30,
        _ => 29,
    })
}

/// Days from the 1st of Farvardin to the 1st of the given month.
const fn month_offset(jm: i64) -> i64 {
    (jm - 1) * 31 - jm / 7 * (jm - 7)
}

/// Convert a Jalali date to a JDN.
pub fn jalali_to_jdn(jy: i32, jm: i32, jd: i32) -> Result<Jdn> {
    let info = jalali_calendar_info(jy)?;
    Ok(gregorian_to_jdn(info.gregorian_year, 3, info.march_day)
        + month_offset(jm as i64)
        + jd as i64
        - 1)
}

/// Convert a JDN to a Jalali date, the inverse of [`jalali_to_jdn`].
///
/// Since the year is guessed from the Gregorian year of the JDN, the days of [`MAX_YEAR`] that
/// fall after the Gregorian new year cannot be converted.
pub fn jdn_to_jalali(jdn: Jdn) -> Result<Ymd> {
    let gy = jdn_to_gregorian(jdn).0;
    let mut jy = gy - YEAR_OFFSET;
    let info = jalali_calendar_info(jy)?;
    let mut k = jdn - gregorian_to_jdn(gy, 3, info.march_day);

    if k >= 0 {
        if k < FIRST_HALF_DAYS {
            return Ok((jy, (1 + k / 31) as i32, (k % 31 + 1) as i32));
        }
        k -= FIRST_HALF_DAYS;
    } else {
        // the JDN is in the second half of the previous Jalali year
        jy -= 1;
        k += 179;
        if info.follows_leap() {
            k += 1;
        }
    }

    Ok((jy, (7 + k / 30) as i32, (k % 30 + 1) as i32))
}

/// Convert a Gregorian date to Jalali.
pub fn to_jalali(gy: i32, gm: i32, gd: i32) -> Result<Ymd> {
    jdn_to_jalali(gregorian_to_jdn(gy, gm, gd))
}

/// Convert a Jalali date to Gregorian.
pub fn to_gregorian(jy: i32, jm: i32, jd: i32) -> Result<Ymd> {
    jalali_to_jdn(jy, jm, jd).map(jdn_to_gregorian)
}

/// Check a Jalali date against the whole range supported by the engine.
pub fn is_valid_jalali_date(jy: i32, jm: i32, jd: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&jy)
        && (1..=12).contains(&jm)
        && jalali_month_length(jy, jm).is_ok_and(|len| (1..=len).contains(&jd))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_conversions() {
        assert_eq!(to_jalali(2018, 3, 21).unwrap(), (1397, 1, 1));
        assert_eq!(to_jalali(2018, 3, 20).unwrap(), (1396, 12, 29));
        assert_eq!(to_jalali(1970, 1, 1).unwrap(), (1348, 10, 11));
        assert_eq!(to_jalali(2019, 1, 1).unwrap(), (1397, 10, 11));
        assert_eq!(to_jalali(2025, 5, 21).unwrap(), (1404, 2, 31));
        assert_eq!(to_jalali(2025, 10, 4).unwrap(), (1404, 7, 12));
        assert_eq!(to_jalali(2019, 3, 15).unwrap(), (1397, 12, 24));

        assert_eq!(to_gregorian(1403, 12, 30).unwrap(), (2025, 3, 20));
        assert_eq!(to_gregorian(1404, 1, 1).unwrap(), (2025, 3, 21));
        assert_eq!(to_gregorian(1391, 1, 20).unwrap(), (2012, 4, 8));
        assert_eq!(to_gregorian(1395, 12, 30).unwrap(), (2017, 3, 20));
    }

    #[test]
    fn test_gregorian_jdn() {
        assert_eq!(gregorian_to_jdn(2000, 1, 1), 2451545);
        assert_eq!(gregorian_to_jdn(1970, 1, 1), 2440588);
        assert_eq!(jdn_to_gregorian(2451545), (2000, 1, 1));
        assert_eq!(jdn_to_gregorian(2440588), (1970, 1, 1));
    }

    #[test]
    fn test_gregorian_round_trip() {
        let start = gregorian_to_jdn(500, 1, 1);
        let end = gregorian_to_jdn(4000, 12, 31);
        for jdn in start..=end {
            let (y, m, d) = jdn_to_gregorian(jdn);
            assert_eq!(gregorian_to_jdn(y, m, d), jdn, "{y}-{m}-{d}");
        }
    }

    #[test]
    fn test_jalali_round_trip() {
        for year in MIN_YEAR..MAX_YEAR {
            for month in 1..=12 {
                for day in 1..=jalali_month_length(year, month).unwrap() {
                    let jdn = jalali_to_jdn(year, month, day).unwrap();
                    assert_eq!(jdn_to_jalali(jdn).unwrap(), (year, month, day));

                    let (gy, gm, gd) = jdn_to_gregorian(jdn);
                    assert_eq!(to_jalali(gy, gm, gd).unwrap(), (year, month, day));
                }
            }
        }
    }

    #[test]
    fn test_jalali_days_are_consecutive() {
        let mut previous = jalali_to_jdn(1300, 1, 1).unwrap() - 1;
        for year in 1300..1500 {
            for month in 1..=12 {
                for day in 1..=jalali_month_length(year, month).unwrap() {
                    let jdn = jalali_to_jdn(year, month, day).unwrap();
                    assert_eq!(jdn, previous + 1);
                    previous = jdn;
                }
            }
        }
    }

    #[test]
    fn test_month_length() {
        for year in [1395, 1396, 1399, 1403, 1404] {
            for month in 1..=12 {
                let len = jalali_month_length(year, month).unwrap();
                assert!((29..=31).contains(&len));
                let leap = is_leap_jalali_year(year).unwrap();
                assert_eq!(len == 29, month == 12 && !leap, "{year}/{month}");
            }
        }
        assert_eq!(jalali_month_length(1404, 6).unwrap(), 31);
        assert_eq!(jalali_month_length(1404, 7).unwrap(), 30);
        assert_eq!(jalali_month_length(1404, 12).unwrap(), 29);
        assert_eq!(jalali_month_length(1403, 12).unwrap(), 30);
    }

    #[test]
    fn test_leap_years() {
        let leaps = [1370, 1375, 1379, 1383, 1387, 1391, 1395, 1399, 1403, 1408];
        for year in 1370..=1410 {
            assert_eq!(
                is_leap_jalali_year(year).unwrap(),
                leaps.contains(&year),
                "{year}"
            );
        }
    }

    #[test]
    fn test_leap_periodicity() {
        let (from, to) = (1000, 3000);
        let days = jalali_to_jdn(to, 1, 1).unwrap() - jalali_to_jdn(from, 1, 1).unwrap();
        let mean = days as f64 / (to - from) as f64;
        assert!((mean - 365.2424).abs() < 0.002, "mean year is {mean}");
    }

    /// The corrections near every break-point must agree with the spacing of new years.
    #[test]
    fn test_break_point_regression() {
        for &point in &BREAKS[1..BREAKS.len() - 1] {
            for year in (point - 8)..=(point + 8) {
                let info = jalali_calendar_info(year).unwrap();
                let next = jalali_calendar_info(year + 1).unwrap();
                let length = gregorian_to_jdn(next.gregorian_year, 3, next.march_day)
                    - gregorian_to_jdn(info.gregorian_year, 3, info.march_day);
                assert_eq!(length, if info.is_leap() { 366 } else { 365 }, "{year}");
                assert_eq!(info.is_leap(), next.follows_leap(), "{year}");
                assert!((18..=23).contains(&info.march_day), "{year}");
            }
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            jalali_calendar_info(-62),
            Err(Error::OutOfRange { year: -62 })
        ));
        assert!(matches!(
            jalali_calendar_info(3178),
            Err(Error::OutOfRange { year: 3178 })
        ));
        assert!(jalali_calendar_info(MIN_YEAR).is_ok());
        assert!(jalali_calendar_info(MAX_YEAR).is_ok());
        assert!(matches!(
            to_gregorian(3200, 1, 1),
            Err(Error::OutOfRange { year: 3200 })
        ));
        assert!(matches!(
            to_jalali(4000, 1, 1),
            Err(Error::OutOfRange { year: 3379 })
        ));
    }

    #[test]
    fn test_validity() {
        assert!(is_valid_jalali_date(1395, 12, 30));
        assert!(!is_valid_jalali_date(1396, 12, 30));
        assert!(!is_valid_jalali_date(1396, 7, 31));
        assert!(!is_valid_jalali_date(1396, 13, 1));
        assert!(!is_valid_jalali_date(1396, 1, 0));
        assert!(!is_valid_jalali_date(3178, 1, 1));
        assert!(is_valid_jalali_date(-61, 1, 1));
    }
}

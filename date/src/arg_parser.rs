use std::{convert::Infallible, path::PathBuf, str::FromStr};

use clap::{
    Arg, ArgAction, ArgGroup, ArgMatches, Command, CommandFactory, FromArgMatches, command,
    error::ErrorKind, value_parser,
};
use jiff::{Zoned, tz::TimeZone};

use jalali::{
    JalaliDate, MonthNames,
    clap_helper::*,
    parser::{parse_datetime, parse_jalali},
};

/// Provides lines each having a date to parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Reader {
    File(PathBuf),
    Stdin,
}

#[derive(Debug, PartialEq)]
pub enum When {
    /// Delay the value as far as possible.
    Now,
    /// The content of a file, one free-text date per line.
    Reader(Reader),
    /// The edit time of a file as set in `reference` flag
    Reference(PathBuf),
    /// The given Gregorian time.
    Given(Zoned),
    /// The given Jalali date.
    Jalali(JalaliDate),
}

/// Signed shifts applied to the basis, years first then months then days.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Shift {
    pub years: i32,
    pub months: i32,
    pub days: i64,
}

impl Shift {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, PartialEq)]
pub struct Args {
    pub timezone: TimeZone,
    pub when: When,
    pub debug: bool,
    /// Print the result in Gregorian.
    pub gregorian: bool,
    /// Print the long form with these names.
    pub names: Option<MonthNames>,
    pub shift: Shift,
}

impl Args {
    pub const DEBUG_LONG: &str = "debug";
    pub const UTC_LONG: &str = "utc";
    pub const DATE_LONG: &str = "date";
    pub const FILE_LONG: &str = "file";
    pub const REFERENCE_LONG: &str = "reference";
    pub const JALALI_LONG: &str = "jalali";
    pub const GREGORIAN_LONG: &str = "gregorian";
    pub const NAMES_LONG: &str = "names";
    pub const NAMES_PAIRS: StaticMap<MonthNames> = StaticMap(&[
        ("iranian", MonthNames::Iranian),
        ("afghan", MonthNames::Afghan),
        ("english", MonthNames::English),
    ]);
    pub const YEARS_LONG: &str = "years";
    pub const MONTHS_LONG: &str = "months";
    pub const DAYS_LONG: &str = "days";

    pub const DATE_SETTERS_GROUP: &str = "whens";
    pub const DATE_SETTERS_ARGS: &[&str] = &[
        Self::REFERENCE_LONG,
        Self::FILE_LONG,
        Self::DATE_LONG,
        Self::JALALI_LONG,
        Self::GREGORIAN_LONG,
    ];

    pub fn groups() -> [ArgGroup; 1] {
        [ArgGroup::new(Self::DATE_SETTERS_GROUP)
            .multiple(false)
            .args(Self::DATE_SETTERS_ARGS)]
    }

    pub fn args() -> [Arg; 11] {
        [
            Arg::new(Self::DEBUG_LONG)
                .long(Self::DEBUG_LONG)
                .help("enable minor extra logs in STDERR")
                .action(ArgAction::SetTrue),
            Arg::new(Self::UTC_LONG)
                .long(Self::UTC_LONG)
                .short('u')
                .visible_alias("uct")
                .visible_alias("universal")
                .help("as if timezone is Coordinated Universal Time (UTC)")
                .action(ArgAction::SetTrue),
            Arg::new(Self::NAMES_LONG)
                .long(Self::NAMES_LONG)
                .short('n')
                .value_name("NAMES")
                .ignore_case(true)
                .help("print weekday and month names of the given naming")
                .value_parser(Self::NAMES_PAIRS),
            // basis setters
            Arg::new(Self::JALALI_LONG)
                .long(Self::JALALI_LONG)
                .short('j')
                .value_name("%Y/%m/%d")
                .help("as if `now` is the given Jalali date"),
            Arg::new(Self::GREGORIAN_LONG)
                .long(Self::GREGORIAN_LONG)
                .short('g')
                .value_name("%Y/%m/%d")
                .help("print the given Jalali date in Gregorian"),
            Arg::new(Self::DATE_LONG)
                .long(Self::DATE_LONG)
                .short('d')
                .overrides_with(Self::DATE_LONG)
                .help("as if `now` is the given (only the last of multiple values takes effect)"),
            Arg::new(Self::FILE_LONG)
                .long(Self::FILE_LONG)
                .short('f')
                .help("read a file or STDIN for dates (use '-' for STDIN)")
                .value_parser(|s: &str| -> Result<Reader, Infallible> {
                    Ok(if s == "-" {
                        Reader::Stdin
                    } else {
                        Reader::File(PathBuf::from_str(s)?)
                    })
                }),
            Arg::new(Self::REFERENCE_LONG)
                .long(Self::REFERENCE_LONG)
                .short('r')
                .help("as if `now` is the modification time of the given file")
                .value_parser(value_parser!(PathBuf)),
            // shifts
            Arg::new(Self::YEARS_LONG)
                .long(Self::YEARS_LONG)
                .value_name("N")
                .allow_negative_numbers(true)
                .help("add N Jalali years (subtract if negative)")
                .value_parser(value_parser!(i32)),
            Arg::new(Self::MONTHS_LONG)
                .long(Self::MONTHS_LONG)
                .value_name("N")
                .allow_negative_numbers(true)
                .help("add N Jalali months (subtract if negative)")
                .value_parser(value_parser!(i32)),
            Arg::new(Self::DAYS_LONG)
                .long(Self::DAYS_LONG)
                .value_name("N")
                .allow_negative_numbers(true)
                .help("add N days (subtract if negative)")
                .value_parser(value_parser!(i64)),
        ]
    }
}

impl CommandFactory for Args {
    fn command() -> Command {
        command!(/* with version, about and author */)
            .after_help(
                "Dates are printed as `YYYY-MM-DD HH:MM:SS` in Jalali unless `--gregorian` is set.\n\
                 Shifts are applied in the order of years, months and days.",
            )
            .args(Self::args())
            .groups(Self::groups())
    }

    fn command_for_update() -> Command {
        Self::command()
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            timezone: TimeZone::system(),
            when: When::Now,
            debug: false,
            gregorian: false,
            names: None,
            shift: Shift::default(),
        }
    }
}

impl FromArgMatches for Args {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut v = Self::default();
        v.update_from_arg_matches(matches)?;
        Ok(v)
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        if matches.get_flag(Self::UTC_LONG) {
            self.timezone = TimeZone::UTC;
        };

        self.debug = self.debug || matches.get_flag(Self::DEBUG_LONG);
        if let Some(v) = matches.get_one::<MonthNames>(Self::NAMES_LONG) {
            self.names = Some(*v);
        }

        if let Some(v) = matches.get_one::<i32>(Self::YEARS_LONG) {
            self.shift.years = *v;
        }
        if let Some(v) = matches.get_one::<i32>(Self::MONTHS_LONG) {
            self.shift.months = *v;
        }
        if let Some(v) = matches.get_one::<i64>(Self::DAYS_LONG) {
            self.shift.days = *v;
        }

        // try date, then jalali, then gregorian, then file, then reference
        if let Some(v) = matches.get_one::<String>(Self::DATE_LONG) {
            let now = Zoned::now().with_time_zone(self.timezone.clone());
            self.when = match parse_datetime(v, Some(now)) {
                Ok(v) => When::Given(v),
                Err(e) => return Err(Self::error(ErrorKind::InvalidValue, e)),
            };
        } else if let Some(v) = matches
            .get_one::<String>(Self::JALALI_LONG)
            .or_else(|| matches.get_one::<String>(Self::GREGORIAN_LONG))
        {
            self.gregorian = matches.contains_id(Self::GREGORIAN_LONG);
            self.when = match parse_jalali(v) {
                Ok(v) => When::Jalali(v.with_time_zone(self.timezone.clone())),
                Err(e) => return Err(Self::error(ErrorKind::InvalidValue, e)),
            };
        } else if let Some(v) = matches.get_one::<Reader>(Self::FILE_LONG) {
            self.when = When::Reader(v.clone());
        } else if let Some(v) = matches.get_one::<PathBuf>(Self::REFERENCE_LONG) {
            self.when = When::Reference(v.clone());
        }

        Ok(())
    }
}

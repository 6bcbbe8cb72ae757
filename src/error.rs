//! Holds the error type shared by the engine, the date type and the parsers.

/// The default result of this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors given by conversions, construction and arithmetic of Jalali dates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The year is outside of the break-point table of the leap algorithm.
    #[error("Jalali year {year} is outside the supported range (-61 to 3177)")]
    OutOfRange { year: i32 },

    /// A date or time field is outside of its bounds.
    ///
    /// For `day` the upper bound is the length of the month in that year.
    #[error("{field} {value} is out of range ({min} to {max})")]
    InvalidRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A count that must be positive was not.
    #[error("{operation} expects a count of at least 1, got {value}")]
    InvalidArgument {
        operation: &'static str,
        value: i64,
    },

    /// The input does not follow the expected date format.
    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: &'static str },

    /// Free-text Gregorian input was not understood.
    #[error(transparent)]
    FreeText(#[from] parse_datetime::ParseDateTimeError),

    /// The Gregorian side (`jiff`) rejected a value or an operation.
    #[error(transparent)]
    Gregorian(#[from] jiff::Error),
}

impl Error {
    pub(crate) fn invalid_range(
        field: &'static str,
        value: impl Into<i64>,
        min: impl Into<i64>,
        max: impl Into<i64>,
    ) -> Self {
        Self::InvalidRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::OutOfRange { year: 3178 }.to_string(),
            "Jalali year 3178 is outside the supported range (-61 to 3177)"
        );
        assert_eq!(
            Error::invalid_range("day", 30u8, 1u8, 29u8).to_string(),
            "day 30 is out of range (1 to 29)"
        );
        assert_eq!(
            Error::InvalidArgument {
                operation: "add_months",
                value: 0
            }
            .to_string(),
            "add_months expects a count of at least 1, got 0"
        );
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: std::error::Error + Send + Sync>() {}
        assert_impl::<Error>();
    }
}

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    InvalidAccountSid { input: String },
    InvalidCountryCode { input: String },
    InvalidUrl { input: String },
    InvalidMethod { input: String },
    InvalidStatus { input: String },
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidAccountSid { input } => {
                write!(f, "invalid account sid: {input} (expected AC...)")
            }
            Self::InvalidCountryCode { input } => {
                write!(f, "invalid country code: {input} (expected two letters)")
            }
            Self::InvalidUrl { input } => write!(f, "invalid webhook url: {input}"),
            Self::InvalidMethod { input } => {
                write!(f, "invalid HTTP method: {input} (expected GET or POST)")
            }
            Self::InvalidStatus { input } => {
                write!(
                    f,
                    "invalid account status: {input} (expected active, suspended or closed)"
                )
            }
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "Body" };
        assert_eq!(err.to_string(), "Body must not be empty");

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::InvalidMethod {
            input: "PUT".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid HTTP method: PUT (expected GET or POST)"
        );

        let err = ValidationError::TooLong {
            field: "Body",
            max: 10,
            actual: 11,
        };
        assert_eq!(err.to_string(), "Body is too long: 11 characters (max 10)");
    }
}

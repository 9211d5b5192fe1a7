use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Twilio account SID (`AC...`).
///
/// Invariant: non-empty after trimming and starts with `AC`.
pub struct AccountSid(String);

impl AccountSid {
    /// Field name used by Twilio (`AccountSid`).
    pub const FIELD: &'static str = "AccountSid";

    /// Create a validated [`AccountSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !trimmed.starts_with("AC") {
            return Err(ValidationError::InvalidAccountSid {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated SID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Twilio auth token.
///
/// Invariant: non-empty after trimming. `Debug` output is redacted.
pub struct AuthToken(String);

impl AuthToken {
    /// Field name used in configuration and error messages.
    pub const FIELD: &'static str = "AuthToken";

    /// Create a validated [`AuthToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token with everything but the last four characters masked.
    pub fn masked(&self) -> String {
        let visible = self.0.chars().rev().take(4).collect::<Vec<_>>();
        let hidden = self.0.chars().count().saturating_sub(visible.len());
        let mut masked = "*".repeat(hidden);
        masked.extend(visible.into_iter().rev());
        masked
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// SID of any Twilio resource (`PN...`, `SK...`, `AL...`, `CL...`).
///
/// Invariant: non-empty after trimming.
pub struct ResourceSid(String);

impl ResourceSid {
    /// Field name used by Twilio (`Sid`).
    pub const FIELD: &'static str = "Sid";

    /// Create a validated [`ResourceSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated SID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Human readable resource name (`FriendlyName`).
///
/// Invariant: non-empty after trimming, at most 64 characters.
pub struct FriendlyName(String);

impl FriendlyName {
    /// Form field name used by Twilio (`FriendlyName`).
    pub const FIELD: &'static str = "FriendlyName";

    /// Maximum length accepted by Twilio.
    pub const MAX_CHARS: usize = 64;

    /// Create a validated [`FriendlyName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let actual = trimmed.chars().count();
        if actual > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_CHARS,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message body (`Body`).
///
/// Invariant: non-empty after trimming, at most 1600 characters. The submitted text
/// (including whitespace) is preserved.
pub struct MessageBody(String);

impl MessageBody {
    /// Form field name used by Twilio (`Body`).
    pub const FIELD: &'static str = "Body";

    /// Maximum body length accepted by the Messages API.
    pub const MAX_CHARS: usize = 1600;

    /// Create a validated message body.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let actual = value.chars().count();
        if actual > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_CHARS,
                actual,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the body as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Phone number in E.164 form. Formatting differences in the input compare equal.
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Form field name used by Twilio (`PhoneNumber`).
    pub const FIELD: &'static str = "PhoneNumber";

    /// Parse a number that carries its own `+<country>` prefix.
    pub fn international(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let Ok(parsed) = phonenumber::parse(None, trimmed) else {
            return Err(ValidationError::InvalidPhoneNumber {
                input: trimmed.to_owned(),
            });
        };
        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        Ok(Self(e164))
    }

    pub fn e164(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// ISO 3166-1 alpha-2 country code.
///
/// Invariant: exactly two ASCII letters, stored upper-cased.
pub struct CountryCode(String);

impl CountryCode {
    /// Field name used by Twilio (`IsoCountry`).
    pub const FIELD: &'static str = "IsoCountry";

    /// Create a validated [`CountryCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed.len() != 2 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCountryCode {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Borrow the upper-cased code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Absolute `http`/`https` URL used for voice, SMS and status callbacks.
pub struct WebhookUrl(url::Url);

impl WebhookUrl {
    /// Generic field name used in error messages.
    pub const FIELD: &'static str = "Url";

    /// Parse and validate a webhook URL.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let parsed = url::Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl {
            input: trimmed.to_owned(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(parsed))
    }

    /// Borrow the URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// HTTP method Twilio uses when invoking a webhook.
pub enum WebhookMethod {
    Get,
    #[default]
    Post,
}

impl WebhookMethod {
    /// Parse `GET`/`POST` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(ValidationError::InvalidMethod {
                input: value.trim().to_owned(),
            }),
        }
    }

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Account lifecycle status (`Status`).
pub enum AccountStatus {
    Active,
    Suspended,
    Closed,
}

impl AccountStatus {
    /// Form field name used by Twilio (`Status`).
    pub const FIELD: &'static str = "Status";

    /// Parse `active`/`suspended`/`closed` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "closed" => Ok(Self::Closed),
            _ => Err(ValidationError::InvalidStatus {
                input: value.trim().to_owned(),
            }),
        }
    }

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Closed => "closed",
        }
    }
}

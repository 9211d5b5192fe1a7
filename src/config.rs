//! Process configuration read from environment variables.

use std::time::Duration;

use thiserror::Error;

use crate::client::{Credentials, GatewayError, TwilioGateway};
use crate::domain::{AccountSid, ValidationError};

pub const ACCOUNT_SID_VAR: &str = "TWILIO_ACCOUNT_SID";
pub const AUTH_TOKEN_VAR: &str = "TWILIO_AUTH_TOKEN";
pub const TIMEOUT_VAR: &str = "TWILIO_TIMEOUT_SECS";
pub const API_BASE_VAR: &str = "TWILIO_API_BASE";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is invalid: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: ValidationError,
    },
    #[error("TWILIO_TIMEOUT_SECS must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { value: String },
    #[error("failed to build the HTTP client: {0}")]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub timeout: Duration,
    /// Replaces the default `https://api.twilio.com/2010-04-01` base.
    pub api_base: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let account_sid = var(ACCOUNT_SID_VAR).ok_or(ConfigError::Missing(ACCOUNT_SID_VAR))?;
        let auth_token = var(AUTH_TOKEN_VAR).ok_or(ConfigError::Missing(AUTH_TOKEN_VAR))?;
        AccountSid::new(account_sid.as_str()).map_err(|source| ConfigError::Invalid {
            var: ACCOUNT_SID_VAR,
            source,
        })?;
        let credentials =
            Credentials::new(account_sid, auth_token).map_err(|source| ConfigError::Invalid {
                var: AUTH_TOKEN_VAR,
                source,
            })?;

        let timeout = match var(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout { value }),
            },
        };

        Ok(Self {
            credentials,
            timeout,
            api_base: var(API_BASE_VAR).map(|base| base.trim().to_owned()),
        })
    }

    pub fn gateway(&self) -> Result<TwilioGateway, ConfigError> {
        let mut builder = TwilioGateway::builder(self.credentials.clone()).timeout(self.timeout);
        if let Some(base) = &self.api_base {
            builder = builder.api_endpoint(base.clone());
        }
        Ok(builder.build()?)
    }
}

//! Interactive administration console for a Twilio account.
//!
//! The crate is layered the same way top to bottom: a domain layer of
//! validated types, a private transport layer that knows Twilio's wire
//! formats, a client layer ([`TwilioGateway`]) issuing the REST calls, and a
//! menu-driven [`cli`] on top.
//!
//! ```rust,no_run
//! use twilio_admin::{Credentials, TwilioGateway};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("AC...", "...")?;
//!     let gateway = TwilioGateway::new(credentials);
//!     for number in gateway.list_active_numbers().await? {
//!         println!("{} {}", number.phone_number, number.friendly_name);
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod export;
mod transport;

pub use cli::CliError;
pub use client::{Credentials, GatewayError, TwilioGateway, TwilioGatewayBuilder};
pub use config::{ConfigError, Settings};
pub use domain::{
    AccountSid, CountryCode, ExportFormat, NumberType, PhoneNumber, SearchQuery, ValidationError,
    WebhookKind, WebhookMethod, WebhookUrl,
};

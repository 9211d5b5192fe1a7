//! Transport layer: query/form encoding and JSON decoding of Twilio payloads.

mod account;
mod messaging;
mod money;
mod monitor;
mod numbers;
mod pricing;
mod search;
mod security;
mod snapshot;

use serde::Deserialize;

use crate::domain::{Capabilities, ValidationError};

pub use account::{
    decode_account, decode_accounts_page, decode_balance, decode_created_account,
    decode_created_key, decode_keys_page, encode_account_update_form, encode_active_accounts_query,
    encode_create_account_form, encode_friendly_name_form,
};
pub use messaging::{
    decode_call_receipt, decode_calls_page, decode_message_receipt, decode_messages_page,
    encode_log_filter_query, encode_place_call_form, encode_send_sms_form,
};
pub use monitor::{
    USAGE_CATEGORIES, decode_alerts_page, decode_events_page, decode_usage_records_page,
    encode_usage_query, summarize_usage,
};
pub use numbers::{
    decode_incoming_number, decode_incoming_numbers_page, decode_purchased_number,
    encode_number_lookup_query, encode_number_update_form, encode_purchase_form,
};
pub use pricing::decode_country_pricing;
pub use search::{decode_available_numbers, encode_search_query};
pub use security::{decode_credential_lists_page, decode_ip_access_lists_page};
pub use snapshot::decode_import_plan;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value in document: {0}")]
    Invalid(#[from] ValidationError),
}

/// Error body Twilio returns with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiFailure {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

/// Decode a Twilio error body; `None` when the body is not one.
pub fn decode_api_failure(json: &str) -> Option<ApiFailure> {
    serde_json::from_str(json).ok()
}

/// One page of a list resource plus the cursor of the next page, if any.
///
/// `next` is either a host-relative URI (`next_page_uri` on the core API) or an
/// absolute URL (`meta.next_page_url` on the v1 APIs).
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Twilio reports capability flags as `voice`/`SMS`/`MMS`; lower-case keys are accepted too.
/// A flag is set when either spelling says so.
#[derive(Debug, Clone, Default, Deserialize)]
struct TransportCapabilities {
    #[serde(default)]
    voice: Option<bool>,
    #[serde(default)]
    sms: Option<bool>,
    #[serde(default, rename = "SMS")]
    sms_upper: Option<bool>,
    #[serde(default)]
    mms: Option<bool>,
    #[serde(default, rename = "MMS")]
    mms_upper: Option<bool>,
}

impl From<Option<TransportCapabilities>> for Capabilities {
    fn from(value: Option<TransportCapabilities>) -> Self {
        let value = value.unwrap_or_default();
        let flag = |lower: Option<bool>, upper: Option<bool>| {
            lower.unwrap_or(false) || upper.unwrap_or(false)
        };
        Capabilities {
            voice: value.voice.unwrap_or(false),
            sms: flag(value.sms, value.sms_upper),
            mms: flag(value.mms, value.mms_upper),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TransportMeta {
    #[serde(default)]
    next_page_url: Option<String>,
}

fn param(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_owned(), value.into())
}

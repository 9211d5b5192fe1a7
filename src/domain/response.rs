use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub voice: bool,
    pub sms: bool,
    pub mms: bool,
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [("voice", self.voice), ("sms", self.sms), ("mms", self.mms)]
            .into_iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| name)
            .collect::<Vec<_>>();
        if flags.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&flags.join("/"))
        }
    }
}

/// Candidate number returned by an available-number search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableNumber {
    pub phone_number: String,
    pub friendly_name: String,
    pub city: String,
    /// Region name when it could be resolved, otherwise what the provider returned.
    pub region: String,
    pub number_type: String,
    pub capabilities: Capabilities,
    pub monthly_price: String,
}

/// Number owned by the account (`IncomingPhoneNumbers`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomingNumber {
    pub sid: String,
    pub phone_number: String,
    pub friendly_name: String,
    pub capabilities: Capabilities,
    pub voice_url: Option<String>,
    pub voice_method: Option<String>,
    pub sms_url: Option<String>,
    pub sms_method: Option<String>,
    pub status_callback: Option<String>,
    pub status_callback_method: Option<String>,
    pub iso_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasedNumber {
    pub sid: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberConfig {
    pub friendly_name: String,
    pub voice_url: Option<String>,
    pub voice_method: Option<String>,
    pub sms_url: Option<String>,
    pub sms_method: Option<String>,
    pub status_callback: Option<String>,
    pub capabilities: Capabilities,
}

impl From<&IncomingNumber> for NumberConfig {
    fn from(number: &IncomingNumber) -> Self {
        Self {
            friendly_name: number.friendly_name.clone(),
            voice_url: number.voice_url.clone(),
            voice_method: number.voice_method.clone(),
            sms_url: number.sms_url.clone(),
            sms_method: number.sms_method.clone(),
            status_callback: number.status_callback.clone(),
            capabilities: number.capabilities,
        }
    }
}

/// Number category guessed from capabilities, for numbers where Twilio does not report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Local,
    Mobile,
    TollFree,
    Unknown,
}

impl NumberKind {
    pub fn infer(capabilities: Capabilities) -> Self {
        match (capabilities.voice, capabilities.sms) {
            (true, true) => Self::Local,
            (false, true) => Self::Mobile,
            (true, false) => Self::TollFree,
            (false, false) => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Mobile => "mobile",
            Self::TollFree => "tollfree",
            Self::Unknown => "N/A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberMetadata {
    pub phone_number: String,
    pub sid: String,
    pub friendly_name: String,
    pub capabilities: Capabilities,
    pub iso_country: String,
    pub kind: NumberKind,
}

impl From<IncomingNumber> for NumberMetadata {
    fn from(number: IncomingNumber) -> Self {
        Self {
            kind: NumberKind::infer(number.capabilities),
            iso_country: number.iso_country.unwrap_or_else(|| "Unknown".to_owned()),
            phone_number: number.phone_number,
            sid: number.sid,
            friendly_name: number.friendly_name,
            capabilities: number.capabilities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReceipt {
    pub sid: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReceipt {
    pub sid: String,
    pub status: String,
}

/// Traffic direction with Twilio's API/trunking variants folded together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Inbound,
    Other(String),
}

impl Direction {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "outbound-api" | "outbound" | "outbound-call" | "outbound-dial"
            | "outbound-reply" | "trunking-originating" => Self::Outbound,
            "inbound" | "trunking-terminating" => Self::Inbound,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outbound => f.write_str("Outbound"),
            Self::Inbound => f.write_str("Inbound"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    pub sid: String,
    pub from: String,
    pub to: String,
    pub body: String,
    pub status: String,
    pub direction: Direction,
    pub date_sent: Option<String>,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    pub sid: String,
    pub from: String,
    pub to: String,
    pub status: String,
    pub direction: Direction,
    pub duration: Option<String>,
    pub start_time: Option<String>,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subaccount {
    pub sid: String,
    pub friendly_name: String,
    pub status: String,
    pub date_created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSubaccount {
    pub sid: String,
    pub friendly_name: String,
    pub auth_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDetails {
    pub sid: String,
    pub friendly_name: String,
    pub status: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub date_created: Option<String>,
    pub owner_account_sid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub currency: String,
    pub balance: String,
    pub account_sid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookEntry {
    pub url: String,
    pub method: String,
}

/// Distinct webhook URLs configured across the account's numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookSettings {
    pub voice: Vec<WebhookEntry>,
    pub sms: Vec<WebhookEntry>,
    pub status: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityListEntry {
    pub sid: String,
    pub friendly_name: String,
    pub date_created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecuritySettings {
    pub account_status: String,
    pub ip_access_rules: Vec<SecurityListEntry>,
    pub credential_lists: Vec<SecurityListEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemEvent {
    pub timestamp: String,
    pub event_type: String,
    pub description: String,
    pub actor_type: String,
    pub actor_sid: String,
    pub resource_type: String,
    pub resource_sid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageRecord {
    pub timestamp: String,
    pub category: String,
    pub count: u64,
    pub price: f64,
    pub usage: f64,
    pub usage_unit: String,
}

/// Aggregated usage across categories; categories the provider rejected are listed
/// so callers can tell the report is partial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageReport {
    pub records: Vec<UsageRecord>,
    pub skipped_categories: Vec<&'static str>,
}

impl UsageReport {
    pub fn is_partial(&self) -> bool {
        !self.skipped_categories.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityAlert {
    pub timestamp: String,
    pub alert_text: String,
    pub error_code: String,
    pub log_level: String,
    pub request_method: String,
    pub request_url: String,
    pub resource_sid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKey {
    pub sid: String,
    pub friendly_name: String,
    pub date_created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedApiKey {
    pub sid: String,
    pub friendly_name: String,
    /// Only returned once, at creation time.
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPrice {
    pub number_type: String,
    pub base_price: String,
    pub current_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryPricing {
    pub country: String,
    pub iso_country: String,
    pub price_unit: String,
    pub prices: Vec<NumberPrice>,
}

impl CountryPricing {
    pub fn price_for(&self, number_type: &str) -> Option<&NumberPrice> {
        self.prices
            .iter()
            .find(|price| price.number_type.eq_ignore_ascii_case(number_type))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillingSummary {
    pub active_numbers: usize,
    pub balance: Balance,
    pub price_per_number: Option<String>,
    pub monthly_recurring: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub account_updated: bool,
    pub numbers_renamed: usize,
    pub numbers_missing: usize,
    pub webhooks_applied: usize,
    pub security_changes: usize,
}

/// Owned number as written to a configuration export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberSnapshot {
    pub sid: String,
    pub phone_number: String,
    pub friendly_name: String,
    pub capabilities: Capabilities,
}

impl From<&IncomingNumber> for NumberSnapshot {
    fn from(number: &IncomingNumber) -> Self {
        Self {
            sid: number.sid.clone(),
            phone_number: number.phone_number.clone(),
            friendly_name: number.friendly_name.clone(),
            capabilities: number.capabilities,
        }
    }
}

/// Account configuration as exported; the JSON form is accepted back by import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSnapshot {
    pub exported_at: String,
    pub account: AccountDetails,
    pub numbers: Vec<NumberSnapshot>,
    pub webhooks: WebhookSettings,
    pub security: SecuritySettings,
}

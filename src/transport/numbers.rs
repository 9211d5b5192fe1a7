use serde::Deserialize;

use super::{Page, TransportCapabilities, TransportError, param};
use crate::domain::{FriendlyName, IncomingNumber, NumberConfigUpdate, PhoneNumber, PurchasedNumber};

#[derive(Debug, Clone, Deserialize)]
struct IncomingNumbersJsonResponse {
    #[serde(default)]
    incoming_phone_numbers: Vec<IncomingNumberJson>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct IncomingNumberJson {
    sid: String,
    phone_number: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    capabilities: Option<TransportCapabilities>,
    #[serde(default)]
    voice_url: Option<String>,
    #[serde(default)]
    voice_method: Option<String>,
    #[serde(default)]
    sms_url: Option<String>,
    #[serde(default)]
    sms_method: Option<String>,
    #[serde(default)]
    status_callback: Option<String>,
    #[serde(default)]
    status_callback_method: Option<String>,
    #[serde(default)]
    iso_country: Option<String>,
}

impl From<IncomingNumberJson> for IncomingNumber {
    fn from(value: IncomingNumberJson) -> Self {
        IncomingNumber {
            sid: value.sid,
            phone_number: value.phone_number,
            friendly_name: value.friendly_name.unwrap_or_default(),
            capabilities: value.capabilities.into(),
            voice_url: non_empty(value.voice_url),
            voice_method: value.voice_method,
            sms_url: non_empty(value.sms_url),
            sms_method: value.sms_method,
            status_callback: non_empty(value.status_callback),
            status_callback_method: value.status_callback_method,
            iso_country: value.iso_country,
        }
    }
}

/// Twilio reports unset webhook URLs as `""` or `null`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn encode_purchase_form(phone: &PhoneNumber) -> Vec<(String, String)> {
    vec![param(PhoneNumber::FIELD, phone.e164())]
}

pub fn encode_number_lookup_query(phone: &PhoneNumber) -> Vec<(String, String)> {
    vec![param(PhoneNumber::FIELD, phone.e164())]
}

pub fn encode_number_update_form(update: &NumberConfigUpdate) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(name) = update.friendly_name.as_ref() {
        params.push(param(FriendlyName::FIELD, name.as_str()));
    }
    if let Some(url) = update.voice_url.as_ref() {
        params.push(param("VoiceUrl", url.as_str()));
    }
    if let Some(method) = update.voice_method {
        params.push(param("VoiceMethod", method.as_str()));
    }
    if let Some(url) = update.sms_url.as_ref() {
        params.push(param("SmsUrl", url.as_str()));
    }
    if let Some(method) = update.sms_method {
        params.push(param("SmsMethod", method.as_str()));
    }
    if let Some(url) = update.status_callback.as_ref() {
        params.push(param("StatusCallback", url.as_str()));
    }
    if let Some(method) = update.status_callback_method {
        params.push(param("StatusCallbackMethod", method.as_str()));
    }
    params
}

pub fn decode_incoming_numbers_page(json: &str) -> Result<Page<IncomingNumber>, TransportError> {
    let parsed: IncomingNumbersJsonResponse = serde_json::from_str(json)?;
    Ok(Page {
        items: parsed
            .incoming_phone_numbers
            .into_iter()
            .map(IncomingNumber::from)
            .collect(),
        next: parsed.next_page_uri,
    })
}

pub fn decode_incoming_number(json: &str) -> Result<IncomingNumber, TransportError> {
    let parsed: IncomingNumberJson = serde_json::from_str(json)?;
    Ok(parsed.into())
}

pub fn decode_purchased_number(json: &str) -> Result<PurchasedNumber, TransportError> {
    let parsed: IncomingNumberJson = serde_json::from_str(json)?;
    Ok(PurchasedNumber {
        sid: parsed.sid,
        phone_number: parsed.phone_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{WebhookKind, WebhookMethod, WebhookUrl};

    #[test]
    fn purchase_and_lookup_use_e164() {
        let phone = PhoneNumber::international("+1 415 555 2671").unwrap();
        assert_eq!(
            encode_purchase_form(&phone),
            vec![param("PhoneNumber", "+14155552671")]
        );
        assert_eq!(
            encode_number_lookup_query(&phone),
            vec![param("PhoneNumber", "+14155552671")]
        );
    }

    #[test]
    fn update_form_only_contains_set_fields() {
        let update = NumberConfigUpdate {
            friendly_name: Some(FriendlyName::new("Support line").unwrap()),
            ..NumberConfigUpdate::webhook(
                WebhookKind::Status,
                WebhookUrl::new("https://example.com/status").unwrap(),
                WebhookMethod::Get,
            )
        };
        assert_eq!(
            encode_number_update_form(&update),
            vec![
                param("FriendlyName", "Support line"),
                param("StatusCallback", "https://example.com/status"),
                param("StatusCallbackMethod", "GET"),
            ]
        );
    }

    #[test]
    fn decode_page_maps_numbers_and_cursor() {
        let json = r#"
        {
          "incoming_phone_numbers": [
            {
              "sid": "PN123",
              "phone_number": "+14155552671",
              "friendly_name": "Main",
              "capabilities": {"voice": true, "sms": true, "mms": true},
              "voice_url": "https://example.com/voice",
              "voice_method": "POST",
              "sms_url": "",
              "sms_method": "POST",
              "status_callback": null,
              "iso_country": "US"
            }
          ],
          "next_page_uri": "/2010-04-01/Accounts/AC1/IncomingPhoneNumbers.json?Page=1"
        }
        "#;
        let page = decode_incoming_numbers_page(json).unwrap();
        assert_eq!(page.items.len(), 1);

        let number = &page.items[0];
        assert_eq!(number.sid, "PN123");
        assert!(number.capabilities.mms);
        assert_eq!(
            number.voice_url.as_deref(),
            Some("https://example.com/voice")
        );
        assert_eq!(number.sms_url, None);
        assert_eq!(number.status_callback, None);
        assert_eq!(number.iso_country.as_deref(), Some("US"));
        assert!(page.next.unwrap().ends_with("Page=1"));
    }

    #[test]
    fn decode_purchased_number_reads_sid() {
        let json = r#"{"sid": "PN9", "phone_number": "+14155552671", "friendly_name": null}"#;
        let purchased = decode_purchased_number(json).unwrap();
        assert_eq!(purchased.sid, "PN9");
        assert_eq!(purchased.phone_number, "+14155552671");
    }
}

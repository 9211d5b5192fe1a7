use serde::Deserialize;

use super::money::TransportMoney;
use super::{Page, TransportError, param};
use crate::domain::{
    CallInstructions, CallReceipt, CallRecord, Direction, MessageBody, MessageReceipt,
    MessageRecord, PhoneNumber, PlaceCall, SendSms,
};

const DEFAULT_PRICE: &str = "0";

#[derive(Debug, Clone, Deserialize)]
struct ReceiptJson {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessagesJsonResponse {
    #[serde(default)]
    messages: Vec<MessageJson>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageJson {
    sid: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    date_sent: Option<String>,
    #[serde(default)]
    price: Option<TransportMoney>,
}

#[derive(Debug, Clone, Deserialize)]
struct CallsJsonResponse {
    #[serde(default)]
    calls: Vec<CallJson>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CallJson {
    sid: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    from_formatted: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    to_formatted: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    price: Option<TransportMoney>,
}

pub fn encode_send_sms_form(request: &SendSms) -> Vec<(String, String)> {
    vec![
        param("From", request.from().e164()),
        param("To", request.to().e164()),
        param(MessageBody::FIELD, request.body().as_str()),
    ]
}

pub fn encode_place_call_form(request: &PlaceCall) -> Vec<(String, String)> {
    let mut params = vec![
        param("From", request.from().e164()),
        param("To", request.to().e164()),
    ];
    match request.instructions() {
        CallInstructions::Url(url) => params.push(param("Url", url.as_str())),
        CallInstructions::Twiml(document) => params.push(param("Twiml", document.as_str())),
    }
    params
}

/// Optional `From` filter for message and call logs.
pub fn encode_log_filter_query(from: Option<&PhoneNumber>) -> Vec<(String, String)> {
    from.map(|phone| vec![param("From", phone.e164())])
        .unwrap_or_default()
}

pub fn decode_message_receipt(json: &str) -> Result<MessageReceipt, TransportError> {
    let parsed: ReceiptJson = serde_json::from_str(json)?;
    Ok(MessageReceipt {
        sid: parsed.sid,
        status: parsed.status.unwrap_or_default(),
    })
}

pub fn decode_call_receipt(json: &str) -> Result<CallReceipt, TransportError> {
    let parsed: ReceiptJson = serde_json::from_str(json)?;
    Ok(CallReceipt {
        sid: parsed.sid,
        status: parsed.status.unwrap_or_default(),
    })
}

pub fn decode_messages_page(json: &str) -> Result<Page<MessageRecord>, TransportError> {
    let parsed: MessagesJsonResponse = serde_json::from_str(json)?;
    let items = parsed
        .messages
        .into_iter()
        .map(|msg| MessageRecord {
            sid: msg.sid,
            from: msg.from.unwrap_or_default(),
            to: msg.to.unwrap_or_default(),
            body: msg.body.unwrap_or_default(),
            status: msg.status.unwrap_or_default(),
            direction: Direction::from_wire(msg.direction.as_deref().unwrap_or_default()),
            date_sent: msg.date_sent,
            price: price_or_default(msg.price),
        })
        .collect();
    Ok(Page {
        items,
        next: parsed.next_page_uri,
    })
}

pub fn decode_calls_page(json: &str) -> Result<Page<CallRecord>, TransportError> {
    let parsed: CallsJsonResponse = serde_json::from_str(json)?;
    let items = parsed
        .calls
        .into_iter()
        .map(|call| CallRecord {
            sid: call.sid,
            from: prefer_formatted(call.from_formatted, call.from),
            to: prefer_formatted(call.to_formatted, call.to),
            status: call.status.unwrap_or_default(),
            direction: Direction::from_wire(call.direction.as_deref().unwrap_or_default()),
            duration: call.duration,
            start_time: call.start_time,
            price: price_or_default(call.price),
        })
        .collect();
    Ok(Page {
        items,
        next: parsed.next_page_uri,
    })
}

fn prefer_formatted(formatted: Option<String>, raw: Option<String>) -> String {
    formatted
        .filter(|value| !value.is_empty())
        .or(raw)
        .unwrap_or_default()
}

fn price_or_default(price: Option<TransportMoney>) -> String {
    price
        .map(TransportMoney::into_string)
        .unwrap_or_else(|| DEFAULT_PRICE.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WebhookUrl;

    fn phone(value: &str) -> PhoneNumber {
        PhoneNumber::international(value).unwrap()
    }

    #[test]
    fn send_sms_form_params() {
        let request = SendSms::new(
            phone("+14155552671"),
            phone("+14155552672"),
            MessageBody::new("hello").unwrap(),
        );
        assert_eq!(
            encode_send_sms_form(&request),
            vec![
                param("From", "+14155552671"),
                param("To", "+14155552672"),
                param("Body", "hello"),
            ]
        );
    }

    #[test]
    fn place_call_uses_url_or_twiml() {
        let url = PlaceCall::new(
            phone("+14155552671"),
            phone("+14155552672"),
            CallInstructions::Url(WebhookUrl::new("https://example.com/twiml").unwrap()),
        );
        assert!(encode_place_call_form(&url).contains(&param("Url", "https://example.com/twiml")));

        let twiml = PlaceCall::new(
            phone("+14155552671"),
            phone("+14155552672"),
            CallInstructions::twiml("<Response><Say>Hi</Say></Response>").unwrap(),
        );
        let params = encode_place_call_form(&twiml);
        assert!(params.contains(&param("Twiml", "<Response><Say>Hi</Say></Response>")));
        assert!(!params.iter().any(|(k, _)| k == "Url"));
    }

    #[test]
    fn log_filter_is_optional() {
        assert!(encode_log_filter_query(None).is_empty());
        assert_eq!(
            encode_log_filter_query(Some(&phone("+14155552671"))),
            vec![param("From", "+14155552671")]
        );
    }

    #[test]
    fn decode_messages_normalizes_direction_and_price() {
        let json = r#"
        {
          "messages": [
            {
              "sid": "SM1",
              "from": "+14155552671",
              "to": "+14155552672",
              "body": "hi",
              "status": "delivered",
              "direction": "outbound-api",
              "date_sent": "Mon, 01 Jan 2024 10:00:00 +0000",
              "price": "-0.00790"
            },
            {
              "sid": "SM2",
              "direction": "inbound",
              "price": null
            }
          ],
          "next_page_uri": null
        }
        "#;
        let page = decode_messages_page(json).unwrap();
        assert_eq!(page.next, None);
        assert_eq!(page.items[0].direction, Direction::Outbound);
        assert_eq!(page.items[0].price, "-0.00790");
        assert_eq!(page.items[1].direction, Direction::Inbound);
        assert_eq!(page.items[1].price, "0");
        assert_eq!(page.items[1].date_sent, None);
    }

    #[test]
    fn decode_calls_prefers_formatted_numbers() {
        let json = r#"
        {
          "calls": [
            {
              "sid": "CA1",
              "from": "+14155552671",
              "from_formatted": "(415) 555-2671",
              "to": "+14155552672",
              "to_formatted": "",
              "status": "completed",
              "direction": "trunking-originating",
              "duration": "42",
              "start_time": "Mon, 01 Jan 2024 10:00:00 +0000",
              "price": -0.013
            }
          ]
        }
        "#;
        let page = decode_calls_page(json).unwrap();
        let call = &page.items[0];
        assert_eq!(call.from, "(415) 555-2671");
        assert_eq!(call.to, "+14155552672");
        assert_eq!(call.direction, Direction::Outbound);
        assert_eq!(call.duration.as_deref(), Some("42"));
        assert_eq!(call.price, "-0.013");
    }

    #[test]
    fn decode_receipts() {
        let receipt = decode_message_receipt(r#"{"sid": "SM1", "status": "queued"}"#).unwrap();
        assert_eq!(receipt.status, "queued");
        let receipt = decode_call_receipt(r#"{"sid": "CA1"}"#).unwrap();
        assert_eq!(receipt.sid, "CA1");
        assert_eq!(receipt.status, "");
    }
}

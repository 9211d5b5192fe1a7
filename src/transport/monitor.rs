use chrono::NaiveDate;
use serde::Deserialize;

use super::money::TransportMoney;
use super::{Page, TransportError, TransportMeta, param};
use crate::domain::{SecurityAlert, SystemEvent, UsageRecord};

/// Usage categories queried for the API activity report.
pub const USAGE_CATEGORIES: [&str; 14] = [
    "calls",
    "calls-client",
    "calls-inbound",
    "calls-outbound",
    "sms",
    "sms-inbound",
    "sms-outbound",
    "mms",
    "mms-inbound",
    "mms-outbound",
    "phonenumbers",
    "phonenumbers-local",
    "phonenumbers-mobile",
    "phonenumbers-tollfree",
];

const USAGE_DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_USAGE_UNIT: &str = "units";

#[derive(Debug, Clone, Deserialize)]
struct EventsJsonResponse {
    #[serde(default)]
    events: Vec<EventJson>,
    #[serde(default)]
    meta: TransportMeta,
}

#[derive(Debug, Clone, Deserialize)]
struct EventJson {
    #[serde(default)]
    event_date: Option<String>,
    #[serde(default)]
    event_type: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    actor_type: Option<String>,
    #[serde(default)]
    actor_sid: Option<String>,
    #[serde(default)]
    resource_type: Option<String>,
    #[serde(default)]
    resource_sid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct AlertsJsonResponse {
    #[serde(default)]
    alerts: Vec<AlertJson>,
    #[serde(default)]
    meta: TransportMeta,
}

#[derive(Debug, Clone, Deserialize)]
struct AlertJson {
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    alert_text: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    request_method: Option<String>,
    #[serde(default)]
    request_url: Option<String>,
    #[serde(default)]
    resource_sid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UsageRecordsJsonResponse {
    #[serde(default)]
    usage_records: Vec<UsageRecordJson>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UsageRecordJson {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    count: Option<TransportMoney>,
    #[serde(default)]
    usage: Option<TransportMoney>,
    #[serde(default)]
    usage_unit: Option<String>,
    #[serde(default)]
    price: Option<TransportMoney>,
}

pub fn encode_usage_query(
    category: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(String, String)> {
    vec![
        param("Category", category),
        param("StartDate", start.format(USAGE_DATE_FORMAT).to_string()),
        param("EndDate", end.format(USAGE_DATE_FORMAT).to_string()),
    ]
}

pub fn decode_events_page(json: &str) -> Result<Page<SystemEvent>, TransportError> {
    let parsed: EventsJsonResponse = serde_json::from_str(json)?;
    let items = parsed
        .events
        .into_iter()
        .map(|event| SystemEvent {
            timestamp: event.event_date.unwrap_or_default(),
            event_type: event.event_type.unwrap_or_default(),
            description: event.description.unwrap_or_default(),
            actor_type: event.actor_type.unwrap_or_default(),
            actor_sid: event.actor_sid.unwrap_or_default(),
            resource_type: event.resource_type.unwrap_or_default(),
            resource_sid: event.resource_sid.unwrap_or_default(),
        })
        .collect();
    Ok(Page {
        items,
        next: parsed.meta.next_page_url,
    })
}

pub fn decode_alerts_page(json: &str) -> Result<Page<SecurityAlert>, TransportError> {
    let parsed: AlertsJsonResponse = serde_json::from_str(json)?;
    let items = parsed
        .alerts
        .into_iter()
        .map(|alert| SecurityAlert {
            timestamp: alert.date_created.unwrap_or_default(),
            alert_text: alert.alert_text.unwrap_or_default(),
            error_code: alert.error_code.unwrap_or_default(),
            log_level: alert.log_level.unwrap_or_default(),
            request_method: alert.request_method.unwrap_or_default(),
            request_url: alert.request_url.unwrap_or_default(),
            resource_sid: alert.resource_sid.unwrap_or_default(),
        })
        .collect();
    Ok(Page {
        items,
        next: parsed.meta.next_page_url,
    })
}

pub fn decode_usage_records_page(
    category: &str,
    json: &str,
) -> Result<Page<UsageRecord>, TransportError> {
    let parsed: UsageRecordsJsonResponse = serde_json::from_str(json)?;
    let items = parsed
        .usage_records
        .into_iter()
        .map(|record| UsageRecord {
            timestamp: record.start_date.unwrap_or_default(),
            category: record.category.unwrap_or_else(|| category.to_owned()),
            count: record
                .count
                .map(|count| count.as_f64().max(0.0) as u64)
                .unwrap_or(0),
            price: record.price.map(|price| price.as_f64()).unwrap_or(0.0),
            usage: record.usage.map(|usage| usage.as_f64()).unwrap_or(0.0),
            usage_unit: record
                .usage_unit
                .filter(|unit| !unit.is_empty())
                .unwrap_or_else(|| DEFAULT_USAGE_UNIT.to_owned()),
        })
        .collect();
    Ok(Page {
        items,
        next: parsed.next_page_uri,
    })
}

/// Drop idle records and order the rest newest first.
pub fn summarize_usage(mut records: Vec<UsageRecord>) -> Vec<UsageRecord> {
    records.retain(|record| record.count > 0 || record.usage > 0.0 || record.price > 0.0);
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: &str, count: u64, usage: f64, price: f64) -> UsageRecord {
        UsageRecord {
            timestamp: timestamp.to_owned(),
            category: "sms".to_owned(),
            count,
            price,
            usage,
            usage_unit: "segments".to_owned(),
        }
    }

    #[test]
    fn usage_query_formats_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(
            encode_usage_query("sms", start, end),
            vec![
                param("Category", "sms"),
                param("StartDate", "2024-01-02"),
                param("EndDate", "2024-02-01"),
            ]
        );
    }

    #[test]
    fn decode_events_follow_meta_cursor() {
        let json = r#"
        {
          "events": [
            {
              "event_date": "2024-01-01T10:00:00Z",
              "event_type": "account.updated",
              "description": "Account updated",
              "actor_type": "account",
              "actor_sid": "AC1",
              "resource_type": "account",
              "resource_sid": "AC1"
            }
          ],
          "meta": {"next_page_url": "https://monitor.twilio.com/v1/Events?PageToken=PT1"}
        }
        "#;
        let page = decode_events_page(json).unwrap();
        assert_eq!(page.items[0].event_type, "account.updated");
        assert_eq!(
            page.next.as_deref(),
            Some("https://monitor.twilio.com/v1/Events?PageToken=PT1")
        );
    }

    #[test]
    fn decode_alerts_without_meta() {
        let json = r#"{"alerts": [{"alert_text": "Invalid URL", "error_code": "11200", "log_level": "error"}]}"#;
        let page = decode_alerts_page(json).unwrap();
        assert_eq!(page.items[0].error_code, "11200");
        assert_eq!(page.items[0].timestamp, "");
        assert_eq!(page.next, None);
    }

    #[test]
    fn decode_usage_records_parses_numeric_strings() {
        let json = r#"
        {
          "usage_records": [
            {"category": "sms", "start_date": "2024-01-01", "count": "12", "usage": "14", "usage_unit": "segments", "price": "0.0948"},
            {"start_date": "2024-01-01", "count": "0", "usage": "0", "usage_unit": "", "price": null}
          ]
        }
        "#;
        let page = decode_usage_records_page("calls", json).unwrap();
        assert_eq!(page.items[0].count, 12);
        assert!((page.items[0].price - 0.0948).abs() < 1e-9);
        assert_eq!(page.items[1].category, "calls");
        assert_eq!(page.items[1].usage_unit, "units");
    }

    #[test]
    fn summarize_keeps_active_records_newest_first() {
        let records = vec![
            record("2024-01-01", 1, 0.0, 0.0),
            record("2024-03-01", 0, 0.0, 0.0),
            record("2024-02-01", 0, 0.0, 0.5),
            record("2024-01-15", 0, 2.0, 0.0),
            record("2024-04-01", 0, 0.0, -0.5),
        ];
        let summary = summarize_usage(records);
        let dates: Vec<_> = summary.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(dates, ["2024-02-01", "2024-01-15", "2024-01-01"]);
    }
}

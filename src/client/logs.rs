use chrono::{Days, NaiveDate, Utc};

use super::{GatewayError, TwilioGateway};
use crate::domain::{
    CallRecord, MessageRecord, PhoneNumber, SecurityAlert, SystemEvent, UsageReport,
};
use crate::transport;

/// Length of the usage window for the API activity report.
const USAGE_WINDOW_DAYS: u64 = 30;

impl TwilioGateway {
    /// Messages sent or received by the active account, optionally only those from `from`.
    pub async fn get_messaging_logs(
        &self,
        from: Option<&PhoneNumber>,
    ) -> Result<Vec<MessageRecord>, GatewayError> {
        self.fetch_all(
            self.account_url("Messages.json"),
            transport::encode_log_filter_query(from),
            transport::decode_messages_page,
        )
        .await
    }

    pub async fn get_call_logs(
        &self,
        from: Option<&PhoneNumber>,
    ) -> Result<Vec<CallRecord>, GatewayError> {
        self.fetch_all(
            self.account_url("Calls.json"),
            transport::encode_log_filter_query(from),
            transport::decode_calls_page,
        )
        .await
    }

    pub async fn get_system_logs(&self) -> Result<Vec<SystemEvent>, GatewayError> {
        self.fetch_all(
            self.monitor_url("Events"),
            Vec::new(),
            transport::decode_events_page,
        )
        .await
    }

    /// Usage over the last 30 days across the fixed category list.
    ///
    /// Categories are queried one after another. A category that fails is
    /// logged, skipped, and named in [`UsageReport::skipped_categories`].
    pub async fn get_api_logs(&self) -> Result<UsageReport, GatewayError> {
        let end = Utc::now().date_naive();
        self.usage_report(end).await
    }

    pub async fn get_security_logs(&self) -> Result<Vec<SecurityAlert>, GatewayError> {
        self.fetch_all(
            self.monitor_url("Alerts"),
            Vec::new(),
            transport::decode_alerts_page,
        )
        .await
    }

    async fn usage_report(&self, end: NaiveDate) -> Result<UsageReport, GatewayError> {
        let start = end
            .checked_sub_days(Days::new(USAGE_WINDOW_DAYS))
            .unwrap_or(end);

        let mut records = Vec::new();
        let mut skipped_categories = Vec::new();
        for category in transport::USAGE_CATEGORIES {
            let result = self
                .fetch_all(
                    self.account_url("Usage/Records.json"),
                    transport::encode_usage_query(category, start, end),
                    |body| transport::decode_usage_records_page(category, body),
                )
                .await;
            match result {
                Ok(page) => records.extend(page),
                Err(err) => {
                    log::warn!("skipping usage category {category}: {err}");
                    skipped_categories.push(category);
                }
            }
        }

        Ok(UsageReport {
            records: transport::summarize_usage(records),
            skipped_categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::Method;
    use super::super::testing::{FakeTransport, assert_param, gateway};
    use super::*;
    use crate::domain::Direction;

    #[tokio::test]
    async fn messaging_logs_filter_by_sender() {
        let transport = FakeTransport::new().route(
            Method::Get,
            "/Messages.json",
            200,
            r#"{"messages": [{"sid": "SM1", "direction": "outbound-api", "price": "-0.0079"}], "next_page_uri": null}"#,
        );
        let from = PhoneNumber::international("+14155552671").unwrap();
        let logs = gateway(&transport)
            .get_messaging_logs(Some(&from))
            .await
            .unwrap();
        assert_eq!(logs[0].direction, Direction::Outbound);
        assert_param(
            &transport.last_request().unwrap().params,
            "From",
            "+14155552671",
        );
    }

    #[tokio::test]
    async fn call_logs_without_filter_send_no_params() {
        let transport = FakeTransport::new().route(
            Method::Get,
            "/Calls.json",
            200,
            r#"{"calls": [{"sid": "CA1", "direction": "inbound"}]}"#,
        );
        let logs = gateway(&transport).get_call_logs(None).await.unwrap();
        assert_eq!(logs[0].direction, Direction::Inbound);
        assert!(transport.last_request().unwrap().params.is_empty());
    }

    #[tokio::test]
    async fn system_logs_use_monitor_endpoint() {
        let transport = FakeTransport::new().route(
            Method::Get,
            "/v1/Events",
            200,
            r#"{"events": [{"event_type": "account.updated"}], "meta": {"next_page_url": null}}"#,
        );
        let events = gateway(&transport).get_system_logs().await.unwrap();
        assert_eq!(events[0].event_type, "account.updated");
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://monitor.example.invalid/v1/Events"
        );
    }

    #[tokio::test]
    async fn usage_report_skips_failed_categories_and_sorts() {
        let transport = FakeTransport::new()
            .route(
                Method::Get,
                "/Usage/Records.json",
                200,
                r#"
                {
                  "usage_records": [
                    {"start_date": "2024-01-10", "count": "3", "usage": "3", "price": "0.02"},
                    {"start_date": "2024-01-15", "count": "0", "usage": "0", "price": "0"},
                    {"start_date": "2024-01-20", "count": "1", "usage": "1", "price": "0.01"}
                  ]
                }
                "#,
            )
            .fail(Method::Get, "/Usage/Records.json?Category=sms&");
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let report = gateway(&transport).usage_report(end).await.unwrap();
        assert_eq!(report.skipped_categories, ["sms"]);
        assert_eq!(
            report.records.len(),
            2 * (transport::USAGE_CATEGORIES.len() - 1)
        );
        assert!(report.records.iter().all(|record| record.category != "sms"));
        assert_eq!(report.records[0].timestamp, "2024-01-20");
        assert_eq!(report.records.last().unwrap().timestamp, "2024-01-10");

        let requests = transport.requests();
        assert_eq!(requests.len(), transport::USAGE_CATEGORIES.len());
        assert_param(&requests[0].params, "Category", "calls");
        assert_param(&requests[0].params, "StartDate", "2024-01-01");
        assert_param(&requests[0].params, "EndDate", "2024-01-31");
        assert_param(&requests[13].params, "Category", "phonenumbers-tollfree");
    }

    #[tokio::test]
    async fn usage_report_names_skipped_categories() {
        let transport = FakeTransport::new().fail(Method::Get, "/Usage/Records.json");
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let report = gateway(&transport).usage_report(end).await.unwrap();
        assert!(report.records.is_empty());
        assert!(report.is_partial());
        assert_eq!(report.skipped_categories.len(), 14);
        assert_eq!(report.skipped_categories[0], "calls");
    }
}

//! CSV rendering shared by configuration and log exports.

use std::borrow::Cow;

use crate::domain::{CallRecord, MessageRecord, SecurityAlert, SystemEvent, UsageRecord};

/// Row-oriented CSV builder. Fields containing a comma, quote or line break are quoted.
#[derive(Debug, Default)]
pub struct CsvWriter {
    out: String,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first = true;
        for field in fields {
            if !first {
                self.out.push(',');
            }
            first = false;
            self.out.push_str(&escape(field.as_ref()));
        }
        self.out.push('\n');
        self
    }

    /// Empty line separating sections.
    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// A record that can be written as one CSV row under fixed headers.
pub trait CsvRecord {
    const HEADERS: &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

/// Header row followed by one row per record.
pub fn records_to_csv<T: CsvRecord>(records: &[T]) -> String {
    let mut writer = CsvWriter::new();
    writer.row(T::HEADERS);
    for record in records {
        writer.row(record.fields());
    }
    writer.finish()
}

impl CsvRecord for MessageRecord {
    const HEADERS: &'static [&'static str] =
        &["sid", "from", "to", "body", "status", "direction", "date_sent", "price"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.sid.clone(),
            self.from.clone(),
            self.to.clone(),
            self.body.clone(),
            self.status.clone(),
            self.direction.to_string(),
            self.date_sent.clone().unwrap_or_default(),
            self.price.clone(),
        ]
    }
}

impl CsvRecord for CallRecord {
    const HEADERS: &'static [&'static str] = &[
        "sid",
        "from",
        "to",
        "status",
        "direction",
        "duration",
        "start_time",
        "price",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.sid.clone(),
            self.from.clone(),
            self.to.clone(),
            self.status.clone(),
            self.direction.to_string(),
            self.duration.clone().unwrap_or_default(),
            self.start_time.clone().unwrap_or_default(),
            self.price.clone(),
        ]
    }
}

impl CsvRecord for SystemEvent {
    const HEADERS: &'static [&'static str] = &[
        "timestamp",
        "event_type",
        "description",
        "actor_type",
        "actor_sid",
        "resource_type",
        "resource_sid",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.event_type.clone(),
            self.description.clone(),
            self.actor_type.clone(),
            self.actor_sid.clone(),
            self.resource_type.clone(),
            self.resource_sid.clone(),
        ]
    }
}

impl CsvRecord for UsageRecord {
    const HEADERS: &'static [&'static str] =
        &["timestamp", "category", "count", "usage", "usage_unit", "price"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.category.clone(),
            self.count.to_string(),
            self.usage.to_string(),
            self.usage_unit.clone(),
            self.price.to_string(),
        ]
    }
}

impl CsvRecord for SecurityAlert {
    const HEADERS: &'static [&'static str] = &[
        "timestamp",
        "alert_text",
        "error_code",
        "log_level",
        "request_method",
        "request_url",
        "resource_sid",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.alert_text.clone(),
            self.error_code.clone(),
            self.log_level.clone(),
            self.request_method.clone(),
            self.request_url.clone(),
            self.resource_sid.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    #[test]
    fn fields_are_quoted_only_when_needed() {
        let mut writer = CsvWriter::new();
        writer
            .row(["plain", "with,comma", "say \"hi\"", "two\nlines"])
            .blank()
            .row(["Section"]);
        assert_eq!(
            writer.finish(),
            "plain,\"with,comma\",\"say \"\"hi\"\"\",\"two\nlines\"\n\nSection\n"
        );
    }

    #[test]
    fn records_render_with_headers() {
        let records = vec![MessageRecord {
            sid: "SM1".to_owned(),
            from: "+14155552671".to_owned(),
            to: "+14155552672".to_owned(),
            body: "hello, world".to_owned(),
            status: "delivered".to_owned(),
            direction: Direction::Outbound,
            date_sent: None,
            price: "-0.0079".to_owned(),
        }];
        let csv = records_to_csv(&records);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("sid,from,to,body,status,direction,date_sent,price")
        );
        assert_eq!(
            lines.next(),
            Some("SM1,+14155552671,+14155552672,\"hello, world\",delivered,Outbound,,-0.0079")
        );
        assert_eq!(lines.next(), None);
    }
}

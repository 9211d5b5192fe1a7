use serde::Deserialize;

use super::{Page, TransportError};
use crate::domain::SecurityListEntry;

#[derive(Debug, Clone, Deserialize)]
struct IpAccessListsJsonResponse {
    #[serde(default)]
    ip_access_control_lists: Vec<ListJson>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CredentialListsJsonResponse {
    #[serde(default)]
    credential_lists: Vec<ListJson>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ListJson {
    sid: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
}

impl From<ListJson> for SecurityListEntry {
    fn from(value: ListJson) -> Self {
        SecurityListEntry {
            sid: value.sid,
            friendly_name: value.friendly_name.unwrap_or_default(),
            date_created: value.date_created,
        }
    }
}

pub fn decode_ip_access_lists_page(
    json: &str,
) -> Result<Page<SecurityListEntry>, TransportError> {
    let parsed: IpAccessListsJsonResponse = serde_json::from_str(json)?;
    Ok(Page {
        items: parsed
            .ip_access_control_lists
            .into_iter()
            .map(SecurityListEntry::from)
            .collect(),
        next: parsed.next_page_uri,
    })
}

pub fn decode_credential_lists_page(
    json: &str,
) -> Result<Page<SecurityListEntry>, TransportError> {
    let parsed: CredentialListsJsonResponse = serde_json::from_str(json)?;
    Ok(Page {
        items: parsed
            .credential_lists
            .into_iter()
            .map(SecurityListEntry::from)
            .collect(),
        next: parsed.next_page_uri,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ip_access_lists() {
        let json = r#"
        {
          "ip_access_control_lists": [
            {"sid": "AL1", "friendly_name": "office", "date_created": "Mon, 01 Jan 2024 10:00:00 +0000"}
          ],
          "next_page_uri": null
        }
        "#;
        let page = decode_ip_access_lists_page(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].friendly_name, "office");
    }

    #[test]
    fn decode_credential_lists_defaults_missing_name() {
        let json = r#"{"credential_lists": [{"sid": "CL1"}]}"#;
        let page = decode_credential_lists_page(json).unwrap();
        assert_eq!(page.items[0].sid, "CL1");
        assert_eq!(page.items[0].friendly_name, "");
        assert_eq!(page.items[0].date_created, None);
    }
}

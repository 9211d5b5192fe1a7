use serde::Deserialize;

use super::TransportError;
use crate::domain::{
    AccountStatus, FriendlyName, ImportPlan, ImportedListEntry, PhoneNumber, ResourceSid,
    WebhookKind, WebhookMethod, WebhookUrl,
};

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigDocumentJson {
    #[serde(default)]
    account: Option<AccountSectionJson>,
    #[serde(default)]
    numbers: Vec<NumberSectionJson>,
    #[serde(default)]
    webhooks: Option<WebhooksSectionJson>,
    #[serde(default)]
    security: Option<SecuritySectionJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct AccountSectionJson {
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct NumberSectionJson {
    phone_number: String,
    #[serde(default)]
    friendly_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WebhooksSectionJson {
    #[serde(default)]
    voice: Vec<WebhookJson>,
    #[serde(default)]
    sms: Vec<WebhookJson>,
    #[serde(default)]
    status: Vec<WebhookJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct WebhookJson {
    url: String,
    #[serde(default)]
    method: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SecuritySectionJson {
    #[serde(default)]
    ip_access_rules: Vec<ListEntryJson>,
    #[serde(default)]
    credential_lists: Vec<ListEntryJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct ListEntryJson {
    #[serde(default)]
    sid: Option<String>,
    friendly_name: String,
}

/// Parse an exported configuration document into the changes it describes.
///
/// Every value is validated before anything is applied, so a bad document is
/// rejected as a whole.
pub fn decode_import_plan(json: &str) -> Result<ImportPlan, TransportError> {
    let parsed: ConfigDocumentJson = serde_json::from_str(json)?;
    let mut plan = ImportPlan::default();

    if let Some(account) = parsed.account {
        plan.account_name = account
            .friendly_name
            .filter(|name| !name.trim().is_empty())
            .map(FriendlyName::new)
            .transpose()?;
        plan.account_status = account
            .status
            .as_deref()
            .map(AccountStatus::parse)
            .transpose()?;
    }

    for number in parsed.numbers {
        let Some(name) = number.friendly_name.filter(|name| !name.trim().is_empty()) else {
            continue;
        };
        plan.number_names.push((
            PhoneNumber::international(number.phone_number)?,
            FriendlyName::new(name)?,
        ));
    }

    if let Some(webhooks) = parsed.webhooks {
        let sections = [
            (WebhookKind::Voice, webhooks.voice),
            (WebhookKind::Sms, webhooks.sms),
            (WebhookKind::Status, webhooks.status),
        ];
        for (kind, entries) in sections {
            let mut chosen = None;
            for entry in entries {
                let method = match entry.method.as_deref() {
                    Some(method) => WebhookMethod::parse(method)?,
                    None => WebhookMethod::default(),
                };
                chosen = Some((kind, WebhookUrl::new(entry.url)?, method));
            }
            // Later entries overwrite earlier ones on the numbers, so only the last matters.
            plan.webhooks.extend(chosen);
        }
    }

    if let Some(security) = parsed.security {
        plan.ip_access_lists = list_entries(security.ip_access_rules)?;
        plan.credential_lists = list_entries(security.credential_lists)?;
    }

    Ok(plan)
}

fn list_entries(entries: Vec<ListEntryJson>) -> Result<Vec<ImportedListEntry>, TransportError> {
    entries
        .into_iter()
        .map(|entry| {
            Ok(ImportedListEntry {
                sid: entry
                    .sid
                    .filter(|sid| !sid.trim().is_empty())
                    .map(ResourceSid::new)
                    .transpose()?,
                friendly_name: FriendlyName::new(entry.friendly_name)?,
            })
        })
        .collect()
}

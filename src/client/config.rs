use chrono::{SecondsFormat, Utc};

use super::account::{CREDENTIAL_LISTS, IP_ACCESS_LISTS, plan_list_changes};
use super::numbers::collect_webhooks;
use super::{GatewayError, TwilioGateway, parse_error};
use crate::domain::{
    ConfigSnapshot, ExportFormat, ImportSummary, NumberConfigUpdate, NumberSnapshot,
    SecurityListEntry, SecuritySettings, WebhookEntry,
};
use crate::export::CsvWriter;
use crate::transport;

impl TwilioGateway {
    /// Account, numbers, webhooks and security settings in one document.
    pub async fn config_snapshot(&self) -> Result<ConfigSnapshot, GatewayError> {
        let account = self.get_account_details().await?;
        let numbers = self.list_active_numbers().await?;
        let security = self.get_security_settings().await?;

        Ok(ConfigSnapshot {
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            account,
            webhooks: collect_webhooks(&numbers),
            numbers: numbers.iter().map(NumberSnapshot::from).collect(),
            security,
        })
    }

    /// Render the configuration snapshot as pretty JSON or sectioned CSV.
    pub async fn export_config(&self, format: ExportFormat) -> Result<String, GatewayError> {
        let snapshot = self.config_snapshot().await?;
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&snapshot)?),
            ExportFormat::Csv => Ok(snapshot_to_csv(&snapshot)),
        }
    }

    /// Apply a JSON document produced by [`TwilioGateway::export_config`].
    ///
    /// The whole document is validated first. Changes are then applied in
    /// order: account name and status, number names, webhooks, security lists.
    /// Numbers the account no longer owns are counted, not treated as errors.
    pub async fn import_config(&self, json: &str) -> Result<ImportSummary, GatewayError> {
        let plan = transport::decode_import_plan(json).map_err(parse_error)?;
        let mut summary = ImportSummary::default();

        if plan.account_name.is_some() || plan.account_status.is_some() {
            self.update_account(
                &self.active_account,
                plan.account_name.as_ref(),
                plan.account_status,
            )
            .await?;
            summary.account_updated = true;
        }

        let needs_numbers = !plan.number_names.is_empty() || !plan.webhooks.is_empty();
        let numbers = if needs_numbers {
            self.list_active_numbers().await?
        } else {
            Vec::new()
        };

        for (phone, name) in &plan.number_names {
            let Some(number) = numbers
                .iter()
                .find(|number| number.phone_number == phone.e164())
            else {
                log::warn!("import: {phone} is not owned by this account");
                summary.numbers_missing += 1;
                continue;
            };
            if number.friendly_name == name.as_str() {
                continue;
            }
            let update = NumberConfigUpdate {
                friendly_name: Some(name.clone()),
                ..NumberConfigUpdate::default()
            };
            self.update_incoming_number(&number.sid, &update).await?;
            summary.numbers_renamed += 1;
        }

        for (kind, url, method) in &plan.webhooks {
            if numbers.is_empty() {
                log::warn!(
                    "import: no numbers to apply the {} webhook to",
                    kind.as_str()
                );
                break;
            }
            let update = NumberConfigUpdate::webhook(*kind, url.clone(), *method);
            for number in &numbers {
                self.update_incoming_number(&number.sid, &update).await?;
            }
            summary.webhooks_applied += 1;
        }

        if !plan.ip_access_lists.is_empty() || !plan.credential_lists.is_empty() {
            let current = self.get_security_settings().await?;
            let lists = [
                (IP_ACCESS_LISTS, &current.ip_access_rules, &plan.ip_access_lists),
                (CREDENTIAL_LISTS, &current.credential_lists, &plan.credential_lists),
            ];
            for (path, existing, wanted) in lists {
                for change in plan_list_changes(existing, wanted) {
                    self.apply_list_change(path, &change).await?;
                    summary.security_changes += 1;
                }
            }
        }

        Ok(summary)
    }
}

fn snapshot_to_csv(snapshot: &ConfigSnapshot) -> String {
    let mut csv = CsvWriter::new();
    let account = &snapshot.account;

    csv.row(["Account"])
        .row(["sid", account.sid.as_str()])
        .row(["friendly_name", account.friendly_name.as_str()])
        .row(["status", account.status.as_str()])
        .row(["type", account.account_type.as_str()])
        .blank();

    csv.row(["Numbers"])
        .row(["SID", "Phone Number", "Friendly Name", "Capabilities"]);
    for number in &snapshot.numbers {
        csv.row([
            number.sid.clone(),
            number.phone_number.clone(),
            number.friendly_name.clone(),
            number.capabilities.to_string(),
        ]);
    }
    csv.blank();

    csv.row(["Webhooks"]);
    let webhooks = [
        ("voice", &snapshot.webhooks.voice),
        ("sms", &snapshot.webhooks.sms),
        ("status", &snapshot.webhooks.status),
    ];
    for (kind, entries) in webhooks {
        csv.row([kind]);
        for WebhookEntry { url, method } in entries {
            csv.row([url, method]);
        }
    }
    csv.blank();

    write_security(&mut csv, &snapshot.security);
    csv.finish()
}

fn write_security(csv: &mut CsvWriter, security: &SecuritySettings) {
    csv.row(["Security"])
        .row(["account_status", security.account_status.as_str()]);
    let lists: [(&str, &[SecurityListEntry]); 2] = [
        ("ip_access_rules", &security.ip_access_rules),
        ("credential_lists", &security.credential_lists),
    ];
    for (name, entries) in lists {
        csv.row([name]);
        for entry in entries {
            csv.row([entry.friendly_name.as_str(), entry.sid.as_str()]);
        }
    }
}

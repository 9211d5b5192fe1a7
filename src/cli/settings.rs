use log::LevelFilter;

use super::{CliError, SecurityList, Session, render};
use crate::domain::{
    AccountSid, AccountStatus, ExportFormat, FriendlyName, ResourceSid, SecurityListChange,
    SecurityUpdate, WebhookEntry, WebhookKind, WebhookMethod, WebhookUrl,
};

impl Session<'_> {
    pub(super) async fn usage_and_billing(&mut self) -> Result<(), CliError> {
        let summary = self.gateway.get_billing_summary().await?;
        let currency = summary.balance.currency.clone();
        let rate = match &summary.price_per_number {
            Some(price) => format!("{price} {currency}"),
            None => "unavailable".to_owned(),
        };
        let monthly = match summary.monthly_recurring {
            Some(total) => format!("{total:.2} {currency}"),
            None => "unavailable".to_owned(),
        };
        render::panel(
            self.console,
            "Usage & Billing",
            &[
                format!("Account:            {}", summary.balance.account_sid),
                format!("Balance:            {} {currency}", summary.balance.balance),
                format!("Active numbers:     {}", summary.active_numbers),
                format!("Price per number:   {rate}"),
                format!("Monthly recurring:  {monthly}"),
            ],
        )
    }

    pub(super) async fn view_security(&mut self) -> Result<(), CliError> {
        let settings = self.gateway.get_security_settings().await?;
        let mut lines = vec![
            format!("Account status: {}", settings.account_status),
            String::new(),
            "IP access lists:".to_owned(),
        ];
        push_entries(
            &mut lines,
            settings
                .ip_access_rules
                .iter()
                .map(|e| (&e.friendly_name, &e.sid)),
        );
        lines.push(String::new());
        lines.push("Credential lists:".to_owned());
        push_entries(
            &mut lines,
            settings
                .credential_lists
                .iter()
                .map(|e| (&e.friendly_name, &e.sid)),
        );
        render::panel(self.console, "Security Settings", &lines)
    }

    pub(super) async fn update_account_status(&mut self) -> Result<(), CliError> {
        let answer = self
            .ask("New status (active/suspended/closed, blank to cancel): ")
            .await?;
        if answer.is_empty() {
            return Ok(());
        }
        let status = AccountStatus::parse(&answer)?;
        if status == AccountStatus::Closed
            && !self
                .confirm("Closing an account is permanent. Continue?")
                .await?
        {
            self.say("Status unchanged.")?;
            return Ok(());
        }

        let update = SecurityUpdate {
            status: Some(status),
            ..SecurityUpdate::default()
        };
        let settings = self.gateway.update_security_settings(&update).await?;
        self.say(&format!("Account status is now {}.", settings.account_status))
    }

    /// Show one SIP list and apply a single add, rename or delete.
    pub(super) async fn manage_security_list(
        &mut self,
        list: SecurityList,
    ) -> Result<(), CliError> {
        let settings = self.gateway.get_security_settings().await?;
        let (title, entries) = match list {
            SecurityList::IpAccess => ("IP Access Lists", settings.ip_access_rules),
            SecurityList::Credentials => ("Credential Lists", settings.credential_lists),
        };

        let mut lines: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {} ({})", i + 1, entry.friendly_name, entry.sid))
            .collect();
        if lines.is_empty() {
            lines.push("No lists configured.".to_owned());
        }
        render::panel(self.console, title, &lines)?;

        let action = self
            .ask("[a]dd  [r]ename  [d]elete  [0] back: ")
            .await?
            .to_ascii_lowercase();
        let change = match action.as_str() {
            "a" => SecurityListChange::Create {
                friendly_name: FriendlyName::new(self.ask("Name: ").await?)?,
            },
            "r" => {
                let Some(index) = self.ask_index("Entry #: ", entries.len()).await? else {
                    return Ok(());
                };
                SecurityListChange::Rename {
                    sid: ResourceSid::new(entries[index].sid.as_str())?,
                    friendly_name: FriendlyName::new(self.ask("New name: ").await?)?,
                }
            }
            "d" => {
                let Some(index) = self.ask_index("Entry #: ", entries.len()).await? else {
                    return Ok(());
                };
                let entry = &entries[index];
                if !self
                    .confirm(&format!("Delete {}?", entry.friendly_name))
                    .await?
                {
                    return Ok(());
                }
                SecurityListChange::Delete {
                    sid: ResourceSid::new(entry.sid.as_str())?,
                }
            }
            "0" | "" => return Ok(()),
            _ => return self.say("Invalid selection."),
        };

        let mut update = SecurityUpdate::default();
        match list {
            SecurityList::IpAccess => update.ip_access_lists.push(change),
            SecurityList::Credentials => update.credential_lists.push(change),
        }
        let settings = self.gateway.update_security_settings(&update).await?;
        let count = match list {
            SecurityList::IpAccess => settings.ip_access_rules.len(),
            SecurityList::Credentials => settings.credential_lists.len(),
        };
        self.say(&format!("{title} updated ({count} configured)."))
    }

    pub(super) async fn security_logs(&mut self) -> Result<(), CliError> {
        let alerts = self.gateway.get_security_logs().await?;
        render::browse(self.console, "Security Alerts", &alerts).await
    }

    pub(super) async fn list_subaccounts(&mut self) -> Result<(), CliError> {
        let accounts = self.gateway.list_subaccounts().await?;
        let rows: Vec<Vec<String>> = accounts
            .iter()
            .map(|account| {
                vec![
                    account.sid.clone(),
                    account.friendly_name.clone(),
                    account.status.clone(),
                    account.date_created.clone().unwrap_or_default(),
                ]
            })
            .collect();
        render::table(self.console, &["SID", "Name", "Status", "Created"], &rows)
    }

    pub(super) async fn create_subaccount(&mut self) -> Result<(), CliError> {
        let name = FriendlyName::new(self.ask("Subaccount name: ").await?)?;
        let created = self.gateway.create_subaccount(&name).await?;
        render::panel(
            self.console,
            "Subaccount Created",
            &[
                format!("SID:        {}", created.sid),
                format!("Name:       {}", created.friendly_name),
                format!("Auth token: {}", created.auth_token),
                String::new(),
                "Store the auth token now; it is not shown again.".to_owned(),
            ],
        )
    }

    /// Point the gateway at a subaccount, or back at the authenticated account with `0`.
    pub(super) async fn switch_account(&mut self) -> Result<(), CliError> {
        let accounts = self.gateway.list_subaccounts().await?;
        let main = self.gateway.credentials().account_sid().clone();
        let mut lines = vec![format!("0. Main account ({main})")];
        lines.extend(
            accounts
                .iter()
                .enumerate()
                .map(|(i, a)| format!("{}. {} ({})", i + 1, a.friendly_name, a.sid)),
        );
        render::panel(self.console, "Switch Account", &lines)?;

        let answer = self.ask("Account # or SID (blank to cancel): ").await?;
        let target = match answer.parse::<usize>() {
            _ if answer.is_empty() => return Ok(()),
            Ok(0) => main,
            Ok(n) if n <= accounts.len() => AccountSid::new(accounts[n - 1].sid.as_str())?,
            Ok(_) => return self.say("Invalid selection."),
            Err(_) => AccountSid::new(answer)?,
        };

        let details = self.gateway.switch_account(target).await?;
        self.say(&format!(
            "Now working in {} ({}).",
            details.friendly_name, details.sid
        ))
    }

    pub(super) async fn close_subaccount(&mut self) -> Result<(), CliError> {
        let sid = AccountSid::new(self.ask("Subaccount SID to close: ").await?)?;
        if &sid == self.gateway.credentials().account_sid() {
            return self.say("The authenticated account cannot be closed from here.");
        }
        if !self
            .confirm(&format!("Close {sid}? This is permanent."))
            .await?
        {
            return self.say("Close cancelled.");
        }

        let closed = self.gateway.close_subaccount(&sid).await?;
        self.say(&format!("{} is now {}.", closed.sid, closed.status))?;
        if &sid == self.gateway.active_account() {
            let main = self.gateway.credentials().account_sid().clone();
            self.gateway.switch_account(main).await?;
            self.say("Switched back to the main account.")?;
        }
        Ok(())
    }

    pub(super) fn show_credentials(&mut self) -> Result<(), CliError> {
        let credentials = self.gateway.credentials();
        let lines = [
            format!("Account SID:    {}", credentials.account_sid()),
            format!("Auth token:     {}", credentials.auth_token().masked()),
            format!("Active account: {}", self.gateway.active_account()),
        ];
        render::panel(self.console, "API Credentials", &lines)
    }

    /// Flip the global log level between debug and warn.
    pub(super) fn toggle_debug_logging(&mut self) -> Result<(), CliError> {
        let enable = log::max_level() < LevelFilter::Debug;
        log::set_max_level(if enable {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
        self.say(if enable {
            "Debug logging enabled."
        } else {
            "Debug logging disabled."
        })
    }

    pub(super) async fn view_webhooks(&mut self) -> Result<(), CliError> {
        let settings = self.gateway.get_webhook_settings().await?;
        let mut lines = Vec::new();
        let kinds: [(&str, &[WebhookEntry]); 3] = [
            ("Voice", &settings.voice),
            ("SMS", &settings.sms),
            ("Status callback", &settings.status),
        ];
        for (label, entries) in kinds {
            lines.push(format!("{label}:"));
            if entries.is_empty() {
                lines.push("  not set".to_owned());
            }
            lines.extend(
                entries
                    .iter()
                    .map(|entry| format!("  {} ({})", entry.url, entry.method)),
            );
        }
        render::panel(self.console, "Webhooks", &lines)
    }

    /// Apply one webhook URL to every owned number.
    pub(super) async fn set_webhook(&mut self, kind: WebhookKind) -> Result<(), CliError> {
        let url = WebhookUrl::new(self.ask(&format!("{} webhook URL: ", kind.as_str())).await?)?;
        let method = self.ask_or("Method (GET/POST) [POST]: ", "POST").await?;
        let method = WebhookMethod::parse(&method)?;
        let updated = self.gateway.set_webhook(kind, &url, method).await?;
        self.say(&format!(
            "Updated the {} webhook on {updated} number(s).",
            kind.as_str()
        ))
    }

    pub(super) async fn list_api_keys(&mut self) -> Result<(), CliError> {
        let keys = self.gateway.list_api_keys().await?;
        let rows: Vec<Vec<String>> = keys
            .iter()
            .map(|key| {
                vec![
                    key.sid.clone(),
                    key.friendly_name.clone(),
                    key.date_created.clone().unwrap_or_default(),
                ]
            })
            .collect();
        render::table(self.console, &["SID", "Name", "Created"], &rows)
    }

    pub(super) async fn create_api_key(&mut self) -> Result<(), CliError> {
        let name = FriendlyName::new(self.ask("Key name: ").await?)?;
        let key = self.gateway.create_api_key(&name).await?;
        render::panel(
            self.console,
            "API Key Created",
            &[
                format!("SID:    {}", key.sid),
                format!("Name:   {}", key.friendly_name),
                format!("Secret: {}", key.secret),
                String::new(),
                "Store the secret now; it is not shown again.".to_owned(),
            ],
        )
    }

    pub(super) async fn revoke_api_key(&mut self) -> Result<(), CliError> {
        let sid = ResourceSid::new(self.ask("Key SID to revoke: ").await?)?;
        if !self.confirm(&format!("Revoke {}?", sid.as_str())).await? {
            return self.say("Revoke cancelled.");
        }
        self.gateway.revoke_api_key(&sid).await?;
        self.say(&format!("Revoked {}.", sid.as_str()))
    }

    pub(super) async fn system_logs(&mut self) -> Result<(), CliError> {
        let events = self.gateway.get_system_logs().await?;
        render::browse(self.console, "System Events", &events).await
    }

    pub(super) async fn api_logs(&mut self) -> Result<(), CliError> {
        let report = self.gateway.get_api_logs().await?;
        if report.is_partial() {
            self.say(&format!(
                "Partial results; these categories could not be loaded: {}",
                report.skipped_categories.join(", ")
            ))?;
        }
        render::browse(self.console, "API Usage (last 30 days)", &report.records).await
    }

    pub(super) async fn export_config(&mut self, format: ExportFormat) -> Result<(), CliError> {
        let document = self.gateway.export_config(format).await?;
        self.say(document.trim_end())
    }

    /// Import a JSON export pasted on one line or read from a file path.
    pub(super) async fn import_config(&mut self) -> Result<(), CliError> {
        let input = self
            .ask("Paste configuration JSON or enter a file path (blank to cancel): ")
            .await?;
        if input.is_empty() {
            return Ok(());
        }
        let document = if input.starts_with('{') {
            input
        } else {
            match std::fs::read_to_string(&input) {
                Ok(contents) => contents,
                Err(err) => return self.say(&format!("Could not read {input}: {err}")),
            }
        };

        let summary = self.gateway.import_config(&document).await?;
        render::panel(
            self.console,
            "Configuration Imported",
            &[
                format!(
                    "Account updated:   {}",
                    if summary.account_updated { "yes" } else { "no" }
                ),
                format!("Numbers renamed:   {}", summary.numbers_renamed),
                format!("Numbers not owned: {}", summary.numbers_missing),
                format!("Webhooks applied:  {}", summary.webhooks_applied),
                format!("Security changes:  {}", summary.security_changes),
            ],
        )
    }
}

fn push_entries<'a>(
    lines: &mut Vec<String>,
    entries: impl Iterator<Item = (&'a String, &'a String)>,
) {
    let before = lines.len();
    lines.extend(entries.map(|(name, sid)| format!("  {name} ({sid})")));
    if lines.len() == before {
        lines.push("  none".to_owned());
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use crate::cli::console::ScriptedConsole;
    use crate::cli::run;
    use crate::client::Method;
    use crate::client::testing::{FakeTransport, assert_param, gateway};

    const ACCOUNT: &str =
        r#"{"sid": "AC123", "friendly_name": "Main", "status": "active", "type": "Full"}"#;
    const SUBACCOUNTS: &str = r#"
    {
      "accounts": [
        {"sid": "AC123", "friendly_name": "Main", "status": "active"},
        {"sid": "AC456", "friendly_name": "Staging", "status": "active"}
      ]
    }
    "#;

    fn security_transport() -> FakeTransport {
        FakeTransport::new()
            .route(Method::Get, "/Accounts/AC123.json", 200, ACCOUNT)
            .route(
                Method::Get,
                "/SIP/IpAccessControlLists.json",
                200,
                r#"{"ip_access_control_lists": [{"sid": "AL1", "friendly_name": "office"}]}"#,
            )
            .route(
                Method::Get,
                "/SIP/CredentialLists.json",
                200,
                r#"{"credential_lists": []}"#,
            )
    }

    #[tokio::test]
    async fn view_security_lists_entries() {
        let transport = security_transport();
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new(["3", "2", "1", "0", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        let output = console.output();
        assert!(output.contains("Account status: active"));
        assert!(output.contains("  office (AL1)"));
        assert!(output.contains("  none"));
    }

    #[tokio::test]
    async fn delete_ip_access_list() {
        let transport = security_transport().route(
            Method::Delete,
            "/SIP/IpAccessControlLists/AL1.json",
            204,
            "",
        );
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new(["3", "2", "3", "d", "1", "y", "0", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        assert!(console.output().contains("IP Access Lists updated"));
        assert_eq!(
            transport.requests_to(Method::Delete, "").len(),
            1,
            "{}",
            console.output()
        );
    }

    #[tokio::test]
    async fn switch_to_listed_subaccount() {
        let transport = FakeTransport::new()
            .route(Method::Get, "/Accounts.json", 200, SUBACCOUNTS)
            .route(
                Method::Get,
                "/Accounts/AC456.json",
                200,
                r#"{"sid": "AC456", "friendly_name": "Staging", "status": "active"}"#,
            );
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new(["3", "3", "3", "1", "0", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        assert!(console.output().contains("Now working in Staging (AC456)."));
        assert!(console.output().contains("Account: AC456"));
        assert_eq!(gateway.active_account().as_str(), "AC456");
    }

    #[tokio::test]
    async fn set_voice_webhook_on_all_numbers() {
        let transport = FakeTransport::new()
            .route(
                Method::Get,
                "/IncomingPhoneNumbers.json",
                200,
                r#"{"incoming_phone_numbers": [{"sid": "PN1", "phone_number": "+14155552671"}, {"sid": "PN2", "phone_number": "+14155552672"}]}"#,
            )
            .route(
                Method::Post,
                "/IncomingPhoneNumbers/PN",
                200,
                r#"{"sid": "PN1", "phone_number": "+14155552671"}"#,
            );
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new([
            "3",
            "4",
            "2",
            "2",
            "https://example.com/voice",
            "",
            "0",
            "0",
            "0",
            "0",
        ]);

        run(&mut gateway, &mut console).await.unwrap();

        assert!(
            console
                .output()
                .contains("Updated the voice webhook on 2 number(s).")
        );
        let posts = transport.requests_to(Method::Post, "");
        assert_eq!(posts.len(), 2);
        assert_param(&posts[1].params, "VoiceUrl", "https://example.com/voice");
        assert_param(&posts[1].params, "VoiceMethod", "POST");
    }

    #[tokio::test]
    async fn create_api_key_shows_secret_once() {
        let transport = FakeTransport::new().route(
            Method::Post,
            "/Keys.json",
            201,
            r#"{"sid": "SK1", "friendly_name": "ci", "secret": "s3cr3t"}"#,
        );
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new(["3", "4", "4", "2", "ci", "0", "0", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        assert!(console.output().contains("Secret: s3cr3t"));
        assert_param(
            &transport.last_request().unwrap().params,
            "FriendlyName",
            "ci",
        );
    }

    #[tokio::test]
    async fn credentials_are_masked_and_debug_toggles() {
        let transport = FakeTransport::new();
        let mut gateway = gateway(&transport);
        let before = log::max_level();
        log::set_max_level(LevelFilter::Warn);
        let mut console = ScriptedConsole::new(["3", "4", "1", "3", "3", "0", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        let output = console.output();
        assert!(output.contains("Auth token:     ******oken"));
        assert!(!output.contains("test_token"));
        assert!(output.contains("Debug logging enabled."));
        assert!(output.contains("Debug logging disabled."));
        log::set_max_level(before);
    }

    #[tokio::test]
    async fn export_json_prints_document() {
        let transport = security_transport()
            .route(
                Method::Get,
                "/IncomingPhoneNumbers.json",
                200,
                r#"{"incoming_phone_numbers": []}"#,
            );
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new(["3", "8", "1", "0", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        let output = console.output();
        assert!(output.contains("\"exported_at\""));
        assert!(output.contains("\"friendly_name\": \"office\""));
    }

    #[tokio::test]
    async fn import_rejects_unreadable_path() {
        let transport = FakeTransport::new();
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new([
            "3",
            "8",
            "3",
            "/nonexistent/twilio-config.json",
            "0",
            "0",
            "0",
        ]);

        run(&mut gateway, &mut console).await.unwrap();

        assert!(
            console
                .output()
                .contains("Could not read /nonexistent/twilio-config.json")
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn import_pasted_document() {
        let transport =
            FakeTransport::new().route(Method::Post, "/Accounts/AC123.json", 200, ACCOUNT);
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new([
            "3",
            "8",
            "3",
            r#"{"account": {"friendly_name": "Main"}}"#,
            "0",
            "0",
            "0",
        ]);

        run(&mut gateway, &mut console).await.unwrap();

        assert!(console.output().contains("Account updated:   yes"));
        assert_param(
            &transport.last_request().unwrap().params,
            "FriendlyName",
            "Main",
        );
    }

    #[tokio::test]
    async fn partial_api_logs_are_flagged() {
        let transport = FakeTransport::new().fail(Method::Get, "/Usage/Records.json");
        let mut gateway = gateway(&transport);
        let mut console = ScriptedConsole::new(["3", "5", "2", "0", "0", "0"]);

        run(&mut gateway, &mut console).await.unwrap();

        let output = console.output();
        assert!(output.contains("Partial results; these categories could not be loaded: calls,"));
        assert!(output.contains("No records found."));
    }
}

use super::{CliError, Session, render};
use crate::domain::{
    CallInstructions, FriendlyName, MessageBody, NumberConfig, NumberConfigUpdate, PhoneNumber,
    PlaceCall, SendSms, WebhookMethod, WebhookUrl,
};

impl Session<'_> {
    pub(super) async fn list_numbers(&mut self) -> Result<(), CliError> {
        let numbers = self.gateway.list_active_numbers().await?;
        let rows: Vec<Vec<String>> = numbers
            .iter()
            .map(|number| {
                vec![
                    number.phone_number.clone(),
                    number.friendly_name.clone(),
                    number.capabilities.to_string(),
                    number.sid.clone(),
                ]
            })
            .collect();
        render::panel(
            self.console,
            "Active Numbers",
            &[format!("{} number(s)", numbers.len())],
        )?;
        render::table(
            self.console,
            &["Number", "Name", "Capabilities", "SID"],
            &rows,
        )
    }

    pub(super) async fn release_number(&mut self) -> Result<(), CliError> {
        let phone = self.ask_phone("Number to release: ").await?;
        let question = format!("Release {phone}? This cannot be undone.");
        if !self.confirm(&question).await? {
            self.say("Release cancelled.")?;
            return Ok(());
        }
        self.gateway.release_number(&phone).await?;
        self.say(&format!("Released {phone}."))
    }

    pub(super) async fn send_sms(&mut self) -> Result<(), CliError> {
        let from = self.ask_phone("From (one of your numbers): ").await?;
        let to = self.ask_phone("To: ").await?;
        let body = MessageBody::new(self.ask("Message: ").await?)?;

        let receipt = self.gateway.send_sms(&SendSms::new(from, to, body)).await?;
        self.say(&format!(
            "Message {} accepted with status {}.",
            receipt.sid, receipt.status
        ))
    }

    /// Place a call driven by a TwiML URL, or by inline TwiML when the answer starts with `<`.
    pub(super) async fn make_call(&mut self) -> Result<(), CliError> {
        let from = self.ask_phone("From (one of your numbers): ").await?;
        let to = self.ask_phone("To: ").await?;
        let source = self.ask("TwiML URL or inline TwiML: ").await?;
        let instructions = if source.starts_with('<') {
            CallInstructions::twiml(source)?
        } else {
            CallInstructions::Url(WebhookUrl::new(source)?)
        };

        let receipt = self
            .gateway
            .make_call(&PlaceCall::new(from, to, instructions))
            .await?;
        self.say(&format!(
            "Call {} started with status {}.",
            receipt.sid, receipt.status
        ))
    }

    pub(super) async fn messaging_logs(&mut self) -> Result<(), CliError> {
        let from = self
            .ask_optional(
                "Filter by sender (blank for all): ",
                PhoneNumber::international,
            )
            .await?;
        let records = self.gateway.get_messaging_logs(from.as_ref()).await?;
        render::browse(self.console, "Messaging Logs", &records).await
    }

    pub(super) async fn call_logs(&mut self) -> Result<(), CliError> {
        let from = self
            .ask_optional(
                "Filter by caller (blank for all): ",
                PhoneNumber::international,
            )
            .await?;
        let records = self.gateway.get_call_logs(from.as_ref()).await?;
        render::browse(self.console, "Call Logs", &records).await
    }

    pub(super) async fn view_number_config(&mut self) -> Result<(), CliError> {
        let phone = self.ask_phone("Number: ").await?;
        let config = self.gateway.get_number_config(&phone).await?;
        self.show_number_config(&phone, &config)
    }

    /// Prompt for each setting; blank answers leave the current value alone.
    pub(super) async fn update_number_config(&mut self) -> Result<(), CliError> {
        let phone = self.ask_phone("Number: ").await?;
        self.say("Leave a field blank to keep its current value.")?;

        let update = NumberConfigUpdate {
            friendly_name: self
                .ask_optional("Friendly name: ", FriendlyName::new)
                .await?,
            voice_url: self.ask_optional("Voice URL: ", WebhookUrl::new).await?,
            voice_method: self
                .ask_optional("Voice method (GET/POST): ", |m| WebhookMethod::parse(&m))
                .await?,
            sms_url: self.ask_optional("SMS URL: ", WebhookUrl::new).await?,
            sms_method: self
                .ask_optional("SMS method (GET/POST): ", |m| WebhookMethod::parse(&m))
                .await?,
            status_callback: self
                .ask_optional("Status callback URL: ", WebhookUrl::new)
                .await?,
            status_callback_method: self
                .ask_optional("Status callback method (GET/POST): ", |m| {
                    WebhookMethod::parse(&m)
                })
                .await?,
        };
        if update.is_empty() {
            self.say("Nothing to update.")?;
            return Ok(());
        }

        let config = self.gateway.update_number_config(&phone, &update).await?;
        self.show_number_config(&phone, &config)
    }

    pub(super) async fn number_details(&mut self) -> Result<(), CliError> {
        let phone = self.ask_phone("Number: ").await?;
        let meta = self.gateway.get_number_metadata(&phone).await?;
        render::panel(
            self.console,
            "Number Details",
            &[
                format!("Number:       {}", meta.phone_number),
                format!("SID:          {}", meta.sid),
                format!("Name:         {}", meta.friendly_name),
                format!("Country:      {}", meta.iso_country),
                format!("Type:         {}", meta.kind.label()),
                format!("Capabilities: {}", meta.capabilities),
            ],
        )
    }

    fn show_number_config(
        &mut self,
        phone: &PhoneNumber,
        config: &NumberConfig,
    ) -> Result<(), CliError> {
        let hook = |url: &Option<String>, method: &Option<String>| match url {
            Some(url) => format!("{url} ({})", method.as_deref().unwrap_or("POST")),
            None => "not set".to_owned(),
        };
        render::panel(
            self.console,
            &format!("Configuration for {phone}"),
            &[
                format!("Name:            {}", config.friendly_name),
                format!("Capabilities:    {}", config.capabilities),
                format!(
                    "Voice webhook:   {}",
                    hook(&config.voice_url, &config.voice_method)
                ),
                format!(
                    "SMS webhook:     {}",
                    hook(&config.sms_url, &config.sms_method)
                ),
                format!(
                    "Status callback: {}",
                    config.status_callback.as_deref().unwrap_or("not set")
                ),
            ],
        )
    }
}

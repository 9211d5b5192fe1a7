use super::{GatewayError, TwilioGateway, parse_error};
use crate::domain::{
    AvailableNumber, CallReceipt, CountryCode, CountryPricing, IncomingNumber, MessageReceipt,
    NumberConfig, NumberConfigUpdate, NumberMetadata, PhoneNumber, PlaceCall, PurchasedNumber,
    SearchQuery, SendSms, WebhookEntry, WebhookKind, WebhookMethod, WebhookSettings, WebhookUrl,
};
use crate::transport;

const INCOMING_NUMBERS: &str = "IncomingPhoneNumbers.json";

impl TwilioGateway {
    /// Search numbers available for purchase.
    ///
    /// Region, area code and pattern are resolved into provider filters by
    /// [`SearchQuery::filters`].
    pub async fn search_available_numbers(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<AvailableNumber>, GatewayError> {
        let url = self.account_url(&format!(
            "AvailablePhoneNumbers/{}/{}.json",
            query.country().as_str(),
            query.kind().path_segment()
        ));
        let result = match self.get(url, transport::encode_search_query(query)).await {
            Ok(body) => transport::decode_available_numbers(query, &body).map_err(parse_error),
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            log::warn!(
                "number search in {} failed: {err}",
                query.country().as_str()
            );
        }
        result
    }

    pub async fn purchase_number(
        &self,
        phone: &PhoneNumber,
    ) -> Result<PurchasedNumber, GatewayError> {
        let body = self
            .post(
                self.account_url(INCOMING_NUMBERS),
                transport::encode_purchase_form(phone),
            )
            .await?;
        transport::decode_purchased_number(&body).map_err(parse_error)
    }

    /// Release an owned number. Fails with [`GatewayError::NotFound`] when the
    /// account does not own it.
    pub async fn release_number(&self, phone: &PhoneNumber) -> Result<(), GatewayError> {
        let number = self.find_number(phone).await?;
        self.delete(self.incoming_number_url(&number.sid)).await
    }

    /// All numbers owned by the active account.
    pub async fn list_active_numbers(&self) -> Result<Vec<IncomingNumber>, GatewayError> {
        self.fetch_all(
            self.account_url(INCOMING_NUMBERS),
            Vec::new(),
            transport::decode_incoming_numbers_page,
        )
        .await
    }

    pub async fn get_number_config(
        &self,
        phone: &PhoneNumber,
    ) -> Result<NumberConfig, GatewayError> {
        let number = self.find_number(phone).await?;
        Ok(NumberConfig::from(&number))
    }

    /// Apply `update` and return the configuration Twilio reports afterwards.
    pub async fn update_number_config(
        &self,
        phone: &PhoneNumber,
        update: &NumberConfigUpdate,
    ) -> Result<NumberConfig, GatewayError> {
        let number = self.find_number(phone).await?;
        if update.is_empty() {
            return Ok(NumberConfig::from(&number));
        }
        let updated = self.update_incoming_number(&number.sid, update).await?;
        Ok(NumberConfig::from(&updated))
    }

    pub async fn get_number_metadata(
        &self,
        phone: &PhoneNumber,
    ) -> Result<NumberMetadata, GatewayError> {
        Ok(self.find_number(phone).await?.into())
    }

    pub async fn send_sms(&self, request: &SendSms) -> Result<MessageReceipt, GatewayError> {
        let body = self
            .post(
                self.account_url("Messages.json"),
                transport::encode_send_sms_form(request),
            )
            .await?;
        transport::decode_message_receipt(&body).map_err(parse_error)
    }

    pub async fn make_call(&self, request: &PlaceCall) -> Result<CallReceipt, GatewayError> {
        let body = self
            .post(
                self.account_url("Calls.json"),
                transport::encode_place_call_form(request),
            )
            .await?;
        transport::decode_call_receipt(&body).map_err(parse_error)
    }

    /// Distinct webhook URLs configured across all owned numbers.
    pub async fn get_webhook_settings(&self) -> Result<WebhookSettings, GatewayError> {
        let numbers = self.list_active_numbers().await?;
        Ok(collect_webhooks(&numbers))
    }

    /// Point one webhook kind of every owned number at `url`.
    ///
    /// Returns the number of numbers updated.
    pub async fn set_webhook(
        &self,
        kind: WebhookKind,
        url: &WebhookUrl,
        method: WebhookMethod,
    ) -> Result<usize, GatewayError> {
        let numbers = self.list_active_numbers().await?;
        if numbers.is_empty() {
            return Err(GatewayError::NoNumbers);
        }

        let update = NumberConfigUpdate::webhook(kind, url.clone(), method);
        for number in &numbers {
            self.update_incoming_number(&number.sid, &update).await?;
        }
        Ok(numbers.len())
    }

    /// Number pricing for one country.
    pub async fn get_country_pricing(
        &self,
        country: &CountryCode,
    ) -> Result<CountryPricing, GatewayError> {
        let body = self
            .get(
                self.pricing_url(&format!("PhoneNumbers/Countries/{}", country.as_str())),
                Vec::new(),
            )
            .await?;
        transport::decode_country_pricing(&body).map_err(parse_error)
    }

    async fn find_number(&self, phone: &PhoneNumber) -> Result<IncomingNumber, GatewayError> {
        let body = self
            .get(
                self.account_url(INCOMING_NUMBERS),
                transport::encode_number_lookup_query(phone),
            )
            .await?;
        let page = transport::decode_incoming_numbers_page(&body).map_err(parse_error)?;
        page.items
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound {
                what: "phone number",
                key: phone.e164().to_owned(),
            })
    }

    pub(super) async fn update_incoming_number(
        &self,
        sid: &str,
        update: &NumberConfigUpdate,
    ) -> Result<IncomingNumber, GatewayError> {
        let body = self
            .post(
                self.incoming_number_url(sid),
                transport::encode_number_update_form(update),
            )
            .await?;
        transport::decode_incoming_number(&body).map_err(parse_error)
    }

    fn incoming_number_url(&self, sid: &str) -> String {
        self.account_url(&format!("IncomingPhoneNumbers/{sid}.json"))
    }
}

pub(super) fn collect_webhooks(numbers: &[IncomingNumber]) -> WebhookSettings {
    let mut settings = WebhookSettings::default();
    for number in numbers {
        push_unique(&mut settings.voice, &number.voice_url, &number.voice_method);
        push_unique(&mut settings.sms, &number.sms_url, &number.sms_method);
        push_unique(
            &mut settings.status,
            &number.status_callback,
            &number.status_callback_method,
        );
    }
    settings
}

fn push_unique(entries: &mut Vec<WebhookEntry>, url: &Option<String>, method: &Option<String>) {
    let Some(url) = url else {
        return;
    };
    if entries.iter().any(|entry| &entry.url == url) {
        return;
    }
    entries.push(WebhookEntry {
        url: url.clone(),
        method: method
            .clone()
            .unwrap_or_else(|| WebhookMethod::default().as_str().to_owned()),
    });
}

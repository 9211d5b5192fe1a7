use super::{GatewayError, TwilioGateway, parse_error};
use crate::domain::{
    AccountDetails, AccountSid, AccountStatus, ApiKey, Balance, BillingSummary, CountryCode,
    CreatedApiKey, CreatedSubaccount, FriendlyName, ImportedListEntry, ResourceSid,
    SecurityListChange, SecurityListEntry, SecuritySettings, SecurityUpdate, Subaccount,
};
use crate::transport;

pub(super) const IP_ACCESS_LISTS: &str = "SIP/IpAccessControlLists";
pub(super) const CREDENTIAL_LISTS: &str = "SIP/CredentialLists";
const BILLING_COUNTRY: &str = "US";
const BILLING_NUMBER_TYPE: &str = "local";

impl TwilioGateway {
    /// Active subaccounts, excluding the authenticated account itself.
    pub async fn list_subaccounts(&self) -> Result<Vec<Subaccount>, GatewayError> {
        let accounts = self
            .fetch_all(
                self.accounts_url(),
                transport::encode_active_accounts_query(),
                transport::decode_accounts_page,
            )
            .await?;
        let own_sid = self.credentials.account_sid().as_str();
        Ok(accounts
            .into_iter()
            .filter(|account| account.sid != own_sid)
            .map(|account| Subaccount {
                sid: account.sid,
                friendly_name: account.friendly_name,
                status: account.status,
                date_created: account.date_created,
            })
            .collect())
    }

    pub async fn create_subaccount(
        &self,
        name: &FriendlyName,
    ) -> Result<CreatedSubaccount, GatewayError> {
        let body = self
            .post(
                self.accounts_url(),
                transport::encode_create_account_form(name),
            )
            .await?;
        transport::decode_created_account(&body).map_err(parse_error)
    }

    pub async fn close_subaccount(&self, sid: &AccountSid) -> Result<AccountDetails, GatewayError> {
        self.update_account(sid, None, Some(AccountStatus::Closed))
            .await
    }

    /// Route all later calls to `sid` once Twilio confirms the account is reachable.
    pub async fn switch_account(
        &mut self,
        sid: AccountSid,
    ) -> Result<AccountDetails, GatewayError> {
        let body = self.get(self.account_root_url(&sid), Vec::new()).await?;
        let details = transport::decode_account(&body).map_err(parse_error)?;
        log::debug!("switched active account to {sid}");
        self.active_account = sid;
        Ok(details)
    }

    pub async fn get_account_details(&self) -> Result<AccountDetails, GatewayError> {
        let body = self
            .get(self.account_root_url(&self.active_account), Vec::new())
            .await?;
        transport::decode_account(&body).map_err(parse_error)
    }

    pub async fn get_account_balance(&self) -> Result<Balance, GatewayError> {
        let body = self
            .get(self.account_url("Balance.json"), Vec::new())
            .await?;
        transport::decode_balance(&body).map_err(parse_error)
    }

    /// Owned number count, balance, and projected monthly cost at the US local rate.
    ///
    /// Pricing is best effort: when it cannot be fetched the summary carries no
    /// rate instead of failing.
    pub async fn get_billing_summary(&self) -> Result<BillingSummary, GatewayError> {
        let numbers = self.list_active_numbers().await?;
        let balance = self.get_account_balance().await?;

        let country = CountryCode::new(BILLING_COUNTRY)?;
        let price_per_number = match self.get_country_pricing(&country).await {
            Ok(pricing) => pricing
                .price_for(BILLING_NUMBER_TYPE)
                .map(|price| price.current_price.clone()),
            Err(err) => {
                log::warn!("pricing lookup for billing summary failed: {err}");
                None
            }
        };
        let monthly_recurring = price_per_number
            .as_deref()
            .and_then(|price| price.parse::<f64>().ok())
            .map(|price| price * numbers.len() as f64);

        Ok(BillingSummary {
            active_numbers: numbers.len(),
            balance,
            price_per_number,
            monthly_recurring,
        })
    }

    pub async fn get_security_settings(&self) -> Result<SecuritySettings, GatewayError> {
        let account = self.get_account_details().await?;
        let ip_access_rules = self
            .fetch_all(
                self.account_url(&format!("{IP_ACCESS_LISTS}.json")),
                Vec::new(),
                transport::decode_ip_access_lists_page,
            )
            .await?;
        let credential_lists = self
            .fetch_all(
                self.account_url(&format!("{CREDENTIAL_LISTS}.json")),
                Vec::new(),
                transport::decode_credential_lists_page,
            )
            .await?;

        Ok(SecuritySettings {
            account_status: account.status,
            ip_access_rules,
            credential_lists,
        })
    }

    /// Apply status and list changes in order, then return the resulting settings.
    pub async fn update_security_settings(
        &self,
        update: &SecurityUpdate,
    ) -> Result<SecuritySettings, GatewayError> {
        if let Some(status) = update.status {
            self.update_account(&self.active_account, None, Some(status))
                .await?;
        }
        for change in &update.ip_access_lists {
            self.apply_list_change(IP_ACCESS_LISTS, change).await?;
        }
        for change in &update.credential_lists {
            self.apply_list_change(CREDENTIAL_LISTS, change).await?;
        }
        self.get_security_settings().await
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, GatewayError> {
        self.fetch_all(
            self.account_url("Keys.json"),
            Vec::new(),
            transport::decode_keys_page,
        )
        .await
    }

    /// Create an API key. The secret is only ever returned here.
    pub async fn create_api_key(
        &self,
        name: &FriendlyName,
    ) -> Result<CreatedApiKey, GatewayError> {
        let body = self
            .post(
                self.account_url("Keys.json"),
                transport::encode_friendly_name_form(name),
            )
            .await?;
        transport::decode_created_key(&body).map_err(parse_error)
    }

    pub async fn revoke_api_key(&self, sid: &ResourceSid) -> Result<(), GatewayError> {
        self.delete(self.account_url(&format!("Keys/{}.json", sid.as_str())))
            .await
    }

    pub(super) async fn update_account(
        &self,
        sid: &AccountSid,
        name: Option<&FriendlyName>,
        status: Option<AccountStatus>,
    ) -> Result<AccountDetails, GatewayError> {
        let body = self
            .post(
                self.account_root_url(sid),
                transport::encode_account_update_form(name, status),
            )
            .await?;
        transport::decode_account(&body).map_err(parse_error)
    }

    pub(super) async fn apply_list_change(
        &self,
        list: &str,
        change: &SecurityListChange,
    ) -> Result<(), GatewayError> {
        match change {
            SecurityListChange::Create { friendly_name } => {
                self.post(
                    self.account_url(&format!("{list}.json")),
                    transport::encode_friendly_name_form(friendly_name),
                )
                .await?;
            }
            SecurityListChange::Rename { sid, friendly_name } => {
                self.post(
                    self.account_url(&format!("{list}/{}.json", sid.as_str())),
                    transport::encode_friendly_name_form(friendly_name),
                )
                .await?;
            }
            SecurityListChange::Delete { sid } => {
                self.delete(self.account_url(&format!("{list}/{}.json", sid.as_str())))
                    .await?;
            }
        }
        Ok(())
    }
}

/// Changes that make `current` match `wanted`: rename entries whose SID is
/// known, create the rest unless an entry with that name already exists.
pub(super) fn plan_list_changes(
    current: &[SecurityListEntry],
    wanted: &[ImportedListEntry],
) -> Vec<SecurityListChange> {
    let mut changes = Vec::new();
    for entry in wanted {
        let existing = entry
            .sid
            .as_ref()
            .and_then(|sid| current.iter().find(|item| item.sid == sid.as_str()));
        match (existing, &entry.sid) {
            (Some(item), Some(sid)) => {
                if item.friendly_name != entry.friendly_name.as_str() {
                    changes.push(SecurityListChange::Rename {
                        sid: sid.clone(),
                        friendly_name: entry.friendly_name.clone(),
                    });
                }
            }
            _ => {
                let duplicate = current
                    .iter()
                    .any(|item| item.friendly_name == entry.friendly_name.as_str());
                if !duplicate {
                    changes.push(SecurityListChange::Create {
                        friendly_name: entry.friendly_name.clone(),
                    });
                }
            }
        }
    }
    changes
}

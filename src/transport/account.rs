use serde::Deserialize;

use super::money::TransportMoney;
use super::{Page, TransportError, param};
use crate::domain::{
    AccountDetails, AccountStatus, ApiKey, Balance, CreatedApiKey, CreatedSubaccount, FriendlyName,
};

#[derive(Debug, Clone, Deserialize)]
struct AccountsJsonResponse {
    #[serde(default)]
    accounts: Vec<AccountJson>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct AccountJson {
    sid: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "type")]
    account_type: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    owner_account_sid: Option<String>,
    #[serde(default)]
    auth_token: Option<String>,
}

impl From<AccountJson> for AccountDetails {
    fn from(value: AccountJson) -> Self {
        AccountDetails {
            sid: value.sid,
            friendly_name: value.friendly_name.unwrap_or_default(),
            status: value.status.unwrap_or_default(),
            account_type: value.account_type.unwrap_or_default(),
            date_created: value.date_created,
            owner_account_sid: value.owner_account_sid,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BalanceJson {
    #[serde(default)]
    currency: Option<String>,
    balance: TransportMoney,
    account_sid: String,
}

#[derive(Debug, Clone, Deserialize)]
struct KeysJsonResponse {
    #[serde(default)]
    keys: Vec<KeyJson>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct KeyJson {
    sid: String,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    secret: Option<String>,
}

pub fn encode_active_accounts_query() -> Vec<(String, String)> {
    vec![param(AccountStatus::FIELD, AccountStatus::Active.as_str())]
}

pub fn encode_create_account_form(name: &FriendlyName) -> Vec<(String, String)> {
    encode_friendly_name_form(name)
}

pub fn encode_friendly_name_form(name: &FriendlyName) -> Vec<(String, String)> {
    vec![param(FriendlyName::FIELD, name.as_str())]
}

/// Account update; at least one of the fields should be set by the caller.
pub fn encode_account_update_form(
    name: Option<&FriendlyName>,
    status: Option<AccountStatus>,
) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(name) = name {
        params.push(param(FriendlyName::FIELD, name.as_str()));
    }
    if let Some(status) = status {
        params.push(param(AccountStatus::FIELD, status.as_str()));
    }
    params
}

pub fn decode_account(json: &str) -> Result<AccountDetails, TransportError> {
    let parsed: AccountJson = serde_json::from_str(json)?;
    Ok(parsed.into())
}

pub fn decode_accounts_page(json: &str) -> Result<Page<AccountDetails>, TransportError> {
    let parsed: AccountsJsonResponse = serde_json::from_str(json)?;
    Ok(Page {
        items: parsed
            .accounts
            .into_iter()
            .map(AccountDetails::from)
            .collect(),
        next: parsed.next_page_uri,
    })
}

pub fn decode_created_account(json: &str) -> Result<CreatedSubaccount, TransportError> {
    let parsed: AccountJson = serde_json::from_str(json)?;
    Ok(CreatedSubaccount {
        sid: parsed.sid,
        friendly_name: parsed.friendly_name.unwrap_or_default(),
        auth_token: parsed.auth_token.unwrap_or_default(),
    })
}

pub fn decode_balance(json: &str) -> Result<Balance, TransportError> {
    let parsed: BalanceJson = serde_json::from_str(json)?;
    Ok(Balance {
        currency: parsed.currency.unwrap_or_else(|| "USD".to_owned()),
        balance: parsed.balance.into_string(),
        account_sid: parsed.account_sid,
    })
}

pub fn decode_keys_page(json: &str) -> Result<Page<ApiKey>, TransportError> {
    let parsed: KeysJsonResponse = serde_json::from_str(json)?;
    let items = parsed
        .keys
        .into_iter()
        .map(|key| ApiKey {
            sid: key.sid,
            friendly_name: key.friendly_name.unwrap_or_default(),
            date_created: key.date_created,
        })
        .collect();
    Ok(Page {
        items,
        next: parsed.next_page_uri,
    })
}

pub fn decode_created_key(json: &str) -> Result<CreatedApiKey, TransportError> {
    let parsed: KeyJson = serde_json::from_str(json)?;
    Ok(CreatedApiKey {
        sid: parsed.sid,
        friendly_name: parsed.friendly_name.unwrap_or_default(),
        secret: parsed.secret.unwrap_or_default(),
    })
}

//! Domain layer: strong types with validation and invariants (no I/O).

pub mod country;
mod request;
mod response;
mod search;
mod validation;
mod value;

pub use country::{Country, Region, RegionPolicy};
pub use request::{
    CallInstructions, ExportFormat, ImportPlan, ImportedListEntry, NumberConfigUpdate, PlaceCall,
    SecurityListChange, SecurityUpdate, SendSms, WebhookKind,
};
pub use response::{
    AccountDetails, ApiKey, AvailableNumber, Balance, BillingSummary, CallReceipt, CallRecord,
    Capabilities, ConfigSnapshot, CountryPricing, CreatedApiKey, CreatedSubaccount, Direction,
    ImportSummary, IncomingNumber, MessageReceipt, MessageRecord, NumberConfig, NumberKind,
    NumberMetadata, NumberPrice, NumberSnapshot, PurchasedNumber, SecurityAlert, SecurityListEntry,
    SecuritySettings, Subaccount, SystemEvent, UsageRecord, UsageReport, WebhookEntry,
    WebhookSettings,
};
pub use search::{DEFAULT_PAGE_SIZE, NumberType, SearchFilters, SearchQuery};
pub use validation::ValidationError;
pub use value::{
    AccountSid, AccountStatus, AuthToken, CountryCode, FriendlyName, MessageBody, PhoneNumber,
    ResourceSid, WebhookMethod, WebhookUrl,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_sid_requires_ac_prefix() {
        assert!(matches!(
            AccountSid::new("   "),
            Err(ValidationError::Empty {
                field: AccountSid::FIELD
            })
        ));
        assert!(matches!(
            AccountSid::new("SK123"),
            Err(ValidationError::InvalidAccountSid { .. })
        ));
        assert_eq!(AccountSid::new(" AC123 ").unwrap().as_str(), "AC123");
    }

    #[test]
    fn auth_token_is_redacted_and_masked() {
        let token = AuthToken::new("abcdef123456").unwrap();
        assert_eq!(format!("{token:?}"), "AuthToken(<redacted>)");
        assert_eq!(token.masked(), "********3456");

        let short = AuthToken::new("ab").unwrap();
        assert_eq!(short.masked(), "ab");
    }

    #[test]
    fn phone_number_normalizes_to_e164() {
        let pn = PhoneNumber::international(" +1 415 555 2671 ").unwrap();
        assert_eq!(pn.e164(), "+14155552671");
        assert_eq!(pn.to_string(), "+14155552671");
    }

    #[test]
    fn phone_number_rejects_empty() {
        assert!(matches!(
            PhoneNumber::international(""),
            Err(ValidationError::Empty {
                field: PhoneNumber::FIELD
            })
        ));
    }

    #[test]
    fn phone_number_equality_uses_e164() {
        let a = PhoneNumber::international("+14155552671").unwrap();
        let b = PhoneNumber::international("+1 (415) 555-2671").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn phone_number_requires_country_prefix() {
        assert!(matches!(
            PhoneNumber::international("415 555 2671"),
            Err(ValidationError::InvalidPhoneNumber { .. })
        ));
    }

    #[test]
    fn country_code_is_upper_cased() {
        assert_eq!(CountryCode::new("us").unwrap().as_str(), "US");
        assert!(CountryCode::new("USA").is_err());
        assert!(CountryCode::new("1A").is_err());
    }

    #[test]
    fn message_body_length_is_enforced() {
        assert!(MessageBody::new("  ").is_err());
        assert!(MessageBody::new("x".repeat(MessageBody::MAX_CHARS)).is_ok());
        assert!(matches!(
            MessageBody::new("x".repeat(MessageBody::MAX_CHARS + 1)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn webhook_url_requires_http_scheme() {
        assert!(WebhookUrl::new("https://example.com/voice").is_ok());
        assert!(WebhookUrl::new("ftp://example.com/voice").is_err());
        assert!(WebhookUrl::new("not a url").is_err());
    }

    #[test]
    fn webhook_method_and_status_parse_case_insensitively() {
        assert_eq!(WebhookMethod::parse("get").unwrap(), WebhookMethod::Get);
        assert_eq!(WebhookMethod::default().as_str(), "POST");
        assert!(WebhookMethod::parse("PUT").is_err());

        assert_eq!(
            AccountStatus::parse("Suspended").unwrap(),
            AccountStatus::Suspended
        );
        assert!(AccountStatus::parse("deleted").is_err());
    }

    #[test]
    fn twiml_instructions_reject_blank_documents() {
        assert!(CallInstructions::twiml(" ").is_err());
        assert!(CallInstructions::twiml("<Response/>").is_ok());
    }

    #[test]
    fn number_kind_is_inferred_from_capabilities() {
        let both = Capabilities {
            voice: true,
            sms: true,
            mms: false,
        };
        assert_eq!(NumberKind::infer(both), NumberKind::Local);
        assert_eq!(
            NumberKind::infer(Capabilities {
                sms: true,
                ..Capabilities::default()
            }),
            NumberKind::Mobile
        );
        assert_eq!(NumberKind::infer(Capabilities::default()).label(), "N/A");
    }

    #[test]
    fn direction_folds_wire_variants() {
        assert_eq!(Direction::from_wire("outbound-api"), Direction::Outbound);
        assert_eq!(
            Direction::from_wire("trunking-terminating"),
            Direction::Inbound
        );
        assert_eq!(
            Direction::from_wire("sideways").to_string(),
            "sideways".to_owned()
        );
    }

    #[test]
    fn config_update_for_webhook_sets_matching_fields() {
        let url = WebhookUrl::new("https://example.com/sms").unwrap();
        let update = NumberConfigUpdate::webhook(WebhookKind::Sms, url.clone(), WebhookMethod::Get);
        assert_eq!(update.sms_url, Some(url));
        assert_eq!(update.sms_method, Some(WebhookMethod::Get));
        assert_eq!(update.voice_url, None);
        assert!(!update.is_empty());
        assert!(NumberConfigUpdate::default().is_empty());
    }
}

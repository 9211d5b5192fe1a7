use crate::domain::validation::ValidationError;
use crate::domain::value::{
    AccountStatus, FriendlyName, MessageBody, PhoneNumber, ResourceSid, WebhookMethod, WebhookUrl,
};

#[derive(Debug, Clone)]
pub struct SendSms {
    from: PhoneNumber,
    to: PhoneNumber,
    body: MessageBody,
}

impl SendSms {
    pub fn new(from: PhoneNumber, to: PhoneNumber, body: MessageBody) -> Self {
        Self { from, to, body }
    }

    pub fn from(&self) -> &PhoneNumber {
        &self.from
    }

    pub fn to(&self) -> &PhoneNumber {
        &self.to
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }
}

/// What Twilio should do once an outbound call connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallInstructions {
    /// Fetch TwiML from this URL.
    Url(WebhookUrl),
    /// Inline TwiML document.
    Twiml(String),
}

impl CallInstructions {
    /// Inline TwiML; must not be blank.
    pub fn twiml(document: impl Into<String>) -> Result<Self, ValidationError> {
        let document = document.into();
        if document.trim().is_empty() {
            return Err(ValidationError::Empty { field: "Twiml" });
        }
        Ok(Self::Twiml(document))
    }
}

#[derive(Debug, Clone)]
pub struct PlaceCall {
    from: PhoneNumber,
    to: PhoneNumber,
    instructions: CallInstructions,
}

impl PlaceCall {
    pub fn new(from: PhoneNumber, to: PhoneNumber, instructions: CallInstructions) -> Self {
        Self {
            from,
            to,
            instructions,
        }
    }

    pub fn from(&self) -> &PhoneNumber {
        &self.from
    }

    pub fn to(&self) -> &PhoneNumber {
        &self.to
    }

    pub fn instructions(&self) -> &CallInstructions {
        &self.instructions
    }
}

/// Partial update of an incoming number. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberConfigUpdate {
    pub friendly_name: Option<FriendlyName>,
    pub voice_url: Option<WebhookUrl>,
    pub voice_method: Option<WebhookMethod>,
    pub sms_url: Option<WebhookUrl>,
    pub sms_method: Option<WebhookMethod>,
    pub status_callback: Option<WebhookUrl>,
    pub status_callback_method: Option<WebhookMethod>,
}

impl NumberConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Update setting the URL and method of one webhook kind.
    pub fn webhook(kind: WebhookKind, url: WebhookUrl, method: WebhookMethod) -> Self {
        let mut update = Self::default();
        match kind {
            WebhookKind::Voice => {
                update.voice_url = Some(url);
                update.voice_method = Some(method);
            }
            WebhookKind::Sms => {
                update.sms_url = Some(url);
                update.sms_method = Some(method);
            }
            WebhookKind::Status => {
                update.status_callback = Some(url);
                update.status_callback_method = Some(method);
            }
        }
        update
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookKind {
    Voice,
    Sms,
    Status,
}

impl WebhookKind {
    pub const ALL: [Self; 3] = [Self::Voice, Self::Sms, Self::Status];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "voice" => Some(Self::Voice),
            "sms" => Some(Self::Sms),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Voice => "voice",
            Self::Sms => "sms",
            Self::Status => "status",
        }
    }
}

/// One change to a SIP IP access control list or credential list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityListChange {
    Create { friendly_name: FriendlyName },
    Rename {
        sid: ResourceSid,
        friendly_name: FriendlyName,
    },
    Delete { sid: ResourceSid },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityUpdate {
    pub status: Option<AccountStatus>,
    pub ip_access_lists: Vec<SecurityListChange>,
    pub credential_lists: Vec<SecurityListChange>,
}

impl SecurityUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.ip_access_lists.is_empty() && self.credential_lists.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Changes derived from an imported configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub account_name: Option<FriendlyName>,
    pub account_status: Option<AccountStatus>,
    pub number_names: Vec<(PhoneNumber, FriendlyName)>,
    /// At most one entry per kind.
    pub webhooks: Vec<(WebhookKind, WebhookUrl, WebhookMethod)>,
    pub ip_access_lists: Vec<ImportedListEntry>,
    pub credential_lists: Vec<ImportedListEntry>,
}

/// Security list entry named in an import document. `sid` is absent for new entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedListEntry {
    pub sid: Option<ResourceSid>,
    pub friendly_name: FriendlyName,
}

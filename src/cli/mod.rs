//! Interactive menu console.
//!
//! Screens form a navigation stack. Each screen has a static table of
//! [`MenuItem`]s mapping a key to an [`Action`]: opening a child screen,
//! running a [`Command`], going back, or exiting. `0` is back (exit on the
//! main screen) everywhere. Command errors are shown and the user chooses
//! whether to carry on; closed input ends the session.

pub mod console;
mod manage;
mod purchase;
mod render;
mod settings;

use std::io;

use thiserror::Error;

use crate::client::{GatewayError, TwilioGateway};
use crate::domain::{ExportFormat, PhoneNumber, ValidationError, WebhookKind};
use console::Console;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("input closed")]
    InputClosed,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("failed to render JSON: {0}")]
    Export(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Purchase,
    Manage,
    Settings,
    Security,
    Subaccounts,
    Developer,
    Webhooks,
    ApiKeys,
    AccountLogs,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SearchNumbers,
    AdvancedSearch,
    CountryPricing,
    ListNumbers,
    ReleaseNumber,
    SendSms,
    MakeCall,
    MessagingLogs,
    CallLogs,
    ViewNumberConfig,
    UpdateNumberConfig,
    NumberDetails,
    UsageAndBilling,
    ViewSecurity,
    UpdateAccountStatus,
    ManageIpAccessLists,
    ManageCredentialLists,
    SecurityLogs,
    ListSubaccounts,
    CreateSubaccount,
    SwitchAccount,
    CloseSubaccount,
    ShowCredentials,
    ToggleDebugLogging,
    ViewWebhooks,
    SetWebhook(WebhookKind),
    ListApiKeys,
    CreateApiKey,
    RevokeApiKey,
    SystemLogs,
    ApiLogs,
    ExportConfig(ExportFormat),
    ImportConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open(Screen),
    Run(Command),
    Back,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub action: Action,
}

const fn item(key: &'static str, label: &'static str, action: Action) -> MenuItem {
    MenuItem { key, label, action }
}

const fn open(key: &'static str, label: &'static str, screen: Screen) -> MenuItem {
    item(key, label, Action::Open(screen))
}

const fn cmd(key: &'static str, label: &'static str, command: Command) -> MenuItem {
    item(key, label, Action::Run(command))
}

const BACK: MenuItem = item("0", "Back", Action::Back);

static MAIN_MENU: &[MenuItem] = &[
    open("1", "Purchase Numbers", Screen::Purchase),
    open("2", "Manage Numbers", Screen::Manage),
    open("3", "Settings & Admin", Screen::Settings),
    item("0", "Exit", Action::Exit),
];

static PURCHASE_MENU: &[MenuItem] = &[
    cmd("1", "Search & Purchase Numbers", Command::SearchNumbers),
    cmd("2", "Country Pricing", Command::CountryPricing),
    BACK,
];

static MANAGE_MENU: &[MenuItem] = &[
    cmd("1", "List Active Numbers", Command::ListNumbers),
    cmd("2", "Release a Number", Command::ReleaseNumber),
    cmd("3", "Send SMS", Command::SendSms),
    cmd("4", "Make a Call", Command::MakeCall),
    cmd("5", "Messaging Logs", Command::MessagingLogs),
    cmd("6", "Call Logs", Command::CallLogs),
    cmd("7", "View Number Configuration", Command::ViewNumberConfig),
    cmd(
        "8",
        "Update Number Configuration",
        Command::UpdateNumberConfig,
    ),
    cmd("9", "Number Details", Command::NumberDetails),
    BACK,
];

static SETTINGS_MENU: &[MenuItem] = &[
    cmd("1", "Usage & Billing", Command::UsageAndBilling),
    open("2", "Security Settings", Screen::Security),
    open("3", "Subaccounts", Screen::Subaccounts),
    open("4", "Developer Tools", Screen::Developer),
    open("5", "Account Logs", Screen::AccountLogs),
    cmd("6", "Advanced Number Search", Command::AdvancedSearch),
    cmd("7", "Country Pricing", Command::CountryPricing),
    open("8", "Configuration Management", Screen::Configuration),
    BACK,
];

static SECURITY_MENU: &[MenuItem] = &[
    cmd("1", "View Security Settings", Command::ViewSecurity),
    cmd("2", "Update Account Status", Command::UpdateAccountStatus),
    cmd("3", "Manage IP Access Lists", Command::ManageIpAccessLists),
    cmd(
        "4",
        "Manage Credential Lists",
        Command::ManageCredentialLists,
    ),
    cmd("5", "Security Logs", Command::SecurityLogs),
    BACK,
];

static SUBACCOUNTS_MENU: &[MenuItem] = &[
    cmd("1", "List Subaccounts", Command::ListSubaccounts),
    cmd("2", "Create Subaccount", Command::CreateSubaccount),
    cmd("3", "Switch Account", Command::SwitchAccount),
    cmd("4", "Close Subaccount", Command::CloseSubaccount),
    BACK,
];

static DEVELOPER_MENU: &[MenuItem] = &[
    cmd("1", "API Credentials", Command::ShowCredentials),
    open("2", "Webhooks", Screen::Webhooks),
    cmd("3", "Toggle Debug Logging", Command::ToggleDebugLogging),
    open("4", "API Keys", Screen::ApiKeys),
    BACK,
];

static WEBHOOKS_MENU: &[MenuItem] = &[
    cmd("1", "View Webhooks", Command::ViewWebhooks),
    cmd(
        "2",
        "Set Voice Webhook",
        Command::SetWebhook(WebhookKind::Voice),
    ),
    cmd(
        "3",
        "Set SMS Webhook",
        Command::SetWebhook(WebhookKind::Sms),
    ),
    cmd(
        "4",
        "Set Status Callback",
        Command::SetWebhook(WebhookKind::Status),
    ),
    BACK,
];

static API_KEYS_MENU: &[MenuItem] = &[
    cmd("1", "List API Keys", Command::ListApiKeys),
    cmd("2", "Create API Key", Command::CreateApiKey),
    cmd("3", "Revoke API Key", Command::RevokeApiKey),
    BACK,
];

static ACCOUNT_LOGS_MENU: &[MenuItem] = &[
    cmd("1", "System Events", Command::SystemLogs),
    cmd("2", "API Usage (last 30 days)", Command::ApiLogs),
    cmd("3", "Security Alerts", Command::SecurityLogs),
    BACK,
];

static CONFIGURATION_MENU: &[MenuItem] = &[
    cmd(
        "1",
        "Export as JSON",
        Command::ExportConfig(ExportFormat::Json),
    ),
    cmd(
        "2",
        "Export as CSV",
        Command::ExportConfig(ExportFormat::Csv),
    ),
    cmd("3", "Import from JSON", Command::ImportConfig),
    BACK,
];

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Self::Main => "TWILIO MANAGER",
            Self::Purchase => "Purchase Numbers",
            Self::Manage => "Manage Numbers",
            Self::Settings => "Settings & Admin",
            Self::Security => "Security Settings",
            Self::Subaccounts => "Subaccounts",
            Self::Developer => "Developer Tools",
            Self::Webhooks => "Webhooks",
            Self::ApiKeys => "API Keys",
            Self::AccountLogs => "Account Logs",
            Self::Configuration => "Configuration Management",
        }
    }

    pub fn items(self) -> &'static [MenuItem] {
        match self {
            Self::Main => MAIN_MENU,
            Self::Purchase => PURCHASE_MENU,
            Self::Manage => MANAGE_MENU,
            Self::Settings => SETTINGS_MENU,
            Self::Security => SECURITY_MENU,
            Self::Subaccounts => SUBACCOUNTS_MENU,
            Self::Developer => DEVELOPER_MENU,
            Self::Webhooks => WEBHOOKS_MENU,
            Self::ApiKeys => API_KEYS_MENU,
            Self::AccountLogs => ACCOUNT_LOGS_MENU,
            Self::Configuration => CONFIGURATION_MENU,
        }
    }

    /// Action bound to `key`, if any.
    pub fn dispatch(self, key: &str) -> Option<Action> {
        let key = key.trim();
        self.items()
            .iter()
            .find(|item| item.key.eq_ignore_ascii_case(key))
            .map(|item| item.action)
    }
}

/// Stack of open screens; the session ends when it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Main],
        }
    }

    pub fn current(&self) -> Option<Screen> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Apply a navigation action. `Run` leaves the stack as is and hands the command back.
    pub fn apply(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Open(screen) => self.stack.push(screen),
            Action::Back => {
                self.stack.pop();
            }
            Action::Exit => self.stack.clear(),
            Action::Run(command) => return Some(command),
        }
        None
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the menu loop until the user exits or input closes.
pub async fn run(gateway: &mut TwilioGateway, console: &mut dyn Console) -> Result<(), CliError> {
    let mut session = Session { gateway, console };
    let mut navigator = Navigator::new();

    while let Some(screen) = navigator.current() {
        session.show_menu(screen)?;
        let Some(choice) = session.console.read_line("Select an option: ").await? else {
            break;
        };
        let Some(action) = screen.dispatch(&choice) else {
            session.say("Invalid selection. Please try again.")?;
            continue;
        };
        let Some(command) = navigator.apply(action) else {
            continue;
        };

        match session.execute(command).await {
            Ok(()) => {}
            Err(CliError::InputClosed) => break,
            Err(CliError::Io(err)) => return Err(CliError::Io(err)),
            Err(err) => {
                log::debug!("{command:?} failed: {err:?}");
                session.say(&format!("Error: {err}"))?;
                let answer = session
                    .console
                    .read_line("Press Enter to continue or 0 to exit: ")
                    .await?;
                if answer.as_deref().is_none_or(|a| a.trim() == "0") {
                    navigator.apply(Action::Exit);
                }
            }
        }
    }

    session.say("Exiting.")?;
    Ok(())
}

/// Gateway and console borrowed for the length of a menu session.
pub(crate) struct Session<'a> {
    gateway: &'a mut TwilioGateway,
    console: &'a mut dyn Console,
}

impl Session<'_> {
    async fn execute(&mut self, command: Command) -> Result<(), CliError> {
        match command {
            Command::SearchNumbers => self.search_numbers(false).await,
            Command::AdvancedSearch => self.search_numbers(true).await,
            Command::CountryPricing => self.country_pricing().await,
            Command::ListNumbers => self.list_numbers().await,
            Command::ReleaseNumber => self.release_number().await,
            Command::SendSms => self.send_sms().await,
            Command::MakeCall => self.make_call().await,
            Command::MessagingLogs => self.messaging_logs().await,
            Command::CallLogs => self.call_logs().await,
            Command::ViewNumberConfig => self.view_number_config().await,
            Command::UpdateNumberConfig => self.update_number_config().await,
            Command::NumberDetails => self.number_details().await,
            Command::UsageAndBilling => self.usage_and_billing().await,
            Command::ViewSecurity => self.view_security().await,
            Command::UpdateAccountStatus => self.update_account_status().await,
            Command::ManageIpAccessLists => self.manage_security_list(SecurityList::IpAccess).await,
            Command::ManageCredentialLists => {
                self.manage_security_list(SecurityList::Credentials).await
            }
            Command::SecurityLogs => self.security_logs().await,
            Command::ListSubaccounts => self.list_subaccounts().await,
            Command::CreateSubaccount => self.create_subaccount().await,
            Command::SwitchAccount => self.switch_account().await,
            Command::CloseSubaccount => self.close_subaccount().await,
            Command::ShowCredentials => self.show_credentials(),
            Command::ToggleDebugLogging => self.toggle_debug_logging(),
            Command::ViewWebhooks => self.view_webhooks().await,
            Command::SetWebhook(kind) => self.set_webhook(kind).await,
            Command::ListApiKeys => self.list_api_keys().await,
            Command::CreateApiKey => self.create_api_key().await,
            Command::RevokeApiKey => self.revoke_api_key().await,
            Command::SystemLogs => self.system_logs().await,
            Command::ApiLogs => self.api_logs().await,
            Command::ExportConfig(format) => self.export_config(format).await,
            Command::ImportConfig => self.import_config().await,
        }
    }

    fn show_menu(&mut self, screen: Screen) -> Result<(), CliError> {
        let mut lines = Vec::new();
        if screen == Screen::Main {
            lines.push(format!("Account: {}", self.gateway.active_account()));
            lines.push(String::new());
        }
        lines.extend(
            screen
                .items()
                .iter()
                .map(|item| format!("{}. {}", item.key, item.label)),
        );
        render::panel(self.console, screen.title(), &lines)
    }

    fn say(&mut self, line: &str) -> Result<(), CliError> {
        self.console.write_line(line)?;
        Ok(())
    }

    /// Trimmed answer to `prompt`.
    async fn ask(&mut self, prompt: &str) -> Result<String, CliError> {
        match self.console.read_line(prompt).await? {
            Some(line) => Ok(line.trim().to_owned()),
            None => Err(CliError::InputClosed),
        }
    }

    /// Answer to `prompt`, with blank input replaced by `default`.
    async fn ask_or(&mut self, prompt: &str, default: &str) -> Result<String, CliError> {
        let answer = self.ask(prompt).await?;
        Ok(if answer.is_empty() {
            default.to_owned()
        } else {
            answer
        })
    }

    /// Parsed answer to `prompt`; blank input is `None`.
    async fn ask_optional<T>(
        &mut self,
        prompt: &str,
        parse: impl FnOnce(String) -> Result<T, ValidationError>,
    ) -> Result<Option<T>, CliError> {
        let answer = self.ask(prompt).await?;
        if answer.is_empty() {
            return Ok(None);
        }
        Ok(Some(parse(answer)?))
    }

    async fn ask_phone(&mut self, prompt: &str) -> Result<PhoneNumber, CliError> {
        let answer = self.ask(prompt).await?;
        Ok(PhoneNumber::international(answer)?)
    }

    async fn confirm(&mut self, question: &str) -> Result<bool, CliError> {
        let answer = self.ask(&format!("{question} [y/N]: ")).await?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// One-based selection from a list of `len` entries; anything else is `None`.
    async fn ask_index(&mut self, prompt: &str, len: usize) -> Result<Option<usize>, CliError> {
        let answer = self.ask(prompt).await?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => Ok(Some(n - 1)),
            _ => {
                if answer != "0" && !answer.is_empty() {
                    self.say("Invalid selection.")?;
                }
                Ok(None)
            }
        }
    }
}

/// Which SIP security list a command manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SecurityList {
    IpAccess,
    Credentials,
}

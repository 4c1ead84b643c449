//! Dashboard construction and notification reporting for commands.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use domwatch_business::{BusinessConfig, Dashboard, FileStore, Notification};
use flume::Receiver;
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::output::Output;

/// Everything a command needs: the dashboard, its notification feed and the terminal.
pub struct CliContext {
    pub dashboard: Dashboard,
    notifications: Receiver<Notification>,
    pub out: Output,
}

/// Resolve the business configuration: defaults, then the config file, then
/// `API_BASE_URL` / `MEDIA_BASE_URL`, then `--api-url`.
pub fn resolve_business_config(
    config: &Config,
    env: impl IntoIterator<Item = (String, String)>,
    api_url: Option<String>,
) -> Result<BusinessConfig> {
    let mut business = config
        .business_config()
        .with_env_overrides(env)
        .context("Failed to read API_BASE_URL / MEDIA_BASE_URL")?;
    if let Some(url) = api_url {
        business.api_base_url = url;
    }
    Ok(business)
}

impl CliContext {
    pub fn new(business: BusinessConfig) -> Result<Self> {
        let store = Arc::new(FileStore::new(Config::state_path()?));
        debug!("Using state file {}", store.path().display());
        let (dashboard, notifications) = Dashboard::with_http(business, store);

        Ok(Self {
            dashboard,
            notifications,
            out: Output::new(),
        })
    }

    /// Print every notification published since the last call.
    pub fn show_notifications(&self) {
        for notification in self.notifications.drain() {
            match notification {
                Notification::Success(message) => self.out.success(message),
                Notification::Error(err) => self.out.error(err),
            }
        }
    }

    /// Prompt for credentials when no session token is stored.
    #[instrument(skip_all, name = "ensure_signed_in")]
    pub async fn ensure_signed_in(&mut self) -> Result<()> {
        if self.dashboard.session().has_token() {
            return Ok(());
        }

        self.out.warning("Not signed in.");
        self.login(None).await
    }

    /// Sign in, prompting for whatever was not given.
    pub async fn login(&mut self, email: Option<String>) -> Result<()> {
        let email = match email {
            Some(email) => email,
            None => Text::new("Email:")
                .with_help_message("Enter your account email")
                .prompt()
                .context("Failed to read email")?,
        };
        let password = Password::new("Password:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read password")?;

        let result = self.dashboard.login(&email, &password).await;
        self.show_notifications();
        result?;
        Ok(())
    }
}

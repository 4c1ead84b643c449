//! Account management: known users, create, delete and password change.

use anyhow::{Context as _, Result, bail};
use domwatch_business::{
    FIELD_CONFIRM_PASSWORD, FIELD_EMAIL, FIELD_NAME, FIELD_PASSWORD, FormKind, LocalUser,
};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::context::CliContext;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&LocalUser> for UserRow {
    fn from(user: &LocalUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

fn ensure_user_management(ctx: &CliContext) -> Result<()> {
    if !ctx.dashboard.config().features.user_management {
        bail!("User management is disabled in the configuration");
    }
    Ok(())
}

fn masked(message: &str) -> Password<'_> {
    Password::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
}

pub fn run_users(ctx: &CliContext) -> Result<()> {
    ensure_user_management(ctx)?;

    let users = ctx.dashboard.registry().users();
    if users.is_empty() {
        ctx.out.dim("No accounts have been created from this machine.");
        return Ok(());
    }

    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());

    ctx.out.print(table);
    ctx.out.total("Total", users.len(), "user");
    Ok(())
}

#[instrument(skip_all, name = "create_account")]
pub async fn run_create_account(
    mut ctx: CliContext,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    ensure_user_management(&ctx)?;
    ctx.ensure_signed_in().await?;

    let name = match name {
        Some(name) => name,
        None => Text::new("Name:").prompt().context("Failed to read name")?,
    };
    let email = match email {
        Some(email) => email,
        None => Text::new("Email:").prompt().context("Failed to read email")?,
    };
    let password = masked("Password:")
        .prompt()
        .context("Failed to read password")?;

    let kind = FormKind::CreateAccount;
    ctx.dashboard.open_form(kind);
    ctx.dashboard.set_field(kind, FIELD_NAME, name);
    ctx.dashboard.set_field(kind, FIELD_EMAIL, email);
    ctx.dashboard.set_field(kind, FIELD_PASSWORD, password);

    let result = ctx.dashboard.submit(kind).await;
    ctx.show_notifications();
    result?;
    Ok(())
}

#[instrument(skip_all, name = "delete_account")]
pub async fn run_delete_account(
    mut ctx: CliContext,
    email: Option<String>,
    yes: bool,
) -> Result<()> {
    ensure_user_management(&ctx)?;
    ctx.ensure_signed_in().await?;

    let email = match email {
        Some(email) => email,
        None => {
            let known: Vec<String> = ctx
                .dashboard
                .registry()
                .users()
                .iter()
                .map(|u| u.email.clone())
                .collect();
            if known.is_empty() {
                bail!("No known users; pass the email to delete explicitly");
            }
            let Some(email) = Select::new("Account to delete:", known)
                .prompt_skippable()
                .context("Failed to select account")?
            else {
                return Ok(());
            };
            email
        }
    };

    ctx.dashboard.select_user_for_deletion(&email);

    let confirmed = yes
        || Confirm::new(&format!("Delete the account '{email}'?"))
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
    if !confirmed {
        ctx.dashboard.close_form(FormKind::DeleteAccount);
        ctx.out.info("Cancelled.");
        return Ok(());
    }

    let result = ctx.dashboard.submit(FormKind::DeleteAccount).await;
    ctx.show_notifications();
    result?;
    Ok(())
}

#[instrument(skip_all, name = "change_password")]
pub async fn run_change_password(mut ctx: CliContext) -> Result<()> {
    ensure_user_management(&ctx)?;
    ctx.ensure_signed_in().await?;

    let password = masked("New password:")
        .prompt()
        .context("Failed to read password")?;
    let confirm = masked("Confirm password:")
        .prompt()
        .context("Failed to read password")?;

    let kind = FormKind::ChangePassword;
    ctx.dashboard.open_form(kind);
    ctx.dashboard.set_field(kind, FIELD_PASSWORD, password);
    ctx.dashboard.set_field(kind, FIELD_CONFIRM_PASSWORD, confirm);

    let result = ctx.dashboard.submit(kind).await;
    ctx.show_notifications();
    result?;
    Ok(())
}

//! `add-customer` and `add-domains`.

use anyhow::{Context as _, Result};
use domwatch_business::{FIELD_DOMAINS, FIELD_NAME, FormKind};
use inquire::Text;
use tracing::instrument;

use crate::context::CliContext;

fn prompt_missing(value: Option<String>, message: &str, help: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Text::new(message)
            .with_help_message(help)
            .prompt()
            .with_context(|| format!("Failed to read {}", message.trim_end_matches(':'))),
    }
}

/// Fill and submit one of the customer forms.
#[instrument(skip_all, name = "customer_form", fields(form = %kind))]
pub async fn run_customer_form(
    mut ctx: CliContext,
    kind: FormKind,
    name: Option<String>,
    domains: Option<String>,
) -> Result<()> {
    ctx.ensure_signed_in().await?;

    let name = prompt_missing(name, "Customer name:", "Name of the customer")?;
    let domains = prompt_missing(
        domains,
        "Domains:",
        "Comma-separated, e.g. example.com, example.org",
    )?;

    ctx.dashboard.open_form(kind);
    ctx.dashboard.set_field(kind, FIELD_NAME, name);
    ctx.dashboard.set_field(kind, FIELD_DOMAINS, domains);

    let result = ctx.dashboard.submit(kind).await;
    ctx.show_notifications();
    result?;
    Ok(())
}

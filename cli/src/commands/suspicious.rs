//! List suspicious domains command.

use anyhow::{Context as _, Result};
use domwatch_business::{SuspiciousDomain, ViewKind};
use inquire::Select;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::context::CliContext;

#[derive(Tabled)]
struct SuspiciousRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Found")]
    found: String,
}

impl From<&SuspiciousDomain> for SuspiciousRow {
    fn from(row: &SuspiciousDomain) -> Self {
        Self {
            id: row.id,
            domain: row.suspicious_domain.clone(),
            customer: row.customer.name.clone(),
            found: row.found_date_display(),
        }
    }
}

fn select_label(row: &SuspiciousDomain) -> String {
    format!(
        "{} ({}, {}) [{}]",
        row.suspicious_domain,
        row.customer.name,
        row.found_date_display(),
        row.id
    )
}

#[instrument(skip_all, name = "suspicious", fields(search = search.as_deref().unwrap_or("")))]
pub async fn run_suspicious(
    mut ctx: CliContext,
    search: Option<String>,
    interactive: bool,
) -> Result<()> {
    ctx.ensure_signed_in().await?;

    let result = ctx.dashboard.load(ViewKind::Suspicious).await;
    ctx.show_notifications();
    result?;

    if let Some(term) = search {
        if ctx.dashboard.config().features.search {
            ctx.dashboard.search(&term);
        } else {
            ctx.out.warning("Search is disabled, showing every row.");
        }
    }

    let rows = ctx.dashboard.visible_suspicious();
    if rows.is_empty() {
        ctx.out.dim("No suspicious domains found.");
        return Ok(());
    }

    if interactive {
        let options: Vec<String> = rows.iter().map(select_label).collect();
        let selection = Select::new("Select a domain to inspect:", options.clone())
            .with_help_message("Use arrow keys to navigate, Enter to select")
            .prompt_skippable()
            .context("Failed to select domain")?;

        let Some(selected) = selection else {
            return Ok(());
        };
        if let Some(row) = options
            .iter()
            .position(|label| *label == selected)
            .and_then(|index| rows.get(index))
        {
            show_details(&ctx, row);
        }
        return Ok(());
    }

    let table_rows: Vec<SuspiciousRow> = rows.iter().map(SuspiciousRow::from).collect();
    let mut table = Table::new(&table_rows);
    table.with(Style::rounded());

    ctx.out.newline();
    ctx.out.print(table);
    ctx.out.total("Total", rows.len(), "suspicious domain");
    Ok(())
}

fn show_details(ctx: &CliContext, row: &SuspiciousDomain) {
    let out = &ctx.out;
    out.newline();
    out.header(&row.suspicious_domain);
    out.labeled("Customer", &row.customer.name);
    out.labeled("Found", row.found_date_display());
    match ctx.dashboard.preview_url(row) {
        Some(url) => out.labeled("Screenshot", url),
        None => out.labeled("Screenshot", "-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> SuspiciousDomain {
        serde_json::from_str(
            r#"{
                "id": 5,
                "suspicious_domain": "acme-login.com",
                "found_date": "2024-03-15T14:05:09Z",
                "customer": {"id": 7, "name": "Acme"}
            }"#,
        )
        .expect("row")
    }

    #[test]
    fn test_row_uses_display_date() {
        let row = SuspiciousRow::from(&sample_row());
        assert_eq!(row.domain, "acme-login.com");
        assert_eq!(row.customer, "Acme");
        assert_eq!(row.found, "3/15/2024, 2:05:09 PM");
    }

    #[test]
    fn test_select_label_ends_with_id() {
        assert_eq!(
            select_label(&sample_row()),
            "acme-login.com (Acme, 3/15/2024, 2:05:09 PM) [5]"
        );
    }
}

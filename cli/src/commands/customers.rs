//! List customers command.

use anyhow::Result;
use domwatch_business::{Customer, ViewKind};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::context::CliContext;

#[derive(Tabled)]
struct CustomerRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Domains")]
    domains: String,
}

impl From<&Customer> for CustomerRow {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            domains: customer
                .domains
                .iter()
                .map(|d| d.domain.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[instrument(skip_all, name = "customers")]
pub async fn run_customers(mut ctx: CliContext) -> Result<()> {
    ctx.ensure_signed_in().await?;

    let result = ctx.dashboard.load(ViewKind::Customers).await;
    ctx.show_notifications();
    result?;

    let customers = &ctx.dashboard.view_state().customers;
    if customers.is_empty() {
        ctx.out.dim("No customers found.");
        return Ok(());
    }

    let rows: Vec<CustomerRow> = customers.iter().map(CustomerRow::from).collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());

    ctx.out.newline();
    ctx.out.print(table);
    ctx.out.total("Total", customers.len(), "customer");
    Ok(())
}

#[cfg(test)]
mod tests {
    use domwatch_business::Domain;

    use super::*;

    #[test]
    fn test_row_lists_one_domain_per_line() {
        let customer = Customer {
            id: 7,
            name: "Acme".to_owned(),
            domains: vec![
                Domain {
                    id: 1,
                    domain: "acme.com".to_owned(),
                    customer_id: 7,
                },
                Domain {
                    id: 2,
                    domain: "acme.org".to_owned(),
                    customer_id: 7,
                },
            ],
        };

        let row = CustomerRow::from(&customer);
        assert_eq!(row.id, 7);
        assert_eq!(row.domains, "acme.com\nacme.org");
    }
}

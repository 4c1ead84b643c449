#![allow(clippy::exit)]

mod cli;
mod commands;
mod config;
mod context;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;
use domwatch_business::{DashboardError, FormKind};
use tracing::error;

use crate::cli::{Cli, Commands};
use crate::commands::{
    generate_completions, run_change_password, run_create_account, run_customer_form,
    run_customers, run_delete_account, run_login, run_logout, run_status, run_suspicious,
    run_users,
};
use crate::config::Config;
use crate::context::{CliContext, resolve_business_config};
use crate::output::Output;

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let config = Config::load()?;
    let business = resolve_business_config(&config, std::env::vars(), cli.api_url)?;
    let ctx = CliContext::new(business)?;

    match cli.command {
        Commands::Login { email } => run_login(ctx, email).await,
        Commands::Logout => run_logout(ctx),
        Commands::Status => run_status(&ctx),
        Commands::Customers => run_customers(ctx).await,
        Commands::Suspicious {
            search,
            interactive,
        } => run_suspicious(ctx, search, interactive).await,
        Commands::AddCustomer { name, domains } => {
            run_customer_form(ctx, FormKind::AddCustomer, name, domains).await
        }
        Commands::AddDomains { name, domains } => {
            run_customer_form(ctx, FormKind::AddDomains, name, domains).await
        }
        Commands::Users => run_users(&ctx),
        Commands::CreateAccount { name, email } => run_create_account(ctx, name, email).await,
        Commands::DeleteAccount { email, yes } => run_delete_account(ctx, email, yes).await,
        Commands::ChangePassword => run_change_password(ctx).await,
        Commands::Completions { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    if let Err(err) = run(cli).await {
        // Dashboard failures were already printed from the notification feed.
        if err.downcast_ref::<DashboardError>().is_none() {
            Output::new().error(format!("{err:#}"));
        }
        error!("{err:#}");
        std::process::exit(1);
    }
}

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "domwatch")]
#[command(about = "Watch look-alike domains registered against your customers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API origin, overrides the config file and API_BASE_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account email (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show session and configuration
    Status,
    /// List customers and their monitored domains
    Customers,
    /// List suspicious look-alike domains
    Suspicious {
        /// Only show rows whose domain, customer or date contains TERM
        #[arg(long, short = 's', value_name = "TERM")]
        search: Option<String>,

        /// Interactive mode (select a row to inspect)
        #[arg(long, short = 'I')]
        interactive: bool,
    },
    /// Register a customer with its domains
    AddCustomer {
        /// Customer name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Comma-separated domains
        #[arg(long, short = 'd')]
        domains: Option<String>,
    },
    /// Attach domains to an existing customer
    AddDomains {
        /// Customer name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Comma-separated domains
        #[arg(long, short = 'd')]
        domains: Option<String>,
    },
    /// List accounts created from this machine
    Users,
    /// Create a user account
    CreateAccount {
        #[arg(long, short = 'n')]
        name: Option<String>,

        #[arg(long, short = 'e')]
        email: Option<String>,
    },
    /// Delete a user account created from this machine
    DeleteAccount {
        /// Email of the account (selected from known users when omitted)
        email: Option<String>,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Change the password of the signed-in account
    ChangePassword,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

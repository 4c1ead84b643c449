//! Command implementations for the domwatch CLI.

pub mod accounts;
pub mod completions;
pub mod customer_forms;
pub mod customers;
pub mod session;
pub mod suspicious;

pub use accounts::{run_change_password, run_create_account, run_delete_account, run_users};
pub use completions::generate_completions;
pub use customer_forms::run_customer_form;
pub use customers::run_customers;
pub use session::{run_login, run_logout, run_status};
pub use suspicious::run_suspicious;

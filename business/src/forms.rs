//! Modal form sessions and their submission.
//!
//! Each form kind keeps its own open flag and field values. Values survive
//! `open` and are cleared on every `close`, whether the form was submitted or
//! cancelled. A failed submit leaves the form open with its values intact so
//! the user can retry.

use std::collections::{BTreeMap, HashMap};

use log::{info, warn};

use crate::api::DomainService;
use crate::config::DashboardFeatures;
use crate::error::DashboardError;
use crate::models::LocalUser;
use crate::search::split_domains;
use crate::session::SessionStore;
use crate::user_registry::UserRegistry;

pub const FIELD_NAME: &str = "name";
pub const FIELD_DOMAINS: &str = "domains";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirm_password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    AddCustomer,
    AddDomains,
    CreateAccount,
    DeleteAccount,
    ChangePassword,
}

impl FormKind {
    pub const ALL: [Self; 5] = [
        Self::AddCustomer,
        Self::AddDomains,
        Self::CreateAccount,
        Self::DeleteAccount,
        Self::ChangePassword,
    ];

    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::AddCustomer | Self::AddDomains => &[FIELD_NAME, FIELD_DOMAINS],
            Self::CreateAccount => &[FIELD_NAME, FIELD_EMAIL, FIELD_PASSWORD],
            Self::DeleteAccount => &[FIELD_EMAIL],
            Self::ChangePassword => &[FIELD_PASSWORD, FIELD_CONFIRM_PASSWORD],
        }
    }

    /// Account forms are only available with user management enabled.
    pub fn requires_user_management(self) -> bool {
        matches!(
            self,
            Self::CreateAccount | Self::DeleteAccount | Self::ChangePassword
        )
    }

    /// The customer and domain forms edit one shared name/domains draft.
    fn shared_with(self) -> Option<Self> {
        match self {
            Self::AddCustomer => Some(Self::AddDomains),
            Self::AddDomains => Some(Self::AddCustomer),
            Self::CreateAccount | Self::DeleteAccount | Self::ChangePassword => None,
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Self::AddCustomer => "Customer added",
            Self::AddDomains => "Domains added",
            Self::CreateAccount => "Account created",
            Self::DeleteAccount => "Account deleted",
            Self::ChangePassword => "Password changed",
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AddCustomer => "add customer",
            Self::AddDomains => "add domains",
            Self::CreateAccount => "create account",
            Self::DeleteAccount => "delete account",
            Self::ChangePassword => "change password",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSession {
    open: bool,
    fields: BTreeMap<String, String>,
}

impl FormSession {
    fn for_kind(kind: FormKind) -> Self {
        Self {
            open: false,
            fields: kind
                .fields()
                .iter()
                .map(|name| ((*name).to_owned(), String::new()))
                .collect(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current value of a field, empty when never set.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    fn clear(&mut self) {
        self.fields.values_mut().for_each(String::clear);
    }
}

/// Everything a submit needs besides the form itself.
pub struct SubmitContext<'a> {
    pub session: &'a SessionStore,
    pub registry: &'a mut UserRegistry,
    pub service: &'a dyn DomainService,
    pub features: DashboardFeatures,
}

#[derive(Debug, Clone)]
pub struct FormSessionManager {
    sessions: HashMap<FormKind, FormSession>,
}

impl Default for FormSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSessionManager {
    pub fn new() -> Self {
        Self {
            sessions: FormKind::ALL
                .iter()
                .map(|kind| (*kind, FormSession::for_kind(*kind)))
                .collect(),
        }
    }

    pub fn form(&self, kind: FormKind) -> &FormSession {
        &self.sessions[&kind]
    }

    fn form_mut(&mut self, kind: FormKind) -> &mut FormSession {
        self.sessions
            .entry(kind)
            .or_insert_with(|| FormSession::for_kind(kind))
    }

    /// Open a form. Values entered before are kept.
    pub fn open(&mut self, kind: FormKind) {
        self.form_mut(kind).open = true;
    }

    /// Close a form and clear its values.
    pub fn close(&mut self, kind: FormKind) {
        let form = self.form_mut(kind);
        form.open = false;
        form.clear();

        if let Some(other) = kind.shared_with() {
            self.form_mut(other).clear();
        }
    }

    pub fn set_field(&mut self, kind: FormKind, name: &str, value: impl Into<String>) {
        self.form_mut(kind)
            .fields
            .insert(name.to_owned(), value.into());
    }

    /// Submit a form.
    ///
    /// Local validation runs first and never reaches the network. On success
    /// the local user registry is reconciled and the form is closed; on any
    /// failure the form stays as it was. Returns the success message.
    pub async fn submit(
        &mut self,
        kind: FormKind,
        ctx: SubmitContext<'_>,
    ) -> Result<&'static str, DashboardError> {
        let form = self.form(kind).clone();

        if kind.requires_user_management() && !ctx.features.user_management {
            return Err(DashboardError::validation("User management is disabled"));
        }

        if kind == FormKind::ChangePassword
            && form.field(FIELD_PASSWORD) != form.field(FIELD_CONFIRM_PASSWORD)
        {
            info!("Change password rejected locally: confirmation does not match");
            return Err(DashboardError::validation("Passwords do not match"));
        }

        if kind == FormKind::DeleteAccount && form.field(FIELD_EMAIL).is_empty() {
            return Err(DashboardError::validation("No user selected"));
        }

        let token = ctx.session.require_token()?;

        let result = match kind {
            FormKind::AddCustomer => {
                let domains = split_domains(form.field(FIELD_DOMAINS));
                ctx.service
                    .create_customer(token, form.field(FIELD_NAME), &domains)
                    .await
            }
            FormKind::AddDomains => {
                let domains = split_domains(form.field(FIELD_DOMAINS));
                ctx.service
                    .add_domains_to_customer(token, form.field(FIELD_NAME), &domains)
                    .await
            }
            FormKind::CreateAccount => {
                ctx.service
                    .create_account(
                        token,
                        form.field(FIELD_NAME),
                        form.field(FIELD_EMAIL),
                        form.field(FIELD_PASSWORD),
                    )
                    .await
            }
            FormKind::DeleteAccount => {
                ctx.service
                    .delete_account(token, form.field(FIELD_EMAIL))
                    .await
            }
            FormKind::ChangePassword => {
                ctx.service
                    .change_password(token, form.field(FIELD_PASSWORD))
                    .await
            }
        };

        if let Err(err) = result {
            warn!("Submit of {kind} failed: {err}");
            return Err(err.into());
        }

        // The server accepted the change; the form closes even if the local
        // snapshot cannot be written.
        let persisted = match kind {
            FormKind::CreateAccount => ctx.registry.append(LocalUser {
                name: form.field(FIELD_NAME).to_owned(),
                email: form.field(FIELD_EMAIL).to_owned(),
            }),
            FormKind::DeleteAccount => ctx.registry.remove(form.field(FIELD_EMAIL)),
            FormKind::AddCustomer | FormKind::AddDomains | FormKind::ChangePassword => Ok(()),
        };

        self.close(kind);
        info!("Submit of {kind} succeeded");
        persisted?;

        Ok(kind.success_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_forms_are_closed_and_empty() {
        let forms = FormSessionManager::new();
        for kind in FormKind::ALL {
            let form = forms.form(kind);
            assert!(!form.is_open());
            assert!(form.fields().values().all(String::is_empty));
            assert_eq!(form.fields().len(), kind.fields().len());
        }
    }

    #[test]
    fn test_open_keeps_values_close_clears() {
        let mut forms = FormSessionManager::new();
        forms.set_field(FormKind::CreateAccount, FIELD_NAME, "A");
        forms.open(FormKind::CreateAccount);

        assert!(forms.form(FormKind::CreateAccount).is_open());
        assert_eq!(forms.form(FormKind::CreateAccount).field(FIELD_NAME), "A");

        forms.close(FormKind::CreateAccount);

        assert!(!forms.form(FormKind::CreateAccount).is_open());
        assert_eq!(forms.form(FormKind::CreateAccount).field(FIELD_NAME), "");
    }

    #[test]
    fn test_closing_customer_form_clears_shared_draft() {
        let mut forms = FormSessionManager::new();
        forms.set_field(FormKind::AddDomains, FIELD_NAME, "Acme");
        forms.open(FormKind::AddCustomer);
        forms.set_field(FormKind::AddCustomer, FIELD_DOMAINS, "a.com");

        forms.close(FormKind::AddCustomer);

        assert_eq!(forms.form(FormKind::AddCustomer).field(FIELD_DOMAINS), "");
        assert_eq!(forms.form(FormKind::AddDomains).field(FIELD_NAME), "");
    }

    #[test]
    fn test_closing_one_form_leaves_others() {
        let mut forms = FormSessionManager::new();
        forms.set_field(FormKind::ChangePassword, FIELD_PASSWORD, "secret");
        forms.open(FormKind::ChangePassword);

        forms.close(FormKind::CreateAccount);

        assert!(forms.form(FormKind::ChangePassword).is_open());
        assert_eq!(
            forms.form(FormKind::ChangePassword).field(FIELD_PASSWORD),
            "secret"
        );
    }

    #[test]
    fn test_unknown_field_reads_empty() {
        let forms = FormSessionManager::new();
        assert_eq!(forms.form(FormKind::DeleteAccount).field("nope"), "");
    }
}

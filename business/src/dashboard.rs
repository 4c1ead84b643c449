//! The dashboard controller.
//!
//! [`Dashboard`] owns one instance of every stateful component and is the
//! only entry point for user actions. Every action returns a `Result` and also
//! publishes a [`Notification`], so a presentation layer can simply drain the
//! channel while tests assert on the returned error kind.
//!
//! An authentication rejection (HTTP 401) from any authenticated call ends the
//! session: the stored token is cleared.

use std::sync::Arc;

use flume::{Receiver, Sender};
use futures::stream::{FuturesUnordered, StreamExt as _};
use log::{debug, info, warn};

use crate::api::{DomainService, HttpDomainService};
use crate::config::BusinessConfig;
use crate::error::DashboardError;
use crate::forms::{FIELD_EMAIL, FormKind, FormSession, FormSessionManager, SubmitContext};
use crate::models::SuspiciousDomain;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::user_registry::UserRegistry;
use crate::view_state::{
    Dataset, LoadStatus, ViewKind, ViewState, ViewStateController, fetch_dataset,
};

/// User-visible outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(DashboardError),
}

pub struct Dashboard {
    config: BusinessConfig,
    service: Arc<dyn DomainService>,
    session: SessionStore,
    registry: UserRegistry,
    views: ViewStateController,
    forms: FormSessionManager,
    notifications: Sender<Notification>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("signed_in", &self.session.has_token())
            .field("registry", &self.registry.users())
            .field("views", &self.views)
            .field("forms", &self.forms)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Build a dashboard over an arbitrary service and store.
    ///
    /// The session and the local user registry are rehydrated from `store`.
    pub fn new(
        config: BusinessConfig,
        service: Arc<dyn DomainService>,
        store: Arc<dyn KeyValueStore>,
    ) -> (Self, Receiver<Notification>) {
        let (tx, rx) = flume::unbounded();
        let dashboard = Self {
            views: ViewStateController::new(config.features.search),
            session: SessionStore::load(store.clone()),
            registry: UserRegistry::load(store),
            forms: FormSessionManager::new(),
            service,
            config,
            notifications: tx,
        };
        (dashboard, rx)
    }

    /// Build a dashboard talking HTTP to `config.api_url()`.
    pub fn with_http(
        config: BusinessConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> (Self, Receiver<Notification>) {
        let service = Arc::new(HttpDomainService::new(config.api_url()));
        Self::new(config, service, store)
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    pub fn view_state(&self) -> &ViewState {
        self.views.state()
    }

    pub fn load_status(&self, kind: ViewKind) -> &LoadStatus {
        self.views.status(kind)
    }

    pub fn form(&self, kind: FormKind) -> &FormSession {
        self.forms.form(kind)
    }

    /// Suspicious rows as currently displayed (search applied).
    pub fn visible_suspicious(&self) -> &[SuspiciousDomain] {
        &self.views.state().filtered_suspicious
    }

    /// Screenshot URL of a row, when image preview is enabled and the row has one.
    pub fn preview_url(&self, row: &SuspiciousDomain) -> Option<String> {
        if !self.config.features.image_preview {
            return None;
        }
        row.photo_url
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| self.config.media_url(p))
    }

    fn notify(&self, notification: Notification) {
        if self.notifications.send(notification).is_err() {
            debug!("Notification dropped: no receiver");
        }
    }

    /// Publish the outcome of an action.
    fn publish<T>(
        &self,
        result: Result<T, DashboardError>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, DashboardError> {
        match &result {
            Ok(value) => self.notify(Notification::Success(success(value))),
            Err(err) => self.notify(Notification::Error(err.clone())),
        }
        result
    }

    /// Publish the outcome of an authenticated action and end the session on a 401.
    fn report<T>(
        &mut self,
        result: Result<T, DashboardError>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, DashboardError> {
        if let Err(DashboardError::Service(service_err)) = &result
            && service_err.is_auth_rejection()
        {
            warn!("Session rejected by the server, signing out");
            if let Err(store_err) = self.session.clear_token() {
                warn!("Failed to clear rejected token: {store_err}");
            }
        }
        self.publish(result, success)
    }

    /// Exchange credentials for a token and store it.
    ///
    /// A rejected login leaves any existing session in place.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), DashboardError> {
        let result = self.try_login(email.trim(), password).await;
        self.publish(result, |_| "Signed in".to_owned())
    }

    async fn try_login(&mut self, email: &str, password: &str) -> Result<(), DashboardError> {
        if email.is_empty() || password.is_empty() {
            return Err(DashboardError::validation("Email and password are required"));
        }
        let token = self.service.login(email, password).await?;
        self.session.set_token(token)?;
        info!("Signed in as '{email}'");
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), DashboardError> {
        let result = self.session.clear_token().map_err(DashboardError::from);
        self.report(result, |_| "Signed out".to_owned())
    }

    /// Load a dataset and make it the active view.
    pub async fn load(&mut self, kind: ViewKind) -> Result<(), DashboardError> {
        let result = self
            .views
            .request_load(kind, &self.session, self.service.as_ref())
            .await;
        let count = match kind {
            ViewKind::Customers => self.views.state().customers.len(),
            ViewKind::Suspicious => self.views.state().suspicious.len(),
        };
        self.report(result, |_| format!("Loaded {count} {kind}"))
    }

    /// Load several datasets concurrently, applying results as they complete.
    ///
    /// Each kind is checked against the session independently; results are
    /// returned in completion order.
    pub async fn load_concurrently(
        &mut self,
        kinds: &[ViewKind],
    ) -> Vec<(ViewKind, Result<(), DashboardError>)> {
        let mut pending = Vec::new();
        let mut results = Vec::new();

        for kind in kinds {
            match self.views.begin_load(*kind, &self.session) {
                Ok(token) => pending.push((*kind, token)),
                Err(err) => {
                    let reported = self.report::<()>(Err(err), |_| String::new());
                    results.push((*kind, reported));
                }
            }
        }

        let service = self.service.clone();
        let mut in_flight: FuturesUnordered<_> = pending
            .iter()
            .map(|(kind, token)| {
                let service = service.as_ref();
                let kind = *kind;
                async move { (kind, fetch_dataset(service, token, kind).await) }
            })
            .collect();

        while let Some((kind, outcome)) = in_flight.next().await {
            let count = outcome.as_ref().map_or(0, Dataset::len);
            let applied = self.views.apply(kind, outcome);
            results.push((kind, self.report(applied, |_| format!("Loaded {count} {kind}"))));
        }

        results
    }

    pub fn search(&mut self, term: &str) {
        self.views.set_search_term(term);
    }

    pub fn open_form(&mut self, kind: FormKind) {
        self.forms.open(kind);
    }

    pub fn close_form(&mut self, kind: FormKind) {
        self.forms.close(kind);
    }

    pub fn set_field(&mut self, kind: FormKind, name: &str, value: impl Into<String>) {
        self.forms.set_field(kind, name, value);
    }

    /// Open the delete-account confirmation for a remembered user.
    pub fn select_user_for_deletion(&mut self, email: &str) {
        self.forms.set_field(FormKind::DeleteAccount, FIELD_EMAIL, email);
        self.forms.open(FormKind::DeleteAccount);
    }

    /// Submit a form and publish the outcome.
    pub async fn submit(&mut self, kind: FormKind) -> Result<(), DashboardError> {
        let ctx = SubmitContext {
            session: &self.session,
            registry: &mut self.registry,
            service: self.service.as_ref(),
            features: self.config.features,
        };
        let result = self.forms.submit(kind, ctx).await;
        self.report(result, |message| (*message).to_owned())
            .map(|_| ())
    }
}

//! View state for the two datasets the dashboard can display.
//!
//! Loading is split in three steps so that overlapping loads behave like
//! independent requests:
//! 1. [`ViewStateController::begin_load`] checks the session and marks the kind `Loading`
//! 2. [`fetch_dataset`] performs the network call without touching the state
//! 3. [`ViewStateController::apply`] folds the outcome in
//!
//! Outcomes are applied in the order they are handed to `apply`; each success
//! replaces the whole dataset, so the last one to arrive wins. A malformed
//! listing empties the dataset but does not switch the active view.

use log::{info, warn};

use crate::api::DomainService;
use crate::error::{DashboardError, ServiceError};
use crate::models::{Customer, Listing, SuspiciousDomain};
use crate::search::filter_suspicious;
use crate::session::SessionStore;

/// A dataset the dashboard can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Customers,
    Suspicious,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customers => f.write_str("customers"),
            Self::Suspicious => f.write_str("suspicious domains"),
        }
    }
}

/// Load progress of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(DashboardError),
}

/// A successfully fetched dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    Customers(Listing<Customer>),
    Suspicious(Listing<SuspiciousDomain>),
}

impl Dataset {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Customers(_) => ViewKind::Customers,
            Self::Suspicious(_) => ViewKind::Suspicious,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Customers(listing) => listing.len(),
            Self::Suspicious(listing) => listing.len(),
        }
    }

    /// Whether the service answered with a usable list.
    pub fn is_well_formed(&self) -> bool {
        !matches!(
            self,
            Self::Customers(Listing::Malformed) | Self::Suspicious(Listing::Malformed)
        )
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Dataset currently displayed, `None` until the first successful load.
    pub active_view: Option<ViewKind>,
    pub customers: Vec<Customer>,
    pub suspicious: Vec<SuspiciousDomain>,
    /// Always `filter_suspicious(&suspicious, &search_term)`.
    pub filtered_suspicious: Vec<SuspiciousDomain>,
    pub search_term: String,
}

#[derive(Debug, Clone, Default)]
pub struct ViewStateController {
    state: ViewState,
    customers_status: LoadStatus,
    suspicious_status: LoadStatus,
    search_enabled: bool,
}

/// Issue the service call for `kind`.
pub async fn fetch_dataset(
    service: &dyn DomainService,
    token: &str,
    kind: ViewKind,
) -> Result<Dataset, ServiceError> {
    match kind {
        ViewKind::Customers => service
            .list_customers_with_domains(token)
            .await
            .map(Dataset::Customers),
        ViewKind::Suspicious => service
            .list_suspicious_domains(token)
            .await
            .map(Dataset::Suspicious),
    }
}

impl ViewStateController {
    pub fn new(search_enabled: bool) -> Self {
        Self {
            search_enabled,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn status(&self, kind: ViewKind) -> &LoadStatus {
        match kind {
            ViewKind::Customers => &self.customers_status,
            ViewKind::Suspicious => &self.suspicious_status,
        }
    }

    fn status_mut(&mut self, kind: ViewKind) -> &mut LoadStatus {
        match kind {
            ViewKind::Customers => &mut self.customers_status,
            ViewKind::Suspicious => &mut self.suspicious_status,
        }
    }

    /// Check the session and mark `kind` as loading.
    ///
    /// Without a token the kind goes straight to `Error(MissingCredentials)`
    /// and no token is returned, so no request can be issued.
    pub fn begin_load(
        &mut self,
        kind: ViewKind,
        session: &SessionStore,
    ) -> Result<String, DashboardError> {
        match session.require_token() {
            Ok(token) => {
                *self.status_mut(kind) = LoadStatus::Loading;
                Ok(token.to_owned())
            }
            Err(err) => {
                warn!("Cannot load {kind}: no session token");
                *self.status_mut(kind) = LoadStatus::Error(err.clone());
                Err(err)
            }
        }
    }

    /// Fold a finished fetch into the state.
    ///
    /// Failures leave `active_view` and every previously loaded dataset as they were.
    pub fn apply(
        &mut self,
        kind: ViewKind,
        outcome: Result<Dataset, ServiceError>,
    ) -> Result<(), DashboardError> {
        match outcome {
            Ok(dataset) => {
                info!("Loaded {} {kind}", dataset.len());
                *self.status_mut(dataset.kind()) = LoadStatus::Loaded;
                self.replace(dataset);
                Ok(())
            }
            Err(err) => {
                warn!("Failed to load {kind}: {err}");
                let err = DashboardError::from(err);
                *self.status_mut(kind) = LoadStatus::Error(err.clone());
                Err(err)
            }
        }
    }

    /// `begin_load`, `fetch_dataset` and `apply` in sequence.
    pub async fn request_load(
        &mut self,
        kind: ViewKind,
        session: &SessionStore,
        service: &dyn DomainService,
    ) -> Result<(), DashboardError> {
        let token = self.begin_load(kind, session)?;
        let outcome = fetch_dataset(service, &token, kind).await;
        self.apply(kind, outcome)
    }

    fn replace(&mut self, dataset: Dataset) {
        let kind = dataset.kind();
        let switch_view = dataset.is_well_formed();
        match dataset {
            Dataset::Customers(listing) => self.state.customers = listing.into_rows(),
            Dataset::Suspicious(listing) => {
                self.state.suspicious = listing.into_rows();
                if switch_view {
                    self.state.search_term.clear();
                }
                self.state.filtered_suspicious =
                    filter_suspicious(&self.state.suspicious, &self.state.search_term);
            }
        }
        if switch_view {
            self.state.active_view = Some(kind);
        } else {
            warn!("Malformed {kind} listing: dataset cleared, view unchanged");
        }
    }

    /// Filter the suspicious list. Always recomputed from the full list.
    ///
    /// Does nothing when search is disabled.
    pub fn set_search_term(&mut self, term: &str) {
        if !self.search_enabled {
            return;
        }
        self.state.search_term = term.to_lowercase();
        self.state.filtered_suspicious =
            filter_suspicious(&self.state.suspicious, &self.state.search_term);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::CustomerRef;
    use crate::storage::MemoryStore;

    fn suspicious(id: i64, domain: &str) -> SuspiciousDomain {
        SuspiciousDomain {
            id,
            suspicious_domain: domain.to_owned(),
            found_date: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
            customer: CustomerRef {
                id: 1,
                name: "Acme".to_owned(),
            },
            photo_url: None,
        }
    }

    fn customer(id: i64) -> Customer {
        Customer {
            id,
            name: format!("customer-{id}"),
            domains: Vec::new(),
        }
    }

    #[test]
    fn test_begin_load_without_token_errors() {
        let session = SessionStore::load(Arc::new(MemoryStore::new()));
        let mut views = ViewStateController::new(true);

        let result = views.begin_load(ViewKind::Suspicious, &session);

        assert_eq!(result, Err(DashboardError::MissingCredentials));
        assert_eq!(
            views.status(ViewKind::Suspicious),
            &LoadStatus::Error(DashboardError::MissingCredentials)
        );
        assert_eq!(views.status(ViewKind::Customers), &LoadStatus::Idle);
    }

    #[test]
    fn test_suspicious_load_resets_search() {
        let mut views = ViewStateController::new(true);
        views
            .apply(
                ViewKind::Suspicious,
                Ok(Dataset::Suspicious(Listing::Rows(vec![
                    suspicious(1, "a.com"),
                    suspicious(2, "b.com"),
                ]))),
            )
            .expect("apply");
        views.set_search_term("a.com");
        assert_eq!(views.state().filtered_suspicious.len(), 1);

        views
            .apply(
                ViewKind::Suspicious,
                Ok(Dataset::Suspicious(Listing::Rows(vec![suspicious(3, "c.com")]))),
            )
            .expect("apply");

        assert_eq!(views.state().search_term, "");
        assert_eq!(views.state().filtered_suspicious, views.state().suspicious);
        assert_eq!(views.state().active_view, Some(ViewKind::Suspicious));
    }

    #[test]
    fn test_loading_other_kind_keeps_first_dataset() {
        let mut views = ViewStateController::new(true);
        views
            .apply(
                ViewKind::Customers,
                Ok(Dataset::Customers(Listing::Rows(vec![customer(1)]))),
            )
            .expect("apply");
        views
            .apply(
                ViewKind::Suspicious,
                Ok(Dataset::Suspicious(Listing::Rows(vec![suspicious(1, "a.com")]))),
            )
            .expect("apply");

        assert_eq!(views.state().active_view, Some(ViewKind::Suspicious));
        assert_eq!(views.state().customers, vec![customer(1)]);
        assert_eq!(views.status(ViewKind::Customers), &LoadStatus::Loaded);
    }

    #[test]
    fn test_failure_keeps_stale_data() {
        let mut views = ViewStateController::new(true);
        views
            .apply(
                ViewKind::Customers,
                Ok(Dataset::Customers(Listing::Rows(vec![customer(1)]))),
            )
            .expect("apply");
        let before = views.state().clone();

        let result = views.apply(
            ViewKind::Suspicious,
            Err(ServiceError::Network("connection refused".to_owned())),
        );

        assert!(matches!(result, Err(DashboardError::Service(ServiceError::Network(_)))));
        assert_eq!(views.state(), &before);
        assert!(matches!(
            views.status(ViewKind::Suspicious),
            LoadStatus::Error(DashboardError::Service(_))
        ));
    }

    #[test]
    fn test_last_applied_outcome_wins() {
        let mut views = ViewStateController::new(true);
        views
            .apply(
                ViewKind::Suspicious,
                Ok(Dataset::Suspicious(Listing::Rows(vec![suspicious(1, "first.com")]))),
            )
            .expect("apply");
        views
            .apply(
                ViewKind::Suspicious,
                Ok(Dataset::Suspicious(Listing::Rows(vec![suspicious(2, "second.com")]))),
            )
            .expect("apply");

        assert_eq!(views.state().suspicious, vec![suspicious(2, "second.com")]);
    }

    #[test]
    fn test_malformed_listing_keeps_active_view() {
        let mut views = ViewStateController::new(true);
        views
            .apply(
                ViewKind::Customers,
                Ok(Dataset::Customers(Listing::Rows(vec![customer(1)]))),
            )
            .expect("apply");
        views
            .apply(
                ViewKind::Suspicious,
                Ok(Dataset::Suspicious(Listing::Rows(vec![suspicious(1, "acme.com")]))),
            )
            .expect("apply");
        views.set_search_term("acme");
        views
            .apply(
                ViewKind::Customers,
                Ok(Dataset::Customers(Listing::Rows(vec![customer(2)]))),
            )
            .expect("apply");

        views
            .apply(ViewKind::Suspicious, Ok(Dataset::Suspicious(Listing::Malformed)))
            .expect("apply");

        assert_eq!(views.state().active_view, Some(ViewKind::Customers));
        assert!(views.state().suspicious.is_empty());
        assert!(views.state().filtered_suspicious.is_empty());
        assert_eq!(views.state().search_term, "acme");
        assert_eq!(views.status(ViewKind::Suspicious), &LoadStatus::Loaded);
    }

    #[test]
    fn test_search_recomputes_from_full_set() {
        let mut views = ViewStateController::new(true);
        views
            .apply(
                ViewKind::Suspicious,
                Ok(Dataset::Suspicious(Listing::Rows(vec![
                    suspicious(1, "acme.com"),
                    suspicious(2, "acne.com"),
                ]))),
            )
            .expect("apply");

        views.set_search_term("acm");
        assert_eq!(views.state().filtered_suspicious.len(), 1);

        // Widening the term again must bring rows back.
        views.set_search_term("ac");
        assert_eq!(views.state().filtered_suspicious.len(), 2);

        views.set_search_term("");
        assert_eq!(views.state().filtered_suspicious.len(), 2);
    }

    #[test]
    fn test_search_disabled_is_noop() {
        let mut views = ViewStateController::new(false);
        views
            .apply(
                ViewKind::Suspicious,
                Ok(Dataset::Suspicious(Listing::Rows(vec![suspicious(1, "acme.com")]))),
            )
            .expect("apply");

        views.set_search_term("zzz");

        assert_eq!(views.state().search_term, "");
        assert_eq!(views.state().filtered_suspicious.len(), 1);
    }
}

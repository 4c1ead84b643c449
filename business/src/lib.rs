//! Session and view-state controller for the domain watch console.
//!
//! The crate holds everything below the presentation layer: the session
//! store, the remote domain service client, the local user registry, the
//! view-state controller and the form sessions, composed by [`Dashboard`].

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod http;
pub mod models;
pub mod search;
pub mod session;
pub mod storage;
pub mod user_registry;
pub mod view_state;

pub use api::{DomainService, HttpDomainService, ServiceResult};
pub use config::{BusinessConfig, DashboardFeatures};
pub use dashboard::{Dashboard, Notification};
pub use error::{DashboardError, ServiceError, StoreError};
pub use forms::{
    FIELD_CONFIRM_PASSWORD, FIELD_DOMAINS, FIELD_EMAIL, FIELD_NAME, FIELD_PASSWORD, FormKind,
    FormSession, FormSessionManager,
};
pub use models::{Customer, CustomerRef, Domain, Listing, LocalUser, SuspiciousDomain};
pub use search::{filter_suspicious, split_domains};
pub use session::{SessionStore, TOKEN_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use user_registry::{LOCAL_USERS_KEY, UserRegistry};
pub use view_state::{Dataset, LoadStatus, ViewKind, ViewState, ViewStateController};

#[cfg(test)]
pub(crate) mod test_utils;

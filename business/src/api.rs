//! Remote domain service client.
//!
//! [`DomainService`] is the seam between the controller and the network:
//! the controller only talks to the trait, [`HttpDomainService`] talks HTTP.
//!
//! Notes:
//! - Authenticated calls take the token explicitly. Checking that a token
//!   exists is the caller's job; this layer never reads the session store.
//! - List endpoints tolerate a malformed envelope: a successful status with an
//!   unusable body yields [`Listing::Malformed`] instead of an error, and rows
//!   that fail to decode are skipped one by one.

use async_trait::async_trait;
use log::{info, warn};
use serde::de::DeserializeOwned;

use crate::error::ServiceError;
use crate::http::{Client, HttpError, HttpResult, RequestBuilder, Response};
use crate::models::{
    ChangePasswordRequest, CreateAccountRequest, Customer, CustomerDomainsRequest,
    DeleteAccountRequest, ErrorBody, ListEnvelope, Listing, LoginRequest, LoginResponse,
    SuspiciousDomain,
};

/// Typed API result.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[async_trait]
pub trait DomainService: Send + Sync {
    /// Exchange credentials for a session token.
    async fn login(&self, email: &str, password: &str) -> ServiceResult<String>;

    async fn list_customers_with_domains(&self, token: &str) -> ServiceResult<Listing<Customer>>;

    async fn list_suspicious_domains(
        &self,
        token: &str,
    ) -> ServiceResult<Listing<SuspiciousDomain>>;

    async fn create_customer(
        &self,
        token: &str,
        name: &str,
        domains: &[String],
    ) -> ServiceResult<()>;

    /// Attach more domains to an existing customer, addressed by name.
    async fn add_domains_to_customer(
        &self,
        token: &str,
        name: &str,
        domains: &[String],
    ) -> ServiceResult<()>;

    async fn create_account(
        &self,
        token: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> ServiceResult<()>;

    async fn delete_account(&self, token: &str, email: &str) -> ServiceResult<()>;

    /// Change the signed-in user's password. Confirmation is checked by the caller.
    async fn change_password(&self, token: &str, password: &str) -> ServiceResult<()>;
}

const DEFAULT_LOGIN_REJECTION: &str = "Invalid credentials";

/// [`DomainService`] over the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDomainService {
    api_url: String,
    client: Client,
}

impl HttpDomainService {
    /// `api_url` is the API root, e.g. `https://host/api`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.api_url)
    }

    async fn send(request: RequestBuilder) -> ServiceResult<Response> {
        request.send().await.map_err(network_error)
    }

    /// Send a JSON mutation and require a 2xx answer. The body is ignored.
    async fn send_mutation(request: HttpResult<RequestBuilder>) -> ServiceResult<()> {
        let response = Self::send(request.map_err(encode_error)?).await?;
        if !response.is_success() {
            return Err(rejected(&response, "Request failed"));
        }
        Ok(())
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> ServiceResult<Listing<T>> {
        let response = Self::send(self.client.get(self.url(path)).bearer(token)).await?;
        if !response.is_success() {
            return Err(rejected(&response, "Request failed"));
        }
        Ok(decode_list(&response, path))
    }
}

fn network_error(err: HttpError) -> ServiceError {
    ServiceError::Network(err.to_string())
}

fn encode_error(err: HttpError) -> ServiceError {
    ServiceError::Malformed(err.to_string())
}

/// Build a rejection from a non-success response, preferring the server's message.
fn rejected(response: &Response, default: &str) -> ServiceError {
    let message = response
        .json::<ErrorBody>()
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| default.to_owned());
    ServiceError::Rejected {
        status: response.status,
        message,
    }
}

fn decode_list<T: DeserializeOwned>(response: &Response, path: &str) -> Listing<T> {
    let envelope = match response.json::<ListEnvelope>() {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!("{path}: response is not a {{data: [...]}} list, treating as empty: {err}");
            return Listing::Malformed;
        }
    };

    let rows = envelope
        .data
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!("{path}: skipping row {index}: {err}");
                None
            }
        })
        .collect();
    Listing::Rows(rows)
}

#[async_trait]
impl DomainService for HttpDomainService {
    async fn login(&self, email: &str, password: &str) -> ServiceResult<String> {
        info!("Signing in as '{email}'");

        let request = self
            .client
            .post(self.url("auth/login"))
            .json(&LoginRequest { email, password })
            .map_err(encode_error)?;
        let response = Self::send(request).await?;

        if !response.is_success() {
            return Err(rejected(&response, DEFAULT_LOGIN_REJECTION));
        }

        response
            .json::<LoginResponse>()
            .ok()
            .and_then(|body| body.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ServiceError::Malformed("login response did not include a token".to_owned())
            })
    }

    async fn list_customers_with_domains(&self, token: &str) -> ServiceResult<Listing<Customer>> {
        self.fetch_list("customers/view", token).await
    }

    async fn list_suspicious_domains(
        &self,
        token: &str,
    ) -> ServiceResult<Listing<SuspiciousDomain>> {
        self.fetch_list("suspicious-domains", token).await
    }

    async fn create_customer(
        &self,
        token: &str,
        name: &str,
        domains: &[String],
    ) -> ServiceResult<()> {
        let request = self
            .client
            .post(self.url("addcustomer"))
            .bearer(token)
            .json(&CustomerDomainsRequest { name, domains });
        Self::send_mutation(request).await
    }

    async fn add_domains_to_customer(
        &self,
        token: &str,
        name: &str,
        domains: &[String],
    ) -> ServiceResult<()> {
        let request = self
            .client
            .post(self.url("add-domain-to-customer"))
            .bearer(token)
            .json(&CustomerDomainsRequest { name, domains });
        Self::send_mutation(request).await
    }

    async fn create_account(
        &self,
        token: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> ServiceResult<()> {
        let request = self
            .client
            .post(self.url("auth/createaccount"))
            .bearer(token)
            .json(&CreateAccountRequest {
                name,
                email,
                password,
            });
        Self::send_mutation(request).await
    }

    async fn delete_account(&self, token: &str, email: &str) -> ServiceResult<()> {
        let request = self
            .client
            .delete(self.url("auth/delete-account"))
            .bearer(token)
            .json(&DeleteAccountRequest { email });
        Self::send_mutation(request).await
    }

    async fn change_password(&self, token: &str, password: &str) -> ServiceResult<()> {
        let request = self
            .client
            .post(self.url("auth/change-password"))
            .bearer(token)
            .json(&ChangePasswordRequest { password });
        Self::send_mutation(request).await
    }
}

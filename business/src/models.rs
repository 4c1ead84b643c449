//! Wire and domain types shared by the client and the controller.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A monitored domain owned by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: i64,
    pub domain: String,
    pub customer_id: i64,
}

/// A customer with its monitored domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(rename = "domain_customers", default)]
    pub domains: Vec<Domain>,
}

/// Customer summary embedded in a suspicious-domain row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: i64,
    pub name: String,
}

/// A look-alike domain flagged by the external detection process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspiciousDomain {
    pub id: i64,
    pub suspicious_domain: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub found_date: DateTime<Utc>,
    pub customer: CustomerRef,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl SuspiciousDomain {
    /// Human-readable discovery date, e.g. `1/1/2024, 12:00:00 AM`.
    ///
    /// Rendered in UTC so that search results do not depend on the host timezone.
    pub fn found_date_display(&self) -> String {
        self.found_date
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string()
    }
}

/// Parse an RFC 3339 timestamp; one without an offset is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Rows returned by a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<T> {
    /// The body was a `{ "data": [...] }` envelope. Rows that did not decode are dropped.
    Rows(Vec<T>),
    /// A success status whose body carried no `data` array.
    Malformed,
}

impl<T> Listing<T> {
    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.len(),
            Self::Malformed => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_rows(self) -> Vec<T> {
        match self {
            Self::Rows(rows) => rows,
            Self::Malformed => Vec::new(),
        }
    }
}

/// A locally remembered account created from this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub name: String,
    pub email: String,
}

/// `{ "data": [...] }` envelope used by the list endpoints. Rows are decoded one by one.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: Option<String>,
}

/// Error body the API sends alongside non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomerDomainsRequest<'a> {
    pub name: &'a str,
    pub domains: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateAccountRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteAccountRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChangePasswordRequest<'a> {
    pub password: &'a str,
}

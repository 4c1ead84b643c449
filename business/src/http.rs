//! Thin HTTP layer over `reqwest`.
//!
//! Requests are described with a small builder and answered with a fully
//! buffered [`Response`], so callers can inspect the status and decode the
//! body as many times as they need without holding a live connection.

use std::collections::HashMap;

use thiserror::Error;

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Delete => Self::DELETE,
        }
    }
}

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP client error.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be sent or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Shared HTTP client. Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone, Default)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Post, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Delete, url)
    }
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(client: reqwest::Client, method: Method, url: impl Into<String>) -> Self {
        Self {
            client,
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach `Authorization: Bearer <token>`.
    pub fn bearer(self, token: &str) -> Self {
        self.header("authorization", format!("Bearer {token}"))
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> HttpResult<Self> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    /// Send the request and buffer the whole response.
    pub async fn send(self) -> HttpResult<Response> {
        let mut request = self.client.request(self.method.into(), &self.url);

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        if let Some(body) = self.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &[u8]) -> Response {
        Response {
            status,
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_response_is_success() {
        assert!(response(200, b"").is_success());
        assert!(response(204, b"").is_success());
        assert!(!response(401, b"").is_success());
        assert!(!response(500, b"").is_success());
    }

    #[test]
    fn test_response_json() {
        let resp = response(200, br#"{"token": "abc"}"#);
        let value: serde_json::Value = resp.json().expect("valid json");
        assert_eq!(value["token"], "abc");

        assert!(response(200, b"<html>").json::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_bearer_sets_authorization_header() {
        let builder = Client::new().get("https://example.com").bearer("abc");

        assert_eq!(
            builder.headers.get("authorization"),
            Some(&"Bearer abc".to_owned())
        );
        assert_eq!(builder.method, Method::Get);
    }

    #[test]
    fn test_json_body_sets_content_type() {
        #[derive(serde::Serialize)]
        struct Body {
            email: String,
        }

        let builder = Client::new()
            .delete("https://example.com")
            .json(&Body {
                email: "a@x.com".to_owned(),
            })
            .expect("body should serialize");

        assert_eq!(
            builder.headers.get("content-type"),
            Some(&"application/json".to_owned())
        );
        assert_eq!(builder.body.as_deref(), Some(br#"{"email":"a@x.com"}"#.as_slice()));
    }
}

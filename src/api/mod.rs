//! REST Client
//!
//! Thin wrappers over `reqwest` that attach the bearer token, unwrap the
//! `{data, message, status}` envelope and map failures into [`ApiError`].

pub mod appointment;
pub mod billing;
pub mod patient;
pub mod pharmacy;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::{message_from_body, ApiError};

/// Body of every backend response
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    /// `true`/`false` or a status string, depending on the service
    #[serde(default)]
    pub status: Option<Value>,
}

impl<T> Envelope<T> {
    /// Some services answer 200 with `status: false`
    pub fn is_failure(&self) -> bool {
        matches!(&self.status, Some(Value::Bool(false)))
            || matches!(&self.status, Some(Value::String(s)) if s.eq_ignore_ascii_case("error"))
    }

    pub fn into_data(self) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Decode a 2xx body into its payload
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if envelope.is_failure() {
        return Err(ApiError::Status { status, message: envelope.message.unwrap_or_default() });
    }
    envelope.into_data()
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self { base_url: base_url.trim_end_matches('/').into(), token: token.map(Into::into) }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.api_base_url, config.auth_token.as_deref())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("[api] {method} {url}");
        let request = reqwest::Client::new().request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(request: RequestBuilder) -> Result<(u16, String), ApiError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            let err = ApiError::from_response(status, &body);
            log::warn!("[api] {err}");
            return Err(err);
        }
        Ok((status, body))
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let (status, body) = Self::send(request).await?;
        parse_envelope(status, &body).inspect_err(|err| log::warn!("[api] {err}"))
    }

    pub async fn get_request<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Self::fetch(self.request(Method::GET, path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        Self::fetch(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post_request<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Self::fetch(self.request(Method::POST, path).json(body)).await
    }

    pub async fn patch_request<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        Self::fetch(self.request(Method::PATCH, path).json(body)).await
    }

    /// Deletes carry no payload; returns the backend message if any
    pub async fn delete_request(&self, path: &str) -> Result<Option<String>, ApiError> {
        let (status, body) = Self::send(self.request(Method::DELETE, path)).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let envelope: Envelope<Value> = serde_json::from_str(&body)?;
        if envelope.is_failure() {
            return Err(ApiError::Status {
                status,
                message: envelope.message.or_else(|| message_from_body(&body)).unwrap_or_default(),
            });
        }
        Ok(envelope.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bill;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = ApiClient::new("https://hms.example.org/api/", None);
        assert_eq!(client.url("/billing/bills"), "https://hms.example.org/api/billing/bills");
        assert_eq!(client.url("pharmacy/drug-requests"), "https://hms.example.org/api/pharmacy/drug-requests");
    }

    #[test]
    fn envelope_data_is_unwrapped() {
        let body = r#"{"status":true,"message":"ok","data":[{"id":1,"patient_id":"P-1","total_payable":2500}]}"#;
        let bills: Vec<Bill> = parse_envelope(200, body).unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].total_payable, 2500.0);
    }

    #[test]
    fn missing_data_is_an_error() {
        let err = parse_envelope::<Vec<Bill>>(200, r#"{"message":"ok"}"#).unwrap_err();
        assert_eq!(err, ApiError::MissingData);
    }

    #[test]
    fn status_false_becomes_error_with_message() {
        let err = parse_envelope::<Vec<Bill>>(200, r#"{"status":false,"message":"Invalid patient","data":null}"#)
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid patient");
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse_envelope::<Vec<Bill>>(200, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}

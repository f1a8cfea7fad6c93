//! Gateway transport.
//!
//! One HTTPS POST per invocation, exactly one attempt. Retry policy, if a
//! host wants one, lives above the client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::envelope::RequestEnvelope;

pub const API_KEY_HEADER: &str = "X-Api-Key";
pub const PROXY_KEY_HEADER: &str = "X-Proxy-Key";
// Instance routing headers: the gateway needs to know which backend
// instance, database, and user the call executes as.
pub const INSTANCE_URL_HEADER: &str = "X-Odoo-Url";
pub const INSTANCE_DB_HEADER: &str = "X-Odoo-Db";
pub const INSTANCE_UID_HEADER: &str = "X-Odoo-Uid";

/// The request could not complete at the network layer. Distinct from a
/// backend-reported [`ServerError`](crate::ServerError), which means the
/// call arrived and was rejected.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),
    #[error("request serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Delivers one envelope to the gateway and returns the raw reply bytes.
///
/// Once `send` is underway the attempt runs to completion or timeout even if
/// the caller stops awaiting; there is no cooperative cancellation signal.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        envelope: &RequestEnvelope,
        config: &ClientConfig,
    ) -> Result<Bytes, TransportError>;
}

/// Production transport over a shared reqwest client.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        envelope: &RequestEnvelope,
        config: &ClientConfig,
    ) -> Result<Bytes, TransportError> {
        let body = serde_json::to_vec(envelope).map_err(TransportError::Serialize)?;
        tracing::debug!(
            model = %envelope.model,
            method = %envelope.method,
            gateway = %config.gateway_url,
            "sending gateway request"
        );

        let response = self
            .http
            .post(&config.gateway_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &config.api_key)
            .header(PROXY_KEY_HEADER, &config.proxy_api_key)
            .header(INSTANCE_URL_HEADER, &config.endpoint_url)
            .header(INSTANCE_DB_HEADER, &config.database)
            .header(INSTANCE_UID_HEADER, config.user_id.to_string())
            .timeout(config.timeout)
            .body(body)
            .send()
            .await
            .map_err(|err| classify(err, config.timeout))?
            .error_for_status()
            .map_err(TransportError::Network)?;

        response
            .bytes()
            .await
            .map_err(|err| classify(err, config.timeout))
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Network(err)
    }
}

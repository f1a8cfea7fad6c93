//! Client facade.

use std::sync::{Arc, OnceLock, RwLock};

use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, ClientInfo};
use crate::envelope::{Keyword, Operation, Params, RequestEnvelope};
use crate::errors::ClientError;
use crate::response::{self, Reply};
use crate::transport::{HttpTransport, Transport, TransportError};

/// The typed entry point for gateway calls.
///
/// Instances are independent; nothing forces a process-wide singleton,
/// though [`ProxyClient::shared`] provides one for hosts that want it. The
/// configuration lives behind a swap-on-write container: `configure`
/// replaces the whole snapshot atomically, and each call captures the
/// snapshot current at call start, so a reconfigure mid-flight never tears
/// or retroactively changes a running call's timeout.
pub struct ProxyClient {
    config: RwLock<Option<Arc<ClientConfig>>>,
    transport: Arc<dyn Transport>,
}

impl ProxyClient {
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    /// Construct with a custom transport. Tests use this to substitute a
    /// fake; production hosts normally don't need it.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            config: RwLock::new(None),
            transport,
        }
    }

    /// Process-wide shared instance.
    pub fn shared() -> &'static ProxyClient {
        static SHARED: OnceLock<ProxyClient> = OnceLock::new();
        SHARED.get_or_init(ProxyClient::new)
    }

    /// Install or replace the configuration. Calls already in flight keep
    /// the snapshot they started with.
    pub fn configure(&self, info: ClientInfo, timeout_secs: u64) {
        let config = Arc::new(ClientConfig::new(info, timeout_secs));
        *self.config.write().expect("client config lock poisoned") = Some(config);
    }

    pub fn is_configured(&self) -> bool {
        self.config
            .read()
            .expect("client config lock poisoned")
            .is_some()
    }

    fn snapshot(&self) -> Result<Arc<ClientConfig>, ClientError> {
        self.config
            .read()
            .expect("client config lock poisoned")
            .clone()
            .ok_or(ClientError::NotConfigured)
    }

    pub async fn search_read<T: DeserializeOwned>(
        &self,
        model: &str,
        params: Params,
        keyword: Keyword,
    ) -> Result<T, ClientError> {
        self.call(model, Operation::SearchRead, None, params, keyword)
            .await
    }

    pub async fn read<T: DeserializeOwned>(
        &self,
        model: &str,
        params: Params,
        keyword: Keyword,
    ) -> Result<T, ClientError> {
        self.call(model, Operation::Read, None, params, keyword).await
    }

    pub async fn write<T: DeserializeOwned>(
        &self,
        model: &str,
        params: Params,
        keyword: Keyword,
    ) -> Result<T, ClientError> {
        self.call(model, Operation::Write, None, params, keyword).await
    }

    pub async fn create<T: DeserializeOwned>(
        &self,
        model: &str,
        params: Params,
        keyword: Keyword,
    ) -> Result<T, ClientError> {
        self.call(model, Operation::Create, None, params, keyword)
            .await
    }

    pub async fn call_method<T: DeserializeOwned>(
        &self,
        model: &str,
        function_name: &str,
        params: Params,
        keyword: Keyword,
    ) -> Result<T, ClientError> {
        self.call(model, Operation::CallMethod, Some(function_name), params, keyword)
            .await
    }

    // All five verbs funnel through here so auth, context, and timeout
    // handling cannot drift between them.
    async fn call<T: DeserializeOwned>(
        &self,
        model: &str,
        operation: Operation,
        function_name: Option<&str>,
        params: Params,
        keyword: Keyword,
    ) -> Result<T, ClientError> {
        let config = self.snapshot()?;
        let envelope = RequestEnvelope::build(model, operation, function_name, params, keyword)?;
        tracing::debug!(model, method = %envelope.method, "dispatching call");

        let bytes = tokio::time::timeout(
            config.timeout,
            self.transport.send(&envelope, &config),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))??;

        match response::decode::<T>(&bytes)? {
            Reply::Result(value) => Ok(value),
            Reply::Error(error) => {
                tracing::debug!(code = error.code, model, "backend rejected call");
                Err(ClientError::Server(error))
            }
        }
    }
}

impl Default for ProxyClient {
    fn default() -> Self {
        Self::new()
    }
}

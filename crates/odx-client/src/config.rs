//! Client configuration.

use std::time::Duration;

/// The ERP instance a gateway call is routed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceInfo {
    pub url: String,
    pub user_id: i64,
    pub db: String,
    pub api_key: String,
}

/// Everything needed to reach the backend through the proxy gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientInfo {
    pub instance: InstanceInfo,
    pub proxy_api_key: String,
    pub gateway_url: String,
}

/// Immutable per-call configuration snapshot.
///
/// [`ProxyClient::configure`](crate::ProxyClient::configure) swaps the whole
/// value at once; a call in flight keeps the snapshot it captured at start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint_url: String,
    pub user_id: i64,
    pub database: String,
    pub api_key: String,
    pub proxy_api_key: String,
    pub gateway_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(info: ClientInfo, timeout_secs: u64) -> Self {
        Self {
            endpoint_url: info.instance.url,
            user_id: info.instance.user_id,
            database: info.instance.db,
            api_key: info.instance.api_key,
            proxy_api_key: info.proxy_api_key,
            gateway_url: info.gateway_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// URL validation the core expects its settings collaborator to run before
/// configuring a client: endpoint and gateway URLs must be absolute http(s)
/// URLs with a host.
pub fn is_absolute_http_url(raw: &str) -> bool {
    match reqwest::Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

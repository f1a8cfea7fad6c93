//! Shared fake transport for domain-call tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use odx_client::{
    ClientConfig, ClientInfo, InstanceInfo, ProxyClient, RequestEnvelope, Transport,
    TransportError,
};
use serde_json::Value;

pub struct ScriptedTransport {
    replies: Mutex<Vec<&'static str>>,
    sent: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// A client wired to this transport with a fixed test configuration.
    pub fn configured_client(self: &Arc<Self>) -> ProxyClient {
        let client = ProxyClient::with_transport(self.clone());
        client.configure(
            ClientInfo {
                instance: InstanceInfo {
                    url: "https://erp.example.com".to_string(),
                    user_id: 2,
                    db: "warehouse".to_string(),
                    api_key: "odoo-key".to_string(),
                },
                proxy_api_key: "proxy-key".to_string(),
                gateway_url: "https://gateway.odxproxy.io/".to_string(),
            },
            60,
        );
        client
    }

    /// The single request body this transport saw, as wire JSON.
    pub fn single_request(&self) -> Value {
        let sent = self.sent.lock().unwrap();
        assert_eq!(sent.len(), 1, "expected exactly one request");
        sent[0].clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        envelope: &RequestEnvelope,
        _config: &ClientConfig,
    ) -> Result<Bytes, TransportError> {
        let body = serde_json::to_value(envelope).expect("envelope serializes");
        self.sent.lock().unwrap().push(body);
        let reply = self.replies.lock().unwrap().remove(0);
        Ok(Bytes::from_static(reply.as_bytes()))
    }
}

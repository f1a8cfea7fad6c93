//! Typed RPC client for an ODX proxy gateway.
//!
//! The gateway brokers calls to a dynamically typed ERP backend. This crate
//! turns domain operations (search-read, read, write, create, call-method)
//! into authenticated HTTPS requests and decodes the loosely typed JSON
//! replies back into strongly typed records, honoring the backend convention
//! of encoding "no value" as a literal `false`.

pub mod client;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod relation;
pub mod response;
pub mod transport;
pub mod value;

pub use client::ProxyClient;
pub use config::{ClientConfig, ClientInfo, InstanceInfo, is_absolute_http_url};
pub use envelope::{
    EnvelopeError, ExecutionContext, Keyword, Operation, Params, RequestEnvelope,
};
pub use errors::ClientError;
pub use relation::Many2One;
pub use response::{DecodeError, Reply, ServerError};
pub use transport::{HttpTransport, Transport, TransportError};
pub use value::OptionalValue;

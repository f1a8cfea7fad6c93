//! Request envelope construction.
//!
//! One builder serves all five verbs so header, context, and keyword
//! handling cannot drift between them. The builder performs no I/O; its
//! output is an immutable structure the transport serializes verbatim.

use std::collections::HashSet;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// The closed set of call verbs sharing the envelope shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    SearchRead,
    Read,
    Write,
    Create,
    CallMethod,
}

impl Operation {
    /// Wire method name for the fixed verbs. `CallMethod` has none: its
    /// method is the caller-supplied function name.
    fn wire_name(self) -> Option<&'static str> {
        match self {
            Operation::SearchRead => Some("search_read"),
            Operation::Read => Some("read"),
            Operation::Write => Some("write"),
            Operation::Create => Some("create"),
            Operation::CallMethod => None,
        }
    }
}

/// Per-call execution context, forwarded to the backend with every request.
/// It affects backend-side row visibility and formatting, never client
/// logic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub allowed_company_ids: Vec<i64>,
    pub default_company_id: i64,
    pub tz: String,
}

impl Default for ExecutionContext {
    /// No companies and UTC. Because `allowed_company_ids` scopes which rows
    /// the backend lets a call see, callers that care about company scoping
    /// must pass their own context rather than rely on this default.
    fn default() -> Self {
        Self {
            allowed_company_ids: Vec::new(),
            default_company_id: 0,
            tz: "UTC".to_string(),
        }
    }
}

/// Non-positional call options: field projection, ordering, pagination, and
/// the execution context.
///
/// `limit`/`offset` left as `None` are simply not sent; the backend applies
/// its own defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Keyword {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ExecutionContext>,
}

/// Positional parameters: domain filters, record ids, value mappings. Opaque
/// to the client beyond being JSON-serializable.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Params(pub Vec<Value>);

impl Params {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("call_method requires a non-empty function name")]
    MissingFunctionName,
    #[error("a function name is only valid for call_method")]
    UnexpectedFunctionName,
}

/// One outbound call, fully assembled and ready to serialize.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestEnvelope {
    pub model: String,
    pub operation: Operation,
    /// Resolved wire method: the verb name, or the function name for
    /// `call_method`.
    pub method: String,
    pub params: Params,
    pub keyword: Keyword,
}

impl RequestEnvelope {
    /// Assemble an envelope. Contract violations fail here, before any
    /// network activity: `call_method` without a function name, or a
    /// function name supplied to any other verb.
    ///
    /// `fields` are deduplicated preserving the caller's order, which the
    /// wire form reproduces verbatim. A missing `context` is replaced by
    /// [`ExecutionContext::default`].
    pub fn build(
        model: impl Into<String>,
        operation: Operation,
        function_name: Option<&str>,
        params: Params,
        mut keyword: Keyword,
    ) -> Result<Self, EnvelopeError> {
        let method = match (operation.wire_name(), function_name) {
            (None, Some(name)) if !name.is_empty() => name.to_string(),
            (None, _) => return Err(EnvelopeError::MissingFunctionName),
            (Some(_), Some(_)) => return Err(EnvelopeError::UnexpectedFunctionName),
            (Some(name), None) => name.to_string(),
        };

        if let Some(fields) = keyword.fields.take() {
            let mut seen = HashSet::new();
            keyword.fields = Some(
                fields
                    .into_iter()
                    .filter(|field| seen.insert(field.clone()))
                    .collect(),
            );
        }
        if keyword.context.is_none() {
            keyword.context = Some(ExecutionContext::default());
        }

        Ok(Self {
            model: model.into(),
            operation,
            method,
            params,
            keyword,
        })
    }
}

// Wire form: {"model": ..., "method": ..., "params": [positional..., keyword]}.
impl Serialize for RequestEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct WireParams<'a>(&'a Params, &'a Keyword);

        impl Serialize for WireParams<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut seq = serializer.serialize_seq(Some(self.0.0.len() + 1))?;
                for value in &self.0.0 {
                    seq.serialize_element(value)?;
                }
                seq.serialize_element(self.1)?;
                seq.end()
            }
        }

        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("model", &self.model)?;
        map.serialize_entry("method", &self.method)?;
        map.serialize_entry("params", &WireParams(&self.params, &self.keyword))?;
        map.end()
    }
}

//! Reply decoding and classification.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::value::json_kind;

/// A rejection the backend reported explicitly: validation failure,
/// permission denial, unknown record. The call reached the backend and was
/// understood; this is a caller-visible condition, not a crash.
#[derive(Clone, Debug, Deserialize, Error, PartialEq)]
#[error("server error {code}: {message}")]
pub struct ServerError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// The reply could not be interpreted against the expected contract. Unlike
/// [`ServerError`] this signals drift between client and backend, so the two
/// are never conflated.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed response body: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("response shape mismatch: expected {expected}, got {got}")]
    Shape { expected: String, got: String },
    #[error("protocol violation: {0}")]
    Protocol(&'static str),
}

/// A well-formed reply carries exactly one of `result` / `error`.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply<T> {
    Result(T),
    Error(ServerError),
}

/// Decode raw gateway bytes against the caller's expected result shape.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Reply<T>, DecodeError> {
    let outer: Value = serde_json::from_slice(bytes).map_err(DecodeError::Malformed)?;
    let Value::Object(mut reply) = outer else {
        return Err(DecodeError::Shape {
            expected: "reply object".to_string(),
            got: json_kind(&outer).to_string(),
        });
    };

    // Some gateways emit the unused key as an explicit null.
    let result = reply.remove("result").filter(|node| !node.is_null());
    let error = reply.remove("error").filter(|node| !node.is_null());

    match (result, error) {
        (Some(_), Some(_)) => Err(DecodeError::Protocol(
            "reply carries both result and error",
        )),
        (None, None) => Err(DecodeError::Protocol(
            "reply carries neither result nor error",
        )),
        (None, Some(node)) => {
            let got = json_kind(&node).to_string();
            let error = serde_json::from_value(node).map_err(|_| DecodeError::Shape {
                expected: "error object {code, message, data?}".to_string(),
                got,
            })?;
            Ok(Reply::Error(error))
        }
        (Some(node), None) => {
            let got = json_kind(&node).to_string();
            let value = serde_json::from_value(node).map_err(|err| DecodeError::Shape {
                expected: std::any::type_name::<T>().to_string(),
                got: format!("{got} ({err})"),
            })?;
            Ok(Reply::Result(value))
        }
    }
}

use thiserror::Error;

use crate::envelope::EnvelopeError;
use crate::response::{DecodeError, ServerError};
use crate::transport::TransportError;

/// Top-level error type for the odx-client crate.
///
/// Every failure a verb can produce surfaces here, tagged so callers can
/// branch: a backend rejection (`Server`) is not a network fault
/// (`Transport`), and neither is a contract drift (`Decode`). Nothing is
/// logged-and-swallowed.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A verb was invoked before `configure`; no network attempt was made.
    #[error("client is not configured")]
    NotConfigured,
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

//! Error types for the graph store adapter.

/// Errors that can occur talking to the triple store.
///
/// Every transport or protocol failure surfaces as a distinguishable
/// store-unavailable condition; an insert failure is never swallowed into a
/// false "stored" outcome.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or the connection failed mid-request.
    #[error("triple store unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("triple store returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, when one could be read.
        body: String,
    },

    /// The store answered 2xx but the response body did not have the
    /// expected shape.
    #[error("malformed store response: {0}")]
    InvalidResponse(String),
}

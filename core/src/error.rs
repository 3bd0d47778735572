//! Error types for request dispatch.
//!
//! # Design
//! Neither error ever reaches a caller of `Dispatcher`. A `TransportError`
//! is logged and replaced by the 500 sentinel response; a `MultipartError`
//! is logged and the offending part is left out of the body; if the whole
//! body cannot be encoded, the request goes out without one.

use thiserror::Error;

/// Failure to carry a request to its destination and back.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be turned into a valid HTTP message.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connection, TLS, or timeout failure.
    #[error("request failed: {0}")]
    Network(String),

    /// The response arrived but its body could not be read.
    #[error("response body unreadable: {0}")]
    Body(String),

    /// The in-process handler did not produce a response.
    #[error("handler failed: {0}")]
    Handler(String),
}

/// Failure to add a part to a multipart body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    /// A form or file name that cannot be written into a part header.
    #[error("invalid part name {0:?}")]
    InvalidName(String),

    /// The multipart writer failed to produce the body.
    #[error("multipart encoding failed: {0}")]
    Encode(String),
}

//! Synchronous HTTP client helpers for a web-application server.
//!
//! # Overview
//! `Dispatcher` builds a request from a method, target, optional body, extra
//! headers and an optional literal `Authorization` value, sends it through a
//! `Transport`, and returns status, headers and body unmodified. A transport
//! failure never surfaces as an error: it is logged and answered with a 500
//! response carrying no headers and no body.
//!
//! # Design
//! - `Dispatcher` is stateless; its transport is chosen at construction.
//! - `NetworkTransport` is a blocking `ureq` agent configured once from
//!   `TransportConfig` (timeout, TLS verification bypass).
//! - Request construction (`build_request`) is pure and testable without I/O.
//! - Every call is bracketed by `start`/`end` `tracing` events; the installed
//!   subscriber decides where they go.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod multipart;
pub mod transport;

pub use config::TransportConfig;
pub use dispatcher::{build_request, Dispatcher, FILE_FIELD, TEXT_PLAIN};
pub use error::{MultipartError, TransportError};
pub use http::{
    group_headers, HttpMethod, HttpRequest, HttpResponse, ResponseHeaders, INTERNAL_ERROR_STATUS,
};
pub use multipart::{EncodedForm, MultipartForm};
pub use transport::{NetworkTransport, Transport};

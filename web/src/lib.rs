//! axum-side helpers for courier.
//!
//! # Overview
//! - `RouterTransport` lets a `courier_core::Dispatcher` serve requests with
//!   an in-process axum `Router` instead of the network.
//! - `respond_if_error` writes a `{status, message}` JSON error body and sets
//!   the HTTP status when a handler step fails.

pub mod reply;
pub mod transport;

pub use reply::{respond_if_error, respond_if_error_with, ErrorReply, StatusMessage, StatusMessageModel};
pub use transport::RouterTransport;

//! In-process transport that serves requests with an axum `Router`.
//!
//! # Design
//! The router is driven with `tower::ServiceExt::oneshot`, so a `Dispatcher`
//! can call into the host's own handlers without a socket. `dispatch` blocks
//! until the handler answers:
//! - from synchronous code it runs on a private current-thread runtime;
//! - from a multi-thread runtime worker it runs on the caller's runtime
//!   inside `block_in_place`;
//! - from a current-thread runtime it cannot block without stalling that
//!   runtime, so it fails with `TransportError::Handler` (a 500 to callers).

use std::convert::Infallible;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use courier_core::{group_headers, HttpRequest, HttpResponse, Transport, TransportError};
use http_body_util::BodyExt;
use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};
use tower::ServiceExt;

#[derive(Debug)]
pub struct RouterTransport {
    router: Router,
    // Only `None` while dropping.
    runtime: Option<Runtime>,
}

impl RouterTransport {
    pub fn new(router: Router) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            router,
            runtime: Some(runtime),
        })
    }
}

impl Drop for RouterTransport {
    fn drop(&mut self) {
        // A plain drop panics when the transport is dropped in async code.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl Transport for RouterTransport {
    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = Request::builder()
            .method(request.method.as_str())
            .uri(request.target.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let body = match &request.body {
            Some(bytes) => Body::from(bytes.clone()),
            None => Body::empty(),
        };
        let http_request = builder
            .body(body)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let serve = async {
            let response = self
                .router
                .clone()
                .oneshot(http_request)
                .await
                .map_err(|never: Infallible| -> TransportError { match never {} })?;
            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| TransportError::Handler(e.to_string()))?
                .to_bytes();

            Ok::<_, TransportError>(HttpResponse {
                status: parts.status.as_u16(),
                headers: group_headers(parts.headers.iter().map(|(name, value)| {
                    (
                        name.as_str(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })),
                body: body.to_vec(),
            })
        };

        match Handle::try_current() {
            Err(_) => match &self.runtime {
                Some(runtime) => runtime.block_on(serve),
                None => Err(TransportError::Handler("runtime shut down".to_string())),
            },
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(serve))
            }
            Ok(_) => Err(TransportError::Handler(
                "cannot block inside a current-thread runtime".to_string(),
            )),
        }
    }
}

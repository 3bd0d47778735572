//! The capability a dispatcher sends requests through.
//!
//! # Design
//! `Transport` is the single seam between request construction and I/O.
//! `NetworkTransport` here talks to real servers with a blocking `ureq`
//! agent; the web crate adds an implementation that feeds requests straight
//! into an axum router. Implementations return every status as data, so a
//! 404 or 500 from the peer is an `Ok` response, and only a failure to get
//! any response at all is an `Err`.

use ureq::http;
use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::config::TransportConfig;
use crate::error::TransportError;
use crate::http::{group_headers, HttpRequest, HttpResponse};

/// Carries one request to its destination and returns the response.
pub trait Transport: Send + Sync {
    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).dispatch(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).dispatch(request)
    }
}

/// Blocking network transport backed by a `ureq` agent.
///
/// The agent holds the connection pool, so one `NetworkTransport` should be
/// built per process and shared.
#[derive(Clone)]
pub struct NetworkTransport {
    agent: Agent,
}

impl NetworkTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let tls = TlsConfig::builder()
            .disable_verification(config.insecure_skip_verify)
            .build();
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout()))
            .tls_config(tls)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for NetworkTransport {
    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match &request.body {
            Some(body) => self.agent.run(to_http(request, body.clone())?),
            None => self.agent.run(to_http(request, ())?),
        };
        let mut response = result.map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = group_headers(response.headers().iter().map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        }));
        // ureq caps reads at 10 MB by default; responses come back whole.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_http<B>(request: &HttpRequest, body: B) -> Result<http::Request<B>, TransportError> {
    let mut builder = http::Request::builder()
        .method(request.method.as_str())
        .uri(request.target.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
        .body(body)
        .map_err(|e| TransportError::InvalidRequest(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn malformed_target_is_an_invalid_request() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            target: "http://bad host/".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = to_http(&request, ()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn headers_are_added_not_replaced() {
        let request = HttpRequest {
            method: HttpMethod::Post,
            target: "http://localhost/echo".to_string(),
            headers: vec![
                ("x-tag".to_string(), "a".to_string()),
                ("x-tag".to_string(), "b".to_string()),
            ],
            body: Some(b"{}".to_vec()),
        };
        let built = to_http(&request, request.body.clone().unwrap()).unwrap();
        assert_eq!(built.method(), "POST");
        let tags: Vec<_> = built.headers().get_all("x-tag").iter().collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(built.body(), b"{}");
    }
}

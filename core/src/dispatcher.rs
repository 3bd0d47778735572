//! Request construction and dispatch.
//!
//! # Design
//! `Dispatcher` holds only its transport and carries no mutable state between
//! calls. `build_request` is the pure half of every call: it turns method,
//! target, body and headers into an `HttpRequest` without touching I/O.
//! `dispatch` hands that request to the transport, logs both sides, and folds
//! any transport failure into the 500 sentinel, so callers always get an
//! `HttpResponse` back and decide what a status means themselves.

use tracing::{debug, info, warn};

use crate::config::TransportConfig;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::{EncodedForm, MultipartForm};
use crate::transport::{NetworkTransport, Transport};

/// Content type used by `post` and `post_with_headers`.
pub const TEXT_PLAIN: &str = "text/plain";

/// Field name every uploaded file is sent under.
pub const FILE_FIELD: &str = "file";

/// Synchronous HTTP client over a pluggable `Transport`.
#[derive(Clone)]
pub struct Dispatcher<T = NetworkTransport> {
    transport: T,
}

impl Dispatcher<NetworkTransport> {
    /// A dispatcher talking to the network with the given settings.
    pub fn new(config: &TransportConfig) -> Self {
        Self::with_transport(NetworkTransport::new(config))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn send(
        &self,
        method: HttpMethod,
        target: &str,
        body: &[u8],
        content_type: &str,
        extra_headers: &[(&str, &str)],
        auth_header: &str,
    ) -> HttpResponse {
        let request = build_request(method, target, body, content_type, extra_headers, auth_header);
        self.dispatch(&request)
    }

    /// Send a prepared request. Never fails: a transport error is logged and
    /// answered with `HttpResponse::internal_error()`.
    pub fn dispatch(&self, request: &HttpRequest) -> HttpResponse {
        info!(method = %request.method, target = %request.target, "start");
        debug!(headers = ?request.headers, "request headers");

        let response = match self.transport.dispatch(request) {
            Ok(response) => response,
            Err(err) => {
                warn!(method = %request.method, target = %request.target, error = %err, "request error");
                return HttpResponse::internal_error();
            }
        };

        info!(
            status = response.status,
            headers = ?response.headers,
            body = %response.text(),
            "end"
        );
        response
    }

    /// POST a `multipart/form-data` body.
    ///
    /// Each `fields` entry becomes a form field named by its key. Each `files`
    /// entry becomes a part under the field name `"file"` with the key as its
    /// filename, so a server reading a single `file` field sees only one of
    /// several uploads. Parts whose names cannot be encoded are logged and
    /// left out.
    pub fn send_multipart<F, N, C, K, V>(
        &self,
        target: &str,
        files: F,
        fields: N,
        auth_header: &str,
    ) -> HttpResponse
    where
        F: IntoIterator<Item = (K, C)>,
        N: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        C: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        info!(%target, "multipart upload");
        let mut form = MultipartForm::new();
        for (name, value) in fields {
            if let Err(err) = form.add_field(name.as_ref(), value.as_ref()) {
                warn!(error = %err, "skipping multipart field");
            }
        }
        for (file_name, content) in files {
            if let Err(err) = form.add_file(FILE_FIELD, file_name.as_ref(), content.as_ref()) {
                warn!(error = %err, "skipping multipart file");
            }
        }

        let encoded = form.encode().unwrap_or_else(|err| {
            warn!(error = %err, "multipart body not encoded");
            EncodedForm::default()
        });
        self.send(
            HttpMethod::Post,
            target,
            &encoded.body,
            &encoded.content_type,
            &[],
            auth_header,
        )
    }

    pub fn get(&self, target: &str, auth_header: &str) -> HttpResponse {
        self.send(HttpMethod::Get, target, &[], "", &[], auth_header)
    }

    pub fn delete(&self, target: &str, auth_header: &str) -> HttpResponse {
        self.send(HttpMethod::Delete, target, &[], "", &[], auth_header)
    }

    /// POST `body` as `text/plain`.
    pub fn post(&self, target: &str, body: &[u8], auth_header: &str) -> HttpResponse {
        self.send(HttpMethod::Post, target, body, TEXT_PLAIN, &[], auth_header)
    }

    pub fn post_with_headers(
        &self,
        target: &str,
        body: &[u8],
        auth_header: &str,
        headers: &[(&str, &str)],
    ) -> HttpResponse {
        self.send(HttpMethod::Post, target, body, TEXT_PLAIN, headers, auth_header)
    }

    pub fn post_raw(
        &self,
        target: &str,
        body: &[u8],
        content_type: &str,
        headers: &[(&str, &str)],
        auth_header: &str,
    ) -> HttpResponse {
        self.send(HttpMethod::Post, target, body, content_type, headers, auth_header)
    }

    pub fn post_multipart<F, N, C, K, V>(
        &self,
        target: &str,
        files: F,
        fields: N,
        auth_header: &str,
    ) -> HttpResponse
    where
        F: IntoIterator<Item = (K, C)>,
        N: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        C: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        self.send_multipart(target, files, fields, auth_header)
    }

    /// PUT without a content type; callers pass one in `headers` if needed.
    pub fn put(
        &self,
        target: &str,
        body: &[u8],
        headers: &[(&str, &str)],
        auth_header: &str,
    ) -> HttpResponse {
        self.send(HttpMethod::Put, target, body, "", headers, auth_header)
    }

    /// PATCH without a content type; callers pass one in `headers` if needed.
    pub fn patch(
        &self,
        target: &str,
        body: &[u8],
        headers: &[(&str, &str)],
        auth_header: &str,
    ) -> HttpResponse {
        self.send(HttpMethod::Patch, target, body, "", headers, auth_header)
    }
}

/// Build the request `send` would dispatch.
///
/// A non-empty `body` becomes the payload and, when `content_type` is
/// non-empty, sets `Content-Type`. A non-empty `auth_header` is added
/// verbatim as `Authorization`. `extra_headers` are appended after both,
/// never replacing them.
pub fn build_request(
    method: HttpMethod,
    target: &str,
    body: &[u8],
    content_type: &str,
    extra_headers: &[(&str, &str)],
    auth_header: &str,
) -> HttpRequest {
    let mut headers = Vec::with_capacity(extra_headers.len() + 2);
    let body = if body.is_empty() {
        None
    } else {
        if !content_type.is_empty() {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        Some(body.to_vec())
    };
    if !auth_header.is_empty() {
        headers.push(("Authorization".to_string(), auth_header.to_string()));
    }
    headers.extend(
        extra_headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    );

    HttpRequest {
        method,
        target: target.to_string(),
        headers,
        body,
    }
}

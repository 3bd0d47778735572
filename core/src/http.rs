//! HTTP request and response described as plain data.
//!
//! # Design
//! The dispatcher builds an `HttpRequest`, hands it to a `Transport`, and gets
//! an `HttpResponse` back. Neither type knows which transport carried it, so
//! the same values flow through the network client and the in-process router.
//!
//! Request headers are a flat list of pairs because a request may repeat a
//! header name (add semantics). Response headers are grouped by name, values
//! kept in arrival order.

use std::collections::BTreeMap;
use std::fmt;

/// Response headers grouped by lowercase name.
pub type ResponseHeaders = BTreeMap<String, Vec<String>>;

/// Status returned in place of a response when the transport fails.
pub const INTERNAL_ERROR_STATUS: u16 = 500;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `Dispatcher::build_request`. `target` is the absolute URL; the
/// in-process transport only routes on its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// All values of the header `name`, compared case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// First value of the header `name`, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name).into_iter().next()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// The sentinel handed back when a request never produced a response.
    pub fn internal_error() -> Self {
        Self {
            status: INTERNAL_ERROR_STATUS,
            headers: ResponseHeaders::new(),
            body: Vec::new(),
        }
    }

    /// First value of the header `name`, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Group `(name, value)` pairs into `ResponseHeaders`, lowercasing names and
/// keeping values in the order they were seen.
pub fn group_headers<'a, I>(pairs: I) -> ResponseHeaders
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut headers = ResponseHeaders::new();
    for (name, value) in pairs {
        headers.entry(name.to_ascii_lowercase()).or_default().push(value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_are_uppercase() {
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn request_header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            target: "http://x/y".to_string(),
            headers: vec![
                ("X-Trace".to_string(), "a".to_string()),
                ("x-trace".to_string(), "b".to_string()),
            ],
            body: None,
        };
        assert_eq!(req.header_values("X-TRACE"), vec!["a", "b"]);
        assert_eq!(req.header("x-trace"), Some("a"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn group_headers_keeps_value_order() {
        let headers = group_headers(vec![
            ("Set-Cookie", "a=1".to_string()),
            ("content-type", "text/plain".to_string()),
            ("set-cookie", "b=2".to_string()),
        ]);
        assert_eq!(headers["set-cookie"], vec!["a=1", "b=2"]);
        assert_eq!(headers["content-type"], vec!["text/plain"]);
    }

    #[test]
    fn internal_error_is_empty() {
        let response = HttpResponse::internal_error();
        assert_eq!(response.status, 500);
        assert!(response.headers.is_empty());
        assert!(response.body.is_empty());
    }

    #[test]
    fn response_text_is_lossy() {
        let response = HttpResponse {
            status: 200,
            headers: ResponseHeaders::new(),
            body: vec![b'o', b'k', 0xff],
        };
        assert_eq!(response.text(), "ok\u{fffd}");
        assert_eq!(response.header("x"), None);
    }
}

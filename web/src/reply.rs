//! JSON error replies for axum handlers.
//!
//! `respond_if_error` turns a failed `Result` into a `{status, message}` body
//! with the HTTP status set on the response, and passes a successful one
//! through. It returns `Result<T, ErrorReply>` so handlers can apply `?`:
//!
//! ```ignore
//! async fn show(Path(id): Path<String>) -> Result<Json<Item>, ErrorReply> {
//!     let item = respond_if_error(load(&id), 4004, StatusCode::NOT_FOUND)?;
//!     Ok(Json(item))
//! }
//! ```

use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// A reply body that carries an application status and an error message.
pub trait StatusMessageModel: Serialize {
    fn set_status(&mut self, status: i32);
    fn set_message(&mut self, message: String);
}

/// Default reply body: `{"status": <int>, "message": "<text>"}`, with
/// `message` left out when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl StatusMessage {
    pub fn new(status: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl StatusMessageModel for StatusMessage {
    fn set_status(&mut self, status: i32) {
        self.status = status;
    }

    fn set_message(&mut self, message: String) {
        self.message = message;
    }
}

/// A reply body paired with the HTTP status it is sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply<M = StatusMessage> {
    pub http_status: StatusCode,
    pub body: M,
}

impl<M: Serialize> IntoResponse for ErrorReply<M> {
    fn into_response(self) -> Response {
        (self.http_status, Json(self.body)).into_response()
    }
}

/// Pass `Ok` through; turn `Err` into a `StatusMessage` reply.
pub fn respond_if_error<T, E: Display>(
    result: Result<T, E>,
    status: i32,
    http_status: StatusCode,
) -> Result<T, ErrorReply> {
    respond_if_error_with(result, StatusMessage::default(), status, http_status)
}

/// Like `respond_if_error`, filling a caller-supplied body type.
pub fn respond_if_error_with<T, E: Display, M: StatusMessageModel>(
    result: Result<T, E>,
    mut model: M,
    status: i32,
    http_status: StatusCode,
) -> Result<T, ErrorReply<M>> {
    let err = match result {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    let message = err.to_string();
    tracing::warn!(status, http_status = http_status.as_u16(), %message, "replying with error");
    model.set_status(status);
    model.set_message(message);
    Err(ErrorReply {
        http_status,
        body: model,
    })
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    #[derive(Default, Serialize)]
    struct Detailed {
        code: i32,
        error: String,
        retry: bool,
    }

    impl StatusMessageModel for Detailed {
        fn set_status(&mut self, status: i32) {
            self.code = status;
        }

        fn set_message(&mut self, message: String) {
            self.error = message;
        }
    }

    #[test]
    fn ok_passes_through() {
        let result: Result<u8, String> = Ok(7);
        assert_eq!(respond_if_error(result, 1, StatusCode::BAD_REQUEST), Ok(7));
    }

    #[test]
    #[traced_test]
    fn err_fills_status_and_message() {
        let result: Result<(), &str> = Err("name is required");
        let reply = respond_if_error(result, 4001, StatusCode::BAD_REQUEST).unwrap_err();

        assert_eq!(reply.http_status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body, StatusMessage::new(4001, "name is required"));
        assert!(logs_contain("replying with error"));
    }

    #[test]
    fn empty_message_is_omitted() {
        let body = serde_json::to_value(StatusMessage::new(3, "")).unwrap();
        assert_eq!(body, json!({"status": 3}));

        let body = serde_json::to_value(StatusMessage::new(3, "boom")).unwrap();
        assert_eq!(body, json!({"status": 3, "message": "boom"}));
    }

    #[test]
    fn message_is_optional_when_parsing() {
        let parsed: StatusMessage = serde_json::from_str(r#"{"status":9}"#).unwrap();
        assert_eq!(parsed, StatusMessage::new(9, ""));
    }

    #[test]
    fn custom_model_is_filled() {
        let result: Result<(), String> = Err("busy".to_string());
        let reply = respond_if_error_with(
            result,
            Detailed {
                retry: true,
                ..Detailed::default()
            },
            503,
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .err()
        .unwrap();

        let body = serde_json::to_value(&reply.body).unwrap();
        assert_eq!(body, json!({"code": 503, "error": "busy", "retry": true}));
    }

    #[tokio::test]
    async fn reply_renders_json_with_http_status() {
        let response = ErrorReply {
            http_status: StatusCode::UNPROCESSABLE_ENTITY,
            body: StatusMessage::new(42, "bad input"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()["content-type"], "application/json");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": 42, "message": "bad input"}));
    }
}

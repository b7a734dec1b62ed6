use derive_more::{Display, Error};
use log::error;
use serde::Serialize;
use std::fmt;

use crate::{metric, models::bird::BirdStatus};

/// Validation failure on one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|err| err.field == field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs = self
            .0
            .iter()
            .map(|err| format!("{}: {}", err.field, err.message))
            .collect::<Vec<String>>();
        write!(f, "{}", msgs.join("; "))
    }
}

/// Turns the output of a form `validate()` into an error when not empty.
pub fn ensure_valid(errors: Vec<FieldError>) -> Result<(), UserError> {
    if errors.is_empty() {
        return Ok(());
    }

    Err(UserError::FormInputValueError(FieldErrors(errors)))
}

/// Requests rejected locally, before anything is sent to the backend.
#[derive(Debug, Display, Error, PartialEq)]
pub enum UserError {
    #[display("invalid form values: {_0}")]
    FormInputValueError(#[error(not(source))] FieldErrors),
    #[display("cannot move a bird from {from} to {to}")]
    InvalidTransition { from: BirdStatus, to: BirdStatus },
    GenderUnverified,
    #[display("birds cannot be paired: {_0}")]
    NotPairable(#[error(not(source))] String),
    ConfirmationRequired,
    NotMated,
    NotSold,
    IncubationClosed,
}

impl UserError {
    pub fn toast_message(&self) -> String {
        match self {
            UserError::FormInputValueError(errors) => format!("表单填写有误: {errors}"),
            UserError::InvalidTransition { from, to } => {
                format!("当前状态({from})不能变更为{to}")
            }
            UserError::GenderUnverified => "性别未鉴定，不能设为种鸟".into(),
            UserError::NotPairable(msg) => format!("无法配对: {msg}"),
            UserError::ConfirmationRequired => "请确认后再操作".into(),
            UserError::NotMated => "该鸟尚未配对".into(),
            UserError::NotSold => "该鸟尚未售出".into(),
            UserError::IncubationClosed => "该孵化记录已结束".into(),
        }
    }
}

/// Failures of a request sent (or attempted) to the backend.
#[derive(Debug, Display, Error, PartialEq)]
pub enum ServerError {
    #[display("[BadRequest] {_0}")]
    BadRequest(#[error(not(source))] String),
    #[display("[NotFound] {_0}")]
    NotFound(#[error(not(source))] String),
    #[display("[Unprocessable] {_0}")]
    Unprocessable(#[error(not(source))] String),
    #[display("[Internal] {_0}")]
    Internal(#[error(not(source))] String),
    #[display("[Unexpected {status}] {msg}")]
    Unexpected { status: u16, msg: String },
    #[display("[Network] {_0}")]
    Network(#[error(not(source))] String),
    #[display("[Decode] {_0}")]
    Decode(#[error(not(source))] String),
}

impl ServerError {
    /// Buckets a non-success response by status code.
    pub fn from_status(status: u16, body: &str) -> Self {
        let msg = extract_server_message(body).unwrap_or_default();
        let err = match status {
            400 => ServerError::BadRequest(msg),
            404 => ServerError::NotFound(msg),
            422 => ServerError::Unprocessable(msg),
            500..=599 => ServerError::Internal(msg),
            _ => ServerError::Unexpected { status, msg },
        };

        error!("{err}");
        metric::incr_api_error_statds(err.kind());
        err
    }

    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let server_err = if err.is_decode() {
            ServerError::Decode(err.to_string())
        } else if err.is_connect() {
            ServerError::Network("no connection".into())
        } else if err.is_timeout() {
            ServerError::Network("request timed out".into())
        } else {
            ServerError::Network(err.to_string())
        };

        error!("{server_err}");
        metric::incr_api_error_statds(server_err.kind());
        server_err
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "bad_request",
            ServerError::NotFound(_) => "not_found",
            ServerError::Unprocessable(_) => "unprocessable",
            ServerError::Internal(_) => "internal",
            ServerError::Unexpected { .. } => "unexpected",
            ServerError::Network(_) => "network",
            ServerError::Decode(_) => "decode",
        }
    }

    /// Short text for a transient notification, server text when it sent one.
    pub fn toast_message(&self) -> String {
        let (server_msg, fallback) = match self {
            ServerError::BadRequest(msg) => (msg.as_str(), "请求参数错误"),
            ServerError::NotFound(msg) => (msg.as_str(), "请求的资源不存在"),
            ServerError::Unprocessable(msg) => (msg.as_str(), "数据校验失败"),
            ServerError::Internal(_) => ("", "服务器错误，请稍后重试"),
            ServerError::Unexpected { msg, .. } => (msg.as_str(), "请求失败"),
            ServerError::Network(_) => ("", "网络连接失败，请检查网络"),
            ServerError::Decode(_) => ("", "服务器返回数据格式错误"),
        };

        if server_msg.is_empty() {
            fallback.to_string()
        } else {
            server_msg.to_string()
        }
    }
}

/// Pulls the human readable text out of a JSON error body.
fn extract_server_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;

    ["message", "detail", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
}

/// Text to show for any error returned by an operation.
pub fn toast_for(err: &anyhow::Error) -> String {
    if let Some(user_err) = err.downcast_ref::<UserError>() {
        return user_err.toast_message();
    }

    if let Some(server_err) = err.downcast_ref::<ServerError>() {
        return server_err.toast_message();
    }

    "操作失败".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_buckets() {
        assert!(matches!(
            ServerError::from_status(400, "{}"),
            ServerError::BadRequest(_)
        ));
        assert!(matches!(
            ServerError::from_status(404, ""),
            ServerError::NotFound(_)
        ));
        assert!(matches!(
            ServerError::from_status(422, "{}"),
            ServerError::Unprocessable(_)
        ));
        assert!(matches!(
            ServerError::from_status(503, "bad gateway"),
            ServerError::Internal(_)
        ));
        assert!(matches!(
            ServerError::from_status(409, "{}"),
            ServerError::Unexpected { status: 409, .. }
        ));
    }

    #[test]
    fn test_toast_prefers_server_text() {
        let err = ServerError::from_status(422, r#"{"message": "脚环号已存在"}"#);
        assert_eq!(err.toast_message(), "脚环号已存在");

        let err = ServerError::from_status(400, r#"{"detail": "price is required"}"#);
        assert_eq!(err.toast_message(), "price is required");

        let err = ServerError::from_status(404, "not json");
        assert_eq!(err.toast_message(), "请求的资源不存在");
    }

    #[test]
    fn test_toast_hides_internal_details() {
        let err = ServerError::from_status(500, r#"{"message": "stack trace here"}"#);
        assert_eq!(err.toast_message(), "服务器错误，请稍后重试");
    }

    #[test]
    fn test_toast_for_anyhow_errors() {
        let err: anyhow::Error = UserError::GenderUnverified.into();
        assert_eq!(toast_for(&err), "性别未鉴定，不能设为种鸟");

        let err: anyhow::Error = ServerError::Network("no connection".into()).into();
        assert_eq!(toast_for(&err), "网络连接失败，请检查网络");

        assert_eq!(toast_for(&anyhow::anyhow!("boom")), "操作失败");
    }

    #[test]
    fn test_ensure_valid() {
        assert!(ensure_valid(vec![]).is_ok());

        let err = ensure_valid(vec![FieldError::new("contact", "required")]).unwrap_err();
        match err {
            UserError::FormInputValueError(errors) => {
                assert!(errors.has_field("contact"));
                assert_eq!(errors.to_string(), "contact: required");
            }
            _ => panic!("unexpected error {err:?}"),
        }
    }
}

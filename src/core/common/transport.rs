use std::fmt::Display;

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Outcome of an API call that reached the application layer.
///
/// A rejection (validation failure, unknown product, missing cart line...) is
/// not an error of the client: it is returned as data so the caller can
/// inspect the messages. Only failures below the application layer surface
/// as [`TransportError`].
#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome<T> {
    Success(T),
    Rejected(ApplicationError),
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ApiOutcome::Rejected(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ApiOutcome::Success(t) => Some(t),
            ApiOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&ApplicationError> {
        match self {
            ApiOutcome::Success(_) => None,
            ApiOutcome::Rejected(e) => Some(e),
        }
    }

    /// Turns a rejection into an `Err`, for callers that consider it fatal.
    pub fn into_result(self) -> Result<T, ApplicationError> {
        match self {
            ApiOutcome::Success(t) => Ok(t),
            ApiOutcome::Rejected(e) => Err(e),
        }
    }
}

/// Error payload of a well-formed response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplicationError {
    pub messages: Vec<String>,
}

impl ApplicationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.messages
            .iter()
            .any(|m| m.to_lowercase().contains(&needle))
    }
}

impl Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API error: {}", self.messages.join("; "))
    }
}

impl std::error::Error for ApplicationError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connection,
    Timeout,
    Request,
    MalformedBody,
    UnexpectedStatus,
}

impl Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransportErrorKind::Connection => "connection failure",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Request => "request failure",
            TransportErrorKind::MalformedBody => "malformed response body",
            TransportErrorKind::UnexpectedStatus => "unexpected status",
        };
        write!(f, "{label}")
    }
}

/// Failure below the application layer. Never retried.
#[derive(Debug)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub reason: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, reason: String) -> Self {
        Self { kind, reason }
    }

    pub fn malformed(reason: String) -> Self {
        Self::new(TransportErrorKind::MalformedBody, reason)
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if e.is_connect() {
            TransportErrorKind::Connection
        } else if e.is_decode() || e.is_body() {
            TransportErrorKind::MalformedBody
        } else if e.is_status() {
            TransportErrorKind::UnexpectedStatus
        } else {
            TransportErrorKind::Request
        };

        Self::new(kind, e.to_string())
    }
}

/// Parses a raw body as JSON. Anything else (empty body, HTML error page)
/// is a transport failure; the status is kept in the reason.
pub fn parse_body(status: StatusCode, body: &str) -> Result<Value, TransportError> {
    if body.trim().is_empty() {
        return Err(TransportError::new(
            unparsable_kind(status),
            format!("empty body (status {status})"),
        ));
    }

    serde_json::from_str::<Value>(body).map_err(|e| {
        let excerpt: String = body.chars().take(200).collect();
        TransportError::new(
            unparsable_kind(status),
            format!("status {status}, {e}: {excerpt}"),
        )
    })
}

fn unparsable_kind(status: StatusCode) -> TransportErrorKind {
    if status.is_success() {
        TransportErrorKind::MalformedBody
    } else {
        TransportErrorKind::UnexpectedStatus
    }
}

/// Splits a parsed body into the success schema `T` or the error payload.
///
/// A body carrying a non-empty `error` field is a rejection regardless of
/// the other fields. A body that matches neither is a malformed response.
pub fn classify<T: DeserializeOwned>(value: Value) -> Result<ApiOutcome<T>, TransportError> {
    if let Some(messages) = error_messages(&value)? {
        return Ok(ApiOutcome::Rejected(ApplicationError::new(messages)));
    }

    serde_json::from_value::<T>(value)
        .map(ApiOutcome::Success)
        .map_err(|e| TransportError::malformed(format!("unexpected response shape: {e}")))
}

fn error_messages(value: &Value) -> Result<Option<Vec<String>>, TransportError> {
    let field = match value.get("error") {
        None | Some(Value::Null) => return Ok(None),
        Some(f) => f.clone(),
    };

    let messages = serde_json::from_value::<ErrorField>(field)
        .map_err(|e| TransportError::malformed(format!("unreadable error payload: {e}")))?
        .into_messages();

    if messages.is_empty() {
        return Ok(None);
    }

    Ok(Some(messages))
}

/// The `error` field shows up as a string, a list, or a keyed object
/// depending on the route.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ErrorField {
    One(String),
    Many(Vec<String>),
    Keyed(serde_json::Map<String, Value>),
}

impl ErrorField {
    fn into_messages(self) -> Vec<String> {
        match self {
            ErrorField::One(m) if m.is_empty() => vec![],
            ErrorField::One(m) => vec![m],
            ErrorField::Many(m) => m,
            ErrorField::Keyed(map) => map
                .into_iter()
                .map(|(key, v)| match v {
                    Value::String(s) => s,
                    other => format!("{key}: {other}"),
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

/// Identifiers and quantities arrive either as JSON numbers or numeric strings.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("'{s}' is not an integer: {e}"))),
    }
}

/// Optional variant of [`lenient_i64`]; pair it with `#[serde(default)]`.
pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("'{s}' is not an integer: {e}"))),
    }
}

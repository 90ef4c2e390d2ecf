//! GraphQL wire types
//!
//! Mirrors the formatted error shape returned by the API:
//! `{ message, path, locations, extensions: { code, details, ... } }`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Symbolic error kind carried in `extensions.code`.
///
/// Unknown codes are preserved verbatim in [`ApiErrorCode::Other`] so that
/// classification never loses information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    UnprocessableEntity,
    InternalError,
    ExpiredJwtToken,
    TokenEncodingError,
    UserAlreadyExists,
    IncorrectLoginOrPassword,
    CurrenciesDoesNotMatch,
    MissingPaymentProviderCustomer,
    /// Error raised by an external payment or tax provider.
    ThirdPartyError,
    Other(String),
}

impl ApiErrorCode {
    /// Wire representation of the code.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::UnprocessableEntity => "unprocessable_entity",
            Self::InternalError => "internal_error",
            Self::ExpiredJwtToken => "expired_jwt_token",
            Self::TokenEncodingError => "token_encoding_error",
            Self::UserAlreadyExists => "user_already_exists",
            Self::IncorrectLoginOrPassword => "incorrect_login_or_password",
            Self::CurrenciesDoesNotMatch => "currencies_does_not_match",
            Self::MissingPaymentProviderCustomer => "missing_payment_provider_customer",
            Self::ThirdPartyError => "third_party_error",
            Self::Other(code) => code,
        }
    }

    /// Codes that invalidate the current session.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::ExpiredJwtToken | Self::TokenEncodingError | Self::Unauthorized)
    }
}

impl From<&str> for ApiErrorCode {
    fn from(value: &str) -> Self {
        match value {
            "unauthorized" => Self::Unauthorized,
            "forbidden" => Self::Forbidden,
            "not_found" => Self::NotFound,
            "unprocessable_entity" => Self::UnprocessableEntity,
            "internal_error" => Self::InternalError,
            "expired_jwt_token" => Self::ExpiredJwtToken,
            "token_encoding_error" => Self::TokenEncodingError,
            "user_already_exists" => Self::UserAlreadyExists,
            "incorrect_login_or_password" => Self::IncorrectLoginOrPassword,
            "currencies_does_not_match" => Self::CurrenciesDoesNotMatch,
            "missing_payment_provider_customer" => Self::MissingPaymentProviderCustomer,
            "third_party_error" => Self::ThirdPartyError,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for ApiErrorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ApiErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// One entry of `extensions.details`.
///
/// Validation failures arrive as lists of reason identifiers; provider errors
/// may carry a single string under `details.error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    List(Vec<String>),
    Scalar(String),
    Other(Value),
}

impl DetailValue {
    /// Reasons carried by this entry. Non-string payloads yield nothing.
    pub fn reasons(&self) -> &[String] {
        match self {
            Self::List(items) => items,
            Self::Scalar(item) => std::slice::from_ref(item),
            Self::Other(_) => &[],
        }
    }

    pub fn contains(&self, reason: &str) -> bool {
        self.reasons().iter().any(|r| r == reason)
    }
}

/// Mapping of field name to violation reasons.
pub type ErrorDetails = BTreeMap<String, DetailValue>;

/// `extensions` block of a formatted error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorExtensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ApiErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
    /// Anything else the server attaches (`status`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Source position of an error inside the query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// Response path segment: field name or list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(u64),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Key(key) => f.write_str(key),
        }
    }
}

/// A GraphQL formatted error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<ErrorLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<ErrorExtensions>,
}

impl GraphqlError {
    /// Error carrying only `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Self::default() }
    }

    /// Set `extensions.code`.
    pub fn with_code(mut self, code: ApiErrorCode) -> Self {
        self.extensions.get_or_insert_with(ErrorExtensions::default).code = Some(code);
        self
    }

    /// Add one `extensions.details` entry.
    pub fn with_detail(mut self, field: impl Into<String>, value: DetailValue) -> Self {
        self.extensions
            .get_or_insert_with(ErrorExtensions::default)
            .details
            .get_or_insert_with(ErrorDetails::new)
            .insert(field.into(), value);
        self
    }

    /// Set the response path.
    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = Some(path);
        self
    }

    /// `extensions.code`, when present.
    pub fn code(&self) -> Option<&ApiErrorCode> {
        self.extensions.as_ref().and_then(|ext| ext.code.as_ref())
    }

    /// `extensions.details`, when present.
    pub fn details(&self) -> Option<&ErrorDetails> {
        self.extensions.as_ref().and_then(|ext| ext.details.as_ref())
    }

    /// Dotted rendering of the response path, for log lines.
    pub fn path_display(&self) -> String {
        self.path
            .as_ref()
            .map(|segments| {
                segments.iter().map(ToString::to_string).collect::<Vec<_>>().join(".")
            })
            .unwrap_or_default()
    }
}

/// Outgoing GraphQL operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    pub query: String,
    #[serde(default)]
    pub variables: Value,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { operation_name: None, query: query.into(), variables: Value::Object(Map::new()) }
    }

    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    /// Mutations bypass the response cache.
    pub fn is_mutation(&self) -> bool {
        self.query.trim_start().starts_with("mutation")
    }
}

/// GraphQL response body. Data and errors may both be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlResponse<T = Value> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
}

impl<T> Default for GraphqlResponse<T> {
    fn default() -> Self {
        Self { data: None, errors: Vec::new() }
    }
}

impl<T> GraphqlResponse<T> {
    /// Successful response without errors.
    pub fn from_data(data: T) -> Self {
        Self { data: Some(data), errors: Vec::new() }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_unprocessable_entity_error() {
        let raw = json!({
            "message": "Unprocessable Entity",
            "locations": [{ "line": 2, "column": 3 }],
            "path": ["loginUser"],
            "extensions": {
                "status": 422,
                "code": "unprocessable_entity",
                "details": { "email": ["user_already_exists"] }
            }
        });

        let error: GraphqlError = serde_json::from_value(raw).unwrap();

        assert_eq!(error.code(), Some(&ApiErrorCode::UnprocessableEntity));
        assert!(error.details().unwrap()["email"].contains("user_already_exists"));
        assert_eq!(error.extensions.unwrap().extra["status"], json!(422));
        assert_eq!(error.locations.unwrap()[0], ErrorLocation { line: 2, column: 3 });
    }

    #[test]
    fn unknown_codes_are_kept_verbatim() {
        let code: ApiErrorCode = serde_json::from_value(json!("SomeUnlisted")).unwrap();
        assert_eq!(code, ApiErrorCode::Other("SomeUnlisted".into()));
        assert_eq!(serde_json::to_value(&code).unwrap(), json!("SomeUnlisted"));
    }

    #[test]
    fn scalar_details_are_supported() {
        let details: ErrorDetails =
            serde_json::from_value(json!({ "error": "Amount must be at least $0.50 usd" }))
                .unwrap();
        assert_eq!(
            details["error"],
            DetailValue::Scalar("Amount must be at least $0.50 usd".into())
        );
    }

    #[test]
    fn path_display_joins_segments() {
        let error = GraphqlError::new("boom")
            .with_path(vec![PathSegment::Key("invoices".into()), PathSegment::Index(2)]);
        assert_eq!(error.path_display(), "invoices.2");
    }

    #[test]
    fn response_without_errors_field_parses() {
        let response: GraphqlResponse =
            serde_json::from_value(json!({ "data": { "ok": true } })).unwrap();
        assert!(!response.has_errors());
        assert_eq!(response.data, Some(json!({ "ok": true })));
    }

    #[test]
    fn detects_mutations() {
        assert!(GraphqlRequest::new("  mutation resendInvoiceEmail { id }").is_mutation());
        assert!(!GraphqlRequest::new("query plans { id }").is_mutation());
    }
}

//! Call-site error classifier.
//!
//! Both helpers only look at the first error of a response for code checks;
//! field detail membership is unioned across every field of that error.

use lago_domain::{ApiErrorCode, DetailValue, GraphqlError, GraphqlResponse};

/// Where the errors being classified come from.
///
/// Call sites hold either a full operation result or a bare list of
/// formatted errors. Both are normalized into one slice before any check.
#[derive(Debug, Clone, Copy, Default)]
pub enum ErrorSource<'a> {
    /// Nothing to inspect.
    #[default]
    Absent,
    /// Errors attached to an operation result.
    Result(&'a [GraphqlError]),
    /// A raw list of formatted errors.
    Formatted(&'a [GraphqlError]),
}

impl<'a> ErrorSource<'a> {
    /// Canonical error list. Empty for [`ErrorSource::Absent`].
    pub fn errors(self) -> &'a [GraphqlError] {
        match self {
            Self::Absent => &[],
            Self::Result(errors) | Self::Formatted(errors) => errors,
        }
    }

    fn first(self) -> Option<&'a GraphqlError> {
        self.errors().first()
    }
}

impl<'a, T> From<&'a GraphqlResponse<T>> for ErrorSource<'a> {
    fn from(response: &'a GraphqlResponse<T>) -> Self {
        Self::Result(&response.errors)
    }
}

impl<'a> From<&'a [GraphqlError]> for ErrorSource<'a> {
    fn from(errors: &'a [GraphqlError]) -> Self {
        Self::Formatted(errors)
    }
}

impl<'a> From<&'a Vec<GraphqlError>> for ErrorSource<'a> {
    fn from(errors: &'a Vec<GraphqlError>) -> Self {
        Self::Formatted(errors)
    }
}

impl<'a, S> From<Option<S>> for ErrorSource<'a>
where
    S: Into<ErrorSource<'a>>,
{
    fn from(source: Option<S>) -> Self {
        source.map_or(Self::Absent, Into::into)
    }
}

/// Whether the response carries `code`, optionally scoped to one field.
///
/// - With `details` on the first error: `field` restricts the lookup to
///   `details[field]`, otherwise every field's reasons are searched.
/// - Without `details`: falls back to comparing the top-level code.
/// - No errors at all: `false`.
pub fn has_defined_error<'a>(
    code: &ApiErrorCode,
    source: impl Into<ErrorSource<'a>>,
    field: Option<&str>,
) -> bool {
    let Some(first) = source.into().first() else {
        return false;
    };

    if let Some(details) = first.details() {
        let wanted = code.as_str();
        return match field {
            Some(field) => details.get(field).is_some_and(|value| value.contains(wanted)),
            None => details.values().flat_map(DetailValue::reasons).any(|reason| reason == wanted),
        };
    }

    first.code().is_some_and(|actual| actual == code)
}

/// Verbatim message from a payment/tax provider failure.
///
/// Only applies when the first error's code is `third_party_error`; returns
/// the first element of `details.error` when it is a list, the string itself
/// when it is a non-empty scalar, `None` for anything else.
pub fn extract_third_party_message<'a>(source: impl Into<ErrorSource<'a>>) -> Option<String> {
    let first = source.into().first()?;

    if first.code() != Some(&ApiErrorCode::ThirdPartyError) {
        return None;
    }

    match first.details()?.get("error")? {
        DetailValue::List(items) => items.first().cloned(),
        DetailValue::Scalar(message) if message.is_empty() => None,
        DetailValue::Scalar(message) => Some(message.clone()),
        DetailValue::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn unprocessable(details: Value) -> GraphqlResponse {
        serde_json::from_value(json!({
            "data": null,
            "errors": [{
                "message": "Unprocessable Entity",
                "locations": [{ "line": 2, "column": 3 }],
                "path": ["loginUser"],
                "extensions": { "status": 422, "code": "unprocessable_entity", "details": details }
            }]
        }))
        .unwrap()
    }

    fn third_party(detail: Value) -> Vec<GraphqlError> {
        serde_json::from_value(json!([{
            "message": "Third Party Error",
            "locations": [{ "line": 2, "column": 3 }],
            "path": ["generateCheckoutUrl"],
            "extensions": { "status": 422, "code": "third_party_error", "details": { "error": detail } }
        }]))
        .unwrap()
    }

    #[test]
    fn absent_source_is_never_a_match() {
        assert!(!has_defined_error(&ApiErrorCode::Forbidden, ErrorSource::Absent, None));
        assert!(!has_defined_error(&ApiErrorCode::Forbidden, None::<&GraphqlResponse>, None));
        assert!(!has_defined_error(&ApiErrorCode::Forbidden, &Vec::new(), Some("email")));
    }

    #[test]
    fn scoped_lookup_only_checks_that_field() {
        let response = unprocessable(json!({ "email": ["user_already_exists"] }));

        assert!(has_defined_error(&ApiErrorCode::UserAlreadyExists, &response, Some("email")));
        assert!(!has_defined_error(&ApiErrorCode::UserAlreadyExists, &response, Some("password")));
        assert!(!has_defined_error(&ApiErrorCode::Forbidden, &response, Some("email")));
    }

    #[test]
    fn unscoped_lookup_unions_every_field() {
        let response = unprocessable(json!({
            "email": ["user_already_exists"],
            "password": ["forbidden"]
        }));

        assert!(has_defined_error(&ApiErrorCode::UserAlreadyExists, &response, None));
        assert!(has_defined_error(&ApiErrorCode::Forbidden, &response, None));
        assert!(!has_defined_error(&ApiErrorCode::CurrenciesDoesNotMatch, &response, None));
    }

    #[test]
    fn formatted_lists_behave_like_results() {
        let response = unprocessable(json!({ "email": ["user_already_exists"] }));
        let errors: &[GraphqlError] = &response.errors;

        assert!(has_defined_error(&ApiErrorCode::UserAlreadyExists, errors, Some("email")));
        assert!(!has_defined_error(&ApiErrorCode::UserAlreadyExists, errors, Some("password")));
    }

    #[test]
    fn falls_back_to_top_level_code_without_details() {
        let errors = vec![GraphqlError::new("Forbidden").with_code(ApiErrorCode::Forbidden)];

        assert!(has_defined_error(&ApiErrorCode::Forbidden, &errors, None));
        assert!(!has_defined_error(&ApiErrorCode::NotFound, &errors, None));
    }

    #[test]
    fn present_details_take_precedence_over_the_code() {
        let response = unprocessable(json!({ "email": ["user_already_exists"] }));

        assert!(!has_defined_error(&ApiErrorCode::UnprocessableEntity, &response, None));
    }

    #[test]
    fn only_the_first_error_is_consulted() {
        let errors = vec![
            GraphqlError::new("Not found").with_code(ApiErrorCode::NotFound),
            GraphqlError::new("Forbidden").with_code(ApiErrorCode::Forbidden),
        ];

        assert!(!has_defined_error(&ApiErrorCode::Forbidden, &errors, None));
    }

    #[test]
    fn extracts_scalar_provider_message() {
        let errors = third_party(json!("Amount must be at least $0.50 usd"));

        assert_eq!(
            extract_third_party_message(&errors).as_deref(),
            Some("Amount must be at least $0.50 usd")
        );
    }

    #[test]
    fn extracts_first_element_of_list_message() {
        let errors = third_party(json!(["msg1", "msg2"]));

        assert_eq!(extract_third_party_message(&errors).as_deref(), Some("msg1"));
    }

    #[test]
    fn other_codes_never_yield_a_provider_message() {
        let response = unprocessable(json!({ "error": ["looks like a provider error"] }));

        assert_eq!(extract_third_party_message(&response), None);
    }

    #[test]
    fn provider_error_without_error_detail_yields_none() {
        let errors: Vec<GraphqlError> = serde_json::from_value(json!([{
            "message": "Third Party Error",
            "extensions": { "code": "third_party_error", "details": { "someOtherKey": ["value"] } }
        }]))
        .unwrap();

        assert_eq!(extract_third_party_message(&errors), None);
        assert_eq!(extract_third_party_message(ErrorSource::Absent), None);
        assert_eq!(extract_third_party_message(&third_party(json!([]))), None);
    }

    #[test]
    fn empty_provider_message_yields_none() {
        assert_eq!(extract_third_party_message(&third_party(json!(""))), None);
    }
}

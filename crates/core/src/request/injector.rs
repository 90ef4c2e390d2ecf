//! Request context injector.
//!
//! Decorates every outgoing operation with the session headers and removes
//! `__typename` from its variables so that objects read back from the cache
//! can be sent as mutation inputs.

use std::sync::Arc;

use lago_domain::constants::{
    AUTHORIZATION_HEADER, CUSTOMER_PORTAL_TOKEN_HEADER, FILE_VARIABLE, ORGANIZATION_HEADER,
    TYPENAME_FIELD,
};
use lago_domain::{GraphqlRequest, SessionSnapshot};
use serde_json::Value;

use crate::session::SessionController;

/// Request ready to be put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub request: GraphqlRequest,
    /// Lower-case header names in insertion order.
    pub headers: Vec<(&'static str, String)>,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
    }
}

/// Reads the live session on every call.
#[derive(Clone)]
pub struct RequestContextInjector {
    session: Arc<SessionController>,
}

impl RequestContextInjector {
    pub fn new(session: Arc<SessionController>) -> Self {
        Self { session }
    }

    /// Attach headers and sanitize variables.
    ///
    /// `has_uploads` is set by the transport when the operation is sent as a
    /// multipart upload; variables are left untouched in that case, as they
    /// are when a `file` variable is present.
    pub fn prepare(&self, mut request: GraphqlRequest, has_uploads: bool) -> PreparedRequest {
        let snapshot = self.session.snapshot();

        if !has_uploads && !carries_file(&request.variables) {
            strip_typename(&mut request.variables);
        }

        PreparedRequest { request, headers: session_headers(&snapshot) }
    }
}

fn carries_file(variables: &Value) -> bool {
    variables.get(FILE_VARIABLE).is_some_and(|file| !file.is_null())
}

fn session_headers(snapshot: &SessionSnapshot) -> Vec<(&'static str, String)> {
    let mut headers = Vec::with_capacity(3);

    if let Some(token) = snapshot.auth_token.as_deref().filter(|token| !token.is_empty()) {
        headers.push((AUTHORIZATION_HEADER, format!("Bearer {token}")));
    }

    if let Some(token) = snapshot.customer_portal_token.as_deref().filter(|token| !token.is_empty())
    {
        headers.push((CUSTOMER_PORTAL_TOKEN_HEADER, token.to_owned()));
    }

    headers.push((ORGANIZATION_HEADER, snapshot.organization_id.clone().unwrap_or_default()));
    headers
}

/// Recursively remove every `__typename` key.
pub fn strip_typename(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove(TYPENAME_FIELD);
            map.values_mut().for_each(strip_typename);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_typename),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::controller_with;

    fn mutation(variables: Value) -> GraphqlRequest {
        GraphqlRequest::new("mutation updatePlan($input: UpdatePlanInput!) { updatePlan(input: $input) { id } }")
            .operation_name("updatePlan")
            .variables(variables)
    }

    #[test]
    fn organization_header_is_always_sent() {
        let (controller, _) = controller_with(&[]);
        let injector = RequestContextInjector::new(controller);

        let prepared = injector.prepare(GraphqlRequest::new("{ me { id } }"), false);

        assert_eq!(prepared.headers, vec![(ORGANIZATION_HEADER, String::new())]);
    }

    #[test]
    fn session_tokens_become_headers() {
        let (controller, _) = controller_with(&[
            ("authToken", "\"abc\""),
            ("customerPortalToken", "\"portal\""),
            ("currentOrganization", "\"org_1\""),
        ]);
        let injector = RequestContextInjector::new(controller);

        let prepared = injector.prepare(GraphqlRequest::new("{ me { id } }"), false);

        assert_eq!(prepared.header(AUTHORIZATION_HEADER), Some("Bearer abc"));
        assert_eq!(prepared.header(CUSTOMER_PORTAL_TOKEN_HEADER), Some("portal"));
        assert_eq!(prepared.header(ORGANIZATION_HEADER), Some("org_1"));
    }

    #[test]
    fn typename_is_stripped_at_every_depth() {
        let (controller, _) = controller_with(&[]);
        let injector = RequestContextInjector::new(controller);

        let prepared = injector.prepare(
            mutation(json!({
                "input": {
                    "__typename": "Plan",
                    "name": "Premium",
                    "charges": [{ "__typename": "Charge", "properties": { "__typename": "Properties", "amount": "10" } }]
                }
            })),
            false,
        );

        assert_eq!(
            prepared.request.variables,
            json!({ "input": { "name": "Premium", "charges": [{ "properties": { "amount": "10" } }] } })
        );
    }

    #[test]
    fn uploads_keep_variables_intact() {
        let (controller, _) = controller_with(&[]);
        let injector = RequestContextInjector::new(controller);
        let variables = json!({ "file": "logo.png", "input": { "__typename": "Organization" } });

        let with_file = injector.prepare(mutation(variables.clone()), false);
        let multipart = injector.prepare(mutation(json!({ "input": { "__typename": "Organization" } })), true);

        assert_eq!(with_file.request.variables, variables);
        assert_eq!(multipart.request.variables, json!({ "input": { "__typename": "Organization" } }));
    }

    #[test]
    fn null_file_variable_does_not_block_stripping() {
        let (controller, _) = controller_with(&[]);
        let injector = RequestContextInjector::new(controller);

        let prepared =
            injector.prepare(mutation(json!({ "file": null, "input": { "__typename": "X", "a": 1 } })), false);

        assert_eq!(prepared.request.variables, json!({ "file": null, "input": { "a": 1 } }));
    }
}

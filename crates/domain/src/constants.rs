//! Application constants
//!
//! Centralized location for storage keys, header names and transport limits.

// Local storage keys
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const TMP_AUTH_TOKEN_KEY: &str = "tmpAuthToken";
pub const CUSTOMER_PORTAL_TOKEN_KEY: &str = "customerPortalToken";
pub const ORGANIZATION_ID_KEY: &str = "currentOrganization";
pub const FEATURE_FLAGS_KEY: &str = "featureFlags";
pub const RESPONSE_CACHE_KEY_PREFIX: &str = "apollo-cache-persist-lago-";

/// Literal some writers leave behind instead of removing a key.
pub const UNDEFINED_LITERAL: &str = "undefined";

// Request headers
pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const CUSTOMER_PORTAL_TOKEN_HEADER: &str = "customer-portal-token";
pub const ORGANIZATION_HEADER: &str = "x-lago-organization";
pub const CLIENT_NAME_HEADER: &str = "apollographql-client-name";
pub const CLIENT_VERSION_HEADER: &str = "apollographql-client-version";

// Transport
pub const GRAPHQL_PATH: &str = "/graphql";
pub const REQUEST_TIMEOUT_SECS: u64 = 300;
pub const TYPENAME_FIELD: &str = "__typename";
pub const FILE_VARIABLE: &str = "file";
pub const PERSISTED_QUERY_NOT_FOUND: &str = "PersistedQueryNotFound";

// Notifications
pub const GENERIC_ERROR_TRANSLATION_KEY: &str = "text_622f7a3dc32ce100c46a5154";

/// Key under which the response cache snapshot is persisted for an app version.
pub fn response_cache_key(app_version: &str) -> String {
    format!("{RESPONSE_CACHE_KEY_PREFIX}{app_version}")
}

//! Integration tests for AppContext lifecycle
//!
//! Contexts are built over a temporary SQLite file so that what one run
//! persists is visible to the next, the way two launches of the binary
//! would see it.

use lago_app::commands::{self, CallSiteReaction, OperationInput};
use lago_app::AppContext;
use lago_core::{FetchPolicy, LocalStorage, OperationContext};
use lago_domain::{
    ApiConfig, ApiErrorCode, AppInfo, Config, FeatureFlag, FeatureFlagSelection, GraphqlRequest,
    Route, SessionStatus, StorageConfig,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CUSTOMERS_QUERY: &str = "query getCustomers { customers { id } }";

fn test_config(temp_dir: &TempDir, api_url: &str) -> Config {
    Config {
        api: ApiConfig { url: api_url.to_string(), timeout_secs: 5 },
        app: AppInfo { name: "lago-test".to_string(), version: "test".to_string() },
        storage: StorageConfig {
            path: temp_dir.path().join("lago.db").to_string_lossy().into_owned(),
        },
    }
}

fn create_context(config: &Config) -> AppContext {
    AppContext::new_with_config(config.clone()).expect("context should build")
}

#[tokio::test]
async fn fresh_context_starts_logged_out() {
    let temp_dir = TempDir::new().expect("temp dir");
    let ctx = create_context(&test_config(&temp_dir, "http://localhost:3000"));

    assert_eq!(ctx.session.status(), SessionStatus::Unauthenticated);
    assert_eq!(ctx.router.current(), Route::Login);
    assert_eq!(ctx.client.endpoint(), "http://localhost:3000/graphql");
    assert!(ctx.cache.is_empty());
}

#[tokio::test]
async fn session_and_flags_survive_a_restart() {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(&temp_dir, "http://localhost:3000");

    {
        let ctx = create_context(&config);
        commands::log_in(&ctx, "org-token").expect("login");
        commands::switch_organization(&ctx, "org_1").expect("switch");
        commands::set_feature_flags(&ctx, FeatureFlagSelection::One(FeatureFlag::FtrEnabled))
            .expect("set flags");
    }

    let ctx = create_context(&config);
    let snapshot = ctx.session.snapshot();
    assert_eq!(snapshot.status, SessionStatus::Authenticated);
    assert_eq!(snapshot.auth_token.as_deref(), Some("org-token"));
    assert_eq!(snapshot.organization_id.as_deref(), Some("org_1"));
    assert!(commands::is_feature_enabled(&ctx, FeatureFlag::FtrEnabled).unwrap());
    assert!(!commands::is_feature_enabled(&ctx, FeatureFlag::FtrNewAnalyticsMrr).unwrap());

    let masked = commands::session_status(&ctx);
    assert_eq!(masked.auth_token.as_deref(), Some("org-***"));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let temp_dir = TempDir::new().expect("temp dir");
    let ctx = create_context(&test_config(&temp_dir, "http://localhost:3000"));
    commands::log_in(&ctx, "org-token").expect("login");

    assert!(commands::log_out(&ctx).expect("first logout"));
    assert_eq!(ctx.session.status(), SessionStatus::Unauthenticated);
    // Logging out again from a logged-out session simply repeats the teardown.
    assert!(commands::log_out(&ctx).expect("second logout"));
    assert_eq!(ctx.router.current(), Route::Login);
    assert_eq!(ctx.storage.get("authToken").unwrap(), None);
}

#[tokio::test]
async fn expired_token_logs_the_session_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [
                { "message": "Token expired", "extensions": { "code": "expired_jwt_token" } },
                { "message": "Token expired", "extensions": { "code": "expired_jwt_token" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().expect("temp dir");
    let ctx = create_context(&test_config(&temp_dir, &server.uri()));
    commands::log_in(&ctx, "stale-token").expect("login");
    let mut notifications = ctx.notifications.subscribe();

    let input = OperationInput::new(GraphqlRequest::new(CUSTOMERS_QUERY));
    let outcome = commands::run_operation(&ctx, input).await.expect("transport succeeds");

    assert_eq!(outcome.response.errors.len(), 2);
    assert_eq!(outcome.reaction, CallSiteReaction::Unhandled("expired_jwt_token".into()));
    assert_eq!(ctx.session.status(), SessionStatus::Unauthenticated);
    assert_eq!(ctx.router.current(), Route::Login);
    assert!(ctx.telemetry.recent().is_empty());
    assert!(notifications.try_recv().is_err());
}

#[tokio::test]
async fn cached_query_is_served_after_a_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "customers": [{ "id": "cus_1" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config(&temp_dir, &server.uri());
    let request = GraphqlRequest::new(CUSTOMERS_QUERY).operation_name("getCustomers");

    {
        let ctx = create_context(&config);
        commands::log_in(&ctx, "org-token").expect("login");
        let outcome = commands::run_operation(&ctx, OperationInput::new(request.clone()))
            .await
            .expect("first run");
        assert_eq!(outcome.reaction, CallSiteReaction::None);
    }

    let ctx = create_context(&config);
    let mut input = OperationInput::new(request);
    input.context = OperationContext::new().fetch_policy(FetchPolicy::CacheFirst);
    let outcome = commands::run_operation(&ctx, input).await.expect("second run");

    assert_eq!(outcome.response.data, Some(json!({ "customers": [{ "id": "cus_1" }] })));
}

#[tokio::test]
async fn silent_codes_skip_the_toast() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{
                "message": "Unprocessable Entity",
                "extensions": {
                    "code": "unprocessable_entity",
                    "details": { "code": ["value_already_exist"] }
                }
            }]
        })))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().expect("temp dir");
    let ctx = create_context(&test_config(&temp_dir, &server.uri()));
    commands::log_in(&ctx, "org-token").expect("login");
    let mut notifications = ctx.notifications.subscribe();

    let mut input = OperationInput::new(GraphqlRequest::new(
        "mutation createPlan($input: CreatePlanInput!) { createPlan(input: $input) { id } }",
    ));
    input.context = OperationContext::new().silent_error_codes([ApiErrorCode::UnprocessableEntity]);
    input.expected = vec!["value_already_exist@code".parse().expect("expected error")];

    let outcome = commands::run_operation(&ctx, input).await.expect("transport succeeds");

    assert_eq!(outcome.reaction, CallSiteReaction::Expected("value_already_exist".into()));
    assert!(ctx.telemetry.recent().is_empty());
    assert!(notifications.try_recv().is_err());
    assert_eq!(ctx.session.status(), SessionStatus::Authenticated);
}

//! GraphQL client.
//!
//! One request goes through: cache lookup, context injection, a single HTTP
//! attempt, response parsing, the error guard and finally the cache write.
//! Responses carrying both `data` and `errors` are returned whole.

use std::sync::Arc;
use std::time::Duration;

use lago_core::{ErrorGuard, FetchPolicy, OperationContext, PreparedRequest, RequestContextInjector};
use lago_domain::constants::{CLIENT_NAME_HEADER, CLIENT_VERSION_HEADER};
use lago_domain::{Config, GraphqlRequest, GraphqlResponse, LagoError, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use tracing::{debug, instrument, warn};

use super::multipart::{self, Upload};
use crate::cache::ResponseCache;
use crate::http::HttpClient;

pub struct GraphqlClient {
    http: HttpClient,
    endpoint: String,
    injector: RequestContextInjector,
    guard: ErrorGuard,
    cache: Arc<ResponseCache>,
}

impl GraphqlClient {
    pub fn new(
        http: HttpClient,
        endpoint: impl Into<String>,
        injector: RequestContextInjector,
        guard: ErrorGuard,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self { http, endpoint: endpoint.into(), injector, guard, cache }
    }

    /// Client for `config`, identifying itself with the app name and version.
    pub fn from_config(
        config: &Config,
        injector: RequestContextInjector,
        guard: ErrorGuard,
        cache: Arc<ResponseCache>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_NAME_HEADER, header_value(&config.app.name)?);
        headers.insert(CLIENT_VERSION_HEADER, header_value(&config.app.version)?);

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .user_agent(format!("{}/{}", config.app.name, config.app.version))
            .default_headers(headers)
            .build()?;

        Ok(Self::new(http, config.api.graphql_endpoint(), injector, guard, cache))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a query (or a mutation, which is never cached).
    ///
    /// # Errors
    ///
    /// Transport failures only. GraphQL errors come back inside the response.
    #[instrument(skip_all, fields(operation = request.operation_name.as_deref().unwrap_or_default()))]
    pub async fn query(
        &self,
        request: GraphqlRequest,
        context: &OperationContext,
    ) -> Result<GraphqlResponse> {
        if request.is_mutation() {
            return self.mutate(request, context).await;
        }

        // Lookups and writes both key on the sanitized request.
        let prepared = self.injector.prepare(request, false);

        match context.policy() {
            FetchPolicy::CacheFirst => {
                if let Some(data) = self.cache.get(&prepared.request) {
                    debug!("cache hit");
                    return Ok(GraphqlResponse::from_data(data));
                }
                self.fetch_and_cache(prepared, context).await
            }
            FetchPolicy::CacheAndNetwork => {
                let cached = self.cache.get(&prepared.request);
                match self.fetch_and_cache(prepared, context).await {
                    Err(e) if cached.is_some() => {
                        warn!(error = %e, "network failed, serving cached data");
                        Ok(GraphqlResponse { data: cached, errors: Vec::new() })
                    }
                    other => other,
                }
            }
            FetchPolicy::NetworkOnly => self.fetch_and_cache(prepared, context).await,
        }
    }

    /// Run a mutation.
    #[instrument(skip_all, fields(operation = request.operation_name.as_deref().unwrap_or_default()))]
    pub async fn mutate(
        &self,
        request: GraphqlRequest,
        context: &OperationContext,
    ) -> Result<GraphqlResponse> {
        let prepared = self.injector.prepare(request, false);
        let builder = self.request(&prepared).json(&prepared.request);
        self.execute(prepared, builder, context).await
    }

    /// Run a mutation with files, sent as a multipart request.
    #[instrument(skip_all, fields(operation = request.operation_name.as_deref().unwrap_or_default(), files = uploads.len()))]
    pub async fn upload(
        &self,
        request: GraphqlRequest,
        uploads: Vec<Upload>,
        context: &OperationContext,
    ) -> Result<GraphqlResponse> {
        if uploads.is_empty() {
            return self.mutate(request, context).await;
        }

        let prepared = self.injector.prepare(request, true);
        let form = multipart::encode(&prepared.request, uploads)?;
        let builder = self.request(&prepared).multipart(form);
        self.execute(prepared, builder, context).await
    }

    async fn fetch_and_cache(
        &self,
        prepared: PreparedRequest,
        context: &OperationContext,
    ) -> Result<GraphqlResponse> {
        let builder = self.request(&prepared).json(&prepared.request);
        let cache_request = prepared.request.clone();

        let response = self.execute(prepared, builder, context).await?;

        if !response.has_errors() {
            if let Some(data) = &response.data {
                if let Err(e) = self.cache.put(&cache_request, data.clone()) {
                    warn!(error = %e, "failed to persist response cache");
                }
            }
        }

        Ok(response)
    }

    fn request(&self, prepared: &PreparedRequest) -> RequestBuilder {
        prepared
            .headers
            .iter()
            .fold(self.http.request(Method::POST, &self.endpoint), |builder, (name, value)| {
                builder.header(*name, value)
            })
    }

    async fn execute(
        &self,
        prepared: PreparedRequest,
        builder: RequestBuilder,
        context: &OperationContext,
    ) -> Result<GraphqlResponse> {
        let response = self.http.send(builder).await?;
        let status = response.status();
        let body = self.http.read_body(response).await?;

        let parsed = serde_json::from_slice::<GraphqlResponse>(&body);
        if !status.is_success() && !parsed.as_ref().is_ok_and(GraphqlResponse::has_errors) {
            return Err(LagoError::Http {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        let parsed =
            parsed.map_err(|e| LagoError::Decode(format!("invalid GraphQL response: {e}")))?;

        if parsed.has_errors() {
            let report = self.guard.inspect(
                prepared.request.operation_name.as_deref(),
                &prepared.request.variables,
                context,
                &parsed.errors,
            );
            debug!(
                errors = parsed.errors.len(),
                reported = report.reported,
                logged_out = report.logged_out,
                "guard inspected response"
            );
        }

        Ok(parsed)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| LagoError::Config(format!("invalid header value '{value}': {e}")))
}

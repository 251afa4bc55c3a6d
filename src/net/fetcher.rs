use std::error::Error as _;
use std::fmt;
use std::sync::Arc;

use http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::HeaderMap;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::FetcherConfig;
use crate::credentials::{CredentialSource, StorageCredential};
use crate::errors::{FetchError, FetchErrorKind};
use crate::net::{FetchRequest, HttpRequest, JsonResponse, Method, ReqwestTransport, Transport};
use crate::storage::StorageArea;

/// JSON client over a [`Transport`].
///
/// Every call attaches `Content-Type: application/json`, adds
/// `Authorization: Bearer <token>` when the credential source has a token,
/// serializes the payload (if any) and parses the reply as JSON.
///
/// Replies with a non-2xx status are **not** errors: the parsed body is
/// returned and a warning is logged. Use [`Fetcher::send`] when the status
/// matters to the caller.
pub struct Fetcher<T: Transport = ReqwestTransport> {
    config: FetcherConfig,
    transport: T,
    credentials: Option<Arc<dyn CredentialSource>>,
}

impl<T: Transport + fmt::Debug> fmt::Debug for Fetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("authenticated", &self.credentials.is_some())
            .finish()
    }
}

impl Fetcher<ReqwestTransport> {
    /// Creates a fetcher on a fresh reqwest client, without credentials.
    pub fn new(config: FetcherConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Entry point to start building a fetcher.
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::default()
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(config: FetcherConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url`
    pub async fn get(&self, url: &str) -> Result<Value, FetchError> {
        self.dispatch(FetchRequest::new(url, Method::Get)).await
    }

    /// POST `data` as JSON to `url`
    pub async fn post<D: Serialize + ?Sized>(&self, url: &str, data: &D) -> Result<Value, FetchError> {
        self.dispatch_with_data(url, Method::Post, data).await
    }

    /// PUT `data` as JSON to `url`
    pub async fn put<D: Serialize + ?Sized>(&self, url: &str, data: &D) -> Result<Value, FetchError> {
        self.dispatch_with_data(url, Method::Put, data).await
    }

    /// DELETE `url`
    pub async fn delete(&self, url: &str) -> Result<Value, FetchError> {
        self.dispatch(FetchRequest::new(url, Method::Delete)).await
    }

    /// Performs the request and returns the parsed body, whatever the status.
    pub async fn dispatch(&self, request: FetchRequest) -> Result<Value, FetchError> {
        let method = request.method;
        let url = request.url.clone();

        let response = self.send(request).await?;
        if !response.is_success() {
            log::warn!("Bad response: {} {} returned status {}", method, url, response.status);
        }

        Ok(response.body)
    }

    /// Performs the request and returns the status together with the parsed body.
    ///
    /// Failures are logged here, once, with their full cause.
    pub async fn send(&self, request: FetchRequest) -> Result<JsonResponse, FetchError> {
        log::debug!("{} {}", request.method, request.url);

        self.attempt(&request).await.map_err(|err| {
            log_failure(&err);
            err
        })
    }

    /// Builds the outgoing request: resolved URL, headers and optional JSON body.
    pub fn build_request(&self, request: &FetchRequest) -> Result<HttpRequest, FetchError> {
        let fail = |kind, cause: crate::errors::BoxError| FetchError::new(kind, request.method, &request.url, cause);

        let url: Url = self
            .config
            .resolve_url(&request.url)
            .map_err(|e| fail(FetchErrorKind::Other, e.into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.credentials.as_ref().and_then(|c| c.bearer_token()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| fail(FetchErrorKind::Other, e.into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let body = match request.body_data() {
            Some(data) => Some(serde_json::to_vec(data).map_err(|e| fail(FetchErrorKind::Encode, e.into()))?),
            None => None,
        };

        Ok(HttpRequest {
            url,
            method: request.method,
            headers,
            body,
        })
    }

    async fn attempt(&self, request: &FetchRequest) -> Result<JsonResponse, FetchError> {
        let http_request = self.build_request(request)?;

        let response = self
            .transport
            .send(http_request)
            .await
            .map_err(|e| FetchError::new(FetchErrorKind::Transport, request.method, &request.url, e))?;

        let body = response
            .json()
            .map_err(|e| FetchError::new(FetchErrorKind::Decode, request.method, &request.url, e))?;

        Ok(JsonResponse {
            status: response.status,
            body,
        })
    }

    async fn dispatch_with_data<D: Serialize + ?Sized>(
        &self,
        url: &str,
        method: Method,
        data: &D,
    ) -> Result<Value, FetchError> {
        let data = serde_json::to_value(data).map_err(|e| {
            let err = FetchError::new(FetchErrorKind::Encode, method, url, e);
            log_failure(&err);
            err
        })?;

        self.dispatch(FetchRequest::new(url, method).with_data(data)).await
    }
}

fn log_failure(err: &FetchError) {
    let mut cause = String::new();
    let mut source = err.source();
    while let Some(e) = source {
        if !cause.is_empty() {
            cause.push_str(": ");
        }
        cause.push_str(&e.to_string());
        source = e.source();
    }

    log::error!("Bad fetcher call - {} {} failed: {}", err.method(), err.url(), cause);
}

/// Builder for a [`Fetcher`] on top of reqwest.
#[derive(Default)]
pub struct FetcherBuilder {
    config: FetcherConfig,
    credentials: Option<Arc<dyn CredentialSource>>,
    local_storage: Option<Arc<dyn StorageArea>>,
}

impl FetcherBuilder {
    pub fn config(mut self, cfg: FetcherConfig) -> Self {
        self.config = cfg;
        self
    }

    pub fn base_url(mut self, url: Url) -> Self {
        self.config.base_url = Some(url);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Key under which the token is looked up in local storage
    pub fn credential_key(mut self, key: impl Into<String>) -> Self {
        self.config.credential_key = key.into();
        self
    }

    /// Reads the bearer token from `area` under the configured credential key.
    pub fn local_storage(mut self, area: Arc<dyn StorageArea>) -> Self {
        self.local_storage = Some(area);
        self
    }

    /// Uses an explicit credential source. Takes precedence over [`local_storage`](Self::local_storage).
    pub fn credentials(mut self, source: Arc<dyn CredentialSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    pub fn build(self) -> anyhow::Result<Fetcher<ReqwestTransport>> {
        let transport = ReqwestTransport::new(&self.config)?;
        Ok(self.build_with_transport(transport))
    }

    pub fn build_with_transport<T: Transport>(self, transport: T) -> Fetcher<T> {
        let credentials = self.credentials.or_else(|| {
            let key = self.config.credential_key.clone();
            self.local_storage
                .map(|area| Arc::new(StorageCredential::new(area, key)) as Arc<dyn CredentialSource>)
        });

        Fetcher {
            config: self.config,
            transport,
            credentials,
        }
    }
}

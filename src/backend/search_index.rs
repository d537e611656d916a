// Search-index sink: ships every event as a JSON document to an
// Elasticsearch-compatible HTTP API.
use super::{Backend, EventDocument};
use crate::domain::{LogEvent, LogLevel, SetupError};
use crate::filter::DropFilter;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// How to reach the search service.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Base URLs of the cluster; the first one is used.
    pub addresses: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Accept invalid TLS certificates
    pub insecure_skip_verify: bool,
    /// Per-request timeout of the HTTP client
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            addresses: vec!["http://localhost:9200".to_string()],
            username: None,
            password: None,
            insecure_skip_verify: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("addresses", &self.addresses)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchIndexConfig {
    pub min_level: LogLevel,
    pub connection: ConnectionConfig,
    /// Index the documents are written to
    pub index: String,
    /// Index mapping; when set the index is created on setup if it is missing
    pub mapping: Option<String>,
    pub drop_patterns: Vec<Option<String>>,
}

/// State that only exists once `initialize` succeeded.
struct Connected {
    client: Client,
    base_url: String,
}

pub struct SearchIndexBackend {
    config: SearchIndexConfig,
    filter: DropFilter,
    connected: Option<Connected>,
}

impl SearchIndexBackend {
    pub fn new(config: SearchIndexConfig) -> Self {
        Self {
            config,
            filter: DropFilter::empty(),
            connected: None,
        }
    }

    pub fn config(&self) -> &SearchIndexConfig {
        &self.config
    }

    fn base_url(&self) -> Result<String, SetupError> {
        let address = self.config.connection.addresses.first().ok_or_else(|| {
            SetupError::InvalidConfig("At least one search-index address is required".to_string())
        })?;

        Url::parse(address).map_err(|e| {
            SetupError::InvalidConfig(format!("Invalid search-index address '{address}': {e}"))
        })?;

        Ok(address.trim_end_matches('/').to_string())
    }

    fn build_client(&self) -> Result<Client, SetupError> {
        let mut builder = Client::builder().timeout(self.config.connection.timeout);
        if self.config.connection.insecure_skip_verify {
            warn!("TLS certificate verification disabled for search-index backend");
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder.build().map_err(SetupError::Client)
    }

    fn request(&self, client: &Client, method: Method, url: &str) -> RequestBuilder {
        let request = client.request(method, url);
        match &self.config.connection.username {
            Some(username) => request.basic_auth(username, self.config.connection.password.as_ref()),
            None => request,
        }
    }

    /// Create the index with the configured mapping unless it already exists.
    async fn ensure_index(&self, connected: &Connected, mapping: &str) -> Result<(), SetupError> {
        let index = &self.config.index;
        let url = format!("{}/{}", connected.base_url, index);

        let exists = self
            .request(&connected.client, Method::HEAD, &url)
            .send()
            .await
            .map_err(|e| SetupError::Request {
                url: url.clone(),
                source: e,
            })?;

        match exists.status() {
            status if status.is_success() => {
                debug!("Search index '{index}' already exists");
                return Ok(());
            }
            StatusCode::NOT_FOUND => {}
            status => {
                return Err(SetupError::IndexCheck {
                    index: index.clone(),
                    status: status.as_u16(),
                });
            }
        }

        let created = self
            .request(&connected.client, Method::PUT, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(mapping.to_string())
            .send()
            .await
            .map_err(|e| SetupError::Request {
                url: url.clone(),
                source: e,
            })?;

        let status = created.status();
        if status.is_success() {
            info!("Created search index '{index}'");
            return Ok(());
        }

        let body = created.text().await.unwrap_or_default();
        // Another process created it between our check and create.
        if status == StatusCode::BAD_REQUEST && body.contains(ALREADY_EXISTS) {
            return Ok(());
        }

        Err(SetupError::IndexCreation {
            index: index.clone(),
            status: status.as_u16(),
            body,
        })
    }

    async fn setup(&mut self) -> Result<(), SetupError> {
        if self.config.index.trim().is_empty() {
            return Err(SetupError::InvalidConfig(
                "Search index name cannot be empty".to_string(),
            ));
        }

        self.filter = DropFilter::compile(self.config.drop_patterns.iter().map(Option::as_deref))?;

        let connected = Connected {
            client: self.build_client()?,
            base_url: self.base_url()?,
        };

        // Without a mapping the index is expected to exist already.
        if let Some(mapping) = &self.config.mapping {
            self.ensure_index(&connected, mapping).await?;
        }

        self.connected = Some(connected);
        Ok(())
    }

    async fn send(&self, event: &LogEvent) {
        if !event.level.is_enabled_for(self.config.min_level) {
            return;
        }
        if self.filter.should_drop(&event.group, &event.message) {
            return;
        }

        let Some(connected) = &self.connected else {
            error!("Search-index backend used before initialization, dropping event");
            return;
        };

        let url = format!("{}/{}/_doc", connected.base_url, self.config.index);
        let document = EventDocument::now(event);

        match self
            .request(&connected.client, Method::POST, &url)
            .json(&document)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!("Failed to index log document: {status} - {body}");
            }
            Err(e) => error!("Failed to send log document to {url}: {e}"),
        }
    }
}

impl Backend for SearchIndexBackend {
    fn initialize(&mut self) -> Pin<Box<dyn Future<Output = Result<(), SetupError>> + Send + '_>> {
        Box::pin(self.setup())
    }

    fn log<'a>(&'a self, event: &'a LogEvent) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(self.send(event))
    }
}

//! Remote collaborators of the generation pipeline.
//!
//! [`RemoteClient`] is the seam between the orchestrator and the backend;
//! [`HttpClient`] is the reqwest implementation talking to the store API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::{Config, DEFAULT_TIMEOUT_SECS};
use crate::ledger::StepName;
use crate::types::{GenerateOptions, GeneratedContent, ProductInfo};
use crate::{Error, Result};

const SCRAPE_PATH: &str = "/api/scrape";
const GENERATE_PATH: &str = "/api/generate";

/// Single-shot calls backing the remote pipeline stages.
///
/// Implementations hold no per-run state and never retry internally. Errors
/// should carry the stage that produced them ([`Error::Remote`] or
/// [`Error::Timeout`]); anything else is attributed to the running stage by
/// the orchestrator.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Scrape product data from a marketplace URL.
    async fn analyze(&self, url: &str) -> Result<ProductInfo>;

    /// Generate store content for a scraped product.
    async fn enrich(
        &self,
        product: &ProductInfo,
        options: &GenerateOptions,
    ) -> Result<GeneratedContent>;

    /// Package the store theme.
    async fn build_theme(&self) -> Result<()>;
}

/// Successful response envelope: `{"data": ...}`.
#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    product_data: &'a ProductInfo,
    options: &'a GenerateOptions,
}

/// HTTP client for the store API.
pub struct HttpClient {
    client: Client,
    base_url: String,
    build_delay: Duration,
}

impl HttpClient {
    /// Creates a client for `base_url` with the default request timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed =
            url::Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "{base_url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nova/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            build_delay: Duration::ZERO,
        })
    }

    /// Creates a client from resolved configuration (base URL, timeout and
    /// build delay).
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.api.resolved_base_url()?;
        Ok(Self::with_timeout(&base_url, config.api.timeout())?
            .with_build_delay(config.timing.build_delay()))
    }

    /// Set how long the build stage takes.
    #[must_use]
    pub const fn with_build_delay(mut self, delay: Duration) -> Self {
        self.build_delay = delay;
        self
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, stage: StepName, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        debug!("POST {} ({} stage)", url, stage);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(stage, &e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("{} returned {}", url, status);
            return Err(Error::Remote {
                stage,
                reason: format!("HTTP {status}"),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| request_error(stage, &e))?;

        serde_json::from_slice::<Envelope<T>>(&bytes)
            .map(|envelope| envelope.data)
            .map_err(|e| Error::Remote {
                stage,
                reason: format!("Malformed response body: {e}"),
            })
    }
}

fn request_error(stage: StepName, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout { stage }
    } else {
        Error::Remote {
            stage,
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl RemoteClient for HttpClient {
    async fn analyze(&self, url: &str) -> Result<ProductInfo> {
        let product: ProductInfo = self
            .post(StepName::Analyze, SCRAPE_PATH, &ScrapeRequest { url })
            .await?;
        info!("Scraped '{}' ({} images)", product.title, product.images.len());
        Ok(product)
    }

    async fn enrich(
        &self,
        product: &ProductInfo,
        options: &GenerateOptions,
    ) -> Result<GeneratedContent> {
        let request = GenerateRequest {
            product_data: product,
            options,
        };
        self.post(StepName::Enrich, GENERATE_PATH, &request).await
    }

    async fn build_theme(&self) -> Result<()> {
        tokio::time::sleep(self.build_delay).await;
        Ok(())
    }
}

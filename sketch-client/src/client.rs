//! HTTP client for the diagram service.
//!
//! Every POST endpoint answers with an envelope
//! `{ "success": bool, "data": object|null, "error": string|null }`; the
//! styles listing is returned bare. HTTP 503 means no AI backend is
//! configured on the service side.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::config::{ClientConfig, RetryConfig};
use crate::error::{DiagramError, DiagramResult};

/// Default journal style.
pub const DEFAULT_STYLE: &str = "nature";

/// Default diagram type for text-only generation.
pub const DEFAULT_DIAGRAM_TYPE: &str = "flowchart";

const STYLES_PATH: &str = "api/diagram/styles";
const REFINE_PATH: &str = "api/diagram/refine";
const GENERATE_PATH: &str = "api/diagram/generate";
const ITERATE_PATH: &str = "api/diagram/iterate";
const TIKZ_PATH: &str = "api/diagram/svg-to-tikz";

/// Name and blurb of a journal style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleInfo {
    /// Display name, e.g. `Nature`.
    pub name: String,
    /// Short description.
    pub description: String,
}

/// Styles and diagram types the service offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCatalog {
    /// Style id to style info.
    pub styles: BTreeMap<String, StyleInfo>,
    /// Diagram type id to label.
    pub diagram_types: BTreeMap<String, String>,
}

/// Turn a hand sketch into a polished diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineRequest {
    /// SVG export of the sketch.
    pub sketch_svg: String,
    /// What the diagram should show.
    pub description: String,
    /// Journal style id.
    pub style: String,
    /// Optional paper context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Earlier conversation turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_iterations: Option<Vec<String>>,
}

/// Generate a diagram from a description only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// What the diagram should show.
    pub description: String,
    /// Journal style id.
    pub style: String,
    /// Diagram type id.
    pub diagram_type: String,
    /// Optional paper context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Revise an existing diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterateRequest {
    /// The diagram to revise.
    pub current_svg: String,
    /// Requested changes.
    pub feedback: String,
    /// Journal style id.
    pub style: String,
}

/// Convert an SVG diagram to TikZ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TikzRequest {
    /// SVG source.
    pub svg: String,
    /// Optional hint about the diagram's content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Result of [`DiagramClient::refine`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefinedDiagram {
    /// The refined SVG.
    pub refined_svg: String,
    /// Style id used.
    pub style: String,
    /// Style display name.
    pub style_name: String,
}

/// Result of [`DiagramClient::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedDiagram {
    /// The generated SVG.
    pub svg: String,
    /// Style id used.
    pub style: String,
    /// Style display name.
    pub style_name: String,
    /// Diagram type id used.
    pub diagram_type: String,
}

/// Result of [`DiagramClient::iterate`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IteratedDiagram {
    /// The revised SVG.
    pub svg: String,
    /// Style id used.
    pub style: String,
    /// The feedback the revision addressed.
    pub feedback_addressed: String,
}

#[derive(Debug, Deserialize)]
struct TikzData {
    tikz: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl Envelope {
    fn open<T: DeserializeOwned>(self, operation: &str) -> DiagramResult<T> {
        if !self.success {
            return Err(DiagramError::Remote(
                self.error.unwrap_or_else(|| format!("{operation} failed")),
            ));
        }
        let data = self
            .data
            .ok_or_else(|| DiagramError::UnexpectedResponse(format!("{operation} returned no data")))?;
        Ok(serde_json::from_value(data)?)
    }
}

/// Asynchronous diagram service client.
#[derive(Clone)]
pub struct DiagramClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    base: Url,
    retry_config: RetryConfig,
}

impl DiagramClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::InvalidUrl`] if the URL is malformed.
    /// Returns [`DiagramError::Http`] if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> DiagramResult<Self> {
        let mut base =
            Url::parse(&config.base_url).map_err(|e| DiagramError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(DiagramError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }
        // Relative joins replace the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                base,
                retry_config: config.retry.clone(),
            }),
        })
    }

    /// The normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// List the available journal styles and diagram types.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a
    /// malformed body.
    pub async fn styles(&self) -> DiagramResult<StyleCatalog> {
        let body = self.execute("styles", Method::GET, STYLES_PATH, None).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Refine a sketch.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::NotConfigured`] on HTTP 503,
    /// [`DiagramError::Remote`] when the service reports a failure, and
    /// transport or decoding errors otherwise.
    pub async fn refine(&self, request: &RefineRequest) -> DiagramResult<RefinedDiagram> {
        self.post_enveloped("refine", REFINE_PATH, request).await
    }

    /// Generate a diagram from text.
    ///
    /// # Errors
    ///
    /// See [`DiagramClient::refine`].
    pub async fn generate(&self, request: &GenerateRequest) -> DiagramResult<GeneratedDiagram> {
        self.post_enveloped("generate", GENERATE_PATH, request).await
    }

    /// Revise an existing diagram.
    ///
    /// # Errors
    ///
    /// See [`DiagramClient::refine`].
    pub async fn iterate(&self, request: &IterateRequest) -> DiagramResult<IteratedDiagram> {
        self.post_enveloped("iterate", ITERATE_PATH, request).await
    }

    /// Convert SVG to TikZ source.
    ///
    /// # Errors
    ///
    /// See [`DiagramClient::refine`].
    pub async fn svg_to_tikz(&self, request: &TikzRequest) -> DiagramResult<String> {
        let data: TikzData = self.post_enveloped("svg-to-tikz", TIKZ_PATH, request).await?;
        Ok(data.tikz)
    }

    async fn post_enveloped<B, T>(&self, operation: &str, path: &str, body: &B) -> DiagramResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(body)?;
        let bytes = self
            .execute(operation, Method::POST, path, Some(&payload))
            .await?;
        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        envelope.open(operation)
    }

    /// Send a request, retrying transport failures only.
    async fn execute(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> DiagramResult<Vec<u8>> {
        let url = self
            .inner
            .base
            .join(path)
            .map_err(|e| DiagramError::InvalidUrl(e.to_string()))?;
        let config = &self.inner.retry_config;
        let max_attempts = config.max_attempts.max(1);
        let mut attempt = 0;

        let response = loop {
            let mut request = self.inner.http.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => break response,
                Err(e) => {
                    let error = DiagramError::Http(e);
                    if error.is_retryable() && attempt + 1 < max_attempts {
                        let delay = config.delay_for_attempt(attempt);
                        warn!(
                            "Diagram {} failed (attempt {}/{}), retrying in {}ms: {}",
                            operation,
                            attempt + 1,
                            max_attempts,
                            delay,
                            error
                        );
                        tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(error);
                }
            }
        };

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(DiagramError::NotConfigured);
        }
        if !status.is_success() {
            return Err(DiagramError::Status(status.as_u16()));
        }
        tracing::debug!("Diagram {} answered {}", operation, status);
        Ok(response.bytes().await?.to_vec())
    }
}

impl std::fmt::Debug for DiagramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramClient")
            .field("base", &self.inner.base.as_str())
            .field("retry_config", &self.inner.retry_config)
            .finish_non_exhaustive()
    }
}

use crate::{client_utils, AnalysisResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Vision-capable model ids to try, in order of preference.
pub const PREFERRED_MODELS: [&str; 6] = [
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
    "gemini-pro-vision",
    "gemini-pro",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];

/// Used when the catalog cannot be listed at all.
pub const DEFAULT_MODEL: &str = "gemini-pro-vision";

/// The generation capability an analysis model must advertise.
const REQUIRED_METHOD: &str = "generateContent";

/// One entry of the provider model catalog.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    /// Prefixed identifier, e.g. `models/gemini-1.5-flash-latest`.
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

/// Body of the provider model-listing endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelListResponse {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

/// Source of the provider model catalog. The HTTP implementation is the
/// production path; tests substitute their own.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(&self) -> AnalysisResult<ModelListResponse>;
}

/// Fetches the catalog from the provider's model-listing endpoint.
pub struct HttpCatalog {
    base_url: String,
    api_key: String,
    client: Client,
}

impl HttpCatalog {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        }
    }
}

#[async_trait]
impl ModelCatalog for HttpCatalog {
    async fn list_models(&self) -> AnalysisResult<ModelListResponse> {
        let url = format!("{}/models?key={}", self.base_url, self.api_key);
        client_utils::fetch_json(&self.client, &url).await
    }
}

/// Decides which vision model to call, once per resolver lifetime.
///
/// The first call fetches the catalog and caches the choice; every later
/// call reuses it. A model that is later decommissioned is not re-resolved.
/// Callers racing on a cold cache may each fetch the catalog; the last
/// write wins.
pub struct ModelResolver {
    preferred: Vec<String>,
    cached: Mutex<Option<String>>,
}

impl Default for ModelResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::with_preferences(PREFERRED_MODELS.iter().map(|id| (*id).to_string()).collect())
    }

    #[must_use]
    pub fn with_preferences(preferred: Vec<String>) -> Self {
        Self {
            preferred,
            cached: Mutex::new(None),
        }
    }

    /// The model id chosen for this resolver, consulting the catalog on
    /// first use. Listing failures fall back to [`DEFAULT_MODEL`] without
    /// retry, and that fallback is cached like any other resolution.
    pub async fn resolve(&self, catalog: &dyn ModelCatalog) -> String {
        {
            let cached = self.cached.lock().expect("resolver cache poisoned");
            if let Some(model) = cached.as_ref() {
                return model.clone();
            }
        }

        let model = self.select(catalog).await;
        *self.cached.lock().expect("resolver cache poisoned") = Some(model.clone());
        model
    }

    async fn select(&self, catalog: &dyn ModelCatalog) -> String {
        let listing = match catalog.list_models().await {
            Ok(listing) => listing,
            Err(error) => {
                warn!(%error, "failed to list models, using default");
                return DEFAULT_MODEL.to_string();
            }
        };

        for preferred in &self.preferred {
            let found = listing.models.iter().any(|entry| {
                entry.name.trim_start_matches("models/") == preferred && supports_generation(entry)
            });
            if found {
                debug!(model = %preferred, "using preferred vision model");
                return preferred.clone();
            }
        }

        if let Some(entry) = listing.models.iter().find(|entry| supports_generation(entry)) {
            let model = entry.name.trim_start_matches("models/").to_string();
            debug!(model = %model, "using fallback vision model");
            return model;
        }

        warn!("no listed model supports content generation, using default");
        DEFAULT_MODEL.to_string()
    }
}

fn supports_generation(entry: &ModelEntry) -> bool {
    entry
        .supported_generation_methods
        .iter()
        .any(|method| method == REQUIRED_METHOD)
}

use async_trait::async_trait;
use plantguard_sdk::resolver::{
    ModelCatalog, ModelEntry, ModelListResponse, ModelResolver, DEFAULT_MODEL,
};
use plantguard_sdk::{AnalysisError, AnalysisResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Catalog double that tracks how often it is consulted and yields a
/// predefined listing, or an error when none is set.
struct MockCatalog {
    listing: Option<ModelListResponse>,
    calls: AtomicUsize,
}

impl MockCatalog {
    fn listing(models: Vec<ModelEntry>) -> Self {
        Self {
            listing: Some(ModelListResponse { models }),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            listing: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelCatalog for MockCatalog {
    async fn list_models(&self) -> AnalysisResult<ModelListResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.listing
            .clone()
            .ok_or_else(|| AnalysisError::Invariant("mock", "listing failed".to_string()))
    }
}

fn entry(name: &str, methods: &[&str]) -> ModelEntry {
    ModelEntry {
        name: name.to_string(),
        supported_generation_methods: methods.iter().map(|m| (*m).to_string()).collect(),
    }
}

#[tokio::test]
async fn picks_the_first_preferred_model_that_generates_content() {
    let catalog = MockCatalog::listing(vec![
        entry("models/gemini-1.5-pro-latest", &["generateContent"]),
        entry("models/gemini-1.5-flash-latest", &["generateContent"]),
    ]);
    let resolver = ModelResolver::new();

    assert_eq!(resolver.resolve(&catalog).await, "gemini-1.5-flash-latest");
}

#[tokio::test]
async fn skips_preferred_models_without_the_capability() {
    let catalog = MockCatalog::listing(vec![
        entry("models/gemini-1.5-flash-latest", &["countTokens"]),
        entry("models/gemini-1.5-pro-latest", &["generateContent"]),
    ]);
    let resolver = ModelResolver::new();

    assert_eq!(resolver.resolve(&catalog).await, "gemini-1.5-pro-latest");
}

#[tokio::test]
async fn unlisted_preferences_fall_back_to_the_first_capable_model() {
    let catalog = MockCatalog::listing(vec![
        entry("models/experimental-embedding", &["embedContent"]),
        entry("models/experimental-vision-9000", &["generateContent"]),
    ]);
    let resolver = ModelResolver::new();

    assert_eq!(resolver.resolve(&catalog).await, "experimental-vision-9000");
}

#[tokio::test]
async fn no_capable_model_resolves_to_the_default() {
    let catalog = MockCatalog::listing(vec![entry("models/embedder", &["embedContent"])]);
    let resolver = ModelResolver::new();

    assert_eq!(resolver.resolve(&catalog).await, DEFAULT_MODEL);
}

#[tokio::test]
async fn listing_failure_resolves_to_the_default_without_retry() {
    let catalog = MockCatalog::failing();
    let resolver = ModelResolver::new();

    assert_eq!(resolver.resolve(&catalog).await, DEFAULT_MODEL);
    assert_eq!(resolver.resolve(&catalog).await, DEFAULT_MODEL);
    // The failed resolution is cached, not re-attempted.
    assert_eq!(catalog.call_count(), 1);
}

#[tokio::test]
async fn resolution_is_cached_for_the_resolver_lifetime() {
    let catalog = MockCatalog::listing(vec![entry(
        "models/gemini-1.5-flash-latest",
        &["generateContent"],
    )]);
    let resolver = ModelResolver::new();

    assert_eq!(resolver.resolve(&catalog).await, "gemini-1.5-flash-latest");
    assert_eq!(resolver.resolve(&catalog).await, "gemini-1.5-flash-latest");
    assert_eq!(catalog.call_count(), 1);
}

#[tokio::test]
async fn custom_preference_lists_are_honored() {
    let catalog = MockCatalog::listing(vec![
        entry("models/alpha", &["generateContent"]),
        entry("models/beta", &["generateContent"]),
    ]);
    let resolver = ModelResolver::with_preferences(vec!["beta".to_string()]);

    assert_eq!(resolver.resolve(&catalog).await, "beta");
}

use super::api::{
    Blob, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    SafetySetting,
};
use crate::{
    client_utils, normalizer,
    resolver::{HttpCatalog, ModelResolver},
    AnalysisError, AnalysisResult, DiagnosisRecord, ImageData,
};
use reqwest::{header::HeaderMap, Client};
use tracing::debug;

const PROVIDER: &str = "google";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Deterministic-leaning sampling with a bounded output length.
const TEMPERATURE: f64 = 0.4;
const TOP_K: i32 = 32;
const TOP_P: f64 = 1.0;
const MAX_OUTPUT_TOKENS: i32 = 2048;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

const DIAGNOSIS_PROMPT: &str = r#"You are an expert plant pathologist. Analyze this plant image and provide a detailed diagnosis.

Please provide your response in the following JSON format:
{
  "disease": "Name of the disease or 'Healthy' if no disease detected",
  "confidence": number between 0-100,
  "severity": "Low" or "Medium" or "High",
  "description": "Detailed description of the condition, symptoms, and causes",
  "treatment": ["Step 1", "Step 2", "Step 3", "Step 4"]
}

Focus on:
1. Identifying any visible diseases, pests, or nutritional deficiencies
2. Assessing the severity level
3. Providing actionable treatment recommendations
4. Being specific about the condition

If the plant appears healthy, indicate that in the diagnosis."#;

/// Client for the plant-analysis flow: resolves a vision-capable model,
/// sends the image with the fixed diagnostic prompt, and normalizes the
/// free-text answer into a [`DiagnosisRecord`].
pub struct VisionModel {
    api_key: String,
    base_url: String,
    client: Client,
    resolver: ModelResolver,
    catalog: HttpCatalog,
}

#[derive(Clone, Default)]
pub struct VisionModelOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub client: Option<Client>,
}

impl VisionModel {
    #[must_use]
    pub fn new(options: VisionModelOptions) -> Self {
        let VisionModelOptions {
            api_key,
            base_url,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let catalog = HttpCatalog::new(base_url.clone(), api_key.clone(), client.clone());

        Self {
            api_key,
            base_url,
            client,
            resolver: ModelResolver::new(),
            catalog,
        }
    }

    /// Analyze a plant image supplied as a base64 data URL.
    ///
    /// Exactly one generate request is issued per call, preceded by at most
    /// one catalog fetch for the lifetime of this client. Failures are not
    /// retried.
    pub async fn analyze(&self, image_data_url: &str) -> AnalysisResult<DiagnosisRecord> {
        if self.api_key.is_empty() || self.api_key == PLACEHOLDER_API_KEY {
            return Err(AnalysisError::Configuration(
                "API key not configured. Set GEMINI_API_KEY in the environment; get a key from https://makersuite.google.com/app/apikey".to_string(),
            ));
        }

        let image = ImageData::from_data_url(image_data_url)?;
        let model = self.resolver.resolve(&self.catalog).await;

        let request = build_generate_request(image);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        debug!(%model, "sending plant analysis request");
        let response: GenerateContentResponse =
            client_utils::send_json(&self.client, &url, &request, HeaderMap::new()).await?;

        let answer = extract_response_text(response)?;
        Ok(normalizer::normalize(&answer))
    }
}

fn build_generate_request(image: ImageData) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: Some(vec![
                Part {
                    text: Some(DIAGNOSIS_PROMPT.to_string()),
                    ..Default::default()
                },
                Part {
                    inline_data: Some(Blob {
                        mime_type: Some(image.mime_type),
                        data: Some(image.data),
                    }),
                    ..Default::default()
                },
            ]),
            role: None,
        }],
        generation_config: Some(GenerationConfig {
            temperature: Some(TEMPERATURE),
            top_k: Some(TOP_K),
            top_p: Some(TOP_P),
            max_output_tokens: Some(MAX_OUTPUT_TOKENS),
        }),
        safety_settings: Some(
            SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: (*category).to_string(),
                    threshold: SAFETY_THRESHOLD.to_string(),
                })
                .collect(),
        ),
    }
}

fn extract_response_text(response: GenerateContentResponse) -> AnalysisResult<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|parts| parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| {
            AnalysisError::Invariant(PROVIDER, "no text candidate in response".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_prompt_image_and_fixed_parameters() {
        let image = ImageData {
            mime_type: "image/jpeg".to_string(),
            data: "aGVsbG8=".to_string(),
        };
        let body = serde_json::to_value(build_generate_request(image)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert!(parts[0]["text"]
            .as_str()
            .unwrap()
            .starts_with("You are an expert plant pathologist."));
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "aGVsbG8=");

        assert_eq!(body["generationConfig"]["temperature"], json!(0.4));
        assert_eq!(body["generationConfig"]["topK"], json!(32));
        assert_eq!(body["generationConfig"]["topP"], json!(1.0));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], json!(2048));

        let safety = body["safetySettings"].as_array().unwrap();
        assert_eq!(safety.len(), 4);
        assert!(safety
            .iter()
            .all(|setting| setting["threshold"] == "BLOCK_MEDIUM_AND_ABOVE"));
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Leaf spot diagnosis"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_response_text(response).unwrap(), "Leaf spot diagnosis");
    }

    #[test]
    fn missing_candidate_text_is_an_invariant_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": []})).unwrap();
        let error = extract_response_text(response).unwrap_err();
        assert!(matches!(error, AnalysisError::Invariant("google", _)));
        assert!(error.is_remote());
    }

    #[tokio::test]
    async fn analyze_without_api_key_is_a_configuration_error() {
        let model = VisionModel::new(VisionModelOptions::default());
        let error = model
            .analyze("data:image/jpeg;base64,aGVsbG8=")
            .await
            .unwrap_err();
        assert!(matches!(error, AnalysisError::Configuration(_)));
        assert!(!error.is_remote());
    }

    #[tokio::test]
    async fn analyze_rejects_malformed_data_url_before_any_request() {
        let model = VisionModel::new(VisionModelOptions {
            api_key: "test-key".to_string(),
            ..Default::default()
        });
        let error = model.analyze("plain text, no header").await.unwrap_err();
        assert!(matches!(error, AnalysisError::InvalidInput(_)));
    }
}

use crate::{AnalysisError, AnalysisResult};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};

/// An image payload extracted from a `data:` URL, ready to inline into a
/// generate-content request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// The IANA MIME type declared in the data-URL header.
    pub mime_type: String,
    /// Base64-encoded bytes, without the data-URL prefix.
    pub data: String,
}

impl ImageData {
    /// Split a `data:<mime>;base64,<payload>` URL into its MIME type and
    /// payload. The payload must decode as base64.
    pub fn from_data_url(data_url: &str) -> AnalysisResult<Self> {
        let (header, payload) = data_url
            .split_once(',')
            .ok_or_else(|| AnalysisError::InvalidInput("expected a base64 data URL".to_string()))?;

        let mime_type = header
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|mime| !mime.is_empty())
            .ok_or_else(|| {
                AnalysisError::InvalidInput(format!("missing MIME type in data URL header '{header}'"))
            })?;

        BASE64_STANDARD.decode(payload).map_err(|error| {
            AnalysisError::InvalidInput(format!("image payload is not valid base64: {error}"))
        })?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }
}

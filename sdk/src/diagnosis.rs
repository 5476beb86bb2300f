use serde::{Deserialize, Serialize};

/// Reported intensity of a diagnosed condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

/// The normalized output of a plant-image analysis.
///
/// Every field is always populated: when the model output carries no signal
/// for a field, the documented default is substituted instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    /// Short label for the identified disease, or [`UNKNOWN_DISEASE`].
    pub disease: String,
    /// Percentage in `0..=100`.
    pub confidence: u8,
    pub severity: Severity,
    pub description: String,
    /// Between one and five actionable steps.
    pub treatment: Vec<String>,
}

/// Sentinel disease label used when the model output names none.
pub const UNKNOWN_DISEASE: &str = "Unknown Disease";

/// Confidence substituted when the model output carries no usable figure.
pub const DEFAULT_CONFIDENCE: u8 = 85;

/// Description substituted when the model output carries none.
pub const DEFAULT_DESCRIPTION: &str = "Unable to determine disease details.";

/// Treatment steps substituted when none could be extracted.
pub const GENERIC_TREATMENT: [&str; 3] = [
    "Ensure proper watering and drainage",
    "Monitor plant health regularly",
    "Consult a local plant specialist",
];

/// Upper bound on the number of treatment steps in a record.
pub const MAX_TREATMENT_STEPS: usize = 5;

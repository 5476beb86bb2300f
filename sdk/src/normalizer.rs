use crate::diagnosis::{
    DiagnosisRecord, Severity, DEFAULT_CONFIDENCE, DEFAULT_DESCRIPTION, GENERIC_TREATMENT,
    MAX_TREATMENT_STEPS, UNKNOWN_DISEASE,
};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

/// Fields recovered by the extraction strategies. `None` means no strategy
/// found a signal; the merge step substitutes the documented default.
#[derive(Debug, Default)]
struct PartialDiagnosis {
    disease: Option<String>,
    confidence: Option<f64>,
    severity: Option<Severity>,
    description: Option<String>,
    treatment: Option<Vec<String>>,
}

/// Convert raw model output into a complete [`DiagnosisRecord`].
///
/// The upstream model's output format is not contractually guaranteed, so
/// this degrades through progressively cruder extraction strategies and
/// never fails: a brace-delimited JSON object is read directly; free text
/// goes through labeled-section heuristics; anything else yields the fixed
/// completion record.
#[must_use]
pub fn normalize(raw_text: &str) -> DiagnosisRecord {
    match find_json_object(raw_text) {
        Some(candidate) => match serde_json::from_str::<Value>(candidate) {
            Ok(value) => merge(from_json(&value)),
            Err(error) => {
                warn!(%error, "model response contained unparseable JSON");
                completion_record(raw_text)
            }
        },
        None => merge(from_heuristics(raw_text)),
    }
}

/// The first brace-delimited substring, spanning the first `{` through the
/// last `}`.
fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn from_json(value: &Value) -> PartialDiagnosis {
    PartialDiagnosis {
        disease: non_empty_string(value.get("disease")),
        confidence: value.get("confidence").and_then(Value::as_f64),
        severity: value
            .get("severity")
            .and_then(Value::as_str)
            .and_then(parse_severity),
        description: non_empty_string(value.get("description")),
        treatment: value
            .get("treatment")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|step| !step.trim().is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|steps| !steps.is_empty()),
    }
}

fn from_heuristics(raw_text: &str) -> PartialDiagnosis {
    PartialDiagnosis {
        disease: extract_disease(raw_text),
        confidence: None,
        severity: extract_severity(raw_text),
        description: extract_description(raw_text),
        treatment: extract_treatment(raw_text),
    }
}

fn merge(partial: PartialDiagnosis) -> DiagnosisRecord {
    let mut treatment = partial
        .treatment
        .unwrap_or_else(|| GENERIC_TREATMENT.iter().map(|step| (*step).to_string()).collect());
    if treatment.is_empty() {
        treatment = GENERIC_TREATMENT.iter().map(|step| (*step).to_string()).collect();
    }
    treatment.truncate(MAX_TREATMENT_STEPS);

    DiagnosisRecord {
        disease: partial
            .disease
            .unwrap_or_else(|| UNKNOWN_DISEASE.to_string()),
        confidence: clamp_confidence(partial.confidence),
        severity: partial.severity.unwrap_or_default(),
        description: partial
            .description
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        treatment,
    }
}

/// Record returned when the response looked structured but could not be
/// read at all.
fn completion_record(raw_text: &str) -> DiagnosisRecord {
    DiagnosisRecord {
        disease: "Analysis Completed".to_string(),
        confidence: 80,
        severity: Severity::Medium,
        description: raw_text.chars().take(200).collect(),
        treatment: vec![
            "Review the full analysis".to_string(),
            "Consult with a plant expert if symptoms persist".to_string(),
        ],
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_confidence(value: Option<f64>) -> u8 {
    value.map_or(DEFAULT_CONFIDENCE, |figure| {
        figure.clamp(0.0, 100.0).round() as u8
    })
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

fn parse_severity(text: &str) -> Option<Severity> {
    match text.trim().to_ascii_lowercase().as_str() {
        "low" => Some(Severity::Low),
        "medium" => Some(Severity::Medium),
        "high" => Some(Severity::High),
        _ => None,
    }
}

fn extract_disease(raw_text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)(?:disease|condition|problem)[:\s]+([^\n.]+)")
            .expect("disease pattern compiles")
    });
    re.captures(raw_text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// High keywords are checked before Low, so a text naming both classes
/// resolves to High.
fn extract_severity(raw_text: &str) -> Option<Severity> {
    static HIGH: OnceLock<Regex> = OnceLock::new();
    static LOW: OnceLock<Regex> = OnceLock::new();
    let high = HIGH.get_or_init(|| {
        Regex::new(r"(?i)\b(?:severe|high|critical)\b").expect("severity pattern compiles")
    });
    let low = LOW.get_or_init(|| {
        Regex::new(r"(?i)\b(?:mild|low|minor)\b").expect("severity pattern compiles")
    });
    if high.is_match(raw_text) {
        Some(Severity::High)
    } else if low.is_match(raw_text) {
        Some(Severity::Low)
    } else {
        None
    }
}

fn extract_description(raw_text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)(?:description|about|appears)[:\s]+([^\n]+(?:\n[^\n]+)*?)(?:\n\n|treatment|recommendation)")
            .expect("description pattern compiles")
    });
    re.captures(raw_text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|text| !text.is_empty())
        .or_else(|| {
            let leading = raw_text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .take(2)
                .collect::<Vec<_>>()
                .join(" ");
            (!leading.is_empty()).then_some(leading)
        })
}

fn extract_treatment(raw_text: &str) -> Option<Vec<String>> {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    static SPLIT: OnceLock<Regex> = OnceLock::new();
    let label = LABEL.get_or_init(|| {
        Regex::new(r"(?is)(?:treatment|recommendation|solution|steps)[:\s]+(.+)")
            .expect("treatment pattern compiles")
    });
    let split = SPLIT.get_or_init(|| Regex::new(r"\n|\d+\.|-\s").expect("step pattern compiles"));

    let caps = label.captures(raw_text)?;
    let steps = split
        .split(&caps[1])
        .map(str::trim)
        .filter(|step| step.chars().count() > 10)
        .take(MAX_TREATMENT_STEPS)
        .map(str::to_string)
        .collect::<Vec<_>>();
    (!steps.is_empty()).then_some(steps)
}

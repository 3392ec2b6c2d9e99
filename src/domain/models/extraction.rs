//! Structured extraction and risk-audit models.
//!
//! The field names here are part of the external contract: consumers depend
//! on them exactly as declared, and on the `raw` wrapper appearing whenever
//! the model response could not be decoded.

use serde::{Deserialize, Serialize};

/// A field value that tolerates both the string and list-of-strings shapes
/// the model may emit for any given field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Whether any part of the value contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            FieldValue::Text(s) => s.contains(needle),
            FieldValue::List(items) => items.iter().any(|s| s.contains(needle)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }
}

/// The fixed extraction schema for a contract.
///
/// Every field is optional in the model response; missing fields decode to
/// their empty defaults rather than failing the whole extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractFields {
    #[serde(default)]
    pub parties: FieldValue,
    #[serde(default)]
    pub effective_date: FieldValue,
    #[serde(default)]
    pub term: FieldValue,
    #[serde(default)]
    pub governing_law: FieldValue,
    #[serde(default)]
    pub payment_terms: FieldValue,
    #[serde(default)]
    pub termination: FieldValue,
    #[serde(default)]
    pub auto_renewal: FieldValue,
    #[serde(default)]
    pub confidentiality: FieldValue,
    #[serde(default)]
    pub indemnity: FieldValue,
    #[serde(default)]
    pub liability_cap: FieldValue,
    #[serde(default)]
    pub signatories: FieldValue,
}

/// A single risk finding from the audit path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskFinding {
    #[serde(rename = "type", default)]
    pub risk_type: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub explanation: String,
}

/// The audit result: a list of risk findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskReport {
    #[serde(default)]
    pub risks: Vec<RiskFinding>,
}

/// Outcome of decoding a model response into a structured schema.
///
/// `Unparsed` carries the full response text and serializes as
/// `{"raw": "..."}`. Callers must branch on the variant instead of reading
/// fields that may not exist; a `raw` payload means "extraction failed,
/// inspect manually".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuredOutcome<T> {
    Parsed(T),
    Unparsed { raw: String },
}

impl<T> StructuredOutcome<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, StructuredOutcome::Parsed(_))
    }

    pub fn as_parsed(&self) -> Option<&T> {
        match self {
            StructuredOutcome::Parsed(value) => Some(value),
            StructuredOutcome::Unparsed { .. } => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            StructuredOutcome::Parsed(_) => None,
            StructuredOutcome::Unparsed { raw } => Some(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_shapes() {
        let text: FieldValue = serde_json::from_str(r#""Delaware""#).unwrap();
        assert!(text.contains("Delaware"));

        let list: FieldValue = serde_json::from_str(r#"["Acme Corp", "Widget LLC"]"#).unwrap();
        assert!(list.contains("Widget"));
        assert!(!list.is_empty());
    }

    #[test]
    fn test_contract_fields_missing_fields_default() {
        let fields: ContractFields =
            serde_json::from_str(r#"{"governing_law": "Delaware"}"#).unwrap();
        assert!(fields.governing_law.contains("Delaware"));
        assert!(fields.parties.is_empty());
        assert!(fields.liability_cap.is_empty());
    }

    #[test]
    fn test_risk_finding_type_rename() {
        let finding: RiskFinding = serde_json::from_str(
            r#"{"type": "auto_renewal", "severity": "high", "evidence": "...", "explanation": "..."}"#,
        )
        .unwrap();
        assert_eq!(finding.risk_type, "auto_renewal");
    }

    #[test]
    fn test_unparsed_serializes_as_raw_wrapper() {
        let outcome: StructuredOutcome<ContractFields> = StructuredOutcome::Unparsed {
            raw: "not json {broken".to_string(),
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"raw": "not json {broken"}));
    }

    #[test]
    fn test_outcome_accessors() {
        let parsed: StructuredOutcome<RiskReport> = StructuredOutcome::Parsed(RiskReport::default());
        assert!(parsed.is_parsed());
        assert!(parsed.as_raw().is_none());

        let unparsed: StructuredOutcome<RiskReport> = StructuredOutcome::Unparsed {
            raw: "oops".to_string(),
        };
        assert_eq!(unparsed.as_raw(), Some("oops"));
        assert!(unparsed.as_parsed().is_none());
    }
}

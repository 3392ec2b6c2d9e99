//! Structured extraction: field extraction and risk audit over full
//! document text.
//!
//! Both operations ask the model for strict JSON and parse the substring
//! between the first `{` and the last `}` of the response. A response that
//! does not parse is not an error; it degrades to the raw model text so
//! callers always get something to show.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::errors::EngineResult;
use crate::domain::models::{ContractFields, RiskReport, StructuredOutcome};
use crate::domain::ports::completion::CompletionProvider;
use crate::infrastructure::retry::RetryPolicy;

/// Character budget for the contract text in the extraction prompt.
const EXTRACT_TEXT_CHARS: usize = 3500;

/// Character budget for the contract text in the audit prompt.
const AUDIT_TEXT_CHARS: usize = 4000;

const EXTRACT_PROMPT: &str = r#"Extract structured fields from the contract.

Return STRICT JSON:
{
  "parties": [],
  "effective_date": "",
  "term": "",
  "governing_law": "",
  "payment_terms": "",
  "termination": "",
  "auto_renewal": "",
  "confidentiality": "",
  "indemnity": "",
  "liability_cap": "",
  "signatories": []
}

Contract:
"#;

const AUDIT_PROMPT: &str = r#"You are a Legal Risk Detection AI.
Return STRICT JSON:
{
  "risks": [
    {"type":"", "severity":"", "evidence":"", "explanation":""}
  ]
}

Analyze risks like:
- Auto-renewal < 30 days
- Unlimited liability
- Broad indemnity
- Ambiguous payment terms
- Missing governing law

Contract:
"#;

/// Runs single-shot structured prompts over document text.
pub struct StructuredExtractor {
    completer: Arc<dyn CompletionProvider>,
    retry: RetryPolicy,
}

impl StructuredExtractor {
    pub fn new(completer: Arc<dyn CompletionProvider>, retry: RetryPolicy) -> Self {
        Self { completer, retry }
    }

    /// Extract the standard contract field schema from document text.
    pub async fn extract_fields(
        &self,
        text: &str,
    ) -> EngineResult<StructuredOutcome<ContractFields>> {
        let prompt = format!("{EXTRACT_PROMPT}{}", truncate_chars(text, EXTRACT_TEXT_CHARS));
        let response = self.retry.execute(|| self.completer.complete(&prompt)).await?;
        Ok(parse_json_block(&response))
    }

    /// Audit document text against the standard risk checklist.
    pub async fn audit_risks(&self, text: &str) -> EngineResult<StructuredOutcome<RiskReport>> {
        let prompt = format!("{AUDIT_PROMPT}{}", truncate_chars(text, AUDIT_TEXT_CHARS));
        let response = self.retry.execute(|| self.completer.complete(&prompt)).await?;
        Ok(parse_json_block(&response))
    }
}

/// Parse the substring between the first `{` and the last `}` as `T`.
///
/// Anything else (no braces, invalid JSON, wrong shape) degrades to
/// [`StructuredOutcome::Unparsed`] carrying the full raw response.
pub fn parse_json_block<T: DeserializeOwned>(response: &str) -> StructuredOutcome<T> {
    let block = response
        .find('{')
        .and_then(|start| response.rfind('}').map(|end| (start, end)))
        .filter(|(start, end)| start < end)
        .map(|(start, end)| &response[start..=end]);

    match block {
        Some(json) => match serde_json::from_str::<T>(json) {
            Ok(parsed) => {
                debug!("Parsed structured response ({} chars)", json.len());
                StructuredOutcome::Parsed(parsed)
            }
            Err(e) => {
                warn!("Model response is not valid structured JSON: {e}");
                StructuredOutcome::Unparsed {
                    raw: response.to_string(),
                }
            }
        },
        None => {
            warn!("Model response contains no JSON object");
            StructuredOutcome::Unparsed {
                raw: response.to_string(),
            }
        }
    }
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

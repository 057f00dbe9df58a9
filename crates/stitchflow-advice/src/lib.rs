//! # stitchflow-advice: Styling Advisory Collaborator
//!
//! Client for the external text-generation service that suggests
//! tailoring styles from a customer's measurements.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Advisory Call Flow                                │
//! │                                                                         │
//! │  Fitting form ("AI Stylist Advice" button)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AdviceRequest ──► prompt(): measurement list + ask                     │
//! │       │            instruction(): master-tailor persona                 │
//! │       ▼                                                                 │
//! │  advise_or_fallback(advisor, request)                                   │
//! │       │                                                                 │
//! │       ├── defensive timeout wraps the whole exchange                    │
//! │       │                                                                 │
//! │       ├── Ok(text) ────────────────────► advisory string                │
//! │       │                                                                 │
//! │       └── Err(anything at all) ─► WARN + FALLBACK_ADVICE                │
//! │                                                                         │
//! │  The surrounding business operation NEVER sees a failure. The form      │
//! │  disables its trigger until resolution; that is a UI concern.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use error::{AdviceError, AdviceResult};

/// Substituted whenever the external call fails, times out, or returns
/// nothing usable.
pub const FALLBACK_ADVICE: &str = "Suggestion: Classic tailored fit with standard detailing.";

/// Default persona sent as the system instruction when the caller does
/// not override it.
const DEFAULT_INSTRUCTION: &str = "You are a master tailor at a high-end bespoke boutique. \
     Provide stylistic advice based on body measurements.";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the advisory client.
#[derive(Debug, Clone)]
pub struct AdviceConfig {
    /// Base URL of the generateContent-compatible API.
    pub endpoint: String,
    /// Model identifier appended to the endpoint path.
    pub model: String,
    /// API key passed as a query parameter.
    pub api_key: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout. The upstream contract defines none; this
    /// one is ours, so a hung call cannot wedge the fitting form
    /// forever.
    pub request_timeout: Duration,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: String::new(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AdviceConfig {
    /// Builds a config from the environment (`STITCHFLOW_ADVICE_KEY`,
    /// optionally `STITCHFLOW_ADVICE_ENDPOINT` and
    /// `STITCHFLOW_ADVICE_MODEL`).
    pub fn from_env() -> Self {
        let mut config = AdviceConfig::default();

        if let Ok(key) = std::env::var("STITCHFLOW_ADVICE_KEY") {
            config.api_key = key;
        }
        if let Ok(endpoint) = std::env::var("STITCHFLOW_ADVICE_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("STITCHFLOW_ADVICE_MODEL") {
            config.model = model;
        }

        config
    }
}

// =============================================================================
// Request
// =============================================================================

/// A styling-advice request: the garment being fitted and the recorded
/// dimensions.
#[derive(Debug, Clone)]
pub struct AdviceRequest {
    /// Garment category ("Shirt", "Pant").
    pub garment: String,
    /// Dimension label → value pairs, as recorded (inches).
    pub details: Vec<(String, String)>,
    /// Optional override for the role-setting instruction.
    pub instruction: Option<String>,
}

impl AdviceRequest {
    /// Builds the free-text context prompt.
    pub fn prompt(&self) -> String {
        let mut lines = String::new();
        for (label, value) in &self.details {
            lines.push_str(&format!("- {label}: {value} inches\n"));
        }
        format!(
            "Client Measurements for a {}:\n{}\n\
             Provide professional tailoring styling advice and design remarks \
             (max 30 words). Suggest fit, collar/cuff style, or pocket styles \
             suitable for these proportions.",
            self.garment, lines
        )
    }

    /// The role-setting instruction, defaulting to the boutique persona.
    pub fn instruction(&self) -> &str {
        self.instruction.as_deref().unwrap_or(DEFAULT_INSTRUCTION)
    }
}

// =============================================================================
// Wire Types
// =============================================================================
// Minimal slice of the generateContent schema - exactly the fields the
// exchange needs, nothing more.

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateResponse {
    /// First candidate's first non-empty text part, if any.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .find(|t| !t.trim().is_empty())
    }
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for a generateContent-compatible advisory endpoint.
pub struct Advisor {
    config: AdviceConfig,
    http: reqwest::Client,
}

impl Advisor {
    /// Creates a new advisor.
    pub fn new(config: AdviceConfig) -> AdviceResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AdviceError::Transport(e.to_string()))?;

        Ok(Advisor { config, http })
    }

    /// Asks the model for styling advice. Fails typed; callers that
    /// must not fail go through [`advise_or_fallback`].
    pub async fn advise(&self, request: &AdviceRequest) -> AdviceResult<String> {
        if self.config.api_key.is_empty() {
            return Err(AdviceError::NotConfigured);
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: request.instruction().to_string(),
                }],
            },
        };

        debug!(model = %self.config.model, garment = %request.garment, "Requesting styling advice");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdviceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdviceError::Upstream {
                status: status.as_u16(),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AdviceError::Malformed(e.to_string()))?;

        parsed.into_text().ok_or(AdviceError::EmptyResponse)
    }
}

// =============================================================================
// Fallback Wrapper
// =============================================================================

/// Asks for advice and NEVER fails: any error - transport, quota,
/// malformed payload, or the defensive outer timeout - is logged at
/// WARN and replaced with [`FALLBACK_ADVICE`].
pub async fn advise_or_fallback(advisor: &Advisor, request: &AdviceRequest) -> String {
    // The client carries its own request timeout; the outer timeout is
    // belt-and-braces against a transport that ignores it.
    let deadline = advisor.config.request_timeout + Duration::from_secs(5);
    let outcome = match tokio::time::timeout(deadline, advisor.advise(request)).await {
        Ok(result) => result,
        Err(_) => Err(AdviceError::TimedOut),
    };

    resolve(outcome)
}

/// Collapses an advisory outcome to a string, substituting the fallback
/// on any failure.
fn resolve(outcome: AdviceResult<String>) -> String {
    match outcome {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "Advisory call failed, using fallback");
            FALLBACK_ADVICE.to_string()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AdviceRequest {
        AdviceRequest {
            garment: "Shirt".to_string(),
            details: vec![
                ("Collar".to_string(), "15.5".to_string()),
                ("Chest".to_string(), "40".to_string()),
            ],
            instruction: None,
        }
    }

    #[test]
    fn test_prompt_lists_measurements() {
        let prompt = request().prompt();
        assert!(prompt.contains("Client Measurements for a Shirt"));
        assert!(prompt.contains("- Collar: 15.5 inches"));
        assert!(prompt.contains("- Chest: 40 inches"));
        assert!(prompt.contains("max 30 words"));
    }

    #[test]
    fn test_instruction_defaults_to_persona() {
        assert!(request().instruction().contains("master tailor"));

        let custom = AdviceRequest {
            instruction: Some("Be terse.".to_string()),
            ..request()
        };
        assert_eq!(custom.instruction(), "Be terse.");
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Go slim fit."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("Go slim fit."));
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_text().is_none());

        let blank =
            r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(blank).unwrap();
        assert!(parsed.into_text().is_none());
    }

    #[test]
    fn test_resolve_substitutes_fallback_on_error() {
        assert_eq!(resolve(Err(AdviceError::TimedOut)), FALLBACK_ADVICE);
        assert_eq!(
            resolve(Err(AdviceError::Upstream { status: 429 })),
            FALLBACK_ADVICE
        );
        assert_eq!(resolve(Ok("Go slim fit.".to_string())), "Go slim fit.");
    }

    #[tokio::test]
    async fn test_unconfigured_advisor_falls_back() {
        // No API key: the typed call errors, the wrapper never does.
        let advisor = Advisor::new(AdviceConfig::default()).unwrap();
        let err = advisor.advise(&request()).await.unwrap_err();
        assert!(matches!(err, AdviceError::NotConfigured));

        let advice = advise_or_fallback(&advisor, &request()).await;
        assert_eq!(advice, FALLBACK_ADVICE);
    }
}

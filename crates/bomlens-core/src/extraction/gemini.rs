use crate::config::ExtractorConfig;
use crate::error::BomError;
use crate::extraction::prompt::{response_schema, EXTRACTION_PROMPT};
use crate::extraction::BomExtractor;
use crate::parsing::{parse_response, RawExtraction};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Extraction backend using the Gemini `generateContent` API.
///
/// The PDF is sent inline (base64) together with the extraction prompt, and
/// the model is constrained to JSON output by a response schema.
pub struct GeminiExtractor {
    client: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, BomError> {
        let api_key = config.require_api_key()?.to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BomError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(GeminiExtractor {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn build_request(pdf_bytes: &[u8]) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part::Text {
                    text: EXTRACTION_PROMPT.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: "application/pdf",
                        data: BASE64.encode(pdf_bytes),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn candidate_text(response: GenerateResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

impl BomExtractor for GeminiExtractor {
    fn request_extraction(
        &self,
        file_name: &str,
        pdf_bytes: &[u8],
    ) -> Result<RawExtraction, BomError> {
        tracing::debug!(
            file = file_name,
            bytes = pdf_bytes.len(),
            model = %self.model,
            "requesting BOM extraction"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(pdf_bytes))
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    BomError::Connection(self.api_base.clone())
                } else if e.is_timeout() {
                    BomError::Timeout(self.timeout_secs)
                } else {
                    BomError::Extraction(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BomError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| BomError::ResponseParse(e.to_string()))?;
        let text = candidate_text(parsed).ok_or(BomError::EmptyResponse)?;

        parse_response(&text)
    }

    fn backend_name(&self) -> &str {
        "gemini"
    }
}

// src/services/openai.rs
use crate::cv::format::extraction_is_empty;
use crate::services::settings::SettingsService;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub models: ModelConfig,
    pub reasoning_effort: ReasoningEffortConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub cv_extraction: String,
    pub generation: String,
}

#[derive(Debug, Clone)]
pub struct ReasoningEffortConfig {
    pub cv_extraction: String,
    pub generation: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cv_extraction: "gpt-5-mini".to_string(),
            generation: "gpt-5".to_string(),
        }
    }
}

impl Default for ReasoningEffortConfig {
    fn default() -> Self {
        Self {
            cv_extraction: "medium".to_string(),
            generation: "low".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TextGenerationPurpose {
    CvExtraction,
    CoverLetter,
    InterviewPrep,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    messages: Option<Vec<ChatMessage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    output: Vec<OutputItem>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Debug)]
pub struct OpenAIService {
    settings_service: Arc<SettingsService>,
    client: Client,
}

impl OpenAIService {
    pub fn new(settings_service: Arc<SettingsService>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(180))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            settings_service,
            client,
        }
    }

    /// Get OpenAI configuration from settings
    pub async fn get_config(&self) -> Result<OpenAIConfig, OpenAIError> {
        let api_key = self
            .settings_service
            .get_setting("openai_api_key")
            .await
            .map_err(|e| OpenAIError::SettingsError(e.to_string()))?
            .ok_or(OpenAIError::NotConfigured)?;

        let base_url = self
            .settings_service
            .get_setting("openai_base_url")
            .await
            .map_err(|e| OpenAIError::SettingsError(e.to_string()))?
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        let models = ModelConfig {
            cv_extraction: self
                .get_setting_or("openai_model_cv_extraction", "gpt-5-mini")
                .await?,
            generation: self
                .get_setting_or("openai_model_generation", "gpt-5")
                .await?,
        };

        let reasoning_effort = ReasoningEffortConfig {
            cv_extraction: self
                .get_setting_or("openai_reasoning_effort_cv_extraction", "medium")
                .await?,
            generation: self
                .get_setting_or("openai_reasoning_effort_generation", "low")
                .await?,
        };

        Ok(OpenAIConfig {
            api_key,
            base_url,
            models,
            reasoning_effort,
        })
    }

    async fn get_setting_or(&self, key: &str, default: &str) -> Result<String, OpenAIError> {
        Ok(self
            .settings_service
            .get_setting(key)
            .await
            .map_err(|e| OpenAIError::SettingsError(e.to_string()))?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Generate text using OpenAI API
    pub async fn generate_text(
        &self,
        purpose: TextGenerationPurpose,
        prompt: &str,
        context: Option<Value>,
    ) -> Result<String, OpenAIError> {
        let config = self.get_config().await?;

        let (model, reasoning_effort) = match purpose {
            TextGenerationPurpose::CvExtraction => (
                &config.models.cv_extraction,
                &config.reasoning_effort.cv_extraction,
            ),
            TextGenerationPurpose::CoverLetter | TextGenerationPurpose::InterviewPrep => {
                (&config.models.generation, &config.reasoning_effort.generation)
            }
        };

        let mut messages = vec![ChatMessage {
            role: "system".to_string(),
            content: self.get_system_prompt(purpose),
        }];

        if let Some(ctx) = context {
            let context_str = serde_json::to_string_pretty(&ctx)
                .map_err(|e| OpenAIError::SerializationError(e.to_string()))?;
            messages.push(ChatMessage {
                role: "user".to_string(),
                content: format!("Context:\n{}\n\nTask:\n{}", context_str, prompt),
            });
        } else {
            messages.push(ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            });
        }

        // GPT-5 family uses the Responses API format; older models use Chat Completions
        let is_gpt5 =
            model.starts_with("gpt-5") || model.starts_with("o1") || model.starts_with("o3");

        let request = if is_gpt5 {
            let content: Vec<Value> = messages
                .iter()
                .map(|msg| {
                    serde_json::json!({
                        "type": "input_text",
                        "text": msg.content
                    })
                })
                .collect();

            ChatCompletionRequest {
                model: model.clone(),
                messages: None,
                input: Some(vec![serde_json::json!({
                    "role": "user",
                    "content": content
                })]),
                temperature: None,
                max_tokens: None,
                max_output_tokens: Some(4000),
                reasoning: Some(serde_json::json!({"effort": reasoning_effort})),
                text: Some(serde_json::json!({"format": {"type": "text"}})),
            }
        } else {
            ChatCompletionRequest {
                model: model.clone(),
                messages: Some(messages),
                input: None,
                temperature: Some(0.7),
                max_tokens: Some(2000),
                max_output_tokens: None,
                reasoning: None,
                text: None,
            }
        };

        debug!(
            purpose = ?purpose,
            model = %model,
            reasoning_effort = %reasoning_effort,
            "Sending OpenAI text generation request"
        );

        let response = self.make_request_with_retry(&config, request).await?;

        // Extract generated text - handle both response formats
        let generated_text = if !response.output.is_empty() {
            response
                .output
                .iter()
                .find_map(|output| output.content.first().and_then(|item| item.text.clone()))
                .ok_or_else(|| {
                    error!(
                        output_items = response.output.len(),
                        "Failed to extract text from Responses API output"
                    );
                    OpenAIError::InvalidResponse("No text in output".to_string())
                })?
        } else {
            response
                .choices
                .first()
                .ok_or_else(|| OpenAIError::InvalidResponse("No choices in response".to_string()))?
                .message
                .content
                .clone()
        };

        if let Some(usage) = response.usage {
            info!(
                purpose = ?purpose,
                model = %model,
                tokens_used = usage.total_tokens,
                "OpenAI text generation completed"
            );
        }

        Ok(generated_text)
    }

    /// Extract a structured CV record from raw CV text.
    ///
    /// Two-attempt pipeline: ask for JSON, parse and validate the shape; on
    /// failure, retry once with a corrective instruction carrying the bad
    /// output. Still invalid after the retry means the extraction failed.
    pub async fn extract_cv_data(&self, cv_text: &str) -> Result<Value, OpenAIError> {
        let prompt = extraction_prompt(cv_text);

        let first = self
            .generate_text(TextGenerationPurpose::CvExtraction, &prompt, None)
            .await?;

        match parse_extraction(&first) {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(error = %e, "First CV extraction attempt unusable, retrying with fix-up instruction");
            }
        }

        let retry_prompt = format!(
            "Your previous output was not usable:\n{}\n\n\
            Return ONLY a valid JSON object, with no markdown fences and no \
            commentary, following the original instructions:\n\n{}",
            first, prompt
        );

        let second = self
            .generate_text(TextGenerationPurpose::CvExtraction, &retry_prompt, None)
            .await?;

        parse_extraction(&second).map_err(|e| {
            error!(error = %e, "CV extraction failed after retry");
            e
        })
    }

    /// Make API request with retry logic
    async fn make_request_with_retry(
        &self,
        config: &OpenAIConfig,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAIError> {
        let max_retries = 3;
        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.make_request(config, &request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        error = %e,
                        "OpenAI API request failed, retrying..."
                    );
                    last_error = Some(e);

                    // Exponential backoff
                    if attempt < max_retries {
                        let delay = std::time::Duration::from_millis(1000 * 2_u64.pow(attempt - 1));
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| OpenAIError::RequestFailed("Unknown error".to_string())))
    }

    /// Make a single API request
    async fn make_request(
        &self,
        config: &OpenAIConfig,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAIError> {
        // Use /v1/responses for GPT-5 models, /v1/chat/completions for others
        let endpoint = if request.model.starts_with("gpt-5")
            || request.model.starts_with("o1")
            || request.model.starts_with("o3")
        {
            "v1/responses"
        } else {
            "v1/chat/completions"
        };
        let url = format!("{}/{}", config.base_url.trim_end_matches('/'), endpoint);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", config.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| OpenAIError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OpenAIError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "OpenAI API request failed");
            return Err(OpenAIError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| OpenAIError::InvalidResponse(e.to_string()))
    }

    /// Get system prompt based on purpose
    fn get_system_prompt(&self, purpose: TextGenerationPurpose) -> String {
        match purpose {
            TextGenerationPurpose::CvExtraction => {
                "You are an expert CV analyzer. Extract structured information from CV text accurately and return it as JSON. Never invent experience that is not in the text.".to_string()
            }
            TextGenerationPurpose::CoverLetter => {
                "You are a professional Danish career coach. Write clear, personal cover letters grounded strictly in the candidate's CV. Maintain a warm yet professional tone.".to_string()
            }
            TextGenerationPurpose::InterviewPrep => {
                "You are a professional Danish career coach preparing candidates for interviews. Base every suggested answer on the candidate's actual CV.".to_string()
            }
        }
    }
}

/// The extraction prompt. The output feeds the synonym-tolerant formatter,
/// so the exact key names are a preference, not a contract.
fn extraction_prompt(cv_text: &str) -> String {
    format!(
        r#"Extract structured information from this CV. Return a JSON object with the following structure:
{{
    "summary": "Brief professional summary (2-3 sentences)",
    "experience": [
        {{
            "title": "Job title",
            "company": "Company name",
            "location": "City if mentioned (null otherwise)",
            "start_date": "Start date (YYYY-MM format if possible)",
            "end_date": "End date (YYYY-MM format) or null if current",
            "bullets": ["responsibility or achievement", ...]
        }}
    ],
    "education": [
        {{
            "degree": "Degree name",
            "institution": "School/University name",
            "period": "Years, e.g. 2016-2020"
        }}
    ],
    "skills": ["skill1", "skill2", ...],
    "languages": ["language1", "language2", ...]
}}

Omit fields the CV does not mention. Do not invent anything.

CV text:
{}"#,
        cv_text
    )
}

/// Parse and validate an extraction response. Tolerates markdown fences by
/// salvaging the outermost JSON object; a record with no recognizable CV
/// fields counts as a failure so the retry path can fire.
fn parse_extraction(response: &str) -> Result<Value, OpenAIError> {
    let parsed: Value = serde_json::from_str(response).or_else(|_| {
        let json_start = response.find('{');
        let json_end = response.rfind('}');
        match (json_start, json_end) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&response[start..=end]),
            _ => Err(serde_json::Error::io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "No JSON found in response",
            ))),
        }
    })
    .map_err(|e| OpenAIError::InvalidResponse(format!("not valid JSON: {}", e)))?;

    if !parsed.is_object() {
        return Err(OpenAIError::InvalidResponse(
            "extraction is not a JSON object".to_string(),
        ));
    }

    if extraction_is_empty(&parsed) {
        return Err(OpenAIError::InvalidResponse(
            "extraction has no recognizable CV fields".to_string(),
        ));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extraction_accepts_plain_json() {
        let response = r#"{"summary": "Erfaren udvikler med fokus på backend."}"#;
        let value = parse_extraction(response).expect("plain JSON should parse");
        assert_eq!(value["summary"], "Erfaren udvikler med fokus på backend.");
    }

    #[test]
    fn test_parse_extraction_salvages_fenced_json() {
        let response = "```json\n{\"experience\": [{\"title\": \"Udvikler\", \"company\": \"Acme\"}]}\n```";
        let value = parse_extraction(response).expect("fenced JSON should be salvaged");
        assert_eq!(value["experience"][0]["title"], "Udvikler");
    }

    #[test]
    fn test_parse_extraction_rejects_prose() {
        let response = "I could not find any CV information in the text.";
        assert!(parse_extraction(response).is_err());
    }

    #[test]
    fn test_parse_extraction_rejects_unrecognizable_object() {
        // Valid JSON, but nothing the formatter can use: the retry path
        // must treat it as a failed attempt
        let response = r#"{"note": "no data"}"#;
        assert!(parse_extraction(response).is_err());
    }
}

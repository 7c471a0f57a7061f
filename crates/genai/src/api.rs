//! REST client for the generative API endpoints.
//!
//! Wraps the hosted `generateContent` endpoints (image model and text model)
//! using [`reqwest`]. Image calls return inline-encoded payloads as
//! `data:` URLs; text calls use structured JSON output where the caller
//! needs a typed response.

use serde::Deserialize;

use crate::prompts;

/// HTTP client for the generative API.
pub struct GenAiApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    image_model: String,
    text_model: String,
}

/// Structured title/description suggestion for a batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataSuggestion {
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// CTR analysis of a single thumbnail.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct CtrAnalysis {
    pub score: i32,
    pub label: String,
    pub feedback: String,
}

/// Errors from the generative API layer.
#[derive(Debug, thiserror::Error)]
pub enum GenAiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Generative API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The model refused the request (safety filters or recitation).
    #[error("Generation blocked by safety filters ({0}). Try a more specific, professional prompt")]
    Blocked(String),

    /// The model answered but produced no image payload.
    #[error("No image data in model response")]
    NoImage,

    /// The response body did not match the expected shape.
    #[error("Malformed model response: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Wire types (generateContent response subset)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

impl GenAiApi {
    /// Create a new API client.
    ///
    /// * `api_url`     - Base URL, e.g. `https://generativelanguage.googleapis.com`.
    /// * `api_key`     - API key sent as `x-goog-api-key`.
    /// * `image_model` - Model id used for image variation calls.
    /// * `text_model`  - Model id used for metadata/scoring/enhancement calls.
    pub fn new(api_url: String, api_key: String, image_model: String, text_model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            image_model,
            text_model,
        }
    }

    /// Render one thumbnail variation, returning an inline `data:` URL.
    ///
    /// Reference images must be `data:` URLs; they are forwarded as inline
    /// parts so the model can incorporate the provided faces/assets.
    pub async fn generate_variation(
        &self,
        prompt: &str,
        style: &str,
        reference_images: &[String],
        index: u32,
    ) -> Result<String, GenAiApiError> {
        let mut parts = vec![serde_json::json!({
            "text": prompts::compose_image_prompt(prompt, style, index),
        })];
        for asset in reference_images {
            if let Some(payload) = prompts::base64_payload_of(asset) {
                parts.push(serde_json::json!({
                    "inlineData": {
                        "mimeType": prompts::mime_type_of(asset),
                        "data": payload,
                    }
                }));
            }
        }

        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "imageConfig": { "aspectRatio": "16:9" } },
        });

        let response: GenerateContentResponse =
            self.generate_content(&self.image_model, &body).await?;
        let candidate = Self::first_candidate(response)?;

        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(inline) = part.inline_data {
                let mime = inline.mime_type.unwrap_or_else(|| "image/png".to_string());
                return Ok(format!("data:{mime};base64,{}", inline.data));
            }
            if let Some(text) = part.text {
                tracing::warn!(text = %text, "Model returned text instead of an image part");
            }
        }

        Err(GenAiApiError::NoImage)
    }

    /// Suggest one clickbait title per image plus a shared description.
    ///
    /// Uses structured JSON output; a response that fails to parse is a
    /// [`GenAiApiError::Malformed`] so the caller can apply its templated
    /// fallback.
    pub async fn suggest_metadata(
        &self,
        prompt: &str,
        style: &str,
        image_urls: &[String],
    ) -> Result<MetadataSuggestion, GenAiApiError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [
                { "text": prompts::compose_metadata_prompt(prompt, style, image_urls) },
            ]}],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "titles": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "description": { "type": "STRING" },
                    },
                    "required": ["titles", "description"],
                },
            },
        });

        self.structured_text_call(&body).await
    }

    /// Score a thumbnail's viral potential (0-100 plus label and feedback).
    ///
    /// `image` may be an inline `data:` URL (forwarded as an inline part) or
    /// a public URL (referenced in the rubric text).
    pub async fn score_thumbnail(
        &self,
        image: &str,
        prompt: &str,
    ) -> Result<CtrAnalysis, GenAiApiError> {
        let mut parts = vec![serde_json::json!({
            "text": prompts::compose_scoring_prompt(prompt),
        })];
        match prompts::base64_payload_of(image) {
            Some(payload) => parts.push(serde_json::json!({
                "inlineData": {
                    "mimeType": prompts::mime_type_of(image),
                    "data": payload,
                }
            })),
            None => parts.push(serde_json::json!({ "text": format!("Thumbnail URL: {image}") })),
        }

        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "score": { "type": "INTEGER" },
                        "label": { "type": "STRING" },
                        "feedback": { "type": "STRING" },
                    },
                    "required": ["score", "label", "feedback"],
                },
            },
        });

        self.structured_text_call(&body).await
    }

    /// Rewrite a concept for better cinematic composition. Returns the
    /// model's plain-text answer, trimmed.
    pub async fn enhance_prompt(&self, prompt: &str) -> Result<String, GenAiApiError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [
                { "text": prompts::compose_enhancement_prompt(prompt) },
            ]}],
        });

        let response: GenerateContentResponse =
            self.generate_content(&self.text_model, &body).await?;
        let text = Self::first_text(response)?;
        Ok(text.trim().to_string())
    }

    // ---- private helpers ----

    /// POST a `generateContent` request for the given model.
    async fn generate_content(
        &self,
        model: &str,
        body: &serde_json::Value,
    ) -> Result<GenerateContentResponse, GenAiApiError> {
        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{model}:generateContent",
                self.api_url
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Run a structured-output text call and deserialize the JSON answer.
    async fn structured_text_call<T: serde::de::DeserializeOwned>(
        &self,
        body: &serde_json::Value,
    ) -> Result<T, GenAiApiError> {
        let response: GenerateContentResponse =
            self.generate_content(&self.text_model, body).await?;
        let text = Self::first_text(response)?;
        serde_json::from_str(&text).map_err(|e| GenAiApiError::Malformed(e.to_string()))
    }

    /// Extract the first candidate, rejecting safety-blocked generations.
    fn first_candidate(response: GenerateContentResponse) -> Result<Candidate, GenAiApiError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GenAiApiError::Malformed("response had no candidates".to_string()))?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if matches!(reason, "SAFETY" | "RECITATION") {
                return Err(GenAiApiError::Blocked(reason.to_string()));
            }
            if reason != "STOP" {
                tracing::warn!(finish_reason = reason, "Unexpected finish reason");
            }
        }

        Ok(candidate)
    }

    /// Extract the first text part of the first candidate.
    fn first_text(response: GenerateContentResponse) -> Result<String, GenAiApiError> {
        let candidate = Self::first_candidate(response)?;
        candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .find_map(|part| part.text)
            .ok_or_else(|| GenAiApiError::Malformed("response had no text part".to_string()))
    }

    /// Ensure a success status and parse the JSON body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GenAiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenAiApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

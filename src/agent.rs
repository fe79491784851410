use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    config::Config,
    prompt::{FALLBACK_ANSWER, FALLBACK_PROMPT}
};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Empty(&'static str)
}

// Client for the local Ollama server. Every public call degrades to a fallback
// string instead of failing, errors are only logged.
pub struct OllamaAgent {
    client: HttpClient,
    base_url: String,
    model: String
}

impl OllamaAgent {
    pub fn new(client: HttpClient, base_url: &str, model: &str) -> Self {
        OllamaAgent {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string()
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        let client = HttpClient::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self::new(client, &config.api_url, &config.model))
    }

    pub async fn random_prompt(&self) -> String {
        match self.try_random_prompt().await {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Error fetching prompt from Ollama: {}", e);
                FALLBACK_PROMPT.to_string()
            }
        }
    }

    pub async fn answer(&self, prompt: &str) -> String {
        match self.try_answer(prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Error getting answer from Ollama: {}", e);
                FALLBACK_ANSWER.to_string()
            }
        }
    }

    /// Single non-streaming completion, `fallback` on any failure or empty reply.
    pub async fn generate_or(&self, prompt: &str, fallback: &str) -> String {
        match self.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Error generating with {}: {}", self.model, e);
                fallback.to_string()
            }
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        debug!("generate with {}: {}", self.model, prompt);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false
        };
        let response: GenerateResponse = self.client
            .post(self.endpoint("generate"))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        non_empty(response.response, "model returned an empty response")
    }

    async fn try_random_prompt(&self) -> Result<String, AgentError> {
        let response: PromptResponse = self.client
            .post(self.endpoint("random_prompt"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response.prompt.ok_or(AgentError::Empty("response has no prompt"))
    }

    async fn try_answer(&self, prompt: &str) -> Result<String, AgentError> {
        let response: AnswerResponse = self.client
            .post(self.endpoint("answer"))
            .json(&AnswerRequest { prompt })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response.answer.ok_or(AgentError::Empty("response has no answer"))
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}", self.base_url, name)
    }
}

fn non_empty(text: String, message: &'static str) -> Result<String, AgentError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AgentError::Empty(message));
    }
    Ok(text.to_string())
}

// request parameters structs.

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    prompt: &'a str
}

// response parameter structs.

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String
}

#[derive(Debug, Deserialize)]
struct PromptResponse {
    prompt: Option<String>
}

#[derive(Debug, Deserialize)]
struct AnswerResponse {
    answer: Option<String>
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let agent = OllamaAgent::new(HttpClient::new(), "http://localhost:11434/", "llama3");
        assert_eq!(agent.endpoint("generate"), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_generate_request_shape() {
        let request = GenerateRequest { model: "llama3", prompt: "hi", stream: false };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"model": "llama3", "prompt": "hi", "stream": false})
        );
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  Rome. \n".to_string(), "empty").unwrap(), "Rome.");
        assert!(non_empty(" \n".to_string(), "empty").is_err());
    }
}

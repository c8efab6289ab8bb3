use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Endpoint of the remote completion service.
const COMPLETIONS_ENDPOINT: &str = "https://api.openai.com/v1/completions";

/// Model and sampling parameters, fixed for every request.
const MODEL: &str = "text-davinci-003";
const TEMPERATURE: f32 = 0.5;
const MAX_OUTPUT_TOKENS: u32 = 1024;
const CANDIDATES: u32 = 1;

/// Errors from a single translation round trip.
///
/// All of these are recoverable: the caller renders them in the result
/// region and the interface stays usable for another attempt.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The service could not be reached at the transport level.
    #[error("could not reach the translation service: {message}")]
    Network { message: String },

    /// The service answered with a non-success status.
    #[error("translation service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The service answered 2xx but the body was not usable.
    #[error("unexpected response from the translation service: {message}")]
    InvalidResponse { message: String },
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    n: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    text: String,
}

/// Client for the remote completion service.
///
/// Owns the HTTP client and the credential; one instance lives for the whole
/// process and is shared by every translate action.
pub struct Translator {
    client: Client,
    credential: String,
    endpoint: String,
}

impl Translator {
    /// Create a translator authorized by `credential`.
    pub fn new(credential: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Translator {
            client,
            credential,
            endpoint: COMPLETIONS_ENDPOINT.to_string(),
        }
    }

    /// Translate `text` from `source` to `target` with one call to the
    /// completion service.
    ///
    /// Inputs are forwarded verbatim into the prompt; empty strings are
    /// accepted. The first candidate's text is returned unmodified.
    pub async fn translate(
        &self,
        source: &str,
        target: &str,
        text: &str,
    ) -> Result<String, TranslateError> {
        let prompt = build_prompt(source, target, text);
        let request = CompletionRequest {
            model: MODEL,
            prompt: &prompt,
            max_tokens: MAX_OUTPUT_TOKENS,
            n: CANDIDATES,
            temperature: TEMPERATURE,
        };

        debug!(chars = text.len(), "requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.credential)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslateError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| TranslateError::InvalidResponse {
                    message: e.to_string(),
                })?;

        first_candidate(parsed)
    }
}

/// Build the instruction sent to the completion service.
fn build_prompt(source: &str, target: &str, text: &str) -> String {
    format!(
        "You are a professional translator and speak and write every language \
         known to humankind. Translate the following text from {} to {}: {}",
        source, target, text
    )
}

/// Pull the first candidate out of a decoded response.
fn first_candidate(response: CompletionResponse) -> Result<String, TranslateError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|candidate| candidate.text)
        .ok_or_else(|| TranslateError::InvalidResponse {
            message: "no candidates in response".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_inputs_in_order() {
        let prompt = build_prompt("French", "English", "Bonjour");

        let source = prompt.find("French").unwrap();
        let target = prompt.find("English").unwrap();
        let text = prompt.find("Bonjour").unwrap();
        assert!(source < target && target < text);
    }

    #[test]
    fn prompt_accepts_empty_inputs() {
        // No validation by design; empty fields are forwarded verbatim.
        let prompt = build_prompt("", "", "");
        assert!(prompt.ends_with("from  to : "));
    }

    #[test]
    fn request_serializes_fixed_parameters() {
        let request = CompletionRequest {
            model: MODEL,
            prompt: "hello",
            max_tokens: MAX_OUTPUT_TOKENS,
            n: CANDIDATES,
            temperature: TEMPERATURE,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-davinci-003");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["n"], 1);
        assert_eq!(json["temperature"], 0.5);
        // No stop sequence is ever sent.
        assert!(json.get("stop").is_none());
    }

    #[test]
    fn first_candidate_is_returned_unmodified() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"choices": [{"text": "\n\nHello"}, {"text": "ignored"}]}"#,
        )
        .unwrap();

        assert_eq!(first_candidate(response).unwrap(), "\n\nHello");
    }

    #[test]
    fn empty_candidate_list_is_an_error() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();

        assert!(matches!(
            first_candidate(response),
            Err(TranslateError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn errors_render_readable_messages() {
        let err = TranslateError::Api {
            status: 401,
            message: "invalid api key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "translation service returned 401: invalid api key"
        );
    }
}

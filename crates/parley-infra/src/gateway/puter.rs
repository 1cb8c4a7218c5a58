//! PuterGateway -- concrete [`InferenceGateway`] for the Puter hosted AI
//! service.
//!
//! Sends the conversation history to the driver-call endpoint and resolves
//! the reply into one of the [`GatewayReply`] shapes immediately. The
//! service answers either with a structured `message.content` payload or a
//! bare string; anything else resolves to an empty structured reply so the
//! controller's fallback literal applies.
//!
//! The API token is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

use parley_core::gateway::provider::InferenceGateway;
use parley_types::chat::{ChatTurn, GatewayReply};
use parley_types::error::GatewayError;

/// Puter hosted AI gateway.
pub struct PuterGateway {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl PuterGateway {
    /// Driver interface identifier on the hosted service.
    const CHAT_INTERFACE: &'static str = "puter-chat-completion";

    /// Create a new gateway client.
    ///
    /// `token` is optional: the service accepts anonymous calls with
    /// reduced quotas.
    pub fn new(token: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: "https://api.puter.com".to_string(),
            token,
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Resolve a raw service payload into a [`GatewayReply`].
///
/// Shapes, in order of preference: `result.message.content`,
/// `message.content`, a bare JSON string. A payload with none of these has
/// no extractable text and resolves to an empty structured reply.
fn parse_reply(value: &Value) -> GatewayReply {
    if let Value::String(text) = value {
        return GatewayReply::Plain(text.clone());
    }

    let content = value
        .pointer("/result/message/content")
        .or_else(|| value.pointer("/message/content"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    GatewayReply::Structured {
        content: content.to_string(),
    }
}

impl InferenceGateway for PuterGateway {
    fn name(&self) -> &str {
        "puter"
    }

    async fn generate(
        &self,
        history: &[ChatTurn],
        model: &str,
        max_tokens: u32,
    ) -> Result<GatewayReply, GatewayError> {
        let body = json!({
            "interface": Self::CHAT_INTERFACE,
            "method": "complete",
            "args": {
                "messages": history,
                "model": model,
                "max_tokens": max_tokens,
            },
        });

        let mut request = self
            .client
            .post(format!("{}/drivers/call", self.base_url))
            .header("content-type", "application/json")
            .json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Deserialization(e.to_string()))?;

        Ok(parse_reply(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_string_is_plain() {
        let value = json!("a plain answer");
        assert_eq!(
            parse_reply(&value),
            GatewayReply::Plain("a plain answer".to_string())
        );
    }

    #[test]
    fn test_parse_message_content_is_structured() {
        let value = json!({"message": {"content": "Hi there"}});
        assert_eq!(
            parse_reply(&value),
            GatewayReply::Structured {
                content: "Hi there".to_string()
            }
        );
    }

    #[test]
    fn test_parse_nested_result_shape() {
        let value = json!({"result": {"message": {"content": "nested"}}});
        assert_eq!(
            parse_reply(&value),
            GatewayReply::Structured {
                content: "nested".to_string()
            }
        );
    }

    #[test]
    fn test_parse_object_without_content_has_no_text() {
        let value = json!({"finish_reason": "stop"});
        let reply = parse_reply(&value);
        assert_eq!(reply.into_text(), None);
    }

    #[test]
    fn test_parse_non_string_content_has_no_text() {
        let value = json!({"message": {"content": 42}});
        assert_eq!(parse_reply(&value).into_text(), None);
    }
}

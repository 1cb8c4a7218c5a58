//! Selectable model catalog.
//!
//! The hosted inference service routes by model identifier; this is the
//! fixed list the console offers. The last pick is persisted through the
//! preference store, not here.

/// A selectable model: wire identifier plus display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub value: &'static str,
    pub label: &'static str,
}

/// Model used when no preference has been stored yet.
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Models available through the hosted service.
pub const MODELS: &[ModelInfo] = &[
    ModelInfo { value: "gpt-5", label: "ChatGPT 5" },
    ModelInfo { value: "gpt-4o", label: "GPT-4o" },
    ModelInfo { value: "gpt-4o-mini", label: "GPT-4o Mini" },
    ModelInfo { value: "claude-3-5-sonnet", label: "Claude 3.5 Sonnet" },
    ModelInfo { value: "claude-3-5-haiku", label: "Claude 3.5 Haiku" },
    ModelInfo { value: "deepseek-chat", label: "DeepSeek Chat" },
    ModelInfo { value: "deepseek-reasoner", label: "DeepSeek Reasoner" },
    ModelInfo { value: "deepseek-v3", label: "DeepSeek V3.1" },
    ModelInfo { value: "grok-beta", label: "Grok" },
    ModelInfo { value: "gemini-2.0-flash-exp", label: "Gemini 2.0 Flash" },
    ModelInfo { value: "o1", label: "OpenAI o1" },
    ModelInfo { value: "o1-mini", label: "OpenAI o1 Mini" },
];

/// Display label for a model identifier, falling back to the identifier
/// itself for unknown models.
pub fn label_for(value: &str) -> &str {
    MODELS
        .iter()
        .find(|m| m.value == value)
        .map(|m| m.label)
        .unwrap_or(value)
}

//! Generative text provider trait.
//!
//! The free-form fallback path (dispatch step of last resort) talks to an
//! external completion API through this port. Implementations live in
//! `lumen-infra`; the provider is optional at runtime -- when unconfigured,
//! the dispatcher answers with a localized "I don't understand" instead.

use lumen_types::error::GenerativeError;

/// Fixed safety-oriented system preamble for supportive free-form replies.
///
/// The assistant must never present itself as a medical or crisis service
/// and steers toward the structured exercises.
pub const SYSTEM_PREAMBLE: &str = "You are Lumen, a mental wellness training assistant. \
You are NOT a medical or crisis service. \
Avoid diagnosis, medications, politics, religion, and graphic trauma details. \
Be calm, respectful, brief. Prefer practical exercises (breathing, grounding, micro-goals). \
If the user mentions self-harm or suicide, refuse and urge them to contact local crisis lines.";

/// Maximum user text forwarded to the service.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Port for the external completion API.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait GenerativeProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// One-shot completion: system preamble plus a single user message.
    fn complete(
        &self,
        system: &str,
        user_text: &str,
    ) -> impl std::future::Future<Output = Result<String, GenerativeError>> + Send;
}

/// Truncate user text to [`MAX_PROMPT_CHARS`] on a char boundary.
pub fn truncate_prompt(text: &str) -> &str {
    match text.char_indices().nth(MAX_PROMPT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

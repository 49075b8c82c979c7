//! Prompt rendering.
//!
//! Templates use `{{variable}}` placeholders. The default template takes a
//! `chat_history` and a `user_question`.

use std::collections::HashMap;

use crate::chat::ChatMessage;

/// Conversational template used by [`ResponseGenerator`](crate::generator::ResponseGenerator)
pub const DEFAULT_TEMPLATE: &str = "You are a helpful assistant. Answer the following questions considering the history of the conversation:

Chat history: {{chat_history}}

User question: {{user_question}}
";

/// Rendered in place of an empty conversation
pub const EMPTY_HISTORY: &str = "(no previous messages)";

/// Serializes a conversation oldest-first, one `Speaker: text` line per message.
pub fn render_history(history: &[ChatMessage]) -> String {
    if history.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    history
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Values for one rendering of the conversational template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Conversation so far, already serialized
    pub chat_history: String,
    /// The new question from the user
    pub user_question: String,
}

impl PromptRequest {
    pub fn new(user_question: impl Into<String>, history: &[ChatMessage]) -> Self {
        Self {
            chat_history: render_history(history),
            user_question: user_question.into(),
        }
    }

    fn variables(&self) -> HashMap<&'static str, &str> {
        HashMap::from([
            ("chat_history", self.chat_history.as_str()),
            ("user_question", self.user_question.as_str()),
        ])
    }
}

/// A prompt template with `{{variable}}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Fills the template from a [`PromptRequest`].
    pub fn render(&self, request: &PromptRequest) -> String {
        self.apply(&request.variables())
    }

    /// Replaces `{{name}}` placeholders with values from `vars`.
    ///
    /// Substitution is a single left-to-right pass, so placeholder syntax
    /// inside a substituted value is kept verbatim. Unknown placeholders are
    /// left intact.
    pub fn apply(&self, vars: &HashMap<&str, &str>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            match after_open.find("}}") {
                Some(end) => {
                    let name = &after_open[..end];
                    match vars.get(name.trim()) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(name);
                            result.push_str("}}");
                        }
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }
}

//! The conversational pipeline: render the prompt, call the model, return text.
//!
//! # Example
//!
//! ```no_run
//! use mistral_chat::{backends::mistral::Mistral, chat::ChatMessage, config::ModelConfig};
//! use mistral_chat::generator::ResponseGenerator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let llm = Mistral::from_config(&ModelConfig::from_env())?;
//!     let generator = ResponseGenerator::new(&llm);
//!
//!     let mut history: Vec<ChatMessage> = Vec::new();
//!     let question = "What is the capital of France?";
//!     let reply = generator.get_response(question, &history).await?;
//!
//!     history.push(ChatMessage::user().content(question).build());
//!     history.push(ChatMessage::assistant().content(reply).build());
//!     Ok(())
//! }
//! ```

use crate::{
    chat::ChatMessage,
    completion::{CompletionProvider, CompletionRequest},
    error::LLMError,
    prompt::{PromptRequest, PromptTemplate},
};

/// Progress notifications around the remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEvent {
    /// The prompt is rendered and the model call is about to start
    Started,
    /// The model call returned, successfully or not
    Finished,
}

/// Produces assistant replies from a question and the caller's chat history.
///
/// Holds only a borrowed client and a template; the history is never stored
/// or modified.
pub struct ResponseGenerator<'a> {
    llm: &'a dyn CompletionProvider,
    template: PromptTemplate,
}

impl<'a> ResponseGenerator<'a> {
    /// Creates a generator using the default conversational template
    pub fn new(llm: &'a dyn CompletionProvider) -> Self {
        Self {
            llm,
            template: PromptTemplate::default(),
        }
    }

    /// Replaces the prompt template
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Renders the prompt that [`get_response`](Self::get_response) would send.
    pub fn render_prompt(&self, user_question: &str, chat_history: &[ChatMessage]) -> String {
        self.template
            .render(&PromptRequest::new(user_question, chat_history))
    }

    /// Asks the model for a reply to `user_question` given `chat_history`.
    ///
    /// Errors from the model client are returned unchanged.
    pub async fn get_response(
        &self,
        user_question: &str,
        chat_history: &[ChatMessage],
    ) -> Result<String, LLMError> {
        self.get_response_observed(user_question, chat_history, |_| {})
            .await
    }

    /// Same as [`get_response`](Self::get_response), reporting
    /// [`ResponseEvent::Started`] before the model call and
    /// [`ResponseEvent::Finished`] once it returns.
    pub async fn get_response_observed<F>(
        &self,
        user_question: &str,
        chat_history: &[ChatMessage],
        mut on_event: F,
    ) -> Result<String, LLMError>
    where
        F: FnMut(ResponseEvent),
    {
        let prompt = self.render_prompt(user_question, chat_history);
        log::debug!(
            "rendered prompt: {} chars, {} history messages",
            prompt.len(),
            chat_history.len()
        );

        on_event(ResponseEvent::Started);
        let result = self.llm.complete(&CompletionRequest::new(prompt)).await;
        on_event(ResponseEvent::Finished);

        match result {
            Ok(response) => Ok(response.into_text()),
            Err(e) => {
                log::debug!("model call failed: {e}");
                Err(e)
            }
        }
    }
}

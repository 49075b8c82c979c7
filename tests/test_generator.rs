use std::sync::Mutex;

use mistral_chat::{
    async_trait,
    chat::ChatMessage,
    completion::{CompletionProvider, CompletionRequest, CompletionResponse},
    error::LLMError,
    generator::{ResponseEvent, ResponseGenerator},
    prompt::PromptTemplate,
};

// Scripted model client that records every prompt it receives
struct ScriptedModel {
    reply: Result<&'static str, fn() -> LLMError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn replying(text: &'static str) -> Self {
        Self {
            reply: Ok(text),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(err: fn() -> LLMError) -> Self {
        Self {
            reply: Err(err),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedModel {
    async fn complete(&self, req: &CompletionRequest) -> Result<CompletionResponse, LLMError> {
        self.prompts.lock().unwrap().push(req.prompt.clone());
        match self.reply {
            Ok(text) => Ok(CompletionResponse {
                text: text.to_string(),
                usage: None,
            }),
            Err(make) => Err(make()),
        }
    }
}

fn history() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user().content("A").build(),
        ChatMessage::assistant().content("B").build(),
        ChatMessage::user().content("C").build(),
    ]
}

#[tokio::test]
async fn returns_model_text_for_empty_history() {
    let model = ScriptedModel::replying("Hi! How can I help?");
    let generator = ResponseGenerator::new(&model);

    let reply = generator.get_response("Hello", &[]).await.unwrap();
    assert_eq!(reply, "Hi! How can I help?");

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("User question: Hello"));
    assert!(prompts[0].contains("Chat history: (no previous messages)"));
}

#[tokio::test]
async fn sent_prompt_preserves_history_order() {
    let model = ScriptedModel::replying("D");
    let generator = ResponseGenerator::new(&model);

    generator.get_response("next?", &history()).await.unwrap();

    let prompt = &model.prompts()[0];
    let a = prompt.find("Human: A").unwrap();
    let b = prompt.find("Assistant: B").unwrap();
    let c = prompt.find("Human: C").unwrap();
    assert!(a < b && b < c);
}

#[tokio::test]
async fn history_is_left_untouched() {
    let model = ScriptedModel::replying("reply");
    let generator = ResponseGenerator::new(&model);
    let history = history();
    let before = history.clone();

    generator.get_response("question", &history).await.unwrap();
    assert_eq!(history, before);
}

#[tokio::test]
async fn rendered_prompt_matches_what_is_sent() {
    let model = ScriptedModel::replying("ok");
    let generator = ResponseGenerator::new(&model);
    let history = history();

    let first = generator.render_prompt("same?", &history);
    let second = generator.render_prompt("same?", &history);
    assert_eq!(first, second);
    assert!(model.prompts().is_empty());

    generator.get_response("same?", &history).await.unwrap();
    assert_eq!(model.prompts(), vec![first]);
}

#[tokio::test]
async fn errors_propagate_unchanged() {
    let model = ScriptedModel::failing(|| LLMError::RateLimitError("slow down".into()));
    let generator = ResponseGenerator::new(&model);

    let err = generator.get_response("Hello", &history()).await.unwrap_err();
    assert!(matches!(err, LLMError::RateLimitError(ref msg) if msg == "slow down"));
}

#[tokio::test]
async fn events_bracket_the_call_on_success_and_failure() {
    let ok = ScriptedModel::replying("fine");
    let mut events = Vec::new();
    ResponseGenerator::new(&ok)
        .get_response_observed("Hello", &[], |e| events.push(e))
        .await
        .unwrap();
    assert_eq!(events, vec![ResponseEvent::Started, ResponseEvent::Finished]);

    let failing = ScriptedModel::failing(|| LLMError::HttpError("connection refused".into()));
    let mut events = Vec::new();
    let result = ResponseGenerator::new(&failing)
        .get_response_observed("Hello", &[], |e| events.push(e))
        .await;
    assert!(result.is_err());
    assert_eq!(events, vec![ResponseEvent::Started, ResponseEvent::Finished]);
}

#[tokio::test]
async fn custom_template_is_used() {
    let model = ScriptedModel::replying("ok");
    let generator = ResponseGenerator::new(&model)
        .with_template(PromptTemplate::new("Q={{user_question}} H={{chat_history}}"));

    generator.get_response("why", &[]).await.unwrap();
    assert_eq!(model.prompts()[0], "Q=why H=(no previous messages)");
}

use mistral_chat::{
    backends::mistral::Mistral,
    chat::{ChatMessage, ChatProvider},
    config::ModelConfig,
    generator::ResponseGenerator,
};

const LLM_API_KEY_ENV: &str = "MISTRAL_API_KEY";
const MODEL: &str = "mistral-small-latest";

fn live_client(test_name: &str) -> Option<Mistral> {
    let api_key = match std::env::var(LLM_API_KEY_ENV) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("test {test_name} ... ignored, {LLM_API_KEY_ENV} not set");
            return None;
        }
    };
    let config = ModelConfig::builder()
        .api_key(api_key)
        .model(MODEL)
        .temperature(0.7)
        .build()
        .expect("Failed to build config");
    Some(Mistral::from_config(&config).expect("Failed to build Mistral client"))
}

#[tokio::test]
async fn test_mistral_chat() -> Result<(), Box<dyn std::error::Error>> {
    let Some(llm) = live_client("test_mistral_chat") else {
        return Ok(());
    };
    let messages = vec![ChatMessage::user().content("Hello.").build()];
    let response = llm.chat(&messages).await?;
    assert!(
        response.text().is_some_and(|t| !t.is_empty()),
        "Expected response message, got {:?}",
        response.text()
    );
    let usage = response.usage().expect("Expected usage information to be present");
    assert!(usage.total_tokens > 0, "Expected total tokens > 0, got {}", usage.total_tokens);
    Ok(())
}

#[tokio::test]
async fn test_mistral_conversation_turns() -> Result<(), Box<dyn std::error::Error>> {
    let Some(llm) = live_client("test_mistral_conversation_turns") else {
        return Ok(());
    };
    let generator = ResponseGenerator::new(&llm);
    let mut history = Vec::new();

    let question = "My name is Ada. Please remember it.";
    let reply = generator.get_response(question, &history).await?;
    history.push(ChatMessage::user().content(question).build());
    history.push(ChatMessage::assistant().content(reply).build());

    let reply = generator.get_response("What is my name?", &history).await?;
    assert!(reply.contains("Ada"), "Expected the model to recall the name, got {reply}");
    Ok(())
}

#[tokio::test]
async fn test_mistral_rejects_bad_key() {
    // Only reach the live API when the live suite is enabled.
    if live_client("test_mistral_rejects_bad_key").is_none() {
        return;
    }
    let config = ModelConfig::builder()
        .api_key("definitely-not-a-key")
        .model(MODEL)
        .build()
        .expect("Failed to build config");
    let llm = Mistral::from_config(&config).expect("Failed to build Mistral client");
    let err = ResponseGenerator::new(&llm)
        .get_response("Hello", &[])
        .await
        .unwrap_err();
    assert!(err.is_auth_error(), "Expected auth error, got {err}");
}

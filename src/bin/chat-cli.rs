use clap::Parser;
use colored::*;
use mistral_chat::backends::mistral::Mistral;
use mistral_chat::chat::ChatMessage;
use mistral_chat::config::{ModelConfig, API_KEY_ENV};
use mistral_chat::generator::{ResponseEvent, ResponseGenerator};
use mistral_chat::secret_store::SecretStore;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use spinners::{Spinner, Spinners};
use std::io::{self, IsTerminal, Read, Write};

const BUSY_MESSAGE: &str = "Preparing response, please wait...";
const ASK_USAGE: &str = "Usage: chat-cli [chat] <question> or pipe a question on stdin";

/// Command line arguments for the chat CLI
#[derive(Parser)]
#[command(
    name = "chat-cli",
    about = "Chat with a Mistral-backed assistant",
    allow_hyphen_values = true
)]
struct CliArgs {
    /// Command to execute (chat, set, get, delete)
    #[arg(index = 1)]
    command: Option<String>,

    /// Key (and value) for set/get/delete, or the words of a one-shot question
    #[arg(index = 2)]
    rest: Vec<String>,

    /// Model name to use
    #[arg(long)]
    model: Option<String>,

    /// API key; defaults to MISTRAL_API_KEY or the secret store
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL for the API
    #[arg(long)]
    base_url: Option<String>,

    /// Temperature setting
    #[arg(long)]
    temperature: Option<f32>,
}

/// Handles `set`, `get` and `delete`. Returns true if a secret command ran.
fn run_secret_command(args: &CliArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(cmd) = args.command.as_deref() else {
        return Ok(false);
    };
    match cmd {
        "set" => {
            if let [key, value] = args.rest.as_slice() {
                let mut store = SecretStore::new()?;
                store.set(key, value)?;
                println!(
                    "{} Secret '{}' has been set in {}.",
                    "✓".bright_green(),
                    key,
                    store.path().display()
                );
            } else {
                eprintln!("{} Usage: chat-cli set <key> <value>", "Error:".bright_red());
            }
            Ok(true)
        }
        "get" => {
            if let [key] = args.rest.as_slice() {
                let store = SecretStore::new()?;
                match store.get(key) {
                    Some(_) => println!("{}: {}", key, "(set)".bright_green()),
                    None => println!("{} Secret '{}' not found", "!".bright_yellow(), key),
                }
            } else {
                eprintln!("{} Usage: chat-cli get <key>", "Error:".bright_red());
            }
            Ok(true)
        }
        "delete" => {
            if let [key] = args.rest.as_slice() {
                let mut store = SecretStore::new()?;
                store.delete(key)?;
                println!("{} Secret '{}' has been deleted.", "✓".bright_green(), key);
            } else {
                eprintln!("{} Usage: chat-cli delete <key>", "Error:".bright_red());
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Question given on the command line, if any.
///
/// `chat` followed by words asks those words; any other leading word starts
/// the question itself. Returns `None` when only `chat` (or nothing) was given.
fn one_shot_question(command: Option<&str>, rest: &[String]) -> Option<String> {
    let words: Vec<&str> = match command {
        None => return None,
        Some("chat") => rest.iter().map(String::as_str).collect(),
        Some(first) => std::iter::once(first)
            .chain(rest.iter().map(String::as_str))
            .collect(),
    };
    let question = words.join(" ");
    let question = question.trim();
    (!question.is_empty()).then(|| question.to_string())
}

fn build_config(args: &CliArgs) -> Result<ModelConfig, Box<dyn std::error::Error>> {
    let mut builder = ModelConfig::builder();
    if let Some(model) = args.model.clone() {
        builder = builder.model(model);
    }
    if let Some(key) = args.api_key.clone() {
        builder = builder.api_key(key);
    }
    if let Some(url) = args.base_url.clone() {
        builder = builder.base_url(url);
    }
    if let Some(temp) = args.temperature {
        builder = builder.temperature(temp);
    }
    Ok(builder.build()?)
}

/// Runs one generator call with a spinner shown while the model is working.
async fn ask(
    generator: &ResponseGenerator<'_>,
    question: &str,
    history: &[ChatMessage],
) -> Result<String, mistral_chat::error::LLMError> {
    let mut spinner: Option<Spinner> = None;
    generator
        .get_response_observed(question, history, |event| match event {
            ResponseEvent::Started => {
                spinner = Some(Spinner::new(
                    Spinners::Dots12,
                    BUSY_MESSAGE.bright_magenta().to_string(),
                ));
            }
            ResponseEvent::Finished => {
                if let Some(mut sp) = spinner.take() {
                    sp.stop();
                    print!("\r\x1B[K");
                }
            }
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    mistral_chat::init_logging();
    let args = CliArgs::parse();

    if run_secret_command(&args)? {
        return Ok(());
    }

    let config = build_config(&args)?;
    if config.api_key.is_empty() {
        log::warn!("{API_KEY_ENV} is not set; requests will be rejected");
    }
    let llm = Mistral::from_config(&config)?;
    let generator = ResponseGenerator::new(&llm);

    let one_shot = one_shot_question(args.command.as_deref(), &args.rest);

    if one_shot.is_some() || !io::stdin().is_terminal() {
        let question = match one_shot {
            Some(q) => q,
            None => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                input.trim().to_string()
            }
        };
        if question.is_empty() {
            eprintln!("{} {}", "Error:".bright_red(), ASK_USAGE);
            return Ok(());
        }
        match generator.get_response(&question, &[]).await {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("{} {}", "Error:".bright_red(), e),
        }
        return Ok(());
    }

    println!("{}", "Chat with the assistant".bright_cyan());
    println!("Model: {}", config.model.bright_green());
    println!("{}", "Type 'exit' to quit".bright_black());
    println!("{}", "─".repeat(50).bright_black());

    let mut rl = DefaultEditor::new()?;
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        io::stdout().flush()?;
        match rl.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("exit") {
                    println!("{}", "👋 Goodbye!".bright_cyan());
                    break;
                }
                let _ = rl.add_history_entry(trimmed);

                match ask(&generator, trimmed, &history).await {
                    Ok(text) => {
                        println!("{} {}", "> Assistant:".bright_green(), text);
                        history.push(ChatMessage::user().content(trimmed).build());
                        history.push(ChatMessage::assistant().content(text).build());
                    }
                    Err(e) => eprintln!("{} {}", "Error:".bright_red(), e),
                }
                println!("{}", "─".repeat(50).bright_black());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\n{}", "👋 Goodbye!".bright_cyan());
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".bright_red(), err);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn every_word_of_a_bare_question_is_kept() {
        assert_eq!(
            one_shot_question(Some("hello"), &words(&["world", "again"])).as_deref(),
            Some("hello world again")
        );
    }

    #[test]
    fn chat_prefix_is_not_part_of_the_question() {
        assert_eq!(
            one_shot_question(Some("chat"), &words(&["what", "is", "Rust?"])).as_deref(),
            Some("what is Rust?")
        );
    }

    #[test]
    fn no_question_without_words() {
        assert_eq!(one_shot_question(None, &[]), None);
        assert_eq!(one_shot_question(Some("chat"), &[]), None);
        assert_eq!(one_shot_question(Some("chat"), &words(&["  "])), None);
    }

    #[test]
    fn secret_commands_take_positional_key_and_value() {
        let args = CliArgs::parse_from(["chat-cli", "set", "MISTRAL_API_KEY", "sk-x"]);
        assert_eq!(args.command.as_deref(), Some("set"));
        assert_eq!(args.rest, words(&["MISTRAL_API_KEY", "sk-x"]));
    }
}

//! A simple terminal chat that demonstrates how to use `inkflow` as a
//! library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;

use inkflow::ChatSessionBuilder;
use inkflow_openai::{OpenAIConfigBuilder, OpenAIProvider};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return;
    };

    let mut config_builder = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config_builder = config_builder.with_base_url(base_url);
    }
    let provider = OpenAIProvider::new(config_builder.build());

    let mut session_builder = ChatSessionBuilder::with_provider(provider)
        .with_title("Terminal chat")
        .with_system_prompt("You are a helpful assistant.");
    if let Ok(model) = env::var("OPENAI_MODEL") {
        session_builder = session_builder.with_model(model);
    }
    let mut session = session_builder.build();

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match session.send_message(line).await {
            Ok(reply) => reply,
            Err(err) => {
                eprintln!("{}", format!("error: {err}").bright_red());
                continue;
            }
        };

        print!("{}🤖 ", BAR_CHAR.bright_cyan());
        std::io::stdout().flush().unwrap();

        let Some(reveal) = session.begin_reveal(&reply.id) else {
            println!("{}", reply.content.bright_white());
            continue;
        };
        let mut frames = reveal.frames();
        let mut shown = 0;
        loop {
            let frame = frames.borrow_and_update().clone();
            print!("{}", (&frame.text[shown..]).bright_white());
            std::io::stdout().flush().unwrap();
            shown = frame.text.len();
            if frame.status.is_terminal() {
                break;
            }
            if frames.changed().await.is_err() {
                break;
            }
        }
        println!();
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

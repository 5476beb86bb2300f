use dotenvy::dotenv;
use plantguard_sdk::chat::{ChatClient, ChatClientOptions, ChatMessage};
use std::env;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let api_key = env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY must be set");

    let question = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let question = if question.is_empty() {
        "My tomato leaves have yellow spots with brown edges. What could it be?".to_string()
    } else {
        question
    };

    let client = ChatClient::new(ChatClientOptions {
        api_key,
        ..Default::default()
    });

    let reply = client.reply_or_fallback(&[ChatMessage::user(question)]).await;

    println!("{reply}");
}

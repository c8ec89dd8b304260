use crate::models::{ChatConfig, ChatReply};
use crate::services::ChatClient;

pub async fn run(message: String) {
    let client = match ChatConfig::from_env().and_then(ChatClient::new) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    match client.chat(&message, &[]).await {
        ChatReply::Success(content) => println!("🤖 {}", content),
        ChatReply::Failure(message) => {
            eprintln!("❌ {}", message);
            std::process::exit(1);
        }
    }
}

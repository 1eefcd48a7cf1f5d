//! Line-oriented terminal client for the chat relay. Reads turns from
//! stdin, paces replies with the typing delay, and keeps saved chats in
//! the same wholesale store the UI uses.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use neon_chat::client::store::{SavedChat, SavedChatStore};
use neon_chat::client::{ChatSession, RelayClient};

#[derive(Parser)]
#[command(name = "console", about = "Terminal client for the neon-chat relay")]
struct Args {
    /// Relay chat endpoint
    #[arg(long, default_value = "http://localhost:3001/api/chat")]
    url: String,

    /// Character to chat with (Neon, Echo, Nova)
    #[arg(long, default_value = "Neon")]
    character: String,

    /// Persona tone (spicy, cool, funny, nonchalant)
    #[arg(long, default_value = "cool")]
    persona: String,

    /// Saved-chat file override
    #[arg(long)]
    store: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let relay = RelayClient::new(args.url);
    let store = SavedChatStore::new(args.store.unwrap_or_else(SavedChatStore::default_path));
    let mut session = ChatSession::new(args.character, args.persona.to_lowercase());

    println!(
        "{}: {}",
        session.character,
        session.messages().first().map(|t| t.text.as_str()).unwrap_or("")
    );
    println!("Commands: /save /chats /clear /quit");

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();

        match input {
            "" => {}
            "/quit" => break,
            "/clear" => {
                session.clear();
                println!(
                    "{}: {}",
                    session.character,
                    session.messages().first().map(|t| t.text.as_str()).unwrap_or("")
                );
            }
            "/save" => {
                store.push(SavedChat::snapshot(
                    &session.character,
                    &session.persona,
                    "",
                    session.messages(),
                ))?;
                println!("Saved.");
            }
            "/chats" => {
                let chats = store.load();
                if chats.is_empty() {
                    println!("No saved chats.");
                }
                for chat in chats {
                    println!("{}  {} ({})", chat.id, chat.title, chat.character);
                }
            }
            _ => {
                let delay = ChatSession::typing_delay(input);
                match session.send(&relay, input).await {
                    Ok(reply) => {
                        tokio::time::sleep(delay).await;
                        println!("{}: {}", session.character, reply);
                    }
                    Err(err) => {
                        eprintln!("error: {err}");
                        // The fallback line is already in the transcript.
                        if let Some(turn) = session.messages().last() {
                            println!("{}: {}", session.character, turn.text);
                        }
                    }
                }
            }
        }
        prompt()?;
    }

    Ok(())
}

fn prompt() -> io::Result<()> {
    print!("you> ");
    io::stdout().flush()
}

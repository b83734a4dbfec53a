//! Interactive chat loop with readline support.
//!
//! Owns the `ChatSession` for the whole loop, so a pending continuation
//! survives across turns and dies with the process.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{Config, Editor};

use vita_assistant::{Assistant, ChatSession};
use vita_core::UserId;

fn history_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vita").join("chat_history"))
}

pub async fn run(assistant: &Assistant, user: UserId, name: &str) -> Result<()> {
    let config = Config::builder()
        .history_ignore_space(true)
        .history_ignore_dups(true)?
        .build();
    let mut editor: Editor<(), FileHistory> = Editor::with_config(config)?;

    let history = history_path();
    if let Some(ref path) = history {
        let _ = editor.load_history(path);
    }

    println!("Chatting as {name}. Type 'exit' or press Ctrl+D to leave.");

    let mut session = ChatSession::new();

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let message = line.trim();
                if message.is_empty() {
                    continue;
                }
                if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
                    break;
                }
                let _ = editor.add_history_entry(message);

                let reply = assistant.respond(user, message, &mut session).await?;
                println!("\n{reply}\n");
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(anyhow::anyhow!("Error reading input: {e}")),
        }
    }

    if let Some(ref path) = history {
        let _ = editor.save_history(path);
    }

    println!("Goodbye, {name}!");
    Ok(())
}

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::Local;
use memechat_core::{conversation_sessions, default_session_gap, ConversationSession, UiSession};
use memechat_schema::ChatResponse;

use super::client::ChatClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Quit,
    History,
    NewChat,
    Theme,
    Message(String),
}

pub fn parse_input(line: &str) -> ReplInput {
    match line.trim() {
        "" => ReplInput::Empty,
        "/quit" | "/exit" | "quit" | "exit" => ReplInput::Quit,
        "/history" => ReplInput::History,
        "/new" => ReplInput::NewChat,
        "/theme" => ReplInput::Theme,
        text => ReplInput::Message(text.to_string()),
    }
}

pub fn format_reply(response: &ChatResponse) -> String {
    format!(
        "{} {}\n  meme: {}",
        response.emoji, response.answer, response.meme
    )
}

pub fn format_sessions(sessions: &[ConversationSession]) -> String {
    if sessions.is_empty() {
        return "No chat history yet.".to_string();
    }
    sessions
        .iter()
        .map(|session| {
            format!(
                "{}  {} ({} messages)",
                session.started_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                session.title,
                session.turns.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn run_repl(client: &ChatClient) -> Result<()> {
    let mut session = UiSession::new(false);

    println!("memechat REPL connected to {}.", client.base_url());
    println!("Commands: /history /new /theme /quit");
    println!("---");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };

        match parse_input(&line?) {
            ReplInput::Empty => continue,
            ReplInput::Quit => break,
            ReplInput::History => match client.history().await {
                Ok(history) => {
                    let sessions = conversation_sessions(history, default_session_gap());
                    println!("{}", format_sessions(&sessions));
                }
                Err(err) => eprintln!("Error: {err}"),
            },
            ReplInput::NewChat => {
                session.start_new_chat();
                println!("Started a new chat.");
            }
            ReplInput::Theme => {
                let dark = session.toggle_theme();
                println!("Theme: {}", if dark { "dark" } else { "light" });
            }
            ReplInput::Message(text) => {
                let Some(_guard) = session.try_begin_send() else {
                    println!("Still waiting for the previous reply.");
                    continue;
                };
                match client.send(&text).await {
                    Ok(response) => {
                        println!("{}", format_reply(&response));
                        if session.mark_chat_started() {
                            tracing::debug!(chat_id = ?session.current_chat_id(), "new chat started");
                        }
                    }
                    Err(err) if err.is_connectivity() => {
                        eprintln!("{err}");
                    }
                    Err(err) => eprintln!("Error: {err}"),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use memechat_schema::{HistoryRecord, ToneSymbol};

    use super::*;

    #[test]
    fn parses_commands_and_messages() {
        assert_eq!(parse_input("   "), ReplInput::Empty);
        assert_eq!(parse_input("/quit"), ReplInput::Quit);
        assert_eq!(parse_input("exit"), ReplInput::Quit);
        assert_eq!(parse_input("/history"), ReplInput::History);
        assert_eq!(parse_input("/new\n"), ReplInput::NewChat);
        assert_eq!(parse_input("/theme"), ReplInput::Theme);
        assert_eq!(
            parse_input("  tell me a joke "),
            ReplInput::Message("tell me a joke".into())
        );
    }

    #[test]
    fn reply_shows_emoji_answer_and_meme() {
        let response = ChatResponse {
            answer: "ha".into(),
            emoji: ToneSymbol::new("😂"),
            meme: "laugh.jpeg".into(),
            all_memes: vec!["laugh.jpeg".into()],
            timestamp: Utc::now(),
        };
        assert_eq!(format_reply(&response), "😂 ha\n  meme: laugh.jpeg");
    }

    #[test]
    fn sessions_listing() {
        assert_eq!(format_sessions(&[]), "No chat history yet.");

        let record = HistoryRecord {
            message: "hi".into(),
            ai_reply: "hello".into(),
            emoji: ToneSymbol::default(),
            meme_url: "default.jpeg".into(),
            all_memes: vec![],
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let sessions = conversation_sessions(vec![record.clone(), record], default_session_gap());
        let listing = format_sessions(&sessions);
        assert!(listing.contains("hi (2 messages)"));
    }
}

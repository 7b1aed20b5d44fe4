//! Line-oriented chat loop over any async reader/writer (stdin/stdout in the binary).

use anyhow::Result;
use bestar_core::Role;
use chat_widget::{Conversation, ConversationState, SendOutcome, SkipReason};
use media_capture::{AudioRecorder, FileMicrophone, PickedFile};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

const HELP: &str = "commands: /image <path>, /record <audio file>, /stop, /cancel, /time, /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Text(String),
    Image(PathBuf),
    Record(PathBuf),
    Stop,
    Cancel,
    Time,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    if !trimmed.starts_with('/') {
        return ReplCommand::Text(line.trim_end_matches(['\r', '\n']).to_string());
    }
    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (trimmed, ""),
    };
    match (cmd, arg.is_empty()) {
        ("/image", false) => ReplCommand::Image(PathBuf::from(arg)),
        ("/record", false) => ReplCommand::Record(PathBuf::from(arg)),
        ("/stop", _) => ReplCommand::Stop,
        ("/cancel", _) => ReplCommand::Cancel,
        ("/time", _) => ReplCommand::Time,
        ("/help", _) => ReplCommand::Help,
        ("/quit" | "/exit", _) => ReplCommand::Quit,
        _ => ReplCommand::Unknown(trimmed.to_string()),
    }
}

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "bestar",
        Role::System => "!",
    }
}

async fn print_new<W: AsyncWrite + Unpin>(
    conversation: &Conversation,
    printed: &mut usize,
    out: &mut W,
) -> Result<()> {
    let messages = conversation.messages();
    for message in messages.iter().skip(*printed) {
        out.write_all(format!("{}: {}\n", label(message.role), message.text).as_bytes())
            .await?;
    }
    *printed = messages.len();
    out.flush().await?;
    Ok(())
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

fn describe_skip(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Gated => "(register first)\n",
        SkipReason::Busy => "(busy: wait for the reply or /stop the recording)\n",
        SkipReason::EmptyInput => "(nothing to send)\n",
        SkipReason::NotRecording => "(not recording)\n",
        SkipReason::Cancelled => "(recording cancelled)\n",
    }
}

/// Runs registration, then the chat loop until `/quit` or end of input. Any active recording is
/// released on exit.
pub async fn run_chat<R, W>(conversation: &Conversation, input: R, mut out: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut printed = 0;
    print_new(conversation, &mut printed, &mut out).await?;

    while conversation.state() == ConversationState::Gated {
        say(&mut out, "name: ").await?;
        let Some(name) = lines.next_line().await? else {
            return Ok(());
        };
        say(&mut out, "phone: ").await?;
        let Some(phone) = lines.next_line().await? else {
            return Ok(());
        };
        match conversation.register(&name, &phone) {
            Ok(identity) => {
                say(&mut out, &format!("registered as {}\n", identity.display_name)).await?
            }
            Err(e) => say(&mut out, &format!("{}\n", e)).await?,
        }
    }
    say(&mut out, &format!("{}\n", HELP)).await?;

    loop {
        say(&mut out, "> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let outcome = match parse_command(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                say(&mut out, &format!("{}\n", HELP)).await?;
                continue;
            }
            ReplCommand::Unknown(cmd) => {
                say(&mut out, &format!("unknown command {}; {}\n", cmd, HELP)).await?;
                continue;
            }
            ReplCommand::Time => {
                let text = conversation
                    .recording_elapsed()
                    .unwrap_or_else(|| "not recording".to_string());
                say(&mut out, &format!("{}\n", text)).await?;
                continue;
            }
            ReplCommand::Cancel => {
                let text = if conversation.cancel_recording() {
                    "recording discarded\n"
                } else {
                    "not recording\n"
                };
                say(&mut out, text).await?;
                continue;
            }
            ReplCommand::Text(text) => conversation.send_text(&text).await,
            ReplCommand::Image(path) => match PickedFile::from_path(&path).await {
                Ok(file) => conversation.send_image(file).await,
                Err(e) => {
                    say(&mut out, &format!("cannot read {}: {}\n", path.display(), e)).await?;
                    continue;
                }
            },
            ReplCommand::Record(path) => {
                let recorder = AudioRecorder::new(Arc::new(FileMicrophone::new(path)));
                conversation.start_recording_with(&recorder).await
            }
            ReplCommand::Stop => conversation.stop_recording().await,
        };

        match outcome {
            SendOutcome::Skipped(reason) => say(&mut out, describe_skip(reason)).await?,
            SendOutcome::Recording => say(&mut out, "recording... /stop to send\n").await?,
            SendOutcome::Delivered | SendOutcome::Rejected(_) => {}
        }
        print_new(conversation, &mut printed, &mut out).await?;
    }

    conversation.shutdown();
    info!("step: chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bestar_core::{Envelope, Reply};
    use session_store::InMemorySessionStore;
    use webhook_client::ChatTransport;

    struct Echo;

    #[async_trait]
    impl ChatTransport for Echo {
        async fn send(&self, envelope: &Envelope) -> Reply {
            Reply::new(format!("echo {}", envelope.message_text))
        }
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("hello there"), ReplCommand::Text("hello there".to_string()));
        assert_eq!(parse_command("   "), ReplCommand::Empty);
        assert_eq!(
            parse_command("/image ./proof.png"),
            ReplCommand::Image(PathBuf::from("./proof.png"))
        );
        assert_eq!(
            parse_command("/record voice.webm"),
            ReplCommand::Record(PathBuf::from("voice.webm"))
        );
        assert_eq!(parse_command("/image"), ReplCommand::Unknown("/image".to_string()));
        assert_eq!(parse_command("/stop"), ReplCommand::Stop);
        assert_eq!(parse_command("/quit"), ReplCommand::Quit);
    }

    #[tokio::test]
    async fn test_chat_session() {
        let conversation = Conversation::new(Arc::new(InMemorySessionStore::new()), Arc::new(Echo));
        let input: &[u8] =
            b"Ahmed\n01012345678\nAhmed Mohamed\n01012345678\nhi\n/stop\n/record /nonexistent/voice.webm\n/quit\n";
        let mut out = Vec::new();

        run_chat(&conversation, input, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Name must contain at least two words"));
        assert!(out.contains("registered as Ahmed Mohamed"));
        assert!(out.contains("you: hi\n"));
        assert!(out.contains("bestar: echo hi\n"));
        assert!(out.contains("(not recording)"));
        assert!(out.contains(&format!("!: {}", conversation.texts().permission_denied)));
        assert_eq!(conversation.state(), ConversationState::Idle);
    }
}

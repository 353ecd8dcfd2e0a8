//! Line-oriented chat adapter: one command per input line, one reply per command.
//!
//! Used by `coinbot console` over stdin/stdout and by tests over in-memory buffers.
use super::commands::{self, BotCommand, CommandParser};
use crate::games::GameEngine;
use crate::storage::UserId;
use log::{debug, info};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub struct ConsoleSession {
    engine: Arc<GameEngine>,
    parser: CommandParser,
    user_id: UserId,
}

impl ConsoleSession {
    pub fn new(engine: Arc<GameEngine>, prefix: &str, user_id: UserId) -> Self {
        Self {
            engine,
            parser: CommandParser::new(prefix),
            user_id,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Reply for one input line, or `None` for a blank line.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return None;
        }
        let prefix = self.parser.prefix();
        let reply = match self.parser.parse(line) {
            BotCommand::Start => {
                let record = self.engine.ensure_ready(self.user_id).await;
                commands::start_text(prefix, &record)
            }
            BotCommand::Help => commands::help_text(prefix, self.engine.has_oracle()),
            BotCommand::Balance => {
                let record = self.engine.ensure_ready(self.user_id).await;
                commands::balance_text(&record)
            }
            BotCommand::Play(kind) => {
                let result = self.engine.play(self.user_id, kind).await;
                if let Err(e) = &result {
                    debug!("{} for user {}: {}", kind, self.user_id, e);
                }
                commands::render_result(&result)
            }
            BotCommand::Unknown => commands::unknown_text(prefix),
        };
        Some(reply)
    }

    /// Serve lines from `reader` until EOF, writing each reply followed by a blank line.
    /// Returns the number of commands handled.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut handled = 0usize;
        while let Some(line) = lines.next_line().await? {
            if let Some(reply) = self.handle_line(&line).await {
                writer.write_all(reply.as_bytes()).await?;
                writer.write_all(b"\n\n").await?;
                writer.flush().await?;
                handled += 1;
            }
        }
        info!(
            "Console session for user {} ended after {} command(s)",
            self.user_id, handled
        );
        Ok(handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PlayerStore;

    fn session(dir: &tempfile::TempDir) -> ConsoleSession {
        let store = Arc::new(PlayerStore::new(dir.path().join("users.json")));
        ConsoleSession::new(Arc::new(GameEngine::new(store)), "/", 7)
    }

    #[tokio::test]
    async fn blank_lines_get_no_reply() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir);
        assert!(s.handle_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn start_shows_zero_balance_for_new_user() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir);
        let reply = s.handle_line("/start").await.unwrap();
        assert!(reply.contains("0💰"), "{reply}");
    }

    #[tokio::test]
    async fn run_replies_per_command() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(&dir);
        let input: &[u8] = b"/help\n\nhello\n/balance\n";
        let mut out = Vec::new();
        let handled = s.run(input, &mut out).await.unwrap();
        assert_eq!(handled, 3);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Danh sách lệnh"));
        assert!(text.contains("Mình chưa hiểu"));
        assert!(text.contains("Chuỗi nhận quà: 0 ngày."));
    }
}

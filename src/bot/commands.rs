//! Chat command parsing and reply texts.
//!
//! Commands look like `<prefix><name>[@botname] [args...]`. Matching is case-insensitive
//! and extra arguments are ignored, the way chat platforms deliver slash commands.
use crate::games::{GameError, GameKind, GameResult};
use crate::storage::PlayerRecord;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Balance,
    Play(GameKind),
    /// Text that is not a known command.
    Unknown,
}

pub struct CommandParser {
    prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parse(&self, raw: &str) -> BotCommand {
        let trimmed = raw.trim();
        let Some(body) = trimmed.strip_prefix(self.prefix.as_str()) else {
            return BotCommand::Unknown;
        };
        let word = body.split_whitespace().next().unwrap_or("");
        // "/work@CoinBot" addresses a specific bot in group chats
        let name = word.split('@').next().unwrap_or("").to_ascii_lowercase();

        let cmd = match name.as_str() {
            "start" => BotCommand::Start,
            "help" | "?" => BotCommand::Help,
            "balance" | "bal" | "money" => BotCommand::Balance,
            other => match other.parse::<GameKind>() {
                Ok(kind) => BotCommand::Play(kind),
                Err(_) => BotCommand::Unknown,
            },
        };
        trace!("Parsed {:?} from '{}'", cmd, raw);
        cmd
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new("/")
    }
}

pub fn start_text(prefix: &str, record: &PlayerRecord) -> String {
    format!(
        "Xin chào! Tôi là bot cày tiền với nhiều mini game.\n\
         Dùng {prefix}help để xem danh sách lệnh.\n\
         Hiện bạn đang có {}💰. Chúc may mắn!",
        record.balance
    )
}

/// Command list. The language games are only listed when `language_games` is true.
pub fn help_text(prefix: &str, language_games: bool) -> String {
    let mut lines = vec![
        "Danh sách lệnh có sẵn:".to_string(),
        format!("{prefix}balance - Xem số tiền hiện có"),
        format!("{prefix}work - Làm việc kiếm tiền (20 phút hồi)"),
        format!("{prefix}dice - Chơi xúc xắc may rủi"),
        format!("{prefix}slots - Quay hũ vui vẻ"),
        format!("{prefix}daily - Nhận quà mỗi ngày"),
        format!("{prefix}fish - Chiến dịch câu cá quy mô lớn"),
        format!("{prefix}mine - Khai thác hầm mỏ siêu lợi nhuận"),
    ];
    if language_games {
        lines.push(format!("{prefix}wordchain - Gọi MC nối từ siêu tốc"));
        lines.push(format!("{prefix}vietking - Thử sức cùng Vua Tiếng Việt"));
    }
    lines.join("\n")
}

pub fn balance_text(record: &PlayerRecord) -> String {
    format!(
        "💼 Ví của bạn hiện có {}💰.\nChuỗi nhận quà: {} ngày.",
        record.balance, record.streak
    )
}

pub fn unknown_text(prefix: &str) -> String {
    format!("Mình chưa hiểu tin nhắn đó. Dùng {prefix}help để xem các lệnh hiện có nhé!")
}

pub fn render_result(result: &Result<GameResult, GameError>) -> String {
    match result {
        Ok(r) => r.message.clone(),
        Err(e) => e.user_message().to_string(),
    }
}

//! Chat-facing adapter: turns text commands into engine calls and engine results into
//! reply text. Transport-specific front ends only need to feed lines and send replies.

pub mod commands;
pub mod console;

pub use commands::{BotCommand, CommandParser};
pub use console::ConsoleSession;

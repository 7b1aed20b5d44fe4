//! # bestar-cli
//!
//! Terminal front-end: argument parsing, config loading, the chat REPL.

pub mod cli;
pub mod config;
pub mod repl;

pub use cli::{Cli, Commands, TicketsCommand};
pub use config::CliConfig;
pub use repl::{parse_command, run_chat, ReplCommand};

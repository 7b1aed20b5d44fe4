//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bestar")]
#[command(about = "Be Star chat client: chat, send, tickets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat (webhook URL from BESTAR_WEBHOOK_URL).
    Chat,
    /// Register and send one text message, then print the reply.
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        text: String,
    },
    /// Review tickets on the event backend (BESTAR_API_BASE_URL).
    Tickets {
        /// Overrides BESTAR_ADMIN_EMAIL.
        #[arg(long, global = true)]
        email: Option<String>,
        /// Overrides BESTAR_ADMIN_PASSWORD.
        #[arg(long, global = true)]
        password: Option<String>,
        #[command(subcommand)]
        action: TicketsCommand,
    },
}

#[derive(Subcommand)]
pub enum TicketsCommand {
    /// List tickets, optionally filtered by status (pending, payment_submitted, ...).
    List {
        #[arg(short, long)]
        status: Option<String>,
    },
    Approve {
        id: i64,
    },
    Reject {
        id: i64,
        #[arg(short, long)]
        reason: String,
    },
    /// Activate a ticket code at the door for the given holder.
    Activate {
        code: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Print the dashboard statistics document.
    Stats,
}

//! bestar CLI: chat with the Be Star assistant, send one message, review tickets. Config from env.

use std::sync::Arc;

use admin_api::{Activation, AdminApiClient, TicketStatus};
use anyhow::{Context, Result};
use bestar_cli::{run_chat, Cli, CliConfig, Commands, TicketsCommand};
use bestar_core::init_tracing;
use chat_widget::{Conversation, ConversationTexts};
use clap::Parser;
use session_store::InMemorySessionStore;
use tokio::io::BufReader;
use tracing::info;
use webhook_client::WebhookClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CliConfig::load()?;
    init_tracing(&config.log_file)?;

    match cli.command {
        Commands::Chat => handle_chat(&config).await,
        Commands::Send { name, phone, text } => handle_send(&config, &name, &phone, &text).await,
        Commands::Tickets {
            email,
            password,
            action,
        } => handle_tickets(&config, email, password, action).await,
    }
}

fn build_conversation(config: &CliConfig, texts: ConversationTexts) -> Result<Conversation> {
    let transport = WebhookClient::from_config(&config.webhook).context("Build webhook client")?;
    info!(webhook_url = %transport.url(), "Initializing conversation");
    Ok(
        Conversation::new(Arc::new(InMemorySessionStore::new()), Arc::new(transport))
            .with_texts(texts),
    )
}

async fn handle_chat(config: &CliConfig) -> Result<()> {
    let conversation = build_conversation(config, ConversationTexts::default())?;
    run_chat(
        &conversation,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

async fn handle_send(config: &CliConfig, name: &str, phone: &str, text: &str) -> Result<()> {
    let conversation =
        build_conversation(config, ConversationTexts::default().without_greeting())?;
    conversation
        .register(name, phone)
        .context("Registration rejected")?;
    let outcome = conversation.send_text(text).await;
    if let Some(reason) = outcome.skip_reason() {
        anyhow::bail!("Message not sent: {:?}", reason);
    }
    if let Some(reply) = conversation.messages().last() {
        println!("{}", reply.text);
    }
    Ok(())
}

async fn handle_tickets(
    config: &CliConfig,
    email: Option<String>,
    password: Option<String>,
    action: TicketsCommand,
) -> Result<()> {
    let (email, password) = config.admin_credentials(email, password)?;
    let client = AdminApiClient::from_config(&config.admin);
    client
        .login(&email, &password)
        .await
        .context("Admin login")?;

    match action {
        TicketsCommand::List { status } => {
            let status = status
                .map(|s| s.parse::<TicketStatus>())
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let tickets = client.list_tickets(status).await?;
            if tickets.is_empty() {
                println!("No tickets.");
                return Ok(());
            }
            println!(
                "{:<6} {:<8} {:<8} {:<18} {:<7} {:<24} {}",
                "id", "code", "type", "status", "price", "customer", "phone"
            );
            println!("{}", "-".repeat(96));
            for t in &tickets {
                println!(
                    "{:<6} {:<8} {:<8} {:<18} {:<7} {:<24} {}",
                    t.id,
                    t.code,
                    t.ticket_type.as_str(),
                    t.status,
                    t.price,
                    t.customer_name,
                    t.customer_phone
                );
            }
        }
        TicketsCommand::Approve { id } => {
            let result = client.approve_ticket(id).await?;
            println!("{}", result.message);
        }
        TicketsCommand::Reject { id, reason } => {
            let result = client.reject_ticket(id, &reason).await?;
            println!("{}", result.message);
        }
        TicketsCommand::Activate {
            code,
            phone,
            name,
            email,
        } => {
            let activation = Activation {
                code,
                phone,
                name,
                email,
            };
            let result = client.activate_ticket(&activation).await?;
            println!("{}", result.message);
            if !result.success {
                anyhow::bail!("Activation refused for {}", activation.code);
            }
        }
        TicketsCommand::Stats => {
            let stats = client.dashboard_stats().await?;
            println!("{:#}", stats);
        }
    }
    Ok(())
}

/// Telechat Client - Main entry point
///
/// A command-line shell around the realtime chat synchronization core
use clap::Parser;
use log::{info, warn};
use telechat_client::cli::{self, Command};
use telechat_client::{ChatClient, ClientConfig, Result};
use tokio::io::BufReader;

#[derive(Parser)]
#[command(name = "telechat")]
#[command(about = "Telehealth chat client - realtime 1:1 messaging")]
struct Args {
    /// Server URL (default: http://localhost:4000)
    #[arg(long, default_value = "http://localhost:4000")]
    server: String,

    /// User id for this session
    #[arg(long)]
    user: String,

    /// Auth token attached to the realtime connection
    #[arg(long, default_value = "")]
    token: String,

    /// Peer user id to chat with
    peer: String,

    /// Enable verbose logging (DEBUG level)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    info!("Starting telechat client");
    info!("Server: {}", args.server);
    info!("User: {}", args.user);
    info!("Peer: {}", args.peer);

    let config = ClientConfig::new(args.server, args.user, args.token);
    let client = ChatClient::new(config);

    client.start().await?;
    client.load_conversations().await?;

    run_loop(&client, &args.peer).await?;

    client.stop().await;
    Ok(())
}

/// Interactive command loop: plain text sends to the peer, slash commands
/// drive the rest of the surface
async fn run_loop(client: &ChatClient, peer: &str) -> Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());

    loop {
        let line = match cli::read_line_async(&mut reader).await? {
            Some(line) => line,
            None => break, // EOF
        };
        if line.is_empty() {
            continue;
        }

        let command = match cli::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        match command {
            Command::Message(content) => match client.send_message(peer, &content).await {
                Ok(message) => println!("{}", cli::format_message(&message)),
                Err(e) => warn!("Send failed: {}", e),
            },
            Command::Contacts(query) => {
                for contact in client.search_contacts(&query).await? {
                    println!("{} ({})", contact.name, contact.id);
                }
            }
            Command::List => {
                client.refresh_if_stale().await?;
                for conversation in client.conversations().await {
                    println!("{}", cli::format_conversation(&conversation));
                }
            }
            Command::Read => {
                if let Some(id) = peer_conversation(client, peer).await {
                    client.mark_read(&id).await?;
                }
            }
            Command::Typing(is_typing) => {
                if let Some(id) = peer_conversation(client, peer).await {
                    if let Err(e) = client.set_typing(&id, is_typing).await {
                        warn!("Typing signal failed: {}", e);
                    }
                }
            }
            Command::Quit => break,
        }
    }

    Ok(())
}

async fn peer_conversation(client: &ChatClient, peer: &str) -> Option<String> {
    client
        .conversations()
        .await
        .iter()
        .find(|c| c.participant_ids.iter().any(|p| p == peer))
        .map(|c| c.id.clone())
}

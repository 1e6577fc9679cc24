use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use gameroom_client::{BrokerClient, TransportConfig, host_room, join_room};
use gameroom_core::{GameKind, RoomId};
use rand::Rng;
use std::net::SocketAddr;
use std::time::Duration;

mod handshake;
mod play;

const DEFAULT_SIGNALLER: &str = "ws://127.0.0.1:8080/ws";

#[derive(Parser)]
#[command(name = "gameroom", version, about = "Peer-to-peer casual game room")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum GameArg {
    Tictactoe,
    Connect4,
    Numguess,
}

impl From<GameArg> for GameKind {
    fn from(arg: GameArg) -> Self {
        match arg {
            GameArg::Tictactoe => GameKind::Tictactoe,
            GameArg::Connect4 => GameKind::Connect4,
            GameArg::Numguess => GameKind::Numguess,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Opponent {
    Ai,
    Hotseat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: SocketAddr,
    },

    /// List the rooms a running relay currently knows.
    Rooms {
        #[arg(long, env = "GAMEROOM_SIGNALLER", default_value = DEFAULT_SIGNALLER)]
        signaller: String,
    },

    /// Play locally, against the AI or sharing the keyboard.
    Play {
        #[arg(value_enum)]
        game: GameArg,

        #[arg(long, value_enum, default_value = "ai")]
        opponent: Opponent,
    },

    /// Host a networked game and wait for an opponent.
    Host {
        #[arg(value_enum)]
        game: GameArg,

        /// Room code to create; a random one is generated if omitted.
        #[arg(long)]
        room: Option<String>,

        #[arg(long, env = "GAMEROOM_SIGNALLER", default_value = DEFAULT_SIGNALLER)]
        signaller: String,

        /// Exchange connection blobs by copy-paste instead of using a relay.
        #[arg(long)]
        manual: bool,

        #[arg(long, default_value_t = 30)]
        grace_secs: u64,
    },

    /// Join a hosted game.
    Join {
        #[arg(value_enum)]
        game: GameArg,

        /// Room code to join (required unless --manual).
        #[arg(long)]
        room: Option<String>,

        #[arg(long, env = "GAMEROOM_SIGNALLER", default_value = DEFAULT_SIGNALLER)]
        signaller: String,

        #[arg(long)]
        manual: bool,

        #[arg(long, default_value_t = 30)]
        grace_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { addr } => {
            println!("{}", "🎮 gameroom signaling relay".green().bold());
            gameroom_broker::serve(addr).await
        }

        Commands::Rooms { signaller } => {
            let mut client = BrokerClient::connect(&signaller).await?;
            let rooms = client.rooms().await?;
            client.close().await;
            if rooms.is_empty() {
                println!("No open rooms.");
            } else {
                println!("{}", "Open rooms:".bold());
                for room in rooms {
                    println!("  {}", room.to_string().cyan());
                }
            }
            Ok(())
        }

        Commands::Play { game, opponent } => play::local(game.into(), opponent),

        Commands::Host {
            game,
            room,
            signaller,
            manual,
            grace_secs,
        } => {
            let grace = Duration::from_secs(grace_secs);
            let session = if manual {
                handshake::host_manual(TransportConfig::default(), grace).await?
            } else {
                let room = RoomId::new(room.unwrap_or_else(generate_room_code));
                println!("Room code: {}", room.to_string().cyan().bold());
                let mut client = BrokerClient::connect(&signaller).await?;
                let session = host_room(&mut client, &room, TransportConfig::default(), grace).await?;
                client.close().await;
                session
            };
            println!("{}", "✨ Peer connected!".green().bold());
            play::network(game.into(), session, true).await
        }

        Commands::Join {
            game,
            room,
            signaller,
            manual,
            grace_secs,
        } => {
            let grace = Duration::from_secs(grace_secs);
            let session = if manual {
                handshake::join_manual(TransportConfig::default(), grace).await?
            } else {
                let room = room
                    .ok_or_else(|| anyhow::anyhow!("--room is required unless --manual is set"))?;
                let room = RoomId::new(room);
                let mut client = BrokerClient::connect(&signaller).await?;
                let session = join_room(&mut client, &room, TransportConfig::default(), grace).await?;
                client.close().await;
                session
            };
            println!("{}", "✨ Peer connected!".green().bold());
            play::network(game.into(), session, false).await
        }
    }
}

fn generate_room_code() -> String {
    const ALPHABET: &[u8] = b"abcdefghjkmnpqrstuvwxyz23456789";
    let mut rng = rand::rng();
    (0..6)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

use anyhow::Result;
use colored::*;
use dialoguer::{Confirm, Input};
use gameroom_client::PeerSession;
use gameroom_core::GameKind;
use gameroom_games::{GameEngine, GameSession, Player, SessionUpdate, Winner};

use crate::Opponent;

/// Local session: AI or two players sharing the keyboard.
pub fn local(kind: GameKind, opponent: Opponent) -> Result<()> {
    let mut engine = GameEngine::new(kind);
    println!("{}", format!("— {} —", kind.title()).bold());

    loop {
        render(&engine);

        if let Some(winner) = engine.winner() {
            announce(winner, &engine);
            if confirm_rematch()? {
                engine.reset_round();
                continue;
            }
            break;
        }

        // The AI plays O; the guessing game is a solo affair either way.
        let ai_turn = matches!(opponent, Opponent::Ai)
            && engine.current_player() == Player::O
            && kind != GameKind::Numguess;

        let mv = if ai_turn {
            let Some(mv) = engine.ai_move() else { break };
            println!("{}", format!("AI plays {mv}").dimmed());
            mv
        } else {
            prompt_move(&move_prompt(&engine))?
        };

        if !engine.make_move(mv) {
            println!("{}", "Illegal move, try again.".red());
        }
    }
    Ok(())
}

/// Networked session over an established peer channel. The host plays X.
pub async fn network(kind: GameKind, mut session: PeerSession, initiator: bool) -> Result<()> {
    let mut game = GameSession::new(kind);
    let me = if initiator { Player::X } else { Player::O };
    println!(
        "{}",
        format!("— {} — you are {}", kind.title(), me.symbol()).bold()
    );

    loop {
        render(game.engine());

        if let Some(winner) = game.engine().winner() {
            announce(winner, game.engine());
            if confirm_rematch_async().await? {
                session.send_text(&game.rematch_frame()).await?;
                game.engine_mut().reset_round();
                continue;
            }
            break;
        }

        if my_turn(&game, me, initiator) {
            let prompt = move_prompt(game.engine());
            let mv = prompt_move_async(prompt).await?;
            if !game.engine_mut().make_move(mv) {
                println!("{}", "Illegal move, try again.".red());
                continue;
            }
            session.send_text(&game.serialize_move(mv)).await?;
        } else {
            println!("{}", "Waiting for opponent...".dimmed());
            match session.recv().await {
                Some(frame) => match game.apply_frame(&frame) {
                    SessionUpdate::Applied => {}
                    SessionUpdate::Rematch => {
                        println!("{}", "Opponent requested a rematch.".yellow());
                    }
                    SessionUpdate::Stale => {
                        tracing::debug!("Dropped stale frame: {frame}");
                    }
                    SessionUpdate::Rejected => {
                        tracing::warn!("Rejected inbound frame: {frame}");
                    }
                },
                None => {
                    println!("{}", "Peer disconnected.".red());
                    break;
                }
            }
        }
    }

    session.close().await;
    Ok(())
}

/// Turn ownership. The guessing game has no turn order in its rules, so the
/// networked version alternates guesses by attempt parity, host first.
fn my_turn(game: &GameSession, me: Player, initiator: bool) -> bool {
    match game.active_game() {
        GameKind::Numguess => {
            let attempts = game
                .engine()
                .numguess()
                .map(|g| g.attempts())
                .unwrap_or_default();
            (attempts % 2 == 0) == initiator
        }
        _ => game.engine().current_player() == me,
    }
}

fn move_prompt(engine: &GameEngine) -> String {
    match engine.kind() {
        GameKind::Tictactoe => {
            format!("Player {}, cell (0-8)", engine.current_player().symbol())
        }
        GameKind::Connect4 => {
            format!("Player {}, column (0-6)", engine.current_player().symbol())
        }
        GameKind::Numguess => {
            let remaining = engine.numguess().map(|g| g.remaining()).unwrap_or_default();
            format!("Guess 1-100 ({remaining} attempts left)")
        }
    }
}

fn prompt_move(prompt: &str) -> Result<u32> {
    Ok(Input::<u32>::new().with_prompt(prompt).interact_text()?)
}

async fn prompt_move_async(prompt: String) -> Result<u32> {
    tokio::task::spawn_blocking(move || prompt_move(&prompt)).await?
}

fn confirm_rematch() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Rematch?")
        .default(true)
        .interact()?)
}

async fn confirm_rematch_async() -> Result<bool> {
    tokio::task::spawn_blocking(confirm_rematch).await?
}

fn announce(winner: Winner, engine: &GameEngine) {
    match winner {
        Winner::Draw => println!("{}", "Draw!".yellow().bold()),
        Winner::Player(p) => println!("{}", format!("{} wins!", p.symbol()).green().bold()),
    }
    if let Some(game) = engine.numguess() {
        println!("The number was {}", game.target());
    }
}

fn render(engine: &GameEngine) {
    println!();
    match engine.kind() {
        GameKind::Tictactoe => render_tictactoe(engine),
        GameKind::Connect4 => render_connect4(engine),
        GameKind::Numguess => render_numguess(engine),
    }
    let score = engine.score();
    println!(
        "{}",
        format!("X {} | O {} | draws {}", score.x, score.o, score.draws).dimmed()
    );
}

fn render_tictactoe(engine: &GameEngine) {
    let Some(game) = engine.tictactoe() else { return };
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let i = row * 3 + col;
                match game.cell(i) {
                    Some(Player::X) => "X".red().bold().to_string(),
                    Some(Player::O) => "O".blue().bold().to_string(),
                    None => i.to_string().dimmed().to_string(),
                }
            })
            .collect();
        println!(" {} ", cells.join(" | "));
        if row < 2 {
            println!("---+---+---");
        }
    }
}

fn render_connect4(engine: &GameEngine) {
    let Some(game) = engine.connect4() else { return };
    println!(" {}", (0..7).map(|c| c.to_string()).collect::<Vec<_>>().join(" "));
    for row in 0..6 {
        let cells: Vec<String> = (0..7)
            .map(|col| match game.cell(row, col) {
                Some(Player::X) => "●".red().to_string(),
                Some(Player::O) => "●".yellow().to_string(),
                None => "·".dimmed().to_string(),
            })
            .collect();
        println!(" {}", cells.join(" "));
    }
}

fn render_numguess(engine: &GameEngine) {
    let Some(game) = engine.numguess() else { return };
    println!(
        "Attempts: {} of {}",
        game.attempts(),
        gameroom_games::numguess::MAX_ATTEMPTS
    );
    for &guess in game.guesses() {
        let hint = match guess.cmp(&game.target()) {
            std::cmp::Ordering::Less => "too low".yellow(),
            std::cmp::Ordering::Greater => "too high".yellow(),
            std::cmp::Ordering::Equal => "correct!".green(),
        };
        println!("  {guess} — {hint}");
    }
}

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input;
use gameroom_client::{Bootstrap, PeerSession, RtcEndpoint, TransportConfig};
use gameroom_core::SignalBlob;
use std::sync::Arc;
use std::time::Duration;

/// Manual handshake, offering side: print the offer blob, paste the answer.
pub async fn host_manual(transport: TransportConfig, grace: Duration) -> Result<PeerSession> {
    let (endpoint, events) = RtcEndpoint::new(transport).await?;
    let mut bootstrap = Bootstrap::initiator(Arc::new(endpoint)).with_grace_period(grace);

    println!("{}", "Generating connection offer...".cyan());
    let offer = bootstrap.offer().await?;
    println!();
    println!("{}", "Send this offer to your opponent:".bold());
    println!("{}", offer.encode());
    println!();

    let answer = match prompt_blob("Paste their answer").await {
        Ok(blob) => blob,
        Err(e) => {
            bootstrap.cancel();
            return Err(e);
        }
    };
    bootstrap.apply_answer(answer).await?;

    println!("{}", "Waiting for the channel to open...".cyan());
    Ok(bootstrap.open_session(events).await?)
}

/// Manual handshake, answering side: paste the offer, print the answer blob.
pub async fn join_manual(transport: TransportConfig, grace: Duration) -> Result<PeerSession> {
    let offer = prompt_blob("Paste the host's offer").await?;

    let (endpoint, events) = RtcEndpoint::new(transport).await?;
    let mut bootstrap = Bootstrap::responder(Arc::new(endpoint)).with_grace_period(grace);

    println!("{}", "Generating answer...".cyan());
    let answer = bootstrap.accept(offer).await?;
    println!();
    println!("{}", "Send this answer back to the host:".bold());
    println!("{}", answer.encode());
    println!();

    println!("{}", "Waiting for the channel to open...".cyan());
    Ok(bootstrap.open_session(events).await?)
}

/// Prompt until the pasted text decodes. Malformed input re-prompts instead
/// of aborting; the bootstrap state is untouched while we retry.
async fn prompt_blob(prompt: &str) -> Result<SignalBlob> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || loop {
        let text: String = Input::new()
            .with_prompt(&prompt)
            .interact_text()
            .context("reading pasted blob")?;
        match SignalBlob::decode(text.trim()) {
            Ok(blob) => return Ok(blob),
            Err(e) => println!("{} {e}", "Invalid input:".red()),
        }
    })
    .await
    .context("prompt task failed")?
}

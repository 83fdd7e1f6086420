//! Terminal confirmation channel.
//!
//! Prompts on stderr so stdout stays clean for the JSON report.

use async_trait::async_trait;
use scoresheet_core::{ConfirmationChannel, SwapChoice, SwapPrompt};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

pub struct TerminalConfirmation;

impl TerminalConfirmation {
    fn render(prompt: &SwapPrompt) -> String {
        format!(
            "\nTeam pairing needs confirmation (confidence {}%)\n  \
             left column  -> {} ({} matched)\n  \
             right column -> {} ({} matched)\n\
             [k]eep, [s]wap, anything else cancels: ",
            prompt.confidence,
            prompt.left.name,
            prompt.left.count,
            prompt.right.name,
            prompt.right.count,
        )
    }
}

/// `k` keeps the shown pairing, `s` flips it, anything else cancels
fn parse_answer(answer: &str) -> SwapChoice {
    match answer.trim().to_ascii_lowercase().as_str() {
        "k" | "keep" => SwapChoice::Confirmed { swapped: false },
        "s" | "swap" => SwapChoice::Confirmed { swapped: true },
        _ => SwapChoice::Cancelled,
    }
}

#[async_trait]
impl ConfirmationChannel for TerminalConfirmation {
    async fn present_swap_choice(&self, prompt: &SwapPrompt) -> SwapChoice {
        let mut stderr = io::stderr();
        if let Err(e) = stderr.write_all(Self::render(prompt).as_bytes()).await {
            warn!("Failed to write confirmation prompt: {}", e);
            return SwapChoice::Cancelled;
        }
        let _ = stderr.flush().await;

        let mut line = String::new();
        match BufReader::new(io::stdin()).read_line(&mut line).await {
            // EOF
            Ok(0) => SwapChoice::Cancelled,
            Ok(_) => parse_answer(&line),
            Err(e) => {
                warn!("Failed to read confirmation answer: {}", e);
                SwapChoice::Cancelled
            }
        }
    }

    fn channel_name(&self) -> &str {
        "TerminalConfirmation"
    }
}

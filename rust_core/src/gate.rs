//! Disambiguation Gate
//!
//! Decides whether the resolver's team pairing can be applied as is or
//! needs a human to confirm it.
//!
//! The human step is modelled as a continuation: [`begin`] either
//! resolves immediately or hands back a [`PendingConfirmation`] that owns the
//! pre-gate resolution. Resuming consumes it, so every reconciliation is
//! continued exactly once. [`confirm`] drives the same flow through an async
//! [`ConfirmationChannel`].

use crate::matching::team::TeamResolution;
use crate::models::{TeamComparison, TeamMapping};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One side of the pairing as shown to the human.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSide {
    /// Reference team name the resolver paired with this OCR column
    pub name: String,
    /// Matched entries (players + officials) under that pairing
    pub count: usize,
}

impl From<&TeamComparison> for TeamSide {
    fn from(comparison: &TeamComparison) -> Self {
        Self {
            name: comparison.ref_team_name.clone(),
            count: comparison.match_count(),
        }
    }
}

/// What the human is asked: left is OCR column A, right is OCR column B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPrompt {
    pub left: TeamSide,
    pub right: TeamSide,
    pub confidence: u8,
}

/// Human answer. `swapped` means "flip the sides I was shown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SwapChoice {
    Confirmed { swapped: bool },
    Cancelled,
}

impl SwapChoice {
    /// Cancelling is the same as accepting what was shown
    pub fn user_swapped(&self) -> bool {
        matches!(self, SwapChoice::Confirmed { swapped: true })
    }
}

/// The core's only outward call that waits for an answer.
#[async_trait]
pub trait ConfirmationChannel: Send + Sync {
    async fn present_swap_choice(&self, prompt: &SwapPrompt) -> SwapChoice;

    /// Channel name for logging and debugging
    fn channel_name(&self) -> &str;
}

/// Headless channel: never asks, always falls back to the resolver's guess.
pub struct AcceptResolverChoice;

#[async_trait]
impl ConfirmationChannel for AcceptResolverChoice {
    async fn present_swap_choice(&self, _prompt: &SwapPrompt) -> SwapChoice {
        SwapChoice::Cancelled
    }

    fn channel_name(&self) -> &str {
        "AcceptResolverChoice"
    }
}

/// Handwritten sheets always go to a human, whatever the confidence.
pub fn needs_confirmation(is_confident: bool, is_manuscript: bool) -> bool {
    !is_confident || is_manuscript
}

/// Compose the resolver's guess with the human's flip.
pub fn final_swapped(resolver_swapped: bool, user_swapped: bool) -> bool {
    resolver_swapped ^ user_swapped
}

/// Gate result, ready for display or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    pub mapping: TeamMapping,
    pub needs_confirmation: bool,
    /// Present only when a human was asked
    pub user_choice: Option<SwapChoice>,
}

/// Suspended reconciliation waiting for a human answer.
///
/// Not `Clone`: `resume` takes it by value, so it is continued at most once.
#[derive(Debug)]
pub struct PendingConfirmation {
    resolution: TeamResolution,
    prompt: SwapPrompt,
}

impl PendingConfirmation {
    fn new(resolution: TeamResolution) -> Self {
        let chosen = resolution.chosen();
        let prompt = SwapPrompt {
            left: TeamSide::from(&chosen.team_a),
            right: TeamSide::from(&chosen.team_b),
            confidence: resolution.confidence_score,
        };
        Self { resolution, prompt }
    }

    pub fn prompt(&self) -> &SwapPrompt {
        &self.prompt
    }

    pub fn resolution(&self) -> &TeamResolution {
        &self.resolution
    }

    /// Finalize with the human's answer.
    pub fn resume(self, choice: SwapChoice) -> GateResult {
        let swapped = final_swapped(self.resolution.swapped, choice.user_swapped());
        match choice {
            SwapChoice::Cancelled => {
                info!("Confirmation cancelled, keeping resolver pairing (swapped={})", swapped)
            }
            SwapChoice::Confirmed { swapped: flip } => {
                info!("User confirmed (flip={}), final swapped={}", flip, swapped)
            }
        }

        GateResult {
            mapping: self.resolution.finalize(swapped),
            needs_confirmation: true,
            user_choice: Some(choice),
        }
    }
}

/// Either finished or waiting for a human.
#[derive(Debug)]
pub enum GateOutcome {
    Resolved(GateResult),
    Pending(PendingConfirmation),
}

/// Apply the resolver's pairing directly, or suspend for confirmation.
pub fn begin(resolution: TeamResolution, is_manuscript: bool) -> GateOutcome {
    if !needs_confirmation(resolution.is_confident, is_manuscript) {
        return GateOutcome::Resolved(GateResult {
            mapping: resolution.mapping(),
            needs_confirmation: false,
            user_choice: None,
        });
    }

    warn!(
        "Team pairing needs confirmation (confidence={}, confident={}, manuscript={})",
        resolution.confidence_score, resolution.is_confident, is_manuscript
    );
    GateOutcome::Pending(PendingConfirmation::new(resolution))
}

/// Run the gate, asking `channel` at most once.
pub async fn confirm(
    resolution: TeamResolution,
    is_manuscript: bool,
    channel: &dyn ConfirmationChannel,
) -> GateResult {
    match begin(resolution, is_manuscript) {
        GateOutcome::Resolved(result) => result,
        GateOutcome::Pending(pending) => {
            info!("Asking {} for team pairing", channel.channel_name());
            let choice = channel.present_swap_choice(pending.prompt()).await;
            pending.resume(choice)
        }
    }
}

//! Scoresheet Core - roster extraction and reconciliation for OCR'd
//! volleyball scoresheets.
//!
//! This module provides:
//! - Section-aware parsing of tab/line-delimited OCR text into team rosters
//! - Name normalization and three-tier similarity scoring
//! - Greedy identity matching of OCR rosters against reference rosters
//! - Team assignment resolution when OCR columns may be swapped
//! - A disambiguation gate that escalates low-confidence pairings to a human

pub mod config;
pub mod error;
pub mod gate;
pub mod matching;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod reference;
pub mod utils;

pub use config::ReconcileConfig;
pub use error::{ReconcileError, Result};
pub use gate::{
    confirm, final_swapped, needs_confirmation, AcceptResolverChoice, ConfirmationChannel,
    GateOutcome, GateResult, PendingConfirmation, SwapChoice, SwapPrompt, TeamSide,
};
pub use matching::team::{confidence_score, Hypothesis, TeamResolution, TeamResolver};
pub use matching::{match_team, IdentityMatcher, ScoreContributor, ShirtNumberBonus};
pub use models::*;
pub use parser::{parse_roster, RosterParser};
pub use pipeline::{ReconciliationReport, Reconciler};
pub use reference::{JsonReferenceSource, ReferenceSource, StaticReferenceSource};
pub use utils::matching::{normalize, similarity};

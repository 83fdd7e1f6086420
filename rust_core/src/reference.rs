//! Reference roster sources.
//!
//! This module provides:
//! - The `ReferenceSource` lookup trait (read-only, synchronous)
//! - An in-memory source and a JSON file source
//! - Validation of reference rosters before matching

use crate::error::{ReconcileError, Result};
use crate::models::{ReferencePair, ReferenceTeam, SheetType};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Read-only lookup of the two reference teams for a scoresheet.
pub trait ReferenceSource: Send + Sync {
    fn get_reference_teams(&self, sheet_type: SheetType) -> Result<ReferencePair>;

    /// Source name for logging and debugging
    fn source_name(&self) -> &str;
}

/// Reject rosters that would break the one-claim-per-id guarantee.
pub fn validate_reference_team(team: &ReferenceTeam) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for person in team.players.iter().chain(team.officials.iter()) {
        if person.id.trim().is_empty() {
            return Err(ReconcileError::EmptyReferenceId {
                team: team.name.clone(),
            });
        }
        if !seen.insert(person.id.as_str()) {
            return Err(ReconcileError::DuplicateReferenceId {
                team: team.name.clone(),
                id: person.id.clone(),
            });
        }
    }
    Ok(())
}

/// Fixed pair of teams, whatever the sheet type.
#[derive(Debug, Clone)]
pub struct StaticReferenceSource {
    pair: ReferencePair,
}

impl StaticReferenceSource {
    pub fn new(team_a: ReferenceTeam, team_b: ReferenceTeam) -> Self {
        Self {
            pair: ReferencePair { team_a, team_b },
        }
    }
}

impl ReferenceSource for StaticReferenceSource {
    fn get_reference_teams(&self, _sheet_type: SheetType) -> Result<ReferencePair> {
        Ok(self.pair.clone())
    }

    fn source_name(&self) -> &str {
        "StaticReferenceSource"
    }
}

/// Accepted file layouts: a single pair, or one pair per sheet type.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReferenceFile {
    Single(ReferencePair),
    PerSheet(HashMap<SheetType, ReferencePair>),
}

/// Reference teams loaded from a JSON file.
///
/// ```json
/// { "team_a": { "name": "...", "players": [...] }, "team_b": { ... } }
/// ```
/// or keyed by sheet type: `{ "electronic": { "team_a": ..., "team_b": ... } }`
#[derive(Debug, Clone)]
pub struct JsonReferenceSource {
    shared: Option<ReferencePair>,
    per_sheet: HashMap<SheetType, ReferencePair>,
}

impl JsonReferenceSource {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let source = Self::from_json_str(&content)?;
        info!("Loaded reference rosters from {}", path.display());
        Ok(source)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: ReferenceFile = serde_json::from_str(content)?;
        Ok(match file {
            ReferenceFile::Single(pair) => Self {
                shared: Some(pair),
                per_sheet: HashMap::new(),
            },
            ReferenceFile::PerSheet(per_sheet) => Self {
                shared: None,
                per_sheet,
            },
        })
    }
}

impl ReferenceSource for JsonReferenceSource {
    fn get_reference_teams(&self, sheet_type: SheetType) -> Result<ReferencePair> {
        self.per_sheet
            .get(&sheet_type)
            .or(self.shared.as_ref())
            .cloned()
            .ok_or_else(|| ReconcileError::MissingReferenceTeams(sheet_type.to_string()))
    }

    fn source_name(&self) -> &str {
        "JsonReferenceSource"
    }
}

//! Reconciliation pipeline
//!
//! OCR text -> parser -> reference lookup -> resolver -> gate -> report.
//! Each call is independent; a `Reconciler` holds only immutable
//! configuration and can serve several scoresheets concurrently.

use crate::config::ReconcileConfig;
use crate::error::Result;
use crate::gate::{confirm, ConfirmationChannel, GateResult, SwapChoice};
use crate::matching::team::{TeamResolution, TeamResolver};
use crate::models::{ParsedGameSheet, ReferencePair, SheetType, TeamMapping};
use crate::parser::RosterParser;
use crate::reference::ReferenceSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Everything one reconciliation produced, for display or debug export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub sheet_type: SheetType,
    /// Parser warnings, shown alongside results
    pub warnings: Vec<String>,
    pub needs_confirmation: bool,
    pub user_choice: Option<SwapChoice>,
    pub mapping: TeamMapping,
}

impl ReconciliationReport {
    fn new(sheet_type: SheetType, warnings: Vec<String>, gate: GateResult) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            sheet_type,
            warnings,
            needs_confirmation: gate.needs_confirmation,
            user_choice: gate.user_choice,
            mapping: gate.mapping,
        }
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Reconciler {
    config: ReconcileConfig,
    resolver: TeamResolver,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        let resolver = TeamResolver::from_config(&config);
        Self { config, resolver }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn parse(&self, text: &str, sheet_type: SheetType) -> ParsedGameSheet {
        RosterParser::new(sheet_type)
            .with_header_line_limit(self.config.header_line_limit)
            .parse(text)
    }

    pub fn resolve(&self, sheet: &ParsedGameSheet, refs: &ReferencePair) -> Result<TeamResolution> {
        self.resolver
            .resolve(&sheet.team_a, &sheet.team_b, &refs.team_a, &refs.team_b)
    }

    /// Full run. Suspends on `channel` only when the gate escalates.
    pub async fn reconcile(
        &self,
        text: &str,
        sheet_type: SheetType,
        source: &dyn ReferenceSource,
        channel: &dyn ConfirmationChannel,
    ) -> Result<ReconciliationReport> {
        let sheet = self.parse(text, sheet_type);
        let refs = source.get_reference_teams(sheet_type)?;
        info!(
            "Reference teams from {}: '{}' / '{}'",
            source.source_name(),
            refs.team_a.name,
            refs.team_b.name
        );

        let resolution = self.resolve(&sheet, &refs)?;
        let gate = confirm(resolution, sheet_type.is_manuscript(), channel).await;

        let report = ReconciliationReport::new(sheet_type, sheet.warnings, gate);
        info!(
            "Reconciliation {} done: swapped={} confidence={} ({} + {} matched)",
            report.session_id,
            report.mapping.swapped,
            report.mapping.confidence_score,
            report.mapping.team_a.counts.matched,
            report.mapping.team_b.counts.matched,
        );
        Ok(report)
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::AcceptResolverChoice;
    use crate::models::{ReferencePerson, ReferenceTeam};
    use crate::reference::StaticReferenceSource;

    fn source() -> StaticReferenceSource {
        let mut a = ReferenceTeam::new("BTV Aarau 1");
        a.players.push(ReferencePerson::new("a1", "Maria", "Tortarolo"));
        a.players.push(ReferencePerson::new("a2", "Anna", "Rossi"));
        let mut b = ReferenceTeam::new("VBC NUC");
        b.players.push(ReferencePerson::new("b1", "Lea", "Meier"));
        b.players.push(ReferencePerson::new("b2", "Nina", "Keller"));
        StaticReferenceSource::new(a, b)
    }

    const TEXT: &str = "BTV Aarau 1\tVBC NUC\nN.\tName of the player\n5\tTORTAROLO MARIA\tOK\t3\tMEIER LEA\tOK\n8\tROSSI ANNA\tOK\t9\tKELLER NINA\tOK";

    #[tokio::test]
    async fn test_reconcile_straight() {
        let report = Reconciler::default()
            .reconcile(TEXT, SheetType::Electronic, &source(), &AcceptResolverChoice)
            .await
            .unwrap();

        assert!(!report.mapping.swapped);
        assert!(report.mapping.is_confident);
        assert!(!report.needs_confirmation);
        assert_eq!(report.mapping.team_a.counts.matched, 2);
        assert_eq!(report.mapping.team_b.counts.matched, 2);
        // No officials section on this sheet
        assert_eq!(report.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let report = Reconciler::default()
            .reconcile(TEXT, SheetType::Manuscript, &source(), &AcceptResolverChoice)
            .await
            .unwrap();
        assert!(report.needs_confirmation);

        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sheet_type"], "manuscript");
        assert_eq!(value["mapping"]["team_a"]["player_results"][0]["status"], "match");
        assert_eq!(value["user_choice"]["kind"], "cancelled");
    }
}

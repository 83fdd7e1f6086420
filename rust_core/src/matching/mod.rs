//! Identity Matcher
//!
//! Pairs OCR entries of one team with the entries of one reference team.
//!
//! Matching is greedy best-first in OCR list order: earlier OCR entries get
//! first pick of the unclaimed reference entries. This is not a globally
//! optimal assignment (no Hungarian step); OCR order is the tie-break and
//! must stay that way so results are reproducible.
//!
//! Extra scoring signals plug in through [`ScoreContributor`]; the only one
//! shipped is [`ShirtNumberBonus`], active for sources that advertise
//! reliable shirt numbers.

use crate::config::{ReconcileConfig, DEFAULT_SHIRT_NUMBER_BONUS};
use crate::models::{
    MatchResult, ParsedPerson, ParsedTeam, ReferencePerson, ReferenceTeam, TeamComparison,
};
use crate::utils::matching::similarity;
use tracing::{debug, info};

pub mod team;

/// Additional score applied on top of the weighted name similarity.
pub trait ScoreContributor: Send + Sync {
    /// Whether this contributor applies to entries of the given reference team
    fn supports(&self, team: &ReferenceTeam) -> bool;

    /// Points added to the weighted score for this candidate pair
    fn contribute(&self, ocr: &ParsedPerson, reference: &ReferencePerson) -> f64;

    /// Contributor name for logging and debugging
    fn contributor_name(&self) -> &str;
}

/// Bonus for agreeing shirt numbers. Only meaningful when the reference
/// source actually carries numbers, so it is gated on the team's
/// `shirt_numbers` capability flag.
pub struct ShirtNumberBonus {
    bonus: f64,
}

impl ShirtNumberBonus {
    pub fn new(bonus: f64) -> Self {
        Self { bonus }
    }
}

impl Default for ShirtNumberBonus {
    fn default() -> Self {
        Self::new(DEFAULT_SHIRT_NUMBER_BONUS)
    }
}

impl ScoreContributor for ShirtNumberBonus {
    fn supports(&self, team: &ReferenceTeam) -> bool {
        team.shirt_numbers
    }

    fn contribute(&self, ocr: &ParsedPerson, reference: &ReferencePerson) -> f64 {
        match (ocr.shirt_number, reference.shirt_number) {
            (Some(a), Some(b)) if a == b => self.bonus,
            _ => 0.0,
        }
    }

    fn contributor_name(&self) -> &str {
        "ShirtNumberBonus"
    }
}

/// Greedy weighted-similarity matcher for one OCR team vs one reference team.
pub struct IdentityMatcher {
    match_threshold: f64,
    last_name_weight: f64,
    first_name_weight: f64,
    contributors: Vec<Box<dyn ScoreContributor>>,
}

impl IdentityMatcher {
    /// Matcher with default weights, threshold and the shirt-number bonus
    pub fn new() -> Self {
        Self::from_config(&ReconcileConfig::default())
    }

    pub fn from_config(config: &ReconcileConfig) -> Self {
        let mut contributors: Vec<Box<dyn ScoreContributor>> = Vec::new();
        if config.shirt_number_bonus > 0.0 {
            contributors.push(Box::new(ShirtNumberBonus::new(config.shirt_number_bonus)));
        }

        Self {
            match_threshold: config.match_threshold,
            last_name_weight: config.last_name_weight,
            first_name_weight: config.first_name_weight,
            contributors,
        }
    }

    /// Add a custom score contributor
    pub fn register_contributor(&mut self, contributor: Box<dyn ScoreContributor>) {
        self.contributors.push(contributor);
    }

    pub fn match_threshold(&self) -> f64 {
        self.match_threshold
    }

    /// Weighted name similarity, 0..=100
    pub fn name_score(&self, ocr: &ParsedPerson, reference: &ReferencePerson) -> f64 {
        self.last_name_weight * similarity(&ocr.last_name, &reference.last_name) as f64
            + self.first_name_weight * similarity(&ocr.first_name, &reference.first_name) as f64
    }

    /// Compare one OCR team with one reference team. Never fails: missing
    /// data just produces more `ocr-only` / `ref-only` rows.
    pub fn match_team(&self, ocr_team: &ParsedTeam, ref_team: &ReferenceTeam) -> TeamComparison {
        let active: Vec<&dyn ScoreContributor> = self
            .contributors
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| c.supports(ref_team))
            .collect();

        let player_results = self.match_entries(&ocr_team.players, &ref_team.players, &active);
        let official_results =
            self.match_entries(&ocr_team.officials, &ref_team.officials, &active);

        let comparison = TeamComparison::new(
            ocr_team.name.clone(),
            ref_team.name.clone(),
            player_results,
            official_results,
        );

        info!(
            "Compared '{}' with '{}': {} matched, {} ocr-only, {} ref-only",
            comparison.ocr_team_name,
            comparison.ref_team_name,
            comparison.counts.matched,
            comparison.counts.ocr_only,
            comparison.counts.ref_only,
        );

        comparison
    }

    fn candidate_score(
        &self,
        ocr: &ParsedPerson,
        reference: &ReferencePerson,
        contributors: &[&dyn ScoreContributor],
    ) -> f64 {
        let bonus: f64 = contributors.iter().map(|c| c.contribute(ocr, reference)).sum();
        self.name_score(ocr, reference) + bonus
    }

    fn match_entries(
        &self,
        ocr_entries: &[ParsedPerson],
        ref_entries: &[ReferencePerson],
        contributors: &[&dyn ScoreContributor],
    ) -> Vec<MatchResult> {
        let mut claimed = vec![false; ref_entries.len()];
        let mut results = Vec::with_capacity(ocr_entries.len() + ref_entries.len());

        for ocr in ocr_entries {
            // Strictly greater keeps the earliest reference entry on ties
            let mut best: Option<(usize, f64)> = None;
            for (idx, reference) in ref_entries.iter().enumerate() {
                if claimed[idx] {
                    continue;
                }
                let score = self.candidate_score(ocr, reference, contributors);
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((idx, score));
                }
            }

            match best {
                Some((idx, score)) if score >= self.match_threshold => {
                    claimed[idx] = true;
                    let reference = &ref_entries[idx];
                    let confidence = score.min(100.0).round() as u8;
                    debug!(
                        "Matched '{}' -> '{}' ({}) score {:.1}",
                        ocr.display_name, reference.display_name, reference.id, score
                    );
                    results.push(MatchResult::matched(ocr.clone(), reference.clone(), confidence));
                }
                best => {
                    debug!(
                        "No match for '{}' (best score {:.1})",
                        ocr.display_name,
                        best.map_or(0.0, |(_, s)| s)
                    );
                    results.push(MatchResult::ocr_only(ocr.clone()));
                }
            }
        }

        for (reference, _) in ref_entries.iter().zip(&claimed).filter(|(_, c)| !**c) {
            results.push(MatchResult::ref_only(reference.clone()));
        }

        // Stable: keeps production order within each status
        results.sort_by_key(|r| r.status);
        results
    }
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare with the default matcher
pub fn match_team(ocr_team: &ParsedTeam, ref_team: &ReferenceTeam) -> TeamComparison {
    IdentityMatcher::new().match_team(ocr_team, ref_team)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStatus, OfficialRole};
    use std::collections::HashSet;

    fn ocr_player(last: &str, first: &str) -> ParsedPerson {
        ParsedPerson::player(&format!("{} {}", last, first), None, None)
    }

    fn team(players: Vec<ParsedPerson>) -> ParsedTeam {
        ParsedTeam {
            name: "OCR".to_string(),
            players,
            officials: Vec::new(),
        }
    }

    fn ref_team(players: Vec<ReferencePerson>) -> ReferenceTeam {
        ReferenceTeam {
            name: "REF".to_string(),
            players,
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_match_confidence_100() {
        let cmp = match_team(
            &team(vec![ocr_player("TORTAROLO", "MARIA")]),
            &ref_team(vec![ReferencePerson::new("r1", "Maria", "Tortarolo")]),
        );
        assert_eq!(cmp.player_results.len(), 1);
        assert_eq!(cmp.player_results[0].status, MatchStatus::Match);
        assert_eq!(cmp.player_results[0].confidence, 100);
    }

    #[test]
    fn test_unrelated_is_ocr_only() {
        let cmp = match_team(
            &team(vec![ocr_player("TORTAROLO", "MARIA")]),
            &ref_team(vec![ReferencePerson::new("r1", "John", "Smith")]),
        );
        let statuses: Vec<_> = cmp.player_results.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![MatchStatus::OcrOnly, MatchStatus::RefOnly]);
    }

    #[test]
    fn test_last_name_only_reaches_threshold() {
        // Same last name, no first name on the OCR side: 0.6 * 100 = 60
        let cmp = match_team(
            &team(vec![ParsedPerson::player("ROSSI", None, None)]),
            &ref_team(vec![ReferencePerson::new("r1", "Anna", "Rossi")]),
        );
        assert_eq!(cmp.player_results[0].status, MatchStatus::Match);
        assert_eq!(cmp.player_results[0].confidence, 60);
    }

    #[test]
    fn test_first_name_only_below_threshold() {
        // 0.4 * 100 = 40 < 50
        let cmp = match_team(
            &team(vec![ocr_player("ROSSI", "ANNA")]),
            &ref_team(vec![ReferencePerson::new("r1", "Anna", "Bianchi")]),
        );
        assert_eq!(cmp.player_results[0].status, MatchStatus::OcrOnly);
    }

    #[test]
    fn test_greedy_order_dependence() {
        // Both OCR entries score identically against the single reference
        // entry; the first in OCR order claims it.
        let cmp = match_team(
            &team(vec![ocr_player("ROSSI", "ANNA"), ocr_player("ROSSI", "ANNA")]),
            &ref_team(vec![ReferencePerson::new("r1", "Anna", "Rossi")]),
        );
        assert_eq!(cmp.counts.matched, 1);
        assert_eq!(cmp.counts.ocr_only, 1);
        assert_eq!(cmp.counts.ref_only, 0);
        assert!(cmp.player_results[0].is_match());
    }

    #[test]
    fn test_reference_tie_prefers_earlier_entry() {
        let cmp = match_team(
            &team(vec![ocr_player("ROSSI", "ANNA")]),
            &ref_team(vec![
                ReferencePerson::new("first", "Anna", "Rossi"),
                ReferencePerson::new("second", "Anna", "Rossi"),
            ]),
        );
        let matched = cmp.player_results[0].ref_entry.as_ref().unwrap();
        assert_eq!(matched.id, "first");
    }

    #[test]
    fn test_exclusivity_and_totals() {
        let ocr = team(vec![
            ocr_player("ROSSI", "ANNA"),
            ocr_player("ROSSI", "ANA"),
            ocr_player("BIANCHI", "SARA"),
            ocr_player("VERDI", "GIULIA"),
            ocr_player("UNKNOWN", "PERSON"),
        ]);
        let refs = ref_team(vec![
            ReferencePerson::new("1", "Anna", "Rossi"),
            ReferencePerson::new("2", "Sara", "Bianchi"),
            ReferencePerson::new("3", "Giulia", "Verdi"),
            ReferencePerson::new("4", "Lea", "Meier"),
        ]);
        let cmp = match_team(&ocr, &refs);

        let mut ref_ids = HashSet::new();
        for r in &cmp.player_results {
            if let Some(reference) = &r.ref_entry {
                assert!(ref_ids.insert(reference.id.clone()), "id claimed twice");
            }
        }

        let mut ocr_names = Vec::new();
        for r in &cmp.player_results {
            if let Some(o) = &r.ocr_entry {
                ocr_names.push(o.raw_name.clone());
            }
        }
        assert_eq!(ocr_names.len(), ocr.players.len());

        let unclaimed = cmp.counts.ref_only;
        assert_eq!(cmp.player_results.len(), ocr.players.len() + unclaimed);
        assert_eq!(ref_ids.len(), refs.players.len());
    }

    #[test]
    fn test_results_sorted_by_status() {
        let cmp = match_team(
            &team(vec![
                ocr_player("NOBODY", "HERE"),
                ocr_player("ROSSI", "ANNA"),
                ocr_player("ALSO", "NOBODY"),
            ]),
            &ref_team(vec![
                ReferencePerson::new("1", "Lea", "Meier"),
                ReferencePerson::new("2", "Anna", "Rossi"),
            ]),
        );
        let statuses: Vec<_> = cmp.player_results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                MatchStatus::Match,
                MatchStatus::OcrOnly,
                MatchStatus::OcrOnly,
                MatchStatus::RefOnly
            ]
        );
        // Production order kept within ocr-only
        let names: Vec<_> = cmp.player_results[1..3]
            .iter()
            .map(|r| r.ocr_entry.as_ref().unwrap().last_name.clone())
            .collect();
        assert_eq!(names, vec!["Nobody", "Also"]);
    }

    #[test]
    fn test_officials_never_cross_matched_with_players() {
        let ocr = ParsedTeam {
            name: "OCR".into(),
            players: vec![ocr_player("ROSSI", "MARIO")],
            officials: vec![],
        };
        let refs = ReferenceTeam {
            name: "REF".into(),
            players: vec![],
            officials: vec![ReferencePerson::new("c1", "Mario", "Rossi")],
            shirt_numbers: false,
        };
        let cmp = match_team(&ocr, &refs);
        assert_eq!(cmp.player_results[0].status, MatchStatus::OcrOnly);
        assert_eq!(cmp.official_results[0].status, MatchStatus::RefOnly);
    }

    #[test]
    fn test_official_matching() {
        let ocr = ParsedTeam {
            name: "OCR".into(),
            players: vec![],
            officials: vec![ParsedPerson::official("Mario ROSSI", OfficialRole::C)],
        };
        let refs = ReferenceTeam {
            name: "REF".into(),
            officials: vec![ReferencePerson::new("c1", "Mario", "Rossi")],
            ..Default::default()
        };
        let cmp = match_team(&ocr, &refs);
        assert_eq!(cmp.official_results[0].status, MatchStatus::Match);
        assert_eq!(cmp.official_results[0].confidence, 100);
    }

    #[test]
    fn test_shirt_number_bonus_requires_capability() {
        // Name score 0.4 * 100 = 40, below threshold on its own
        let ocr = team(vec![ParsedPerson::player("ROSSl ANNA", Some(7), None)]);
        let mut refs = ref_team(vec![ReferencePerson::new("1", "Anna", "Bianchi").with_shirt_number(7)]);

        let cmp = match_team(&ocr, &refs);
        assert_eq!(cmp.player_results[0].status, MatchStatus::OcrOnly);

        refs.shirt_numbers = true;
        let cmp = match_team(&ocr, &refs);
        assert_eq!(cmp.player_results[0].status, MatchStatus::Match);
        assert_eq!(cmp.player_results[0].confidence, 80);
    }

    #[test]
    fn test_confidence_capped_at_100() {
        let ocr = team(vec![ParsedPerson::player("ROSSI ANNA", Some(7), None)]);
        let mut refs = ref_team(vec![ReferencePerson::new("1", "Anna", "Rossi").with_shirt_number(7)]);
        refs.shirt_numbers = true;
        let cmp = match_team(&ocr, &refs);
        assert_eq!(cmp.player_results[0].confidence, 100);
    }

    #[test]
    fn test_custom_contributor() {
        struct Always(f64);
        impl ScoreContributor for Always {
            fn supports(&self, _team: &ReferenceTeam) -> bool {
                true
            }
            fn contribute(&self, _ocr: &ParsedPerson, _reference: &ReferencePerson) -> f64 {
                self.0
            }
            fn contributor_name(&self) -> &str {
                "Always"
            }
        }

        let mut matcher = IdentityMatcher::new();
        matcher.register_contributor(Box::new(Always(50.0)));
        let cmp = matcher.match_team(
            &team(vec![ocr_player("SMITH", "JOHN")]),
            &ref_team(vec![ReferencePerson::new("1", "Maria", "Tortarolo")]),
        );
        assert_eq!(cmp.player_results[0].status, MatchStatus::Match);
        assert_eq!(cmp.player_results[0].confidence, 50);
    }

    #[test]
    fn test_empty_inputs() {
        let cmp = match_team(&ParsedTeam::default(), &ReferenceTeam::default());
        assert!(cmp.player_results.is_empty());
        assert!(cmp.official_results.is_empty());
        assert_eq!(cmp.counts.matched, 0);
    }
}

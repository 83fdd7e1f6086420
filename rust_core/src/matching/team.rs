//! Team Assignment Resolver
//!
//! Decides which OCR column belongs to which reference team. Both pairings
//! are matched in full and compared by total match count:
//!
//! - straight: OCR A <-> Ref A, OCR B <-> Ref B
//! - crossed:  OCR A <-> Ref B, OCR B <-> Ref A
//!
//! Ties keep the straight pairing, the layout expected a priori.

use super::IdentityMatcher;
use crate::config::{ReconcileConfig, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SCORE_GAP};
use crate::error::Result;
use crate::models::{ParsedTeam, ReferenceTeam, TeamComparison, TeamMapping};
use crate::reference::validate_reference_team;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One pairing hypothesis, fully matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub swapped: bool,
    /// Comparison for OCR column A
    pub team_a: TeamComparison,
    /// Comparison for OCR column B
    pub team_b: TeamComparison,
    /// Matched players + officials across both comparisons
    pub score: usize,
}

impl Hypothesis {
    fn new(swapped: bool, team_a: TeamComparison, team_b: TeamComparison) -> Self {
        let score = team_a.match_count() + team_b.match_count();
        Self {
            swapped,
            team_a,
            team_b,
            score,
        }
    }
}

/// Resolver output before the disambiguation gate runs.
///
/// Keeps both hypotheses so the gate can finalize either one without
/// re-matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResolution {
    pub straight: Hypothesis,
    pub crossed: Hypothesis,
    /// Resolver's guess
    pub swapped: bool,
    pub confidence_score: u8,
    pub is_confident: bool,
}

impl TeamResolution {
    pub fn hypothesis(&self, swapped: bool) -> &Hypothesis {
        if swapped {
            &self.crossed
        } else {
            &self.straight
        }
    }

    /// The hypothesis the resolver picked
    pub fn chosen(&self) -> &Hypothesis {
        self.hypothesis(self.swapped)
    }

    /// Build the final mapping for a swap decision. Confidence fields always
    /// describe the resolver's own guess.
    pub fn finalize(&self, swapped: bool) -> TeamMapping {
        let hypothesis = self.hypothesis(swapped);
        TeamMapping {
            swapped,
            is_confident: self.is_confident,
            confidence_score: self.confidence_score,
            team_a: hypothesis.team_a.clone(),
            team_b: hypothesis.team_b.clone(),
        }
    }

    /// Mapping under the resolver's own guess
    pub fn mapping(&self) -> TeamMapping {
        self.finalize(self.swapped)
    }
}

/// Confidence (0-100) that the better hypothesis is right.
///
/// Half the score rewards how much matched overall, half rewards how
/// clearly one hypothesis beat the other.
pub fn confidence_score(score_straight: usize, score_crossed: usize, total_possible: usize) -> u8 {
    if total_possible == 0 {
        return 0;
    }
    let max_score = score_straight.max(score_crossed);
    let diff = score_straight.abs_diff(score_crossed);

    let match_ratio = max_score as f64 / total_possible as f64;
    let diff_ratio = diff as f64 / max_score.max(1) as f64;

    (match_ratio * 50.0 + diff_ratio * 50.0).round().clamp(0.0, 100.0) as u8
}

pub struct TeamResolver {
    matcher: IdentityMatcher,
    min_score_gap: usize,
    min_confidence: u8,
}

impl TeamResolver {
    pub fn new() -> Self {
        Self {
            matcher: IdentityMatcher::new(),
            min_score_gap: DEFAULT_MIN_SCORE_GAP,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn from_config(config: &ReconcileConfig) -> Self {
        Self {
            matcher: IdentityMatcher::from_config(config),
            min_score_gap: config.min_score_gap,
            min_confidence: config.min_confidence,
        }
    }

    pub fn matcher(&self) -> &IdentityMatcher {
        &self.matcher
    }

    /// Both a minimum absolute gap and a confidence floor are required
    pub fn is_confident(&self, score_gap: usize, confidence: u8) -> bool {
        score_gap >= self.min_score_gap && confidence >= self.min_confidence
    }

    /// Match both pairings and pick the better one.
    ///
    /// Fails only on unusable reference data (empty or duplicate ids).
    pub fn resolve(
        &self,
        ocr_a: &ParsedTeam,
        ocr_b: &ParsedTeam,
        ref_a: &ReferenceTeam,
        ref_b: &ReferenceTeam,
    ) -> Result<TeamResolution> {
        validate_reference_team(ref_a)?;
        validate_reference_team(ref_b)?;

        let straight = Hypothesis::new(
            false,
            self.matcher.match_team(ocr_a, ref_a),
            self.matcher.match_team(ocr_b, ref_b),
        );
        let crossed = Hypothesis::new(
            true,
            self.matcher.match_team(ocr_a, ref_b),
            self.matcher.match_team(ocr_b, ref_a),
        );

        let swapped = crossed.score > straight.score;
        let total_possible = ocr_a.entry_count() + ocr_b.entry_count();
        let confidence = confidence_score(straight.score, crossed.score, total_possible);
        let is_confident =
            self.is_confident(straight.score.abs_diff(crossed.score), confidence);

        info!(
            "Team assignment: straight {} vs crossed {} of {} -> swapped={} confidence={} confident={}",
            straight.score, crossed.score, total_possible, swapped, confidence, is_confident
        );

        Ok(TeamResolution {
            straight,
            crossed,
            swapped,
            confidence_score: confidence,
            is_confident,
        })
    }
}

impl Default for TeamResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use crate::models::{ParsedPerson, ReferencePerson};

    const NAMES: &[(&str, &str)] = &[
        ("Rossi", "Anna"),
        ("Bianchi", "Sara"),
        ("Verdi", "Giulia"),
        ("Meier", "Lea"),
        ("Keller", "Nina"),
        ("Huber", "Laura"),
        ("Weber", "Julia"),
        ("Fischer", "Sofia"),
        ("Schmid", "Alina"),
        ("Brunner", "Elena"),
        ("Baumann", "Chiara"),
        ("Frei", "Noemi"),
        ("Gerber", "Lara"),
        ("Moser", "Mia"),
        ("Suter", "Emma"),
        ("Graf", "Lena"),
        ("Wyss", "Zoe"),
        ("Roth", "Ella"),
        ("Kunz", "Livia"),
        ("Frey", "Nora"),
    ];

    fn ocr_team(name: &str, names: &[(&str, &str)]) -> ParsedTeam {
        ParsedTeam {
            name: name.to_string(),
            players: names
                .iter()
                .map(|(l, f)| ParsedPerson::player(&format!("{} {}", l, f), None, None))
                .collect(),
            officials: Vec::new(),
        }
    }

    fn ref_team(name: &str, prefix: &str, names: &[(&str, &str)]) -> ReferenceTeam {
        ReferenceTeam {
            name: name.to_string(),
            players: names
                .iter()
                .enumerate()
                .map(|(i, (l, f))| ReferencePerson::new(format!("{}{}", prefix, i), f, l))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_straight_pairing_confident() {
        let a = &NAMES[..10];
        let b = &NAMES[10..19];
        let resolution = TeamResolver::new()
            .resolve(
                &ocr_team("A", a),
                &ocr_team("B", b),
                &ref_team("Ref A", "a", a),
                &ref_team("Ref B", "b", b),
            )
            .unwrap();

        assert_eq!(resolution.straight.score, 19);
        assert_eq!(resolution.crossed.score, 0);
        assert!(!resolution.swapped);
        assert!(resolution.is_confident);
        assert_eq!(resolution.confidence_score, 100);
    }

    #[test]
    fn test_crossed_pairing_detected() {
        let a = &NAMES[..6];
        let b = &NAMES[6..12];
        let resolution = TeamResolver::new()
            .resolve(
                &ocr_team("A", a),
                &ocr_team("B", b),
                &ref_team("Ref B", "b", b),
                &ref_team("Ref A", "a", a),
            )
            .unwrap();

        assert!(resolution.swapped);
        let mapping = resolution.mapping();
        assert!(mapping.swapped);
        assert_eq!(mapping.team_a.ref_team_name, "Ref A");
        assert_eq!(mapping.team_b.ref_team_name, "Ref B");
    }

    #[test]
    fn test_tie_keeps_straight() {
        // Nothing matches either way
        let resolution = TeamResolver::new()
            .resolve(
                &ocr_team("A", &NAMES[..3]),
                &ocr_team("B", &NAMES[3..6]),
                &ref_team("Ref A", "a", &NAMES[10..13]),
                &ref_team("Ref B", "b", &NAMES[13..16]),
            )
            .unwrap();
        assert_eq!(resolution.straight.score, resolution.crossed.score);
        assert!(!resolution.swapped);
        assert!(!resolution.is_confident);

        // Everything matches both ways: same roster on both references
        let same = &NAMES[..4];
        let resolution = TeamResolver::new()
            .resolve(
                &ocr_team("A", same),
                &ocr_team("B", same),
                &ref_team("Ref A", "a", same),
                &ref_team("Ref B", "b", same),
            )
            .unwrap();
        assert_eq!(resolution.straight.score, resolution.crossed.score);
        assert!(!resolution.swapped);
    }

    #[test]
    fn test_confidence_formula() {
        assert_eq!(confidence_score(0, 0, 0), 0);
        assert_eq!(confidence_score(19, 0, 19), 100);
        assert_eq!(confidence_score(0, 0, 10), 0);
        // Many matches, near tie: 50 * 10/10 + 50 * 1/10 = 55
        assert_eq!(confidence_score(10, 9, 10), 55);
        // Few matches, clear winner: 50 * 2/20 + 50 * 2/2 = 55
        assert_eq!(confidence_score(0, 2, 20), 55);
    }

    #[test]
    fn test_small_gap_not_confident() {
        let resolver = TeamResolver::new();
        // Gap of 1 is never enough
        assert!(!resolver.is_confident(1, 100));
        // Gap of 2 with low confidence is not enough either
        assert!(!resolver.is_confident(2, 30));
        assert!(resolver.is_confident(2, 50));
    }

    #[test]
    fn test_duplicate_reference_id_rejected() {
        let mut refs = ref_team("Ref A", "a", &NAMES[..2]);
        refs.players[1].id = refs.players[0].id.clone();
        let err = TeamResolver::new()
            .resolve(
                &ocr_team("A", &NAMES[..2]),
                &ocr_team("B", &NAMES[2..4]),
                &refs,
                &ref_team("Ref B", "b", &NAMES[2..4]),
            )
            .unwrap_err();
        assert!(matches!(err, ReconcileError::DuplicateReferenceId { .. }));
    }

    #[test]
    fn test_finalize_either_side() {
        let a = &NAMES[..5];
        let b = &NAMES[5..10];
        let resolution = TeamResolver::new()
            .resolve(
                &ocr_team("A", a),
                &ocr_team("B", b),
                &ref_team("Ref A", "a", a),
                &ref_team("Ref B", "b", b),
            )
            .unwrap();

        let kept = resolution.finalize(false);
        let flipped = resolution.finalize(true);
        assert_eq!(kept.team_a.ref_team_name, "Ref A");
        assert_eq!(flipped.team_a.ref_team_name, "Ref B");
        assert_eq!(flipped.confidence_score, resolution.confidence_score);
        assert_eq!(flipped.team_a.counts.matched, 0);
    }
}

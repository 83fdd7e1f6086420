//! Configuration constants and environment loading for the reconciliation engine
//!
//! This module manages all engine tunables:
//! - Identity matcher threshold and name weights
//! - Team assignment confidence gate
//! - Shirt-number scoring bonus
//! - Parser header bound

use std::env;

/// Minimum weighted similarity to accept an OCR-to-reference pairing
pub const DEFAULT_MATCH_THRESHOLD: f64 = 50.0;

/// Last names are the more stable OCR signal on these forms
pub const DEFAULT_LAST_NAME_WEIGHT: f64 = 0.6;
pub const DEFAULT_FIRST_NAME_WEIGHT: f64 = 0.4;

/// Minimum absolute match-count gap between the two pairing hypotheses
pub const DEFAULT_MIN_SCORE_GAP: usize = 2;

/// Minimum confidence score (0-100) to skip human confirmation
pub const DEFAULT_MIN_CONFIDENCE: u8 = 50;

/// Added to the weighted score when shirt numbers agree (capable sources only)
pub const DEFAULT_SHIRT_NUMBER_BONUS: f64 = 40.0;

/// Header lines read before the parser assumes the player table started
pub const DEFAULT_HEADER_LINE_LIMIT: usize = 3;

/// Engine tunables
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileConfig {
    pub match_threshold: f64,
    pub last_name_weight: f64,
    pub first_name_weight: f64,
    pub min_score_gap: usize,
    pub min_confidence: u8,
    pub shirt_number_bonus: f64,
    pub header_line_limit: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            last_name_weight: DEFAULT_LAST_NAME_WEIGHT,
            first_name_weight: DEFAULT_FIRST_NAME_WEIGHT,
            min_score_gap: DEFAULT_MIN_SCORE_GAP,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            shirt_number_bonus: DEFAULT_SHIRT_NUMBER_BONUS,
            header_line_limit: DEFAULT_HEADER_LINE_LIMIT,
        }
    }
}

impl ReconcileConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let match_threshold = env::var("MATCH_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_MATCH_THRESHOLD)
            .clamp(0.0, 100.0);

        let last_name_weight = env::var("LAST_NAME_WEIGHT")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_LAST_NAME_WEIGHT)
            .clamp(0.0, 1.0);

        let first_name_weight = env::var("FIRST_NAME_WEIGHT")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_FIRST_NAME_WEIGHT)
            .clamp(0.0, 1.0);

        let min_score_gap = env::var("MIN_SCORE_GAP")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MIN_SCORE_GAP);

        let min_confidence = env::var("MIN_CONFIDENCE")
            .ok()
            .and_then(|v| v.parse::<u8>().ok())
            .unwrap_or(DEFAULT_MIN_CONFIDENCE)
            .min(100);

        let shirt_number_bonus = env::var("SHIRT_NUMBER_BONUS")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_SHIRT_NUMBER_BONUS)
            .clamp(0.0, 100.0);

        let header_line_limit = env::var("HEADER_LINE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_HEADER_LINE_LIMIT)
            .clamp(1, 20);

        Self {
            match_threshold,
            last_name_weight,
            first_name_weight,
            min_score_gap,
            min_confidence,
            shirt_number_bonus,
            header_line_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconcileConfig::default();
        assert_eq!(config.match_threshold, 50.0);
        assert_eq!(config.min_score_gap, 2);
        assert_eq!(config.min_confidence, 50);
        assert_eq!(config.header_line_limit, 3);
        assert!((config.last_name_weight + config.first_name_weight - 1.0).abs() < 1e-9);
    }
}

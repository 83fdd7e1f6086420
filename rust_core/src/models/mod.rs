// Shared models for the scoresheet reconciliation engine
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Sheet & Role Enums
// ============================================================================

/// Kind of scoresheet the OCR text came from.
///
/// Selects the parser's marker dialect and how strict the disambiguation
/// gate is (handwritten sheets always go to a human).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetType {
    #[default]
    Electronic,
    Manuscript,
}

impl SheetType {
    pub fn is_manuscript(&self) -> bool {
        matches!(self, SheetType::Manuscript)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SheetType::Electronic => "electronic",
            SheetType::Manuscript => "manuscript",
        }
    }
}

impl fmt::Display for SheetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SheetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "electronic" | "e-scoresheet" | "digital" => Ok(SheetType::Electronic),
            "manuscript" | "handwritten" | "paper" => Ok(SheetType::Manuscript),
            other => Err(format!("unknown sheet type: {}", other)),
        }
    }
}

/// Bench official role as printed in the officials section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OfficialRole {
    C,
    AC,
    AC2,
    AC3,
    AC4,
    M,
}

impl OfficialRole {
    /// Case-insensitive lookup of a role code. Returns None for anything else.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "C" => Some(OfficialRole::C),
            "AC" => Some(OfficialRole::AC),
            "AC2" => Some(OfficialRole::AC2),
            "AC3" => Some(OfficialRole::AC3),
            "AC4" => Some(OfficialRole::AC4),
            "M" => Some(OfficialRole::M),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LiberoPosition {
    L1,
    L2,
}

impl LiberoPosition {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "L1" => Some(LiberoPosition::L1),
            "L2" => Some(LiberoPosition::L2),
            _ => None,
        }
    }
}

// ============================================================================
// Parsed (OCR) Side
// ============================================================================

/// A player or official as extracted from the OCR text.
///
/// Built once by the parser and never mutated afterwards; later stages wrap
/// it in [`MatchResult`] instead of annotating it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPerson {
    /// Verbatim OCR token the names were derived from
    pub raw_name: String,
    pub last_name: String,
    pub first_name: String,
    pub display_name: String,
    /// Players only. Display field, never used for plain name matching
    pub shirt_number: Option<u32>,
    /// Players only
    pub license_status: Option<String>,
    /// Officials only
    pub role: Option<OfficialRole>,
    pub is_libero: bool,
    pub libero_position: Option<LiberoPosition>,
}

impl ParsedPerson {
    /// Build a player entry from a "LAST First..." token.
    pub fn player(raw_name: &str, shirt_number: Option<u32>, license_status: Option<String>) -> Self {
        let (last_name, first_name) = split_last_name_first(raw_name);
        Self {
            raw_name: raw_name.to_string(),
            display_name: display_name(&first_name, &last_name),
            last_name,
            first_name,
            shirt_number,
            license_status,
            role: None,
            is_libero: false,
            libero_position: None,
        }
    }

    /// Build a libero entry. Same name order as regular players.
    pub fn libero(
        raw_name: &str,
        shirt_number: Option<u32>,
        license_status: Option<String>,
        position: Option<LiberoPosition>,
    ) -> Self {
        Self {
            is_libero: true,
            libero_position: position,
            ..Self::player(raw_name, shirt_number, license_status)
        }
    }

    /// Build an official entry from a "First... LAST" token.
    pub fn official(raw_name: &str, role: OfficialRole) -> Self {
        let (last_name, first_name) = split_first_name_first(raw_name);
        Self {
            raw_name: raw_name.to_string(),
            display_name: display_name(&first_name, &last_name),
            last_name,
            first_name,
            shirt_number: None,
            license_status: None,
            role: Some(role),
            is_libero: false,
            libero_position: None,
        }
    }
}

pub type ParsedPlayer = ParsedPerson;
pub type ParsedOfficial = ParsedPerson;

/// One OCR column of the scoresheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTeam {
    pub name: String,
    /// Regular players and liberos, in source order
    pub players: Vec<ParsedPlayer>,
    pub officials: Vec<ParsedOfficial>,
}

impl ParsedTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of entries that could possibly be matched (players + officials)
    pub fn entry_count(&self) -> usize {
        self.players.len() + self.officials.len()
    }

    pub fn libero_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_libero).count()
    }
}

/// The parser's only output. Always complete, possibly degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedGameSheet {
    pub team_a: ParsedTeam,
    pub team_b: ParsedTeam,
    pub warnings: Vec<String>,
}

// ============================================================================
// Reference Side
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePerson {
    /// Opaque, stable identifier from the reference source
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub shirt_number: Option<u32>,
    #[serde(default)]
    pub is_libero: bool,
}

impl ReferencePerson {
    pub fn new(id: impl Into<String>, first_name: &str, last_name: &str) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            display_name: display_name(first_name, last_name),
            shirt_number: None,
            is_libero: false,
        }
    }

    pub fn with_shirt_number(mut self, number: u32) -> Self {
        self.shirt_number = Some(number);
        self
    }
}

/// A team as known to the reference roster source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTeam {
    pub name: String,
    #[serde(default)]
    pub players: Vec<ReferencePerson>,
    #[serde(default)]
    pub officials: Vec<ReferencePerson>,
    /// Capability flag: the source provides reliable shirt numbers
    #[serde(default)]
    pub shirt_numbers: bool,
}

impl ReferenceTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Both reference teams in the sheet's a-priori "team A / team B" order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePair {
    pub team_a: ReferenceTeam,
    pub team_b: ReferenceTeam,
}

// ============================================================================
// Match Results
// ============================================================================

/// Classification of one row of a comparison. Declaration order is the
/// display order (matches first, reference-only last).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    Match,
    OcrOnly,
    RefOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub status: MatchStatus,
    pub ocr_entry: Option<ParsedPerson>,
    pub ref_entry: Option<ReferencePerson>,
    /// 0..=100
    pub confidence: u8,
}

impl MatchResult {
    pub fn matched(ocr: ParsedPerson, reference: ReferencePerson, confidence: u8) -> Self {
        Self {
            status: MatchStatus::Match,
            ocr_entry: Some(ocr),
            ref_entry: Some(reference),
            confidence: confidence.min(100),
        }
    }

    pub fn ocr_only(ocr: ParsedPerson) -> Self {
        Self {
            status: MatchStatus::OcrOnly,
            ocr_entry: Some(ocr),
            ref_entry: None,
            confidence: 0,
        }
    }

    pub fn ref_only(reference: ReferencePerson) -> Self {
        Self {
            status: MatchStatus::RefOnly,
            ocr_entry: None,
            ref_entry: Some(reference),
            confidence: 0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.status == MatchStatus::Match
    }
}

/// Aggregate per-status counts for one comparison (players + officials).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub matched: usize,
    pub ocr_only: usize,
    pub ref_only: usize,
}

impl StatusCounts {
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a MatchResult>) -> Self {
        let mut counts = Self::default();
        for result in results {
            match result.status {
                MatchStatus::Match => counts.matched += 1,
                MatchStatus::OcrOnly => counts.ocr_only += 1,
                MatchStatus::RefOnly => counts.ref_only += 1,
            }
        }
        counts
    }
}

/// One OCR column compared against one reference team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamComparison {
    pub ocr_team_name: String,
    pub ref_team_name: String,
    pub player_results: Vec<MatchResult>,
    pub official_results: Vec<MatchResult>,
    pub counts: StatusCounts,
}

impl TeamComparison {
    pub fn new(
        ocr_team_name: String,
        ref_team_name: String,
        player_results: Vec<MatchResult>,
        official_results: Vec<MatchResult>,
    ) -> Self {
        let counts = StatusCounts::tally(player_results.iter().chain(official_results.iter()));
        Self {
            ocr_team_name,
            ref_team_name,
            player_results,
            official_results,
            counts,
        }
    }

    /// Matched players + matched officials
    pub fn match_count(&self) -> usize {
        self.counts.matched
    }
}

/// Final left/right pairing of OCR columns with reference teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMapping {
    /// OCR column A is paired with reference team B (and vice versa)
    pub swapped: bool,
    pub is_confident: bool,
    pub confidence_score: u8,
    /// Comparison for OCR column A
    pub team_a: TeamComparison,
    /// Comparison for OCR column B
    pub team_b: TeamComparison,
}

// ============================================================================
// Name Helpers
// ============================================================================

/// Scoresheet player convention: first token is the last name.
fn split_last_name_first(raw: &str) -> (String, String) {
    let mut tokens = raw.split_whitespace();
    let last = tokens.next().map(title_case).unwrap_or_default();
    let first = tokens.map(title_case).collect::<Vec<_>>().join(" ");
    (last, first)
}

/// Official convention: last token is the last name.
fn split_first_name_first(raw: &str) -> (String, String) {
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();
    let last = tokens.pop().map(title_case).unwrap_or_default();
    let first = tokens.into_iter().map(title_case).collect::<Vec<_>>().join(" ");
    (last, first)
}

fn display_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last).trim().to_string()
}

/// "TORTAROLO" -> "Tortarolo", "JEAN-LUC" -> "Jean-Luc", "O'NEIL" -> "O'Neil"
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_start = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if at_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_start = false;
        } else {
            out.push(c);
            at_start = true;
        }
    }
    out
}

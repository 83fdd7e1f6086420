//! Roster Parser
//!
//! Turns raw, tab/line-delimited OCR text into a [`ParsedGameSheet`].
//!
//! Parsing is a section state machine (`Header -> Players -> Libero ->
//! Officials -> Done`). Section changes are driven by markers in the input,
//! checked before the current section's own logic, with precedence:
//! signatures > officials header > libero header > per-section rules.
//!
//! The parser never fails. Malformed input yields a degraded sheet plus
//! human-readable warnings.

pub mod dialect;

use crate::config::DEFAULT_HEADER_LINE_LIMIT;
use crate::models::{
    LiberoPosition, OfficialRole, ParsedGameSheet, ParsedPerson, ParsedTeam, SheetType,
};
use dialect::{get_dialect, SheetDialect};
use tracing::{debug, info, warn};

pub const WARN_NO_PLAYERS_A: &str = "No players found for Team A";
pub const WARN_NO_PLAYERS_B: &str = "No players found for Team B";
pub const WARN_NO_OFFICIALS: &str =
    "No officials found: bench section may not have been recognized";

/// Current section of the scoresheet being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Team names and header noise; `consumed` counts non-blank lines read
    Header { consumed: usize },
    Players,
    Libero,
    Officials,
    /// Terminal. Every further line is ignored
    Done,
}

impl Section {
    pub fn start() -> Self {
        Section::Header { consumed: 0 }
    }
}

/// Which OCR column an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// Something a single line contributed to the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowEvent {
    TeamNames { team_a: String, team_b: Option<String> },
    Player { side: Side, person: ParsedPerson },
    Official { side: Side, person: ParsedPerson },
}

/// Result of feeding one line to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Section,
    pub events: Vec<RowEvent>,
}

impl Transition {
    fn to(next: Section) -> Self {
        Self {
            next,
            events: Vec::new(),
        }
    }
}

/// Section-aware roster parser for one sheet dialect.
#[derive(Debug, Clone)]
pub struct RosterParser {
    dialect: &'static SheetDialect,
    header_line_limit: usize,
}

impl RosterParser {
    pub fn new(sheet_type: SheetType) -> Self {
        Self {
            dialect: get_dialect(sheet_type),
            header_line_limit: DEFAULT_HEADER_LINE_LIMIT,
        }
    }

    /// Override how many header lines are read before assuming players start.
    pub fn with_header_line_limit(mut self, limit: usize) -> Self {
        self.header_line_limit = limit.max(1);
        self
    }

    /// Pure transition function: `(section, line) -> (next section, events)`.
    pub fn step(&self, section: Section, line: &str) -> Transition {
        if section == Section::Done {
            return Transition::to(Section::Done);
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.iter().all(|f| f.is_empty()) {
            return Transition::to(section);
        }

        let upper = line.to_uppercase();

        if self.dialect.is_terminal(&upper) {
            return Transition::to(Section::Done);
        }
        if self.dialect.is_officials_header(&upper) {
            return Transition::to(Section::Officials);
        }
        if self.dialect.is_libero_header(&upper, fields.len()) {
            return Transition::to(Section::Libero);
        }

        match section {
            Section::Header { consumed } => self.step_header(consumed, &upper, &fields),
            Section::Players => self.step_rows(Section::Players, &upper, &fields, player_row),
            Section::Libero => self.step_rows(Section::Libero, &upper, &fields, libero_row),
            Section::Officials => self.step_officials(&upper, &fields),
            Section::Done => Transition::to(Section::Done),
        }
    }

    fn step_header(&self, consumed: usize, upper: &str, fields: &[&str]) -> Transition {
        if self.dialect.is_column_header(upper, fields) {
            return Transition::to(Section::Players);
        }

        let mut events = Vec::new();
        if consumed == 0 {
            // Positional: an empty first field is a missing Team A name
            events.push(RowEvent::TeamNames {
                team_a: fields[0].to_string(),
                team_b: fields.get(1).map(|s| s.to_string()),
            });
        }

        let consumed = consumed + 1;
        let next = if consumed >= self.header_line_limit {
            Section::Players
        } else {
            Section::Header { consumed }
        };

        Transition { next, events }
    }

    fn step_rows(
        &self,
        section: Section,
        upper: &str,
        fields: &[&str],
        row: fn(&[&str]) -> Option<ParsedPerson>,
    ) -> Transition {
        if self.dialect.is_column_header(upper, fields) {
            return Transition::to(section);
        }

        let mut events = Vec::new();
        if let Some(person) = row(fields) {
            events.push(RowEvent::Player { side: Side::A, person });
        }
        if fields.len() > 3 {
            if let Some(person) = row(&fields[3..]) {
                events.push(RowEvent::Player { side: Side::B, person });
            }
        }

        Transition {
            next: section,
            events,
        }
    }

    fn step_officials(&self, upper: &str, fields: &[&str]) -> Transition {
        if self.dialect.is_column_header(upper, fields) {
            return Transition::to(Section::Officials);
        }

        let mut events = Vec::new();
        if let Some(person) = official_row(fields) {
            events.push(RowEvent::Official { side: Side::A, person });
        }
        if fields.len() > 2 {
            if let Some(person) = official_row(&fields[2..]) {
                events.push(RowEvent::Official { side: Side::B, person });
            }
        }

        Transition {
            next: Section::Officials,
            events,
        }
    }

    /// Parse a full OCR text into a game sheet. Never fails.
    pub fn parse(&self, text: &str) -> ParsedGameSheet {
        let mut sheet = ParsedGameSheet::default();
        let mut section = Section::start();

        for (line_no, line) in text.lines().enumerate() {
            let transition = self.step(section, line);
            if transition.next != section && !matches!(transition.next, Section::Header { .. }) {
                debug!(
                    "Line {}: section {:?} -> {:?}",
                    line_no + 1,
                    section,
                    transition.next
                );
            }
            section = transition.next;

            for event in transition.events {
                apply_event(&mut sheet, event);
            }

            if section == Section::Done {
                debug!("Terminal marker on line {}, ignoring the rest", line_no + 1);
                break;
            }
        }

        sheet.warnings = validate(&sheet);
        for warning in &sheet.warnings {
            warn!("{}", warning);
        }

        info!(
            "Parsed {} sheet: A '{}' {} players / {} officials, B '{}' {} players / {} officials",
            self.dialect.sheet_type,
            sheet.team_a.name,
            sheet.team_a.players.len(),
            sheet.team_a.officials.len(),
            sheet.team_b.name,
            sheet.team_b.players.len(),
            sheet.team_b.officials.len(),
        );

        sheet
    }
}

/// Convenience entry point with the default header bound.
pub fn parse_roster(text: &str, sheet_type: SheetType) -> ParsedGameSheet {
    RosterParser::new(sheet_type).parse(text)
}

fn apply_event(sheet: &mut ParsedGameSheet, event: RowEvent) {
    match event {
        RowEvent::TeamNames { team_a, team_b } => {
            sheet.team_a.name = team_a;
            if let Some(team_b) = team_b {
                sheet.team_b.name = team_b;
            }
        }
        RowEvent::Player { side, person } => team_mut(sheet, side).players.push(person),
        RowEvent::Official { side, person } => team_mut(sheet, side).officials.push(person),
    }
}

fn team_mut(sheet: &mut ParsedGameSheet, side: Side) -> &mut ParsedTeam {
    match side {
        Side::A => &mut sheet.team_a,
        Side::B => &mut sheet.team_b,
    }
}

fn validate(sheet: &ParsedGameSheet) -> Vec<String> {
    let mut warnings = Vec::new();
    if sheet.team_a.players.is_empty() {
        warnings.push(WARN_NO_PLAYERS_A.to_string());
    }
    if sheet.team_b.players.is_empty() {
        warnings.push(WARN_NO_PLAYERS_B.to_string());
    }
    if sheet.team_a.officials.is_empty() && sheet.team_b.officials.is_empty() {
        warnings.push(WARN_NO_OFFICIALS.to_string());
    }
    warnings
}

fn non_empty(field: Option<&&str>) -> Option<String> {
    field.filter(|f| !f.is_empty()).map(|f| f.to_string())
}

/// `[shirtNumber, name, license]`
fn player_row(fields: &[&str]) -> Option<ParsedPerson> {
    if fields.len() < 3 {
        return None;
    }
    let number = fields[0].parse::<u32>().ok()?;
    let name = fields[1];
    if name.is_empty() {
        return None;
    }
    Some(ParsedPerson::player(name, Some(number), non_empty(fields.get(2))))
}

/// `[L1|L2, "<number> <name>", license?]`
fn libero_row(fields: &[&str]) -> Option<ParsedPerson> {
    if fields.len() < 2 {
        return None;
    }
    let (number, name) = split_number_prefix(fields[1]);
    if name.is_empty() {
        return None;
    }
    Some(ParsedPerson::libero(
        name,
        number,
        non_empty(fields.get(2)),
        LiberoPosition::parse(fields[0]),
    ))
}

/// `[role, name]`
fn official_row(fields: &[&str]) -> Option<ParsedPerson> {
    if fields.len() < 2 {
        return None;
    }
    let role = OfficialRole::parse(fields[0])?;
    let name = fields[1];
    if name.is_empty() {
        return None;
    }
    Some(ParsedPerson::official(name, role))
}

/// "7 DOE JANE" -> (Some(7), "DOE JANE"); "DOE JANE" -> (None, "DOE JANE")
fn split_number_prefix(field: &str) -> (Option<u32>, &str) {
    let field = field.trim();
    match field.split_once(char::is_whitespace) {
        Some((head, rest)) => match head.parse::<u32>() {
            Ok(n) => (Some(n), rest.trim()),
            Err(_) => (None, field),
        },
        None => match field.parse::<u32>() {
            Ok(n) => (Some(n), ""),
            Err(_) => (None, field),
        },
    }
}

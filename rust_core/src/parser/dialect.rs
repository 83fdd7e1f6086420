//! Section markers per scoresheet format.
//!
//! This module provides:
//! - Static marker tables for electronic and manuscript sheets
//! - Case-insensitive marker recognition used by the section state machine

use crate::models::SheetType;

/// Marker table for one scoresheet format.
#[derive(Debug, Clone)]
pub struct SheetDialect {
    pub sheet_type: SheetType,
    /// Any of these ends parsing for good (signature block)
    pub terminal_markers: &'static [&'static str],
    /// Start of the bench officials section
    pub officials_markers: &'static [&'static str],
    /// Start of the libero section (only on short lines)
    pub libero_marker: &'static str,
    /// Whole-field column header tokens
    pub column_header_fields: &'static [&'static str],
    /// Column header phrases found anywhere in the line
    pub column_header_phrases: &'static [&'static str],
}

/// Static dialects for all supported sheet types.
pub static SHEET_DIALECTS: &[SheetDialect] = &[
    SheetDialect {
        sheet_type: SheetType::Electronic,
        terminal_markers: &["SIGNATURES", "TEAM CAPTAIN"],
        officials_markers: &["OFFICIAL MEMBERS"],
        libero_marker: "LIBERO",
        column_header_fields: &["N."],
        column_header_phrases: &["NAME OF THE PLAYER"],
    },
    // Handwritten forms label the officials block as bench admission
    SheetDialect {
        sheet_type: SheetType::Manuscript,
        terminal_markers: &["SIGNATURES", "TEAM CAPTAIN"],
        officials_markers: &["OFFICIAL MEMBERS", "ADMITTED ON THE BENCH", "BENCH ADMISSION"],
        libero_marker: "LIBERO",
        column_header_fields: &["N.", "NO."],
        column_header_phrases: &["NAME OF THE PLAYER"],
    },
];

/// Get the dialect for a sheet type.
pub fn get_dialect(sheet_type: SheetType) -> &'static SheetDialect {
    SHEET_DIALECTS
        .iter()
        .find(|d| d.sheet_type == sheet_type)
        .unwrap_or(&SHEET_DIALECTS[0])
}

impl SheetDialect {
    pub fn is_terminal(&self, upper_line: &str) -> bool {
        self.terminal_markers.iter().any(|m| upper_line.contains(m))
    }

    pub fn is_officials_header(&self, upper_line: &str) -> bool {
        self.officials_markers.iter().any(|m| upper_line.contains(m))
    }

    /// Libero headers are short; a long row mentioning "libero" is data.
    pub fn is_libero_header(&self, upper_line: &str, field_count: usize) -> bool {
        field_count <= 2 && upper_line.contains(self.libero_marker)
    }

    pub fn is_column_header(&self, upper_line: &str, fields: &[&str]) -> bool {
        let first = fields.first().map(|f| f.to_uppercase()).unwrap_or_default();
        self.column_header_fields.iter().any(|h| first == *h)
            || self.column_header_phrases.iter().any(|p| upper_line.contains(p))
    }
}

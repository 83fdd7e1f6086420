use anyhow::{bail, Context, Result};
use scoresheet_core::SheetType;
use std::env;
use std::path::PathBuf;

/// How a low-confidence or handwritten pairing gets confirmed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmMode {
    /// Ask on the terminal
    Prompt,
    /// Keep the resolver's pairing without asking
    Auto,
}

impl ConfirmMode {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "auto" => Ok(Self::Auto),
            other => bail!("Unknown CONFIRM_MODE '{}' (expected prompt or auto)", other),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub ocr_text_path: PathBuf,
    pub reference_path: PathBuf,
    pub sheet_type: SheetType,
    /// Report goes to stdout when unset
    pub report_path: Option<PathBuf>,
    pub confirm_mode: ConfirmMode,
}

impl Config {
    /// Environment first, then `[ocr_text] [reference]` positional overrides.
    pub fn from_env(args: &[String]) -> Result<Self> {
        let ocr_text_path = args
            .first()
            .cloned()
            .or_else(|| env::var("OCR_TEXT_PATH").ok())
            .context("OCR text path missing: pass it as first argument or set OCR_TEXT_PATH")?;

        let reference_path = args
            .get(1)
            .cloned()
            .or_else(|| env::var("REFERENCE_PATH").ok())
            .context("Reference path missing: pass it as second argument or set REFERENCE_PATH")?;

        let sheet_type = match env::var("SHEET_TYPE") {
            Ok(value) => value
                .parse::<SheetType>()
                .map_err(anyhow::Error::msg)
                .context("Invalid SHEET_TYPE")?,
            Err(_) => SheetType::default(),
        };

        let confirm_mode = match env::var("CONFIRM_MODE") {
            Ok(value) => ConfirmMode::parse(&value)?,
            Err(_) => ConfirmMode::Prompt,
        };

        Ok(Self {
            ocr_text_path: PathBuf::from(ocr_text_path),
            reference_path: PathBuf::from(reference_path),
            sheet_type,
            report_path: env::var("REPORT_PATH").ok().map(PathBuf::from),
            confirm_mode,
        })
    }
}

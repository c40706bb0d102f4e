//! Scan results and the reporters that publish them.
//!
//! A `ScanReport` carries both the structured records (under the `Pack`
//! key) and the Markdown table meant for humans.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;

const TABLE_HEADERS: [&str; 4] = ["name", "id", "is_private_pack", "price"];

/// One pack that passed the cutoff filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSummary {
    pub name: Option<String>,
    pub id: String,
    pub is_private_pack: bool,
    /// The metadata value as written, `0` when absent.
    pub price: Value,
}

impl PackSummary {
    fn table_cells(&self) -> [String; 4] {
        [
            self.name.clone().unwrap_or_default(),
            self.id.clone(),
            self.is_private_pack.to_string(),
            match &self.price {
                Value::String(text) => text.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub cutoff: String,
    pub packs: Vec<PackSummary>,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    #[serde(rename = "Pack")]
    packs: &'a [PackSummary],
    readable_output: String,
}

impl ScanReport {
    pub fn new(cutoff: impl Into<String>, packs: Vec<PackSummary>) -> Self {
        Self {
            cutoff: cutoff.into(),
            packs,
        }
    }

    pub fn title(&self) -> String {
        format!("New Released Packs from {}", self.cutoff)
    }

    pub fn readable_output(&self) -> String {
        let mut out = format!("### {}\n", self.title());
        if self.packs.is_empty() {
            out.push_str("**No entries.**\n");
            return out;
        }
        push_row(&mut out, TABLE_HEADERS.iter().map(|h| h.to_string()));
        push_row(&mut out, TABLE_HEADERS.iter().map(|_| "---".to_string()));
        for pack in &self.packs {
            push_row(&mut out, pack.table_cells().into_iter());
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        let json = ReportJson {
            packs: &self.packs,
            readable_output: self.readable_output(),
        };
        serde_json::to_string_pretty(&json).context("serialize scan report")
    }
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    out.push('|');
    for cell in cells {
        out.push_str(&escape_cell(&cell));
        out.push('|');
    }
    out.push('\n');
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', "<br>")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Where a finished report goes.
pub trait ResultReporter {
    fn report(&mut self, report: &ScanReport) -> Result<()>;
}

pub struct StdoutReporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> StdoutReporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultReporter for StdoutReporter<W> {
    fn report(&mut self, report: &ScanReport) -> Result<()> {
        let text = match self.format {
            OutputFormat::Markdown => report.readable_output(),
            OutputFormat::Json => {
                let mut json = report.to_json()?;
                json.push('\n');
                json
            }
        };
        self.out
            .write_all(text.as_bytes())
            .context("write scan report")?;
        self.out.flush().context("flush scan report")?;
        Ok(())
    }
}

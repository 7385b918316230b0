//! Structured text carcass reports.
//!
//! Reports are plain text: a space tree dump, a cut list and the oracle
//! verdicts, readable in a failing test's output.

use std::fmt;

use carcass_types::{PlacementStrategy, Space};

use crate::helpers::{format_dimensions, HarnessError};
use crate::oracle::{self, OracleVerdict};
use crate::workflow::CabinetBuilder;

/// A complete carcass report with all sections.
pub struct CarcassReport {
    pub name: String,
    pub dimensions: String,
    pub space_entries: Vec<SpaceEntry>,
    pub cut_list: Vec<CutListEntry>,
    pub oracle_results: Vec<OracleVerdict>,
}

/// One node of the space tree.
pub struct SpaceEntry {
    pub depth: usize,
    /// First eight hex digits of the space id.
    pub id_prefix: String,
    pub name: String,
    pub dimensions: String,
    pub position: (f64, f64, f64),
    pub active: bool,
    pub piece_count: usize,
}

/// One panel to cut.
pub struct CutListEntry {
    pub index: usize,
    pub name: String,
    pub piece_type: String,
    pub thickness: f64,
    /// Longer then shorter in-plane extent.
    pub panel: (f64, f64),
    pub strategy: String,
}

impl CarcassReport {
    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Carcass Report: {} ===\n", self.name));
        out.push_str(&format!("Dimensions: {}\n\n", self.dimensions));

        let active = self.space_entries.iter().filter(|e| e.active).count();
        out.push_str(&format!(
            "Space Tree ({} spaces, {} active):\n",
            self.space_entries.len(),
            active,
        ));
        for entry in &self.space_entries {
            let marker = if entry.active { " [ACTIVE]" } else { "" };
            let (x, y, z) = entry.position;
            out.push_str(&format!(
                "{}\"{}\" {} @ ({:.1}, {:.1}, {:.1}), {} pieces [{}]{}\n",
                "  ".repeat(entry.depth + 1),
                entry.name,
                entry.dimensions,
                x,
                y,
                z,
                entry.piece_count,
                entry.id_prefix,
                marker,
            ));
        }

        if self.cut_list.is_empty() {
            out.push_str("\nCut List: empty\n");
        } else {
            out.push_str(&format!("\nCut List ({} panels):\n", self.cut_list.len()));
            for c in &self.cut_list {
                let line = format!(
                    "  [{}] \"{}\" ({}) {:.1} x {:.1}, t={:.1} {}",
                    c.index, c.name, c.piece_type, c.panel.0, c.panel.1, c.thickness, c.strategy,
                );
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }

        let passed = self.oracle_results.iter().filter(|v| v.passed).count();
        out.push_str(&format!(
            "\nOracle Results ({}/{} passed):\n",
            passed,
            self.oracle_results.len()
        ));
        for v in &self.oracle_results {
            let status = if v.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
        }

        out
    }
}

impl fmt::Display for CarcassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl CabinetBuilder {
    /// Generate a complete carcass report.
    pub fn report(&self) -> Result<CarcassReport, HarnessError> {
        let engine = self.engine()?;
        let carcass = engine.carcass();

        let mut space_entries = Vec::new();
        collect_spaces(engine.tree(), 0, &mut space_entries);

        let cut_list = engine
            .pieces()
            .iter()
            .enumerate()
            .map(|(index, piece)| {
                let (panel, strategy) = match piece.placement {
                    Some(placement) => {
                        let (a, b) = piece.piece_type.panel_extents(&placement.dimensions);
                        ((a.max(b), a.min(b)), describe_strategy(placement.strategy))
                    }
                    None => ((0.0, 0.0), "unplaced".to_string()),
                };
                CutListEntry {
                    index,
                    name: piece.name.clone(),
                    piece_type: piece.piece_type.to_string(),
                    thickness: piece.thickness,
                    panel,
                    strategy,
                }
            })
            .collect();

        Ok(CarcassReport {
            name: carcass.name.clone(),
            dimensions: format_dimensions(&carcass.dimensions),
            space_entries,
            cut_list,
            oracle_results: oracle::run_all(engine),
        })
    }
}

fn collect_spaces(space: &Space, depth: usize, out: &mut Vec<SpaceEntry>) {
    out.push(SpaceEntry {
        depth,
        id_prefix: space.id.simple().to_string()[..8].to_string(),
        name: space.name.clone(),
        dimensions: format_dimensions(&space.current_dimensions),
        position: (space.position.x, space.position.y, space.position.z),
        active: space.is_active,
        piece_count: space.pieces.len(),
    });
    for child in space.children() {
        collect_spaces(child, depth + 1, out);
    }
}

fn describe_strategy(strategy: PlacementStrategy) -> String {
    match strategy {
        PlacementStrategy::Nominal => String::new(),
        PlacementStrategy::ReducedThickness { requested } => {
            format!("[REDUCED from {:.1}]", requested)
        }
        PlacementStrategy::Offset => "[OFFSET]".to_string(),
    }
}

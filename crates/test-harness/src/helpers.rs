//! Helper functions: error types, preset cabinets, geometry helpers.

use carcass_engine::ErrorKind;
use carcass_types::{Axis, Dimensions, PieceType};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("piece not found: {name}")]
    PieceNotFound { name: String },

    #[error("space not found: {name}")]
    SpaceNotFound { name: String },

    /// The engine answered the request with an `Error` message.
    #[error("rejected ({kind:?}): {message}")]
    Rejected { kind: ErrorKind, message: String },

    #[error("dispatch error: {message}")]
    DispatchError { message: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },
}

impl HarnessError {
    /// The engine error kind, for rejected requests.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            HarnessError::Rejected { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

// ── Preset Cabinets ─────────────────────────────────────────────────────────

/// Ready-made cabinets used as realistic fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 800 x 2100 x 600 tall kitchen unit: full box, three shelves, one divider.
    KitchenCabinet,
    /// 1200 x 1800 x 300 bookcase with a thin back and four shelves.
    Bookcase,
    /// 600 x 800 x 450 bathroom module split into two compartments.
    BathroomModule,
}

/// One insertion of a preset, in order, into the first active space.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetStep {
    pub name: String,
    pub piece_type: PieceType,
    pub thickness: f64,
}

impl Preset {
    pub const ALL: [Preset; 3] = [
        Preset::KitchenCabinet,
        Preset::Bookcase,
        Preset::BathroomModule,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::KitchenCabinet => "Kitchen Cabinet",
            Preset::Bookcase => "Bookcase",
            Preset::BathroomModule => "Bathroom Module",
        }
    }

    pub fn dimensions(self) -> Dimensions {
        match self {
            Preset::KitchenCabinet => Dimensions::new(800.0, 2100.0, 600.0),
            Preset::Bookcase => Dimensions::new(1200.0, 1800.0, 300.0),
            Preset::BathroomModule => Dimensions::new(600.0, 800.0, 450.0),
        }
    }

    pub fn steps(self) -> Vec<PresetStep> {
        let back = match self {
            Preset::Bookcase => 15.0,
            _ => 18.0,
        };
        let mut steps = vec![
            step("left", PieceType::LateralLeft, 18.0),
            step("right", PieceType::LateralRight, 18.0),
            step("back", PieceType::LateralBack, back),
            step("bottom", PieceType::Bottom, 18.0),
            step("top", PieceType::Top, 18.0),
        ];
        match self {
            Preset::KitchenCabinet => {
                for i in 1..=3 {
                    steps.push(step(&format!("shelf{}", i), PieceType::Shelf, 18.0));
                }
                steps.push(step("divider", PieceType::DividerVertical, 18.0));
            }
            Preset::Bookcase => {
                for i in 1..=4 {
                    steps.push(step(&format!("shelf{}", i), PieceType::Shelf, 18.0));
                }
            }
            Preset::BathroomModule => steps.push(step("shelf", PieceType::Shelf, 18.0)),
        }
        steps
    }
}

fn step(name: &str, piece_type: PieceType, thickness: f64) -> PresetStep {
    PresetStep {
        name: name.to_string(),
        piece_type,
        thickness,
    }
}

// ── Geometry Helpers ────────────────────────────────────────────────────────

/// Largest per-axis difference between two boxes.
pub fn max_dimension_delta(a: &Dimensions, b: &Dimensions) -> f64 {
    Axis::ALL
        .iter()
        .map(|&axis| (a.along(axis) - b.along(axis)).abs())
        .fold(0.0, f64::max)
}

/// `W x H x D` with one decimal.
pub fn format_dimensions(d: &Dimensions) -> String {
    format!("{:.1} x {:.1} x {:.1}", d.width, d.height, d.depth)
}

//! Tunables for the placement calculators.

use serde::{Deserialize, Serialize};

/// Longest raw sheet edge (mm).
pub const RAW_PANEL_MAX_LENGTH: f64 = 2750.0;
/// Shortest raw sheet edge (mm).
pub const RAW_PANEL_MAX_WIDTH: f64 = 1850.0;

/// Usable raw-sheet size any single panel face must fit within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelEnvelope {
    /// Limit for the longer in-plane edge.
    pub max_length: f64,
    /// Limit for the shorter in-plane edge.
    pub max_width: f64,
}

impl Default for PanelEnvelope {
    fn default() -> Self {
        Self {
            max_length: RAW_PANEL_MAX_LENGTH,
            max_width: RAW_PANEL_MAX_WIDTH,
        }
    }
}

/// Configuration for placement, validation and conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Raw-panel envelope every placed piece is checked against.
    pub panel: PanelEnvelope,
    /// Clearance kept between a thinned piece and the piece it conflicts with (mm).
    pub safety_margin: f64,
    /// Thinnest panel the resolver may produce (mm).
    pub min_thickness: f64,
    /// Gap left between stacked pieces by the offset strategy (mm).
    pub stack_gap: f64,
    /// Bounds tolerance for left/right/front/back pieces (mm).
    pub lateral_bounds_margin: f64,
    /// Bounds tolerance for bottom/top pieces (mm).
    pub vertical_bounds_margin: f64,
    /// Faces closer than this count as touching, not overlapping (mm).
    pub overlap_epsilon: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            panel: PanelEnvelope::default(),
            safety_margin: 2.0,
            min_thickness: 1.0,
            stack_gap: 1.0,
            lateral_bounds_margin: 50.0,
            vertical_bounds_margin: 5.0,
            overlap_epsilon: 1e-6,
        }
    }
}

impl PlacementConfig {
    /// No bounds tolerance: offset placements must stay inside the space.
    pub fn strict() -> Self {
        Self {
            lateral_bounds_margin: 0.0,
            vertical_bounds_margin: 0.0,
            ..Self::default()
        }
    }

    /// Wider bounds tolerance for spaces nested deep inside a larger volume.
    pub fn lenient() -> Self {
        Self {
            lateral_bounds_margin: 100.0,
            vertical_bounds_margin: 20.0,
            ..Self::default()
        }
    }
}

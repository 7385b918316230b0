//! Conflict resolution for structural pieces whose nominal box overlaps a
//! piece already placed in the same leaf ancestry.
//!
//! Two strategies are tried in order:
//!
//! 1. **Reduced thickness.** When the piece conflicts with a piece on the
//!    opposite face, thin it to the free distance minus the safety margin
//!    and cut again.
//! 2. **Offset.** Stack it beside the nearest piece of the same type, on
//!    that piece's outer side, leaving the space uncut.
//!
//! Each candidate must clear every existing piece and pass the bounds check.

use carcass_types::{Aabb, Axis, Piece, PieceType, PlacementStrategy, Position, Side, Space};
use tracing::{debug, instrument, warn};

use crate::config::PlacementConfig;
use crate::cut::{compute_cut_with_depth, structural_box};
use crate::types::{check_thickness, ChildBox, OpError, Resolution};
use crate::validate::{find_collisions, is_within_space_bounds};

/// Find a placement for a structural `piece` in `space` that avoids every
/// piece in `existing` (the pieces of the leaf and its ancestors).
#[instrument(level = "debug", skip_all, fields(piece_type = %piece.piece_type, thickness = piece.thickness))]
pub fn resolve_conflict(
    space: &Space,
    existing: &[Piece],
    piece: &Piece,
    config: &PlacementConfig,
) -> Result<Resolution, OpError> {
    let piece_type = piece.piece_type;
    let side = piece_type.face().ok_or_else(|| OpError::InvalidParameter {
        reason: format!("{} cannot be resolved as a structural piece", piece_type),
    })?;
    check_thickness(piece_type, piece.thickness, piece.cut_depth())?;

    let (nominal_position, nominal_dimensions) = structural_box(space, piece_type, piece.thickness)?;
    let nominal = Aabb::from_center(nominal_position, nominal_dimensions);

    if let Some(resolution) = try_reduce(space, existing, piece, side, &nominal, config) {
        return Ok(resolution);
    }
    if let Some(resolution) = try_offset(space, existing, piece, side, nominal_position, config) {
        return Ok(resolution);
    }

    warn!(%piece_type, "conflict could not be resolved");
    Err(OpError::NoValidPlacement {
        piece_type,
        reason: format!(
            "{:.1} mm panel collides with existing pieces and neither thinning nor stacking clears them",
            piece.thickness
        ),
    })
}

fn is_clear(bounds: &Aabb, space: &Space, piece_type: PieceType, existing: &[Piece], config: &PlacementConfig) -> bool {
    find_collisions(bounds, existing, config.overlap_epsilon).is_empty()
        && is_within_space_bounds(space, piece_type, bounds, config)
}

fn try_reduce(
    space: &Space,
    existing: &[Piece],
    piece: &Piece,
    side: Side,
    nominal: &Aabb,
    config: &PlacementConfig,
) -> Option<Resolution> {
    let piece_type = piece.piece_type;
    let opposing = piece_type.opposing()?;
    let axis = piece_type.axis();
    let anchor = space.bounds().face(axis, side);

    // The face of the opposing piece that looks toward our anchor face.
    let distance = find_collisions(nominal, existing, config.overlap_epsilon)
        .into_iter()
        .filter(|p| p.piece_type == opposing)
        .filter_map(|p| p.bounds())
        .map(|b| (anchor - b.face(axis, side)).abs())
        .min_by(|a, b| a.total_cmp(b))?;

    let allowed = distance - config.safety_margin;
    if allowed < config.min_thickness {
        debug!(distance, "not enough room to thin the piece");
        return None;
    }

    let thickness = piece.thickness.min(allowed);
    let cut_depth = if thickness < piece.thickness {
        thickness
    } else {
        piece.cut_depth()
    };
    let cut = match compute_cut_with_depth(space, piece_type, thickness, cut_depth) {
        Ok(cut) => cut,
        Err(e) => {
            debug!(error = %e, "thinned cut failed");
            return None;
        }
    };

    let bounds = Aabb::from_center(cut.piece_position, cut.piece_dimensions);
    if !is_clear(&bounds, space, piece_type, existing, config) {
        debug!(thickness, "thinned piece still collides");
        return None;
    }

    let strategy = if thickness < piece.thickness {
        PlacementStrategy::ReducedThickness {
            requested: piece.thickness,
        }
    } else {
        PlacementStrategy::Nominal
    };
    debug!(requested = piece.thickness, thickness, "piece thinned to fit");
    Some(Resolution {
        piece_position: cut.piece_position,
        piece_dimensions: cut.piece_dimensions,
        thickness,
        strategy,
        space_update: Some(ChildBox {
            dimensions: cut.new_space_dimensions,
            position: cut.new_space_position,
        }),
    })
}

fn try_offset(
    space: &Space,
    existing: &[Piece],
    piece: &Piece,
    side: Side,
    nominal_position: Position,
    config: &PlacementConfig,
) -> Option<Resolution> {
    let piece_type = piece.piece_type;
    let axis = piece_type.axis();
    let target = nominal_position.along(axis);

    let neighbour = existing
        .iter()
        .filter(|p| p.piece_type == piece_type)
        .filter_map(|p| p.bounds())
        .min_by(|a, b| {
            let da = (centre(a, axis) - target).abs();
            let db = (centre(b, axis) - target).abs();
            da.total_cmp(&db)
        })?;

    let half = piece.thickness / 2.0;
    let coord = match side {
        Side::Min => neighbour.face(axis, Side::Min) - config.stack_gap - half,
        Side::Max => neighbour.face(axis, Side::Max) + config.stack_gap + half,
    };
    let position = nominal_position.with(axis, coord);
    let dimensions = space.current_dimensions.with(axis, piece.thickness);
    let bounds = Aabb::from_center(position, dimensions);
    if !is_clear(&bounds, space, piece_type, existing, config) {
        debug!(coord, "stacked position is blocked");
        return None;
    }

    debug!(coord, "piece stacked beside existing panel");
    Some(Resolution {
        piece_position: position,
        piece_dimensions: dimensions,
        thickness: piece.thickness,
        strategy: PlacementStrategy::Offset,
        space_update: None,
    })
}

fn centre(b: &Aabb, axis: Axis) -> f64 {
    (b.face(axis, Side::Min) + b.face(axis, Side::Max)) / 2.0
}

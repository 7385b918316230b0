//! Collision, bounds and raw-panel checks.

use carcass_types::{Aabb, Dimensions, Piece, PieceType, Space};

use crate::config::{PanelEnvelope, PlacementConfig};
use crate::types::{OpError, PanelEdge};

/// Clearance a lateral piece must leave beyond its own thickness (mm).
const LATERAL_CLEARANCE: f64 = 10.0;

/// True when `piece` overlaps any placed piece in `existing`.
///
/// Pieces that only share a face do not collide. A piece never collides
/// with itself, and unplaced pieces are ignored. Overlaps no deeper than
/// `epsilon` are tolerated.
pub fn check_collision(piece: &Piece, existing: &[Piece], epsilon: f64) -> bool {
    let Some(bounds) = piece.bounds() else {
        return false;
    };
    existing
        .iter()
        .filter(|other| other.id != piece.id)
        .any(|other| other.bounds().is_some_and(|b| bounds.overlaps(&b, epsilon)))
}

/// Placed pieces in `existing` whose boxes overlap `bounds`.
pub fn find_collisions<'a>(bounds: &Aabb, existing: &'a [Piece], epsilon: f64) -> Vec<&'a Piece> {
    existing
        .iter()
        .filter(|p| p.bounds().is_some_and(|b| bounds.overlaps(&b, epsilon)))
        .collect()
}

/// Whether a candidate box for `piece_type` is acceptably placed relative to
/// `space`.
///
/// Side, front and back pieces only need to touch the space grown by the
/// lateral margin. Bottom and top must fit inside the space grown by the
/// vertical margin. Shelves and dividers must fit inside the space itself.
pub fn is_within_space_bounds(
    space: &Space,
    piece_type: PieceType,
    bounds: &Aabb,
    config: &PlacementConfig,
) -> bool {
    let space_box = space.bounds();
    match piece_type {
        PieceType::LateralLeft
        | PieceType::LateralRight
        | PieceType::LateralFront
        | PieceType::LateralBack => space_box
            .grown(config.lateral_bounds_margin)
            .overlaps(bounds, 0.0),
        PieceType::Bottom | PieceType::Top => space_box
            .grown(config.vertical_bounds_margin)
            .contains(bounds, 0.0),
        PieceType::Shelf | PieceType::DividerVertical => {
            space_box.contains(bounds, config.overlap_epsilon)
        }
    }
}

/// Check a piece's in-plane extents against the raw-panel envelope.
///
/// The two extents are sorted so the longer is compared with
/// `max_length` and the shorter with `max_width`.
pub fn validate_panel_size(
    piece_type: PieceType,
    dimensions: &Dimensions,
    envelope: &PanelEnvelope,
) -> Result<(), OpError> {
    let (a, b) = piece_type.panel_extents(dimensions);
    let (long, short) = if a >= b { (a, b) } else { (b, a) };

    if long > envelope.max_length {
        return Err(OpError::PanelTooLarge {
            piece_type,
            edge: PanelEdge::Long,
            dimension: long,
            limit: envelope.max_length,
        });
    }
    if short > envelope.max_width {
        return Err(OpError::PanelTooLarge {
            piece_type,
            edge: PanelEdge::Short,
            dimension: short,
            limit: envelope.max_width,
        });
    }
    Ok(())
}

fn consumes_width(piece_type: PieceType) -> bool {
    matches!(piece_type, PieceType::LateralLeft | PieceType::LateralRight)
}

/// Pre-check used before offering a left or right side: the space width left
/// after the sides already in `space` must still fit `thickness` plus a small
/// clearance. Other piece types always pass.
pub fn can_insert_lateral(space: &Space, piece_type: PieceType, thickness: f64) -> bool {
    if !consumes_width(piece_type) {
        return true;
    }
    let used: f64 = space
        .pieces
        .iter()
        .filter(|p| consumes_width(p.piece_type))
        .map(|p| p.thickness)
        .sum();
    space.original_dimensions.width - used >= thickness + LATERAL_CLEARANCE
}

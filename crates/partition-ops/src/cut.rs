//! Structural cuts: a side, back, front, bottom or top panel placed flush
//! against one face of a space, which then shrinks along that axis.

use carcass_types::{Dimensions, Piece, PieceType, Placement, PlacementStrategy, Position, Space};
use tracing::{debug, instrument};

use crate::types::{check_thickness, Placed, CutResult, OpError};

/// The nominal box of a structural piece: flush against its face of `space`,
/// spanning the space on the other two axes.
pub fn structural_box(
    space: &Space,
    piece_type: PieceType,
    thickness: f64,
) -> Result<(Position, Dimensions), OpError> {
    let side = piece_type.face().ok_or_else(|| OpError::InvalidParameter {
        reason: format!("{} is not a structural piece", piece_type),
    })?;
    let axis = piece_type.axis();
    let extent = space.current_dimensions.along(axis);
    let center = space.position.along(axis) + side.sign() * (extent / 2.0 - thickness / 2.0);
    Ok((
        space.position.with(axis, center),
        space.current_dimensions.with(axis, thickness),
    ))
}

/// Compute a cut whose depth equals the piece thickness.
pub fn compute_cut(
    space: &Space,
    piece_type: PieceType,
    thickness: f64,
) -> Result<CutResult, OpError> {
    compute_cut_with_depth(space, piece_type, thickness, thickness)
}

/// Compute a cut where the depth removed from the space may differ from the
/// thickness of the piece box.
pub fn compute_cut_with_depth(
    space: &Space,
    piece_type: PieceType,
    thickness: f64,
    cut_depth: f64,
) -> Result<CutResult, OpError> {
    check_thickness(piece_type, thickness, cut_depth)?;
    let (piece_position, piece_dimensions) = structural_box(space, piece_type, thickness)?;

    let axis = piece_type.axis();
    let available = space.current_dimensions.along(axis);
    let remaining = available - cut_depth;
    if remaining < 0.0 {
        return Err(OpError::InsufficientSpace {
            piece_type,
            axis,
            available,
            required: cut_depth,
        });
    }

    // face() is Some here, structural_box already checked it
    let sign = piece_type.face().map(|s| s.sign()).unwrap_or(0.0);
    Ok(CutResult {
        piece_position,
        piece_dimensions,
        new_space_dimensions: space.current_dimensions.with(axis, remaining),
        new_space_position: space.position.shifted(axis, -sign * cut_depth / 2.0),
    })
}

/// Apply a structural piece to a leaf space.
///
/// Returns the placed piece and the updated space. The input space is left
/// untouched, so a failed cut never leaves a half-applied state behind.
#[instrument(level = "debug", skip_all, fields(piece_type = %piece.piece_type, space = %space.id))]
pub fn execute_cut(space: &Space, piece: &Piece) -> Result<Placed, OpError> {
    let result = compute_cut_with_depth(space, piece.piece_type, piece.thickness, piece.cut_depth())?;

    let mut placed = piece.clone();
    placed.placement = Some(Placement {
        position: result.piece_position,
        dimensions: result.piece_dimensions,
        strategy: PlacementStrategy::Nominal,
    });

    let mut updated = space.clone();
    updated.current_dimensions = result.new_space_dimensions;
    updated.position = result.new_space_position;
    updated.pieces.push(placed.clone());

    debug!(
        remaining = result.new_space_dimensions.along(piece.piece_type.axis()),
        "structural cut applied"
    );
    Ok(Placed {
        piece: placed,
        space: updated,
    })
}

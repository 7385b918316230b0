use carcass_types::{Aabb, Axis, Piece, Placement, PlacementStrategy, Space};
use tracing::{debug, instrument, warn};

use crate::config::PlacementConfig;
use crate::cut::{execute_cut, structural_box};
use crate::partition::execute_partition;
use crate::resolve::resolve_conflict;
use crate::types::{check_thickness, OpError, Placed};
use crate::validate::{find_collisions, validate_panel_size};

/// Apply any piece to a leaf space.
///
/// `existing` holds the pieces of the leaf and of every ancestor. Structural
/// pieces that would overlap one of them go through the conflict resolver;
/// the others are cut flush. Internal pieces split the leaf. Every placed
/// piece must fit the raw-panel envelope.
#[instrument(level = "debug", skip_all, fields(piece = %piece.id, piece_type = %piece.piece_type))]
pub fn execute_placement(
    leaf: &Space,
    existing: &[Piece],
    piece: &Piece,
    config: &PlacementConfig,
) -> Result<Placed, OpError> {
    check_thickness(piece.piece_type, piece.thickness, piece.cut_depth())?;
    if !leaf.is_leaf() {
        return Err(OpError::InvalidParameter {
            reason: format!("space {} is already split", leaf.id),
        });
    }
    if let Some(axis) = Axis::ALL
        .into_iter()
        .find(|&a| leaf.current_dimensions.along(a) <= 0.0)
    {
        return Err(OpError::InsufficientSpace {
            piece_type: piece.piece_type,
            axis,
            available: leaf.current_dimensions.along(axis),
            required: piece.cut_depth(),
        });
    }

    let placed = if piece.piece_type.is_internal() {
        let outcome = execute_partition(leaf, piece)?;
        check_panel(&outcome.piece, config)?;
        let mut space = leaf.clone();
        let piece = outcome.split(&mut space);
        Placed { piece, space }
    } else {
        place_structural(leaf, existing, piece, config)?
    };

    debug!(strategy = ?placed.piece.placement.map(|p| p.strategy), "piece placed");
    Ok(placed)
}

fn place_structural(
    leaf: &Space,
    existing: &[Piece],
    piece: &Piece,
    config: &PlacementConfig,
) -> Result<Placed, OpError> {
    let (position, dimensions) = structural_box(leaf, piece.piece_type, piece.thickness)?;
    let nominal = Aabb::from_center(position, dimensions);
    let conflicts = find_collisions(&nominal, existing, config.overlap_epsilon);

    if conflicts.is_empty() {
        let placed = execute_cut(leaf, piece)?;
        check_panel(&placed.piece, config)?;
        return Ok(placed);
    }

    warn!(
        piece_type = %piece.piece_type,
        conflicts = conflicts.len(),
        "nominal placement collides, resolving"
    );
    let resolution = resolve_conflict(leaf, existing, piece, config)?;

    let mut resolved = piece.clone();
    resolved.thickness = resolution.thickness;
    resolved.placement = Some(Placement {
        position: resolution.piece_position,
        dimensions: resolution.piece_dimensions,
        strategy: resolution.strategy,
    });
    check_panel(&resolved, config)?;

    let mut space = leaf.clone();
    if let Some(update) = resolution.space_update {
        space.current_dimensions = update.dimensions;
        space.position = update.position;
    }
    space.pieces.push(resolved.clone());
    Ok(Placed {
        piece: resolved,
        space,
    })
}

fn check_panel(piece: &Piece, config: &PlacementConfig) -> Result<(), OpError> {
    match piece.placement {
        Some(p) => validate_panel_size(piece.piece_type, &p.dimensions, &config.panel),
        None => Ok(()),
    }
}

/// Thickness a piece asked for before any resolver thinning.
pub fn requested_thickness(piece: &Piece) -> f64 {
    match piece.placement.map(|p| p.strategy) {
        Some(PlacementStrategy::ReducedThickness { requested }) => requested,
        _ => piece.thickness,
    }
}

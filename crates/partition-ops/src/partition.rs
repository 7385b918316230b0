//! Internal splits: a shelf or vertical divider centered in a space, which
//! is replaced by two equal children on either side of the piece.

use carcass_types::{Piece, PieceType, Placement, PlacementStrategy, Space};
use tracing::{debug, instrument};

use crate::types::{check_thickness, ChildBox, OpError, PartitionOutcome, PartitionResult};

pub fn compute_partition(
    space: &Space,
    piece_type: PieceType,
    thickness: f64,
) -> Result<PartitionResult, OpError> {
    compute_partition_with_depth(space, piece_type, thickness, thickness)
}

/// Compute a split where the depth removed between the children may differ
/// from the thickness of the piece box.
pub fn compute_partition_with_depth(
    space: &Space,
    piece_type: PieceType,
    thickness: f64,
    cut_depth: f64,
) -> Result<PartitionResult, OpError> {
    if !piece_type.is_internal() {
        return Err(OpError::InvalidParameter {
            reason: format!("{} does not split a space", piece_type),
        });
    }
    check_thickness(piece_type, thickness, cut_depth)?;

    let axis = piece_type.axis();
    let available = space.current_dimensions.along(axis);
    let usable = available - cut_depth;
    if usable <= 0.0 {
        return Err(OpError::InsufficientSpace {
            piece_type,
            axis,
            available,
            required: cut_depth,
        });
    }

    let half = usable / 2.0;
    let center = space.position.along(axis);
    let low_face = center - available / 2.0;
    let high_face = center + available / 2.0;
    let child_dims = space.current_dimensions.with(axis, half);

    Ok(PartitionResult {
        piece_position: space.position,
        piece_dimensions: space.current_dimensions.with(axis, thickness),
        children: [
            ChildBox {
                dimensions: child_dims,
                position: space.position.with(axis, low_face + half / 2.0),
            },
            ChildBox {
                dimensions: child_dims,
                position: space.position.with(axis, high_face - half / 2.0),
            },
        ],
    })
}

fn child_labels(piece_type: PieceType) -> [&'static str; 2] {
    match piece_type {
        PieceType::DividerVertical => ["Left", "Right"],
        _ => ["Lower", "Upper"],
    }
}

/// Split a leaf space with an internal piece.
///
/// The children get ids derived from the parent id and the piece id, so
/// replaying the same piece list yields the same tree.
#[instrument(level = "debug", skip_all, fields(piece_type = %piece.piece_type, space = %space.id))]
pub fn execute_partition(space: &Space, piece: &Piece) -> Result<PartitionOutcome, OpError> {
    let result = compute_partition_with_depth(
        space,
        piece.piece_type,
        piece.thickness,
        piece.cut_depth(),
    )?;

    let mut placed = piece.clone();
    placed.placement = Some(Placement {
        position: result.piece_position,
        dimensions: result.piece_dimensions,
        strategy: PlacementStrategy::Nominal,
    });

    let labels = child_labels(piece.piece_type);
    let [a, b] = result.children;
    let children = [
        Space::child_of(space, piece.id, 0, labels[0], a.dimensions, a.position),
        Space::child_of(space, piece.id, 1, labels[1], b.dimensions, b.position),
    ];
    debug!(
        child_extent = a.dimensions.along(piece.piece_type.axis()),
        "space partitioned"
    );

    Ok(PartitionOutcome {
        piece: placed,
        children,
    })
}

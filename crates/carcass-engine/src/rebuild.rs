use carcass_types::{Dimensions, Piece, Space};
use partition_ops::{execute_placement, requested_thickness, PlacementConfig};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::locate::{ancestry_pieces, locate_leaf, node_at, node_at_mut};
use crate::types::{Carcass, EngineError};

/// Output of a successful replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebuild {
    /// The space tree derived from the piece list.
    pub tree: Space,
    /// The piece list in the same order, each with its placement filled in.
    pub pieces: Vec<Piece>,
}

/// Rebuild the space tree by replaying `pieces` in order against a fresh
/// root.
///
/// The first piece that cannot be placed aborts the replay; nothing
/// partial is returned. Replay is pure: the same inputs give the same tree,
/// ids included.
#[instrument(skip(name, pieces, config), fields(pieces = pieces.len()))]
pub fn rebuild_tree(
    root_id: Uuid,
    name: &str,
    dimensions: Dimensions,
    pieces: &[Piece],
    config: &PlacementConfig,
) -> Result<Rebuild, EngineError> {
    let mut tree = Space::root(root_id, name, dimensions);
    let mut placed = Vec::with_capacity(pieces.len());

    for piece in pieces {
        let invalid = || EngineError::InvalidParent {
            piece_id: piece.id,
            space_id: piece.parent_space_id,
        };
        let path = locate_leaf(&tree, piece)?;
        let existing = ancestry_pieces(&tree, &path);
        let leaf = node_at(&tree, &path).ok_or_else(invalid)?;

        // replay from what was asked for, not from a previous thinning
        let mut request = piece.clone();
        request.thickness = requested_thickness(piece);

        let outcome = execute_placement(leaf, &existing, &request, config).map_err(|source| {
            warn!(piece = %piece.id, piece_type = %piece.piece_type, error = %source, "replay rejected piece");
            EngineError::Placement {
                piece_id: piece.id,
                source,
            }
        })?;
        debug!(piece = %piece.id, leaf = %leaf.id, depth = path.len(), "piece replayed");

        let slot = node_at_mut(&mut tree, &path).ok_or_else(invalid)?;
        *slot = outcome.space;
        placed.push(outcome.piece);
    }

    info!(
        pieces = placed.len(),
        leaves = tree.leaves().len(),
        "space tree rebuilt"
    );
    Ok(Rebuild {
        tree,
        pieces: placed,
    })
}

/// Replay a carcass's own piece list.
pub fn rebuild_carcass(carcass: &Carcass, config: &PlacementConfig) -> Result<Rebuild, EngineError> {
    rebuild_tree(
        carcass.root_id,
        &carcass.name,
        carcass.dimensions,
        &carcass.pieces,
        config,
    )
}

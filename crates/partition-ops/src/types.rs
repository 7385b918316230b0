use std::fmt;

use carcass_types::{Axis, Dimensions, Piece, PieceType, PlacementStrategy, Position, Space};

/// Numeric outcome of a structural cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutResult {
    /// Center of the piece, flush against its face of the space.
    pub piece_position: Position,
    pub piece_dimensions: Dimensions,
    /// The space after the cut depth is removed along the piece's axis.
    pub new_space_dimensions: Dimensions,
    /// The space center, shifted away from the consumed face by half the cut.
    pub new_space_position: Position,
}

/// Box of one child produced by a partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildBox {
    pub dimensions: Dimensions,
    pub position: Position,
}

/// Numeric outcome of an internal split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionResult {
    /// Centered in the parent space.
    pub piece_position: Position,
    pub piece_dimensions: Dimensions,
    /// Child A (lower / left) then child B (upper / right).
    pub children: [ChildBox; 2],
}

/// A piece applied to a leaf space.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    /// The piece with its placement filled in.
    pub piece: Piece,
    /// Replacement for the leaf: cut, split, or unchanged apart from the
    /// recorded piece.
    pub space: Space,
}

/// An internal piece that split a space.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionOutcome {
    pub piece: Piece,
    /// The two new active leaves, child A first.
    pub children: [Space; 2],
}

impl PartitionOutcome {
    /// Record the split on `parent`: the piece is appended, the children
    /// attached, and the parent deactivated.
    pub fn split(self, parent: &mut Space) -> Piece {
        parent.pieces.push(self.piece.clone());
        parent.sub_spaces = Some(Box::new(self.children));
        parent.is_active = false;
        self.piece
    }
}

/// The resolver's answer for a conflicting structural piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub piece_position: Position,
    pub piece_dimensions: Dimensions,
    /// Thickness the piece ends up with.
    pub thickness: f64,
    pub strategy: PlacementStrategy,
    /// New space box, or `None` when the space is left uncut.
    pub space_update: Option<ChildBox>,
}

/// Which edge of a panel exceeded the raw-sheet envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEdge {
    Long,
    Short,
}

impl fmt::Display for PanelEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelEdge::Long => f.write_str("long edge"),
            PanelEdge::Short => f.write_str("short edge"),
        }
    }
}

/// Errors from placement operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OpError {
    #[error("insufficient space for {piece_type} along {axis:?}: {available:.1} mm available, {required:.1} mm required")]
    InsufficientSpace {
        piece_type: PieceType,
        axis: Axis,
        available: f64,
        required: f64,
    },

    #[error("{piece_type} exceeds raw panel size: {edge} is {dimension:.1} mm, limit {limit:.1} mm")]
    PanelTooLarge {
        piece_type: PieceType,
        edge: PanelEdge,
        dimension: f64,
        limit: f64,
    },

    #[error("no valid placement for {piece_type}: {reason}")]
    NoValidPlacement { piece_type: PieceType, reason: String },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

/// Reject non-finite or non-positive thickness values, and a cut thinner
/// than the panel it makes room for.
pub(crate) fn check_thickness(piece_type: PieceType, thickness: f64, cut_depth: f64) -> Result<(), OpError> {
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("{} thickness must be positive, got {}", piece_type, thickness),
        });
    }
    if !cut_depth.is_finite() || cut_depth <= 0.0 {
        return Err(OpError::InvalidParameter {
            reason: format!("{} cut thickness must be positive, got {}", piece_type, cut_depth),
        });
    }
    if cut_depth < thickness {
        return Err(OpError::InvalidParameter {
            reason: format!(
                "{} cut thickness {} is less than its panel thickness {}",
                piece_type, cut_depth, thickness
            ),
        });
    }
    Ok(())
}

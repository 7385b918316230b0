use carcass_types::{Axis, Dimensions, Piece};
use uuid::Uuid;

use crate::types::{Carcass, EngineError};

/// Reject dimensions that are non-finite or not strictly positive.
pub fn check_dimensions(dimensions: &Dimensions) -> Result<(), EngineError> {
    for axis in Axis::ALL {
        let v = dimensions.along(axis);
        if !v.is_finite() || v <= 0.0 {
            return Err(EngineError::InvalidDimensions {
                reason: format!("{} must be positive, got {}", axis.dimension_name(), v),
            });
        }
    }
    Ok(())
}

impl Carcass {
    /// An empty carcass with a fresh root id.
    pub fn new(name: impl Into<String>, dimensions: Dimensions) -> Result<Self, EngineError> {
        check_dimensions(&dimensions)?;
        Ok(Self {
            root_id: Uuid::new_v4(),
            name: name.into(),
            dimensions,
            pieces: Vec::new(),
        })
    }

    /// Append a piece to the end of the list.
    pub fn add_piece(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// Insert a piece at a list position (clamped to the end).
    pub fn insert_piece_at(&mut self, index: usize, piece: Piece) {
        let index = index.min(self.pieces.len());
        self.pieces.insert(index, piece);
    }

    /// Remove a piece by id. Returns the removed piece.
    pub fn remove_piece(&mut self, id: Uuid) -> Result<Piece, EngineError> {
        let pos = self
            .piece_index(id)
            .ok_or(EngineError::PieceNotFound { id })?;
        Ok(self.pieces.remove(pos))
    }

    pub fn find_piece(&self, id: Uuid) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn piece_index(&self, id: Uuid) -> Option<usize> {
        self.pieces.iter().position(|p| p.id == id)
    }

    /// Drop every piece, returning them in list order.
    pub fn clear_pieces(&mut self) -> Vec<Piece> {
        std::mem::take(&mut self.pieces)
    }

    /// Give the carcass a new outer box. The root gets a new id and all
    /// pieces are discarded and returned.
    pub fn resize(&mut self, dimensions: Dimensions) -> Result<Vec<Piece>, EngineError> {
        check_dimensions(&dimensions)?;
        self.root_id = Uuid::new_v4();
        self.dimensions = dimensions;
        Ok(self.clear_pieces())
    }
}

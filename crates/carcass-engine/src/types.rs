use carcass_types::{Dimensions, Piece, PieceType};
use partition_ops::OpError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The carcass being designed: its outer box and the ordered piece list.
///
/// The list is the single source of truth. The space tree is always
/// derived from it by replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carcass {
    /// Id of the root space. Changes when the carcass is resized.
    pub root_id: Uuid,
    pub name: String,
    /// Outer box of the root space.
    pub dimensions: Dimensions,
    /// Pieces in insertion order.
    pub pieces: Vec<Piece>,
}

/// A request to insert a new piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRequest {
    pub piece_type: PieceType,
    pub thickness: f64,
    #[serde(default)]
    pub cut_thickness: Option<f64>,
    /// Overrides the type's default name.
    #[serde(default)]
    pub name: Option<String>,
    /// Target space. Falls back to the first active leaf.
    #[serde(default)]
    pub space_id: Option<Uuid>,
}

impl PieceRequest {
    pub fn new(piece_type: PieceType, thickness: f64) -> Self {
        Self {
            piece_type,
            thickness,
            cut_thickness: None,
            name: None,
            space_id: None,
        }
    }

    pub fn in_space(mut self, space_id: Uuid) -> Self {
        self.space_id = Some(space_id);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_cut_thickness(mut self, cut_thickness: f64) -> Self {
        self.cut_thickness = Some(cut_thickness);
        self
    }
}

/// Serializable error category, the part of an error a UI reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InsufficientSpace,
    PanelTooLarge,
    NoValidPlacement,
    InvalidParent,
    InvalidParameter,
    NotFound,
}

/// Errors from the carcass engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("piece {piece_id} refers to unknown or ambiguous space {space_id}")]
    InvalidParent { piece_id: Uuid, space_id: Uuid },

    #[error("piece not found: {id}")]
    PieceNotFound { id: Uuid },

    #[error("space not found: {id}")]
    SpaceNotFound { id: Uuid },

    #[error("invalid carcass dimensions: {reason}")]
    InvalidDimensions { reason: String },

    #[error("cannot place piece {piece_id}: {source}")]
    Placement {
        piece_id: Uuid,
        #[source]
        source: OpError,
    },

    #[error("operation error: {0}")]
    Op(#[from] OpError),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidParent { .. } => ErrorKind::InvalidParent,
            EngineError::PieceNotFound { .. } | EngineError::SpaceNotFound { .. } => {
                ErrorKind::NotFound
            }
            EngineError::InvalidDimensions { .. } => ErrorKind::InvalidParameter,
            EngineError::Placement { source, .. } | EngineError::Op(source) => op_kind(source),
        }
    }

    /// The piece the error is about, if any.
    pub fn piece_id(&self) -> Option<Uuid> {
        match self {
            EngineError::InvalidParent { piece_id, .. } | EngineError::Placement { piece_id, .. } => {
                Some(*piece_id)
            }
            EngineError::PieceNotFound { id } => Some(*id),
            _ => None,
        }
    }
}

fn op_kind(err: &OpError) -> ErrorKind {
    match err {
        OpError::InsufficientSpace { .. } => ErrorKind::InsufficientSpace,
        OpError::PanelTooLarge { .. } => ErrorKind::PanelTooLarge,
        OpError::NoValidPlacement { .. } => ErrorKind::NoValidPlacement,
        OpError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
    }
}

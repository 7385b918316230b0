use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carcass_engine::ErrorKind;
use carcass_types::{Dimensions, Piece, PieceType, Space};

/// Messages from the UI to the engine.
/// Serialized as JSON for postMessage transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToEngine {
    // -- Carcass --
    /// Start a new, empty carcass.
    CreateCarcass {
        name: String,
        dimensions: Dimensions,
    },
    /// Resize the carcass. Discards every piece.
    SetDimensions {
        dimensions: Dimensions,
    },

    // -- Pieces --
    /// Insert a piece into the selected space (or the first active space).
    InsertPiece {
        piece_type: PieceType,
        /// Falls back to the default thickness.
        #[serde(default)]
        thickness: Option<f64>,
        #[serde(default)]
        cut_thickness: Option<f64>,
        #[serde(default)]
        name: Option<String>,
    },
    /// Remove a piece and the pieces inside the spaces it created.
    RemovePiece {
        piece_id: Uuid,
    },
    ClearPieces,

    // -- Selection and settings --
    SelectSpace {
        #[serde(default)]
        space_id: Option<Uuid>,
    },
    SetDefaultThickness {
        thickness: f64,
    },
    /// Check a panel against the raw-sheet envelope without inserting it.
    ValidatePanel {
        piece_type: PieceType,
        dimensions: Dimensions,
    },

    // -- History --
    Undo,
    Redo,
}

/// Messages from the engine to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineToUi {
    /// The space tree has been rebuilt.
    ModelUpdated {
        tree: Space,
        pieces: Vec<Piece>,
        selected_space_id: Option<Uuid>,
    },

    /// The selected space changed.
    SelectionChanged { space_id: Option<Uuid> },

    /// Result of a `ValidatePanel` request.
    PanelChecked {
        valid: bool,
        message: Option<String>,
    },

    /// Bridge settings changed.
    SettingsChanged { default_thickness: f64 },

    /// A request was rejected. Engine state is unchanged.
    Error {
        kind: ErrorKind,
        message: String,
        piece_id: Option<Uuid>,
    },
}

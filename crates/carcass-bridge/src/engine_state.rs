use carcass_engine::{Engine, EngineError, ErrorKind};
use carcass_types::DEFAULT_THICKNESS;
use uuid::Uuid;

/// The engine state wrapper for the bridge.
///
/// Holds the carcass engine plus the UI-side session state the engine
/// itself does not track.
#[derive(Debug)]
pub struct EngineState {
    /// The carcass engine, once a carcass has been created.
    pub engine: Option<Engine>,
    /// Space new pieces go into.
    pub selected_space_id: Option<Uuid>,
    /// Thickness used when an insertion does not name one (mm).
    pub default_thickness: f64,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            engine: None,
            selected_space_id: None,
            default_thickness: DEFAULT_THICKNESS,
        }
    }

    pub fn engine(&self) -> Result<&Engine, BridgeError> {
        self.engine.as_ref().ok_or(BridgeError::NoCarcass)
    }

    pub fn engine_mut(&mut self) -> Result<&mut Engine, BridgeError> {
        self.engine.as_mut().ok_or(BridgeError::NoCarcass)
    }

    /// Select a space. `None` clears the selection.
    pub fn select(&mut self, space_id: Option<Uuid>) -> Result<(), BridgeError> {
        if let Some(id) = space_id {
            if self.engine()?.find_space(id).is_none() {
                return Err(EngineError::SpaceNotFound { id }.into());
            }
        }
        self.selected_space_id = space_id;
        Ok(())
    }

    /// Drop the selection if the selected space is no longer an active leaf.
    pub fn refresh_selection(&mut self) {
        let still_active = match (&self.engine, self.selected_space_id) {
            (Some(engine), Some(id)) => engine.find_space(id).is_some_and(|s| s.is_active),
            _ => false,
        };
        if !still_active {
            self.selected_space_id = None;
        }
    }

    pub fn set_default_thickness(&mut self, thickness: f64) -> Result<(), BridgeError> {
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(BridgeError::InvalidParameter {
                reason: format!("default thickness must be positive, got {}", thickness),
            });
        }
        self.default_thickness = thickness;
        Ok(())
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from the bridge layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    #[error("no carcass: send CreateCarcass first")]
    NoCarcass,

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::NoCarcass => ErrorKind::NotFound,
            BridgeError::Engine(e) => e.kind(),
            BridgeError::InvalidParameter { .. } | BridgeError::Serialization { .. } => {
                ErrorKind::InvalidParameter
            }
        }
    }

    pub fn piece_id(&self) -> Option<Uuid> {
        match self {
            BridgeError::Engine(e) => e.piece_id(),
            _ => None,
        }
    }
}

use carcass_engine::{Engine, PieceRequest};
use partition_ops::{validate_panel_size, PanelEnvelope};
use tracing::{debug, warn};

use crate::engine_state::{BridgeError, EngineState};
use crate::messages::{EngineToUi, UiToEngine};

/// Dispatch a UI message to the engine and return a response.
///
/// Every rejected request becomes an `EngineToUi::Error`; the engine state
/// is left as it was before the request.
pub fn dispatch(state: &mut EngineState, msg: UiToEngine) -> EngineToUi {
    match handle_message(state, msg) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "request rejected");
            error_response(&e)
        }
    }
}

/// Convert a bridge error to the message the UI receives.
pub fn error_response(e: &BridgeError) -> EngineToUi {
    EngineToUi::Error {
        kind: e.kind(),
        message: e.to_string(),
        piece_id: e.piece_id(),
    }
}

fn handle_message(state: &mut EngineState, msg: UiToEngine) -> Result<EngineToUi, BridgeError> {
    match msg {
        // -- Carcass --
        UiToEngine::CreateCarcass { name, dimensions } => {
            let engine = Engine::new(name, dimensions)?;
            state.engine = Some(engine);
            state.selected_space_id = None;
            model_updated_response(state)
        }

        UiToEngine::SetDimensions { dimensions } => {
            state.engine_mut()?.set_dimensions(dimensions)?;
            state.refresh_selection();
            model_updated_response(state)
        }

        // -- Pieces --
        UiToEngine::InsertPiece {
            piece_type,
            thickness,
            cut_thickness,
            name,
        } => {
            let mut request =
                PieceRequest::new(piece_type, thickness.unwrap_or(state.default_thickness));
            request.cut_thickness = cut_thickness;
            request.name = name;
            request.space_id = state.selected_space_id;

            let id = state.engine_mut()?.insert_piece(request)?;
            debug!(%id, "piece inserted from ui");
            state.refresh_selection();
            model_updated_response(state)
        }

        UiToEngine::RemovePiece { piece_id } => {
            let removed = state.engine_mut()?.remove_piece(piece_id)?;
            debug!(count = removed.len(), "pieces removed from ui");
            state.refresh_selection();
            model_updated_response(state)
        }

        UiToEngine::ClearPieces => {
            state.engine_mut()?.clear_pieces()?;
            state.refresh_selection();
            model_updated_response(state)
        }

        // -- Selection and settings --
        UiToEngine::SelectSpace { space_id } => {
            state.select(space_id)?;
            Ok(EngineToUi::SelectionChanged { space_id })
        }

        UiToEngine::SetDefaultThickness { thickness } => {
            state.set_default_thickness(thickness)?;
            Ok(EngineToUi::SettingsChanged {
                default_thickness: thickness,
            })
        }

        UiToEngine::ValidatePanel {
            piece_type,
            dimensions,
        } => {
            let envelope = state
                .engine
                .as_ref()
                .map(|e| e.config().panel)
                .unwrap_or_default();
            Ok(panel_checked_response(piece_type, &dimensions, &envelope))
        }

        // -- History --
        UiToEngine::Undo => {
            state.engine_mut()?.undo()?;
            state.refresh_selection();
            model_updated_response(state)
        }

        UiToEngine::Redo => {
            state.engine_mut()?.redo()?;
            state.refresh_selection();
            model_updated_response(state)
        }
    }
}

/// Build a ModelUpdated response from the current engine state.
fn model_updated_response(state: &EngineState) -> Result<EngineToUi, BridgeError> {
    let engine = state.engine()?;
    Ok(EngineToUi::ModelUpdated {
        tree: engine.tree().clone(),
        pieces: engine.pieces().to_vec(),
        selected_space_id: state.selected_space_id,
    })
}

fn panel_checked_response(
    piece_type: carcass_types::PieceType,
    dimensions: &carcass_types::Dimensions,
    envelope: &PanelEnvelope,
) -> EngineToUi {
    match validate_panel_size(piece_type, dimensions, envelope) {
        Ok(()) => EngineToUi::PanelChecked {
            valid: true,
            message: None,
        },
        Err(e) => EngineToUi::PanelChecked {
            valid: false,
            message: Some(e.to_string()),
        },
    }
}

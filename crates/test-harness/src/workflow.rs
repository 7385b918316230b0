//! CabinetBuilder: fluent API for scripting carcass design sessions in tests.
//!
//! Wraps `carcass_bridge::dispatch()` to test the real dispatch path, not a
//! simulation. Pieces and spaces are addressed by string names instead of
//! UUIDs for readability.

use std::collections::HashMap;

use carcass_bridge::messages::{EngineToUi, UiToEngine};
use carcass_bridge::EngineState;
use carcass_engine::Engine;
use carcass_types::{Dimensions, Piece, PieceType, Space};
use uuid::Uuid;

use crate::helpers::{HarnessError, Preset};
use crate::oracle::{self, OracleVerdict};

/// A fluent builder for constructing and verifying carcasses in tests.
///
/// Wraps `EngineState` and keeps a name table for pieces and spaces, a log
/// of every request sent, and inline assertions.
#[derive(Debug)]
pub struct CabinetBuilder {
    pub state: EngineState,
    named_pieces: HashMap<String, Uuid>,
    named_spaces: HashMap<String, Uuid>,
    history: Vec<(String, String)>,
    auto_check: bool,
}

impl CabinetBuilder {
    /// Start a new, empty carcass. The root space is named `"root"`.
    pub fn new(name: &str, dimensions: Dimensions) -> Result<Self, HarnessError> {
        let mut builder = Self {
            state: EngineState::new(),
            named_pieces: HashMap::new(),
            named_spaces: HashMap::new(),
            history: Vec::new(),
            auto_check: false,
        };
        builder.send_expect_model(
            "CreateCarcass",
            UiToEngine::CreateCarcass {
                name: name.to_string(),
                dimensions,
            },
        )?;
        builder.name_root()?;
        Ok(builder)
    }

    /// Build one of the ready-made cabinets, naming each piece after its step.
    pub fn preset(preset: Preset) -> Result<Self, HarnessError> {
        let mut builder = Self::new(preset.name(), preset.dimensions())?;
        for step in preset.steps() {
            builder.piece(&step.name, step.piece_type, step.thickness)?;
        }
        Ok(builder)
    }

    /// Run every oracle after each successful mutation.
    pub fn with_auto_check(mut self) -> Self {
        self.auto_check = true;
        self
    }

    // ── Pieces ──────────────────────────────────────────────────────────

    /// Insert a piece into the selected space (or the first active one).
    pub fn piece(
        &mut self,
        name: &str,
        piece_type: PieceType,
        thickness: f64,
    ) -> Result<Uuid, HarnessError> {
        self.insert(name, piece_type, Some(thickness), None)
    }

    /// Insert a piece whose cut depth differs from its thickness.
    pub fn piece_with_cut(
        &mut self,
        name: &str,
        piece_type: PieceType,
        thickness: f64,
        cut_thickness: f64,
    ) -> Result<Uuid, HarnessError> {
        self.insert(name, piece_type, Some(thickness), Some(cut_thickness))
    }

    /// Insert a piece using the session's default thickness.
    pub fn piece_default(&mut self, name: &str, piece_type: PieceType) -> Result<Uuid, HarnessError> {
        self.insert(name, piece_type, None, None)
    }

    /// Insert a piece into a named space.
    pub fn piece_in(
        &mut self,
        space: &str,
        name: &str,
        piece_type: PieceType,
        thickness: f64,
    ) -> Result<Uuid, HarnessError> {
        self.select(space)?;
        self.piece(name, piece_type, thickness)
    }

    /// Remove a named piece. Returns the sorted names of every piece that
    /// went with it, the named piece included.
    pub fn remove(&mut self, name: &str) -> Result<Vec<String>, HarnessError> {
        let id = self.piece_id(name)?;
        let before: Vec<Uuid> = self.engine()?.pieces().iter().map(|p| p.id).collect();
        self.send_expect_model("RemovePiece", UiToEngine::RemovePiece { piece_id: id })?;

        let after: Vec<Uuid> = self.engine()?.pieces().iter().map(|p| p.id).collect();
        let gone: Vec<Uuid> = before.into_iter().filter(|id| !after.contains(id)).collect();
        let mut names = Vec::new();
        self.named_pieces.retain(|n, id| {
            if gone.contains(id) {
                names.push(n.clone());
                false
            } else {
                true
            }
        });
        names.sort();
        self.prune_spaces();
        Ok(names)
    }

    /// Remove every piece, keeping the carcass.
    pub fn clear(&mut self) -> Result<&mut Self, HarnessError> {
        self.send_expect_model("ClearPieces", UiToEngine::ClearPieces)?;
        self.named_pieces.clear();
        self.prune_spaces();
        Ok(self)
    }

    /// Resize the carcass. Every piece is discarded and the root renamed.
    pub fn resize(&mut self, dimensions: Dimensions) -> Result<&mut Self, HarnessError> {
        self.send_expect_model("SetDimensions", UiToEngine::SetDimensions { dimensions })?;
        self.named_pieces.clear();
        self.named_spaces.clear();
        self.name_root()?;
        Ok(self)
    }

    // ── Spaces ──────────────────────────────────────────────────────────

    /// Name the two spaces a shelf or divider created, first child first
    /// (lower / left, then upper / right).
    pub fn name_split(
        &mut self,
        piece: &str,
        first: &str,
        second: &str,
    ) -> Result<&mut Self, HarnessError> {
        let id = self.piece_id(piece)?;
        for name in [first, second] {
            self.check_space_name_available(name)?;
        }
        let children: Vec<Uuid> = self
            .tree()?
            .descendants()
            .into_iter()
            .filter(|s| s.created_by_piece_id == Some(id))
            .map(|s| s.id)
            .collect();
        let [a, b] = children.as_slice() else {
            return Err(HarnessError::SpaceNotFound {
                name: format!("children of '{}'", piece),
            });
        };
        let (a, b) = (*a, *b);
        self.named_spaces.insert(first.to_string(), a);
        self.named_spaces.insert(second.to_string(), b);
        Ok(self)
    }

    /// Select a named space as the target for following insertions.
    pub fn select(&mut self, space: &str) -> Result<&mut Self, HarnessError> {
        let id = self.space_id(space)?;
        self.send_selection(Some(id))?;
        Ok(self)
    }

    /// Drop the selection; insertions go to the first active space.
    pub fn deselect(&mut self) -> Result<&mut Self, HarnessError> {
        self.send_selection(None)?;
        Ok(self)
    }

    /// Change the thickness used when an insertion names none.
    pub fn default_thickness(&mut self, thickness: f64) -> Result<&mut Self, HarnessError> {
        let response =
            carcass_bridge::dispatch(&mut self.state, UiToEngine::SetDefaultThickness { thickness });
        match response {
            EngineToUi::SettingsChanged { .. } => {
                self.log("SetDefaultThickness", "SettingsChanged");
                Ok(self)
            }
            other => Err(self.unexpected("SetDefaultThickness", other)),
        }
    }

    // ── History ─────────────────────────────────────────────────────────

    /// Undo the last operation. Names are rebuilt from the restored pieces.
    pub fn undo(&mut self) -> Result<&mut Self, HarnessError> {
        self.send_expect_model("Undo", UiToEngine::Undo)?;
        self.resync_names()?;
        Ok(self)
    }

    /// Redo the last undone operation.
    pub fn redo(&mut self) -> Result<&mut Self, HarnessError> {
        self.send_expect_model("Redo", UiToEngine::Redo)?;
        self.resync_names()?;
        Ok(self)
    }

    // ── Raw Protocol ────────────────────────────────────────────────────

    /// Send a raw JSON request down the same path a UI uses and return the
    /// parsed response. The name table is not updated.
    pub fn send_json(&mut self, json: &str) -> Result<serde_json::Value, HarnessError> {
        let out = carcass_bridge::process_json(&mut self.state, json);
        let value: serde_json::Value =
            serde_json::from_str(&out).map_err(|e| HarnessError::DispatchError {
                message: format!("response is not JSON: {}", e),
            })?;
        let response = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("?")
            .to_string();
        self.log("Json", &response);
        Ok(value)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn engine(&self) -> Result<&Engine, HarnessError> {
        self.state.engine().map_err(|e| HarnessError::DispatchError {
            message: e.to_string(),
        })
    }

    pub fn tree(&self) -> Result<&Space, HarnessError> {
        Ok(self.engine()?.tree())
    }

    pub fn piece_id(&self, name: &str) -> Result<Uuid, HarnessError> {
        self.named_pieces
            .get(name)
            .copied()
            .ok_or_else(|| HarnessError::PieceNotFound {
                name: name.to_string(),
            })
    }

    pub fn space_id(&self, name: &str) -> Result<Uuid, HarnessError> {
        self.named_spaces
            .get(name)
            .copied()
            .ok_or_else(|| HarnessError::SpaceNotFound {
                name: name.to_string(),
            })
    }

    /// The placed piece with this name.
    pub fn get_piece(&self, name: &str) -> Result<&Piece, HarnessError> {
        let id = self.piece_id(name)?;
        self.engine()?
            .find_piece(id)
            .ok_or_else(|| HarnessError::PieceNotFound {
                name: name.to_string(),
            })
    }

    /// The space with this name, as in the current tree.
    pub fn get_space(&self, name: &str) -> Result<&Space, HarnessError> {
        let id = self.space_id(name)?;
        self.engine()?
            .find_space(id)
            .ok_or_else(|| HarnessError::SpaceNotFound {
                name: name.to_string(),
            })
    }

    pub fn piece_count(&self) -> usize {
        self.engine().map(|e| e.pieces().len()).unwrap_or(0)
    }

    pub fn leaf_count(&self) -> usize {
        self.engine().map(|e| e.active_spaces().len()).unwrap_or(0)
    }

    pub fn selected_space(&self) -> Option<Uuid> {
        self.state.selected_space_id
    }

    /// Requests sent so far, with the response type each produced.
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    // ── Inline Assertions ───────────────────────────────────────────────

    /// Assert the piece list has exactly `expected` pieces.
    pub fn assert_piece_count(&self, expected: usize) -> Result<&Self, HarnessError> {
        let actual = self.piece_count();
        if actual == expected {
            Ok(self)
        } else {
            let names: Vec<String> = self
                .engine()?
                .pieces()
                .iter()
                .map(|p| p.name.clone())
                .collect();
            Err(HarnessError::AssertionFailed {
                detail: format!("expected {} pieces, got {}. Pieces: {:?}", expected, actual, names),
            })
        }
    }

    /// Assert the tree has exactly `expected` active spaces.
    pub fn assert_leaf_count(&self, expected: usize) -> Result<&Self, HarnessError> {
        let actual = self.leaf_count();
        if actual == expected {
            Ok(self)
        } else {
            Err(HarnessError::AssertionFailed {
                detail: format!("expected {} active spaces, got {}", expected, actual),
            })
        }
    }

    /// Assert a named space's present box within `tol`.
    pub fn assert_space_dims(
        &self,
        name: &str,
        expected: Dimensions,
        tol: f64,
    ) -> Result<&Self, HarnessError> {
        let space = self.get_space(name)?;
        crate::assertions::assert_dims_eq(&space.current_dimensions, &expected, tol, name)?;
        Ok(self)
    }

    /// Assert every oracle passes on the current state.
    pub fn assert_invariants(&self) -> Result<&Self, HarnessError> {
        let verdicts = self.check_invariants()?;
        crate::assertions::assert_all_pass(&verdicts, "invariants")?;
        Ok(self)
    }

    // ── Oracle Integration ──────────────────────────────────────────────

    /// Run all oracles against the current engine state.
    pub fn check_invariants(&self) -> Result<Vec<OracleVerdict>, HarnessError> {
        Ok(oracle::run_all(self.engine()?))
    }

    // ── Internal Helpers ────────────────────────────────────────────────

    fn insert(
        &mut self,
        name: &str,
        piece_type: PieceType,
        thickness: Option<f64>,
        cut_thickness: Option<f64>,
    ) -> Result<Uuid, HarnessError> {
        self.check_piece_name_available(name)?;
        let before = self.piece_count();
        self.send_expect_model(
            "InsertPiece",
            UiToEngine::InsertPiece {
                piece_type,
                thickness,
                cut_thickness,
                name: Some(name.to_string()),
            },
        )?;

        let pieces = self.engine()?.pieces();
        let added = pieces.last().filter(|_| pieces.len() == before + 1).map(|p| p.id);
        match added {
            Some(id) => {
                self.named_pieces.insert(name.to_string(), id);
                Ok(id)
            }
            None => Err(HarnessError::DispatchError {
                message: format!("insert of '{}' did not add a piece", name),
            }),
        }
    }

    fn send_selection(&mut self, space_id: Option<Uuid>) -> Result<(), HarnessError> {
        let response = carcass_bridge::dispatch(&mut self.state, UiToEngine::SelectSpace { space_id });
        match response {
            EngineToUi::SelectionChanged { .. } => {
                self.log("SelectSpace", "SelectionChanged");
                Ok(())
            }
            other => Err(self.unexpected("SelectSpace", other)),
        }
    }

    /// Dispatch a request that answers with `ModelUpdated`.
    fn send_expect_model(&mut self, label: &str, msg: UiToEngine) -> Result<(), HarnessError> {
        let response = carcass_bridge::dispatch(&mut self.state, msg);
        match response {
            EngineToUi::ModelUpdated { .. } => {
                self.log(label, "ModelUpdated");
                if self.auto_check {
                    self.assert_invariants()?;
                }
                Ok(())
            }
            other => Err(self.unexpected(label, other)),
        }
    }

    fn unexpected(&mut self, label: &str, response: EngineToUi) -> HarnessError {
        match response {
            EngineToUi::Error { kind, message, .. } => {
                self.log(label, "Error");
                HarnessError::Rejected { kind, message }
            }
            other => HarnessError::DispatchError {
                message: format!("unexpected {} response: {:?}", label, other),
            },
        }
    }

    fn log(&mut self, request: &str, response: &str) {
        self.history.push((request.to_string(), response.to_string()));
    }

    fn name_root(&mut self) -> Result<(), HarnessError> {
        let root = self.engine()?.carcass().root_id;
        self.named_spaces.insert("root".to_string(), root);
        Ok(())
    }

    /// Forget space names whose node is gone from the tree.
    fn prune_spaces(&mut self) {
        let Some(engine) = self.state.engine.as_ref() else {
            return;
        };
        self.named_spaces.retain(|_, id| engine.find_space(*id).is_some());
    }

    /// Re-derive piece names from the piece list after undo or redo.
    ///
    /// Piece names given through this builder are unique, so the list's own
    /// names identify them.
    fn resync_names(&mut self) -> Result<(), HarnessError> {
        let engine = self.state.engine().map_err(|e| HarnessError::DispatchError {
            message: e.to_string(),
        })?;
        let known: Vec<(String, Uuid)> = engine
            .pieces()
            .iter()
            .map(|p| (p.name.clone(), p.id))
            .collect();
        let root = engine.carcass().root_id;
        self.named_pieces = known.into_iter().collect();
        self.prune_spaces();
        self.named_spaces.insert("root".to_string(), root);
        Ok(())
    }

    fn check_piece_name_available(&self, name: &str) -> Result<(), HarnessError> {
        if self.named_pieces.contains_key(name) {
            Err(HarnessError::DuplicateName {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn check_space_name_available(&self, name: &str) -> Result<(), HarnessError> {
        if self.named_spaces.contains_key(name) {
            Err(HarnessError::DuplicateName {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

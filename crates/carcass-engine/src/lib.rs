pub mod locate;
pub mod rebuild;
pub mod tree;
pub mod types;
pub mod undo;

use std::collections::HashSet;

use carcass_types::{Dimensions, Piece, Space};
use partition_ops::PlacementConfig;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub use rebuild::{rebuild_carcass, rebuild_tree, Rebuild};
pub use types::{Carcass, EngineError, ErrorKind, PieceRequest};

use crate::undo::{Command, UndoStack};

/// The carcass placement engine.
///
/// Owns the ordered piece list and the space tree derived from it. Every
/// mutation builds a candidate list, replays it, and only swaps the result
/// in when the replay succeeds, so a failed operation changes nothing.
#[derive(Debug)]
pub struct Engine {
    carcass: Carcass,
    config: PlacementConfig,
    /// Tree from the last successful replay.
    tree: Space,
    history: UndoStack,
}

impl Engine {
    /// An empty carcass with the default placement configuration.
    pub fn new(name: impl Into<String>, dimensions: Dimensions) -> Result<Self, EngineError> {
        Self::with_config(name, dimensions, PlacementConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        dimensions: Dimensions,
        config: PlacementConfig,
    ) -> Result<Self, EngineError> {
        let carcass = Carcass::new(name, dimensions)?;
        let tree = Space::root(carcass.root_id, carcass.name.clone(), dimensions);
        Ok(Self {
            carcass,
            config,
            tree,
            history: UndoStack::new(),
        })
    }

    pub fn carcass(&self) -> &Carcass {
        &self.carcass
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn tree(&self) -> &Space {
        &self.tree
    }

    /// Positioned pieces, in list order.
    pub fn pieces(&self) -> &[Piece] {
        &self.carcass.pieces
    }

    /// Leaves of the tree, depth-first.
    pub fn active_spaces(&self) -> Vec<&Space> {
        self.tree.leaves()
    }

    pub fn find_space(&self, id: Uuid) -> Option<&Space> {
        self.tree.find(id)
    }

    pub fn find_piece(&self, id: Uuid) -> Option<&Piece> {
        self.carcass.find_piece(id)
    }

    /// Where an insertion without an explicit target goes: the first
    /// active leaf, else the root.
    pub fn default_target(&self) -> Uuid {
        self.tree
            .leaves()
            .first()
            .map(|s| s.id)
            .unwrap_or(self.carcass.root_id)
    }

    /// Insert a piece at the end of the list and rebuild.
    #[instrument(skip(self, request), fields(piece_type = %request.piece_type, thickness = request.thickness))]
    pub fn insert_piece(&mut self, request: PieceRequest) -> Result<Uuid, EngineError> {
        let target = match request.space_id {
            Some(id) if self.tree.find(id).is_none() => {
                return Err(EngineError::SpaceNotFound { id })
            }
            Some(id) => id,
            None => self.default_target(),
        };

        let mut piece = Piece::new(request.piece_type, request.thickness, target);
        if let Some(name) = request.name {
            piece = piece.named(name);
        }
        if let Some(cut) = request.cut_thickness {
            piece = piece.with_cut_thickness(cut);
        }
        let id = piece.id;

        let mut candidate = self.carcass.clone();
        let position = candidate.pieces.len();
        candidate.add_piece(piece);
        self.commit(candidate).map_err(|e| {
            warn!(error = %e, "insertion rejected");
            e
        })?;

        let placed = self
            .find_piece(id)
            .cloned()
            .ok_or(EngineError::PieceNotFound { id })?;
        self.history.push(Command::InsertPiece {
            piece: Box::new(placed),
            position,
        });
        info!(%id, space = %target, "piece inserted");
        Ok(id)
    }

    /// Remove a piece and every piece inserted into the spaces it created.
    ///
    /// Returns the ids of all removed pieces in list order.
    #[instrument(skip(self))]
    pub fn remove_piece(&mut self, id: Uuid) -> Result<Vec<Uuid>, EngineError> {
        if self.carcass.find_piece(id).is_none() {
            return Err(EngineError::PieceNotFound { id });
        }

        let orphaned: HashSet<Uuid> = self
            .tree
            .descendants()
            .into_iter()
            .filter(|s| s.created_by_piece_id == Some(id))
            .flat_map(|s| s.descendants())
            .map(|s| s.id)
            .collect();

        let mut removed = Vec::new();
        let mut kept = Vec::new();
        for (i, p) in self.carcass.pieces.iter().enumerate() {
            if p.id == id || orphaned.contains(&p.parent_space_id) {
                removed.push((i, p.clone()));
            } else {
                kept.push(p.clone());
            }
        }

        let candidate = Carcass {
            pieces: kept,
            ..self.carcass.clone()
        };
        self.commit(candidate).map_err(|e| {
            warn!(error = %e, "removal rejected");
            e
        })?;

        let ids: Vec<Uuid> = removed.iter().map(|(_, p)| p.id).collect();
        info!(cascade = ids.len() - 1, "piece removed");
        self.history.push(Command::RemovePieces { removed });
        Ok(ids)
    }

    /// Replace the outer box. The root gets a new id and every piece is
    /// discarded.
    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> Result<(), EngineError> {
        let mut candidate = self.carcass.clone();
        let old_pieces = candidate.resize(dimensions)?;
        let cmd = Command::Resize {
            old_root_id: self.carcass.root_id,
            old_dimensions: self.carcass.dimensions,
            old_pieces,
            new_root_id: candidate.root_id,
            new_dimensions: dimensions,
        };
        self.commit(candidate)?;
        self.history.push(cmd);
        info!(?dimensions, "carcass resized");
        Ok(())
    }

    /// Drop every piece, keeping the outer box and root id.
    pub fn clear_pieces(&mut self) -> Result<(), EngineError> {
        if self.carcass.pieces.is_empty() {
            return Ok(());
        }
        let mut candidate = self.carcass.clone();
        let pieces = candidate.clear_pieces();
        self.commit(candidate)?;
        self.history.push(Command::ClearPieces { pieces });
        Ok(())
    }

    /// Undo the last command. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EngineError> {
        let Some(cmd) = self.history.pop_undo() else {
            return Ok(false);
        };
        let candidate = self.reverted(&cmd);
        match self.commit(candidate) {
            Ok(()) => {
                self.history.push_redo(cmd);
                Ok(true)
            }
            Err(e) => {
                self.history.push_undo_only(cmd);
                Err(e)
            }
        }
    }

    /// Redo the last undone command. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EngineError> {
        let Some(cmd) = self.history.pop_redo() else {
            return Ok(false);
        };
        let candidate = self.reapplied(&cmd);
        match self.commit(candidate) {
            Ok(()) => {
                self.history.push_undo_only(cmd);
                Ok(true)
            }
            Err(e) => {
                self.history.push_redo(cmd);
                Err(e)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replay `candidate` and adopt it if the replay succeeds.
    fn commit(&mut self, candidate: Carcass) -> Result<(), EngineError> {
        let rebuilt = rebuild_carcass(&candidate, &self.config)?;
        self.carcass = Carcass {
            pieces: rebuilt.pieces,
            ..candidate
        };
        self.tree = rebuilt.tree;
        Ok(())
    }

    fn reverted(&self, cmd: &Command) -> Carcass {
        let mut carcass = self.carcass.clone();
        match cmd {
            Command::InsertPiece { piece, .. } => carcass.pieces.retain(|p| p.id != piece.id),
            Command::RemovePieces { removed } => {
                for (i, p) in removed {
                    carcass.insert_piece_at(*i, p.clone());
                }
            }
            Command::Resize {
                old_root_id,
                old_dimensions,
                old_pieces,
                ..
            } => {
                carcass.root_id = *old_root_id;
                carcass.dimensions = *old_dimensions;
                carcass.pieces = old_pieces.clone();
            }
            Command::ClearPieces { pieces } => carcass.pieces = pieces.clone(),
        }
        carcass
    }

    fn reapplied(&self, cmd: &Command) -> Carcass {
        let mut carcass = self.carcass.clone();
        match cmd {
            Command::InsertPiece { piece, position } => {
                carcass.insert_piece_at(*position, piece.as_ref().clone())
            }
            Command::RemovePieces { removed } => carcass
                .pieces
                .retain(|p| !removed.iter().any(|(_, r)| r.id == p.id)),
            Command::Resize {
                new_root_id,
                new_dimensions,
                ..
            } => {
                carcass.root_id = *new_root_id;
                carcass.dimensions = *new_dimensions;
                carcass.pieces.clear();
            }
            Command::ClearPieces { .. } => carcass.pieces.clear(),
        }
        carcass
    }
}

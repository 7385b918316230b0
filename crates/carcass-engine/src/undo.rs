use carcass_types::{Dimensions, Piece};
use uuid::Uuid;

/// A reversible command recorded by the engine.
///
/// Each variant carries enough of the piece list to restore the state on
/// either side of the change.
#[derive(Debug, Clone)]
pub enum Command {
    InsertPiece {
        piece: Box<Piece>,
        position: usize,
    },
    /// A removal with its cascade, each entry at its original list position.
    RemovePieces {
        removed: Vec<(usize, Piece)>,
    },
    Resize {
        old_root_id: Uuid,
        old_dimensions: Dimensions,
        old_pieces: Vec<Piece>,
        new_root_id: Uuid,
        new_dimensions: Dimensions,
    },
    ClearPieces {
        pieces: Vec<Piece>,
    },
}

/// Two-stack undo/redo history.
#[derive(Debug)]
pub struct UndoStack {
    undo: Vec<Command>,
    redo: Vec<Command>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
        }
    }

    /// Push a command onto the undo stack, clearing the redo stack.
    pub fn push(&mut self, cmd: Command) {
        self.undo.push(cmd);
        self.redo.clear();
    }

    /// Push without clearing redo; used when a redo re-applies a command.
    pub fn push_undo_only(&mut self, cmd: Command) {
        self.undo.push(cmd);
    }

    pub fn pop_undo(&mut self) -> Option<Command> {
        self.undo.pop()
    }

    pub fn push_redo(&mut self, cmd: Command) {
        self.redo.push(cmd);
    }

    pub fn pop_redo(&mut self) -> Option<Command> {
        self.redo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

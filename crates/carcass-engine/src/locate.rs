//! Locating the leaf a piece applies to during replay.

use std::collections::HashSet;

use carcass_types::{Piece, Space};
use uuid::Uuid;

use crate::types::EngineError;

/// Deepest split chain replay will follow.
pub const MAX_DEPTH: usize = 256;

/// A path from the root: the child index taken at each level.
pub type SpacePath = Vec<usize>;

/// Find the node with `id`, depth-first.
///
/// Returns `Ok(None)` when no node has the id. A duplicate id or a tree
/// deeper than [`MAX_DEPTH`] means the tree is corrupt and is reported as
/// `InvalidParent` for `piece_id`.
pub fn find_path(root: &Space, id: Uuid, piece_id: Uuid) -> Result<Option<SpacePath>, EngineError> {
    let invalid = || EngineError::InvalidParent {
        piece_id,
        space_id: id,
    };

    let mut visited = HashSet::new();
    let mut found = None;
    let mut stack: Vec<(&Space, SpacePath)> = vec![(root, Vec::new())];
    while let Some((node, path)) = stack.pop() {
        if !visited.insert(node.id) || path.len() > MAX_DEPTH {
            return Err(invalid());
        }
        if node.id == id {
            if found.is_some() {
                return Err(invalid());
            }
            found = Some(path.clone());
        }
        for (i, child) in node.children().iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i);
            stack.push((child, child_path));
        }
    }
    Ok(found)
}

pub fn node_at<'a>(root: &'a Space, path: &[usize]) -> Option<&'a Space> {
    path.iter()
        .try_fold(root, |node, &i| node.children().get(i))
}

pub fn node_at_mut<'a>(root: &'a mut Space, path: &[usize]) -> Option<&'a mut Space> {
    let mut node = root;
    for &i in path {
        node = node.sub_spaces.as_deref_mut()?.get_mut(i)?;
    }
    Some(node)
}

/// Path to the leaf `piece` applies to.
///
/// Starts at the piece's parent space and, while that node is split,
/// descends into the child containing the piece's recorded position on the
/// split axis. Unplaced pieces, and positions outside both children, go to
/// the first child.
pub fn locate_leaf(root: &Space, piece: &Piece) -> Result<SpacePath, EngineError> {
    let invalid = || EngineError::InvalidParent {
        piece_id: piece.id,
        space_id: piece.parent_space_id,
    };

    let mut path = find_path(root, piece.parent_space_id, piece.id)?.ok_or_else(invalid)?;
    let mut node = node_at(root, &path).ok_or_else(invalid)?;

    while !node.is_leaf() {
        if path.len() >= MAX_DEPTH {
            return Err(invalid());
        }
        let children = node.children();
        let index = match (node.split_axis(), piece.position()) {
            (Some(axis), Some(position)) => children
                .iter()
                .position(|c| c.bounds().contains_coord(axis, position.along(axis)))
                .unwrap_or(0),
            _ => 0,
        };
        path.push(index);
        node = children.get(index).ok_or_else(invalid)?;
    }
    Ok(path)
}

/// Pieces recorded on every node along `path`, root first, leaf last.
pub fn ancestry_pieces(root: &Space, path: &[usize]) -> Vec<Piece> {
    let mut pieces = root.pieces.clone();
    let mut node = root;
    for &i in path {
        match node.children().get(i) {
            Some(child) => {
                pieces.extend(child.pieces.iter().cloned());
                node = child;
            }
            None => break,
        }
    }
    pieces
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Aabb, Axis, Dimensions, Position};
use crate::piece::Piece;

/// A node of the space tree.
///
/// A leaf (`sub_spaces == None`) is active and accepts pieces. A split node
/// keeps the structural pieces applied before the split plus the splitting
/// piece, and has exactly two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    /// Box at creation time, before any structural cut.
    pub original_dimensions: Dimensions,
    /// Present box. Shrinks with each structural cut, frozen once split.
    pub current_dimensions: Dimensions,
    pub position: Position,
    /// Pieces applied to this node, in application order.
    pub pieces: Vec<Piece>,
    #[serde(default)]
    pub sub_spaces: Option<Box<[Space; 2]>>,
    #[serde(default)]
    pub parent_space_id: Option<Uuid>,
    pub is_active: bool,
    /// The internal piece whose split created this node.
    #[serde(default)]
    pub created_by_piece_id: Option<Uuid>,
}

impl Space {
    /// An active root space centered at the origin.
    pub fn root(id: Uuid, name: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            id,
            name: name.into(),
            original_dimensions: dimensions,
            current_dimensions: dimensions,
            position: Position::ORIGIN,
            pieces: Vec::new(),
            sub_spaces: None,
            parent_space_id: None,
            is_active: true,
            created_by_piece_id: None,
        }
    }

    /// Deterministic id of child `slot` (0 or 1) created when `piece_id` splits `parent_id`.
    pub fn child_id(parent_id: Uuid, piece_id: Uuid, slot: usize) -> Uuid {
        let tag = if slot == 0 { "a" } else { "b" };
        Uuid::new_v5(&parent_id, format!("{}:{}", piece_id, tag).as_bytes())
    }

    /// A new active leaf produced by splitting `parent` with `piece_id`.
    pub fn child_of(
        parent: &Space,
        piece_id: Uuid,
        slot: usize,
        label: &str,
        dimensions: Dimensions,
        position: Position,
    ) -> Self {
        Self {
            id: Self::child_id(parent.id, piece_id, slot),
            name: format!("{} / {}", parent.name, label),
            original_dimensions: dimensions,
            current_dimensions: dimensions,
            position,
            pieces: Vec::new(),
            sub_spaces: None,
            parent_space_id: Some(parent.id),
            is_active: true,
            created_by_piece_id: Some(piece_id),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.current_dimensions)
    }

    pub fn is_leaf(&self) -> bool {
        self.sub_spaces.is_none()
    }

    /// The two children, or an empty slice for a leaf.
    pub fn children(&self) -> &[Space] {
        match &self.sub_spaces {
            Some(children) => &children[..],
            None => &[],
        }
    }

    /// The internal piece that split this node.
    pub fn splitting_piece(&self) -> Option<&Piece> {
        let creator = self.children().first()?.created_by_piece_id?;
        self.pieces.iter().find(|p| p.id == creator)
    }

    /// Axis along which this node was split.
    pub fn split_axis(&self) -> Option<Axis> {
        self.splitting_piece().map(|p| p.piece_type.axis())
    }

    /// Every node of the subtree, pre-order, first child before second.
    pub fn descendants(&self) -> Vec<&Space> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in node.children().iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Find a node of the subtree by id.
    pub fn find(&self, id: Uuid) -> Option<&Space> {
        self.descendants().into_iter().find(|s| s.id == id)
    }

    /// Active leaves of the subtree, pre-order.
    pub fn leaves(&self) -> Vec<&Space> {
        self.descendants()
            .into_iter()
            .filter(|s| s.is_leaf())
            .collect()
    }

    /// Every piece recorded anywhere in the subtree.
    pub fn all_pieces(&self) -> Vec<&Piece> {
        self.descendants()
            .into_iter()
            .flat_map(|s| s.pieces.iter())
            .collect()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Aabb, Axis, Dimensions, Position, Side};

/// Panel thickness used when a request does not name one (mm).
pub const DEFAULT_THICKNESS: f64 = 18.0;

/// The kind of panel being inserted.
///
/// Structural types shrink a space from one face. Internal types split a
/// space into two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceType {
    LateralLeft,
    LateralRight,
    LateralFront,
    LateralBack,
    Bottom,
    Top,
    Shelf,
    DividerVertical,
}

impl PieceType {
    pub const ALL: [PieceType; 8] = [
        PieceType::LateralLeft,
        PieceType::LateralRight,
        PieceType::LateralFront,
        PieceType::LateralBack,
        PieceType::Bottom,
        PieceType::Top,
        PieceType::Shelf,
        PieceType::DividerVertical,
    ];

    /// Face-shrinking piece (sides, bottom, top).
    pub fn is_structural(self) -> bool {
        !self.is_internal()
    }

    /// Space-splitting piece (shelf, vertical divider).
    pub fn is_internal(self) -> bool {
        matches!(self, PieceType::Shelf | PieceType::DividerVertical)
    }

    /// Left, right, front or back side.
    pub fn is_lateral(self) -> bool {
        matches!(
            self,
            PieceType::LateralLeft
                | PieceType::LateralRight
                | PieceType::LateralFront
                | PieceType::LateralBack
        )
    }

    /// The axis the piece consumes (structural) or splits (internal).
    pub fn axis(self) -> Axis {
        match self {
            PieceType::LateralLeft | PieceType::LateralRight | PieceType::DividerVertical => Axis::X,
            PieceType::Bottom | PieceType::Top | PieceType::Shelf => Axis::Y,
            PieceType::LateralFront | PieceType::LateralBack => Axis::Z,
        }
    }

    /// The face a structural piece sits flush against. `None` for internal pieces.
    pub fn face(self) -> Option<Side> {
        match self {
            PieceType::LateralLeft | PieceType::Bottom | PieceType::LateralBack => Some(Side::Min),
            PieceType::LateralRight | PieceType::Top | PieceType::LateralFront => Some(Side::Max),
            PieceType::Shelf | PieceType::DividerVertical => None,
        }
    }

    /// The structural type on the opposite face of the same axis.
    pub fn opposing(self) -> Option<PieceType> {
        match self {
            PieceType::LateralLeft => Some(PieceType::LateralRight),
            PieceType::LateralRight => Some(PieceType::LateralLeft),
            PieceType::LateralFront => Some(PieceType::LateralBack),
            PieceType::LateralBack => Some(PieceType::LateralFront),
            PieceType::Bottom => Some(PieceType::Top),
            PieceType::Top => Some(PieceType::Bottom),
            PieceType::Shelf | PieceType::DividerVertical => None,
        }
    }

    /// User-visible name given to a new piece of this type.
    pub fn default_name(self) -> &'static str {
        match self {
            PieceType::LateralLeft => "Left Side",
            PieceType::LateralRight => "Right Side",
            PieceType::LateralFront => "Front Panel",
            PieceType::LateralBack => "Back Panel",
            PieceType::Bottom => "Bottom",
            PieceType::Top => "Top",
            PieceType::Shelf => "Shelf",
            PieceType::DividerVertical => "Vertical Divider",
        }
    }

    /// The two in-plane extents of a panel of this type, ignoring thickness.
    pub fn panel_extents(self, dims: &Dimensions) -> (f64, f64) {
        match self {
            PieceType::LateralLeft | PieceType::LateralRight | PieceType::DividerVertical => {
                (dims.height, dims.depth)
            }
            PieceType::LateralFront | PieceType::LateralBack => (dims.width, dims.height),
            PieceType::Bottom | PieceType::Top | PieceType::Shelf => (dims.width, dims.depth),
        }
    }

    fn wire_name(self) -> &'static str {
        match self {
            PieceType::LateralLeft => "lateral_left",
            PieceType::LateralRight => "lateral_right",
            PieceType::LateralFront => "lateral_front",
            PieceType::LateralBack => "lateral_back",
            PieceType::Bottom => "bottom",
            PieceType::Top => "top",
            PieceType::Shelf => "shelf",
            PieceType::DividerVertical => "divider_vertical",
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// How the engine arrived at a piece's placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlacementStrategy {
    /// Flush against its face (structural) or centered (internal).
    Nominal,
    /// Thinned by the conflict resolver from `requested` to the piece's thickness.
    ReducedThickness { requested: f64 },
    /// Stacked beside an existing piece of the same type; the space was not cut.
    Offset,
}

/// Engine-derived box of a placed piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    pub dimensions: Dimensions,
    pub strategy: PlacementStrategy,
}

impl Placement {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.dimensions)
    }
}

/// A panel in the ordered piece list.
///
/// Only `piece_type`, `thickness`, `cut_thickness` and `parent_space_id` are
/// inputs. `placement` is recomputed on every rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub piece_type: PieceType,
    pub name: String,
    pub thickness: f64,
    /// Depth removed from the space, when it differs from `thickness`.
    #[serde(default)]
    pub cut_thickness: Option<f64>,
    /// The space this piece was inserted into.
    pub parent_space_id: Uuid,
    #[serde(default)]
    pub placement: Option<Placement>,
}

impl Piece {
    /// A fresh, unplaced piece with a random id and the type's default name.
    pub fn new(piece_type: PieceType, thickness: f64, parent_space_id: Uuid) -> Self {
        Self::with_id(Uuid::new_v4(), piece_type, thickness, parent_space_id)
    }

    pub fn with_id(id: Uuid, piece_type: PieceType, thickness: f64, parent_space_id: Uuid) -> Self {
        Self {
            id,
            piece_type,
            name: piece_type.default_name().to_string(),
            thickness,
            cut_thickness: None,
            parent_space_id,
            placement: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_cut_thickness(mut self, cut_thickness: f64) -> Self {
        self.cut_thickness = Some(cut_thickness);
        self
    }

    /// Depth this piece removes from the space it is applied to.
    pub fn cut_depth(&self) -> f64 {
        self.cut_thickness.unwrap_or(self.thickness)
    }

    pub fn position(&self) -> Option<Position> {
        self.placement.map(|p| p.position)
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.placement.map(|p| p.dimensions)
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.placement.map(|p| p.bounds())
    }
}

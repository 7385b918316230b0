use serde::{Deserialize, Serialize};

/// A box axis. X runs left to right (width), Y bottom to top (height),
/// Z back to front (depth).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into `[x, y, z]` arrays.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The dimension name this axis measures.
    pub fn dimension_name(self) -> &'static str {
        match self {
            Axis::X => "width",
            Axis::Y => "height",
            Axis::Z => "depth",
        }
    }
}

/// Which end of an axis a face sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The negative end (left, bottom, back).
    Min,
    /// The positive end (right, top, front).
    Max,
}

impl Side {
    /// -1.0 for `Min`, +1.0 for `Max`.
    pub fn sign(self) -> f64 {
        match self {
            Side::Min => -1.0,
            Side::Max => 1.0,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Min => Side::Max,
            Side::Max => Side::Min,
        }
    }
}

/// Box extents in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Extent along an axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Z => self.depth,
        }
    }

    /// Copy with one axis replaced.
    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => self.width = value,
            Axis::Y => self.height = value,
            Axis::Z => self.depth = value,
        }
        self
    }

    /// True when no extent is negative (zero is allowed).
    pub fn is_non_negative(&self) -> bool {
        Axis::ALL.iter().all(|&a| self.along(a) >= 0.0)
    }

    /// True when every extent is finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        Axis::ALL
            .iter()
            .all(|&a| self.along(a).is_finite() && self.along(a) > 0.0)
    }

    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }
}

/// Center of a box in the shared carcass coordinate system (mm).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinate along an axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Copy with one coordinate replaced.
    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
        self
    }

    /// Copy shifted by `delta` along an axis.
    pub fn shifted(self, axis: Axis, delta: f64) -> Self {
        let v = self.along(axis);
        self.with(axis, v + delta)
    }
}

/// Axis-aligned bounding box: [min_x, min_y, min_z] .. [max_x, max_y, max_z].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    /// Box centered at `center` with the given extents.
    pub fn from_center(center: Position, dims: Dimensions) -> Self {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for axis in Axis::ALL {
            let i = axis.index();
            let half = dims.along(axis) / 2.0;
            min[i] = center.along(axis) - half;
            max[i] = center.along(axis) + half;
        }
        Self { min, max }
    }

    /// Coordinate of the face on `side` of `axis`.
    pub fn face(&self, axis: Axis, side: Side) -> f64 {
        match side {
            Side::Min => self.min[axis.index()],
            Side::Max => self.max[axis.index()],
        }
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        self.max[axis.index()] - self.min[axis.index()]
    }

    /// Strict overlap on all three axes. Projections that overlap by no more
    /// than `epsilon` count as touching, not overlapping.
    pub fn overlaps(&self, other: &Aabb, epsilon: f64) -> bool {
        Axis::ALL.iter().all(|&a| {
            let i = a.index();
            self.max[i] - other.min[i] > epsilon && other.max[i] - self.min[i] > epsilon
        })
    }

    /// True when `other` lies inside `self`, allowing `tolerance` on every face.
    pub fn contains(&self, other: &Aabb, tolerance: f64) -> bool {
        Axis::ALL.iter().all(|&a| {
            let i = a.index();
            other.min[i] >= self.min[i] - tolerance && other.max[i] <= self.max[i] + tolerance
        })
    }

    /// Inclusive containment of a single coordinate along one axis.
    pub fn contains_coord(&self, axis: Axis, value: f64) -> bool {
        let i = axis.index();
        value >= self.min[i] && value <= self.max[i]
    }

    /// Box grown by `margin` on every face.
    pub fn grown(&self, margin: f64) -> Aabb {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] -= margin;
            out.max[i] += margin;
        }
        out
    }
}

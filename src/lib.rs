// SPDX-License-Identifier: MPL-2.0

//! A 2D/3D scatter-chart rendering core.
//!
//! # Coordinate Spaces
//!
//! There are four coordinate spaces: **data** space, **plot** space, **camera** space, and
//! **pixel** space.
//!
//! ## Data Space
//!
//! The space in which callers push samples. Each axis is bounded by the chart's axis range
//! (`min < max` always holds) but samples outside the range are legal; they are clipped or faded
//! during rendering.
//!
//! ## Plot Space
//!
//! The chart owns a single [`Transform`] that rebases data space. In 2D mode this lands directly
//! in pixel space, offset so that each axis minimum sits on the grid's edge. In 3D mode data is
//! centered on the midpoint of each range and squeezed into the plot box, the cube spanning
//! `[-1, 1]` in all axes.
//!
//! ## Camera Space
//!
//! In 3D mode an [`OrbitCamera`] orbits the plot box. Its view transform rotates the world by
//! elevation and azimuth and pushes it away by the orbit distance; its projection transform is
//! either orthographic or perspective.
//!
//! ## Pixel Space
//!
//! The final raster, origin at the top-left corner, Y growing downwards. Rendered frames are read
//! back from the GPU as BGRA rows in this orientation.

pub mod annotation;
pub mod camera;
pub mod chart;
pub mod color;
pub mod config;
pub mod error;
pub mod grid;
pub mod linear;
pub mod marker;
pub mod renderer;
pub mod shape;
pub mod target;
pub mod transformable;
pub mod vertex;

pub use annotation::{Annotation, ApproximateMetrics, Label, LabelKind, TextMetrics};
pub use camera::{OrbitCamera, Projection};
pub use chart::{AxisRanges, ScatterChart};
pub use color::{Argb, Color};
pub use config::ChartConfig;
pub use error::{Error, Result};
pub use grid::{Axis, GridShape, Plane};
pub use linear::{Transform, Vector};
pub use marker::{Marker, Markers, Octahedron};
pub use renderer::Renderer;
pub use shape::{ColorPalette, PointsShape, ShapeKind};
pub use target::{DrawCommand, Frame, RenderStates, RenderTarget, View};
pub use transformable::{Rotation, Transformable};
pub use vertex::{PrimitiveType, Vertex, VertexArray};

use std::ops::{Add, Mul, Neg, Sub};

/// A singular location within a coordinate space.
///
/// The `Point` type definition does not prescribe a particular coordinate space to constrain its
/// coordinates by; rather, the coordinates of a `Point` shall be interpreted by context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Point {
    /// The X coordinate.
    pub x: f32,
    /// The Y coordinate.
    pub y: f32,
    /// The Z coordinate.
    pub z: f32,
}

unsafe impl bytemuck::Pod for Point {}
unsafe impl bytemuck::Zeroable for Point {}

impl Point {
    /// The point that lies at `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0., 0., 0.);

    pub const UNIT_X: Self = Self::new(1., 0., 0.);
    pub const UNIT_Y: Self = Self::new(0., 1., 0.);
    pub const UNIT_Z: Self = Self::new(0., 0., 1.);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        (self.x * rhs.x) + (self.y * rhs.y) + (self.z * rhs.z)
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            (self.y * rhs.z) - (self.z * rhs.y),
            (self.z * rhs.x) - (self.x * rhs.z),
            (self.x * rhs.y) - (self.y * rhs.x),
        )
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// This point scaled to unit length, or the point itself if its length is zero.
    pub fn normalize(self) -> Self {
        let length = self.length();
        if length == 0. {
            self
        } else {
            self * (1. / length)
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// An axis-aligned rectangle.
///
/// Pixel rectangles grow rightwards and downwards from `(left, top)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Whether this rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0. || self.height <= 0.
    }
}

/// An axis-aligned box bounded by two opposite corners.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// The plot box, which spans `[-1, 1]` in all axes.
    pub const PLOT: Self = Self::new(Point::new(-1., -1., -1.), Point::new(1., 1., 1.));

    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The smallest box enclosing all `points`.
    ///
    /// An empty iterator yields a box of inverted infinite extent.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Self {
        points.into_iter().fold(
            Self::new(
                Point::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
                Point::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
            ),
            |acc, p| Self::new(
                Point::new(acc.min.x.min(p.x), acc.min.y.min(p.y), acc.min.z.min(p.z)),
                Point::new(acc.max.x.max(p.x), acc.max.y.max(p.y), acc.max.z.max(p.z)),
            ),
        )
    }

    pub fn size(&self) -> Point {
        self.max - self.min
    }

    /// The eight corners of this box.
    pub fn corners(&self) -> [Point; 8] {
        let (a, b) = (self.min, self.max);

        [
            Point::new(a.x, a.y, a.z),
            Point::new(b.x, a.y, a.z),
            Point::new(a.x, b.y, a.z),
            Point::new(b.x, b.y, a.z),
            Point::new(a.x, a.y, b.z),
            Point::new(b.x, a.y, b.z),
            Point::new(a.x, b.y, b.z),
            Point::new(b.x, b.y, b.z),
        ]
    }
}

/// Whether `value` lies in the half-open range `[low, high)`.
pub(crate) fn is_in_range(value: f32, low: f32, high: f32) -> bool {
    !(value < low) && value < high
}

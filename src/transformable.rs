// SPDX-License-Identifier: MPL-2.0

use std::cell::Cell;

use crate::{Point, Transform};

impl Default for Transformable {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            origin: Point::ORIGIN,
            rotation: Rotation::ZERO,
            scale: Point::new(1., 1., 1.),
            cached_transforms: Default::default(),
        }
    }
}

/// Position, rotation, and scale of an object, expressed as a single transform.
///
/// Points are first rebased onto [the origin](Self::origin), then scaled, rotated, and finally
/// translated to [the position](Self::position).
#[derive(Debug)]
pub struct Transformable {
    position: Point,
    /// The local point about which scaling and rotation happen.
    origin: Point,
    rotation: Rotation,
    scale: Point,
    /// Cached forward and inverse transforms.
    ///
    /// If a transform is available from a previous call to [`transform`](Self::transform) or
    /// [`inverse_transform`](Self::inverse_transform), it is pulled from here. Every setter
    /// empties both cells.
    cached_transforms: CachedTransforms,
}

impl Clone for Transformable {
    fn clone(&self) -> Self {
        Self {
            position: self.position,
            origin: self.origin,
            rotation: self.rotation,
            scale: self.scale,
            cached_transforms: Default::default(),
        }
    }
}

impl Transformable {
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.cached_transforms.invalidate();
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
        self.cached_transforms.invalidate();
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.cached_transforms.invalidate();
    }

    pub fn scale(&self) -> Point {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Point) {
        self.scale = scale;
        self.cached_transforms.invalidate();
    }

    /// The transform from local coordinates to parent coordinates.
    ///
    /// This will return a cached copy if one is available.
    pub fn transform(&self) -> Transform {
        Self::cached(&self.cached_transforms.forward, || self.create_transform())
    }

    /// The transform from parent coordinates back to local coordinates.
    ///
    /// This will return a cached copy if one is available.
    pub fn inverse_transform(&self) -> Transform {
        Self::cached(&self.cached_transforms.inverse, || self.transform().inverse())
    }

    fn cached(cell: &Cell<Option<Transform>>, create: impl FnOnce() -> Transform) -> Transform {
        if let Some(transform) = cell.get() {
            return transform;
        }

        let transform = create();
        cell.set(Some(transform));

        transform
    }

    fn create_transform(&self) -> Transform {
        let Self { position: p, origin: o, rotation: r, scale: s, .. } = *self;

        // Because we're post-multiplying, the order of application is reversed. The true order
        // is:
        // 1. Rebase onto the origin.
        // 2. Scale.
        // 3. Rotate.
        // 4. Translate.
        let mut transform = Transform::IDENTITY;
        transform
            .translate(p.x, p.y, p.z)
            .rotate(r.angle, r.axis)
            .scale(s.x, s.y, s.z)
            .translate(-o.x, -o.y, -o.z);

        transform
    }
}

impl Default for CachedTransforms {
    fn default() -> Self {
        Self {
            forward: Cell::new(None),
            inverse: Cell::new(None),
        }
    }
}

#[derive(Debug)]
struct CachedTransforms {
    forward: Cell<Option<Transform>>,
    inverse: Cell<Option<Transform>>,
}

impl CachedTransforms {
    fn invalidate(&self) {
        self.forward.set(None);
        self.inverse.set(None);
    }
}

/// A rotation of [`angle`](Self::angle) degrees about [`axis`](Self::axis).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub angle: f32,
    pub axis: Point,
}

impl Rotation {
    pub const ZERO: Self = Self { angle: 0., axis: Point::UNIT_Z };

    pub const fn new(angle: f32, axis: Point) -> Self {
        Self { angle, axis }
    }
}

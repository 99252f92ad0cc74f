// SPDX-License-Identifier: MPL-2.0

//! Linear algebra definitions.

use std::ops::{Mul, MulAssign};

use crate::{BoundingBox, Point, Rect};

pub type Scalar = f32;

impl Transform {
    pub const fn new(
        r0c0: Scalar,
        r0c1: Scalar,
        r0c2: Scalar,
        r0c3: Scalar,
        r1c0: Scalar,
        r1c1: Scalar,
        r1c2: Scalar,
        r1c3: Scalar,
        r2c0: Scalar,
        r2c1: Scalar,
        r2c2: Scalar,
        r2c3: Scalar,
        r3c0: Scalar,
        r3c1: Scalar,
        r3c2: Scalar,
        r3c3: Scalar,
    ) -> Self {
        Self([
            Vector::new(r0c0, r1c0, r2c0, r3c0),
            Vector::new(r0c1, r1c1, r2c1, r3c1),
            Vector::new(r0c2, r1c2, r2c2, r3c2),
            Vector::new(r0c3, r1c3, r2c3, r3c3),
        ])
    }

    fn from_rows(rows: [[Scalar; 4]; 4]) -> Self {
        let [r0, r1, r2, r3] = rows;

        Self::new(
            r0[0], r0[1], r0[2], r0[3],
            r1[0], r1[1], r1[2], r1[3],
            r2[0], r2[1], r2[2], r2[3],
            r3[0], r3[1], r3[2], r3[3],
        )
    }
}

/// A 4x4 transformation matrix, stored as four columns.
///
/// Transforms compose by matrix multiplication: `a.combine(&b)` yields `a × b`, which maps a point
/// through `b` first and `a` second. The chain `projection.combine(&view).combine(&model)` thus
/// takes a model-space point all the way to clip space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Transform([Vector; 4]);

unsafe impl bytemuck::Pod for Transform {}
unsafe impl bytemuck::Zeroable for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self::new(
        1., 0., 0., 0.,
        0., 1., 0., 0.,
        0., 0., 1., 0.,
        0., 0., 0., 1.,
    );

    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// The element at `row` and `column`.
    pub fn get(&self, row: usize, column: usize) -> Scalar {
        self.0[column].0[row]
    }

    pub fn columns(&self) -> &[Vector; 4] {
        &self.0
    }

    /// The 16 elements in column-major order.
    pub fn to_cols_array(&self) -> [Scalar; 16] {
        let mut array = [0.; 16];
        for (chunk, column) in array.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&column.0);
        }

        array
    }

    pub fn to_cols_array_2d(&self) -> [[Scalar; 4]; 4] {
        self.0.map(|column| column.0)
    }

    fn to_rows(&self) -> [[Scalar; 4]; 4] {
        let mut rows = [[0.; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, element) in row.iter_mut().enumerate() {
                *element = self.get(r, c);
            }
        }

        rows
    }

    fn product(lhs: &Self, rhs: &Self) -> Self {
        let mut columns = [Vector::ZERO; 4];
        for (c, column) in columns.iter_mut().enumerate() {
            for r in 0..4 {
                column.0[r] = (0..4).map(|k| lhs.get(r, k) * rhs.get(k, c)).sum();
            }
        }

        Self(columns)
    }
}

impl Transform {
    /// Multiplies this transform by `other` on the right.
    ///
    /// After this call, `other` is applied to points *before* the previous contents of `self`.
    pub fn combine(&mut self, other: &Self) -> &mut Self {
        *self = Self::product(self, other);

        self
    }

    pub fn translate(&mut self, x: Scalar, y: Scalar, z: Scalar) -> &mut Self {
        self.combine(&Self::new(
            1., 0., 0.,  x,
            0., 1., 0.,  y,
            0., 0., 1.,  z,
            0., 0., 0., 1.,
        ))
    }

    /// Rotates by `angle` degrees, counter-clockwise about `axis`.
    ///
    /// A zero-length axis leaves the transform unchanged.
    pub fn rotate(&mut self, angle: Scalar, axis: Point) -> &mut Self {
        if axis.length() == 0. {
            return self;
        }

        let Point { x, y, z } = axis.normalize();
        let (s, c) = angle.to_radians().sin_cos();
        let t = 1. - c;

        self.combine(&Self::new(
            (t * x * x) + c,       (t * x * y) - (s * z), (t * x * z) + (s * y), 0.,
            (t * x * y) + (s * z), (t * y * y) + c,       (t * y * z) - (s * x), 0.,
            (t * x * z) - (s * y), (t * y * z) + (s * x), (t * z * z) + c,       0.,
            0.,                    0.,                    0.,                    1.,
        ))
    }

    /// Rotates by `angle` degrees about the Z axis.
    pub fn rotate_z(&mut self, angle: Scalar) -> &mut Self {
        self.rotate(angle, Point::UNIT_Z)
    }

    pub fn scale(&mut self, sx: Scalar, sy: Scalar, sz: Scalar) -> &mut Self {
        self.combine(&Self::new(
            sx, 0., 0., 0.,
            0., sy, 0., 0.,
            0., 0., sz, 0.,
            0., 0., 0., 1.,
        ))
    }

    /// Scales by `factors` about `center` rather than the origin.
    pub fn scale_about(&mut self, factors: Point, center: Point) -> &mut Self {
        let Point { x: sx, y: sy, z: sz } = factors;
        let Point { x: cx, y: cy, z: cz } = center;

        self.combine(&Self::new(
            sx, 0., 0., cx * (1. - sx),
            0., sy, 0., cy * (1. - sy),
            0., 0., sz, cz * (1. - sz),
            0., 0., 0., 1.,
        ))
    }

    /// The inverse of this transform.
    ///
    /// A singular transform has no inverse; the identity is returned in that case.
    pub fn inverse(&self) -> Self {
        let mut lhs = self.to_rows();
        let mut rhs = Self::IDENTITY.to_rows();

        // Gauss-Jordan elimination with partial pivoting.
        for column in 0..4 {
            let pivot = (column..4)
                .max_by(|&a, &b| lhs[a][column].abs().total_cmp(&lhs[b][column].abs()))
                .unwrap_or(column);
            if lhs[pivot][column] == 0. {
                return Self::IDENTITY;
            }
            lhs.swap(column, pivot);
            rhs.swap(column, pivot);

            let divisor = lhs[column][column];
            for k in 0..4 {
                lhs[column][k] /= divisor;
                rhs[column][k] /= divisor;
            }

            let (pivot_lhs, pivot_rhs) = (lhs[column], rhs[column]);
            for row in (0..4).filter(|&row| row != column) {
                let factor = lhs[row][column];
                if factor == 0. {
                    continue;
                }
                for k in 0..4 {
                    lhs[row][k] -= factor * pivot_lhs[k];
                    rhs[row][k] -= factor * pivot_rhs[k];
                }
            }
        }

        Self::from_rows(rhs)
    }

    pub fn transpose(&self) -> Self {
        // The rows of `self` are the columns of the transpose.
        Self(self.to_rows().map(Vector))
    }
}

impl Transform {
    /// Maps `p` through this transform, treating it as an affine point.
    ///
    /// The homogeneous `w` coordinate is ignored; see [`Self::project_point`] for the perspective
    /// divide.
    pub fn transform_point(&self, p: Point) -> Point {
        let [x, y, z, _] = self.apply(p);

        Point::new(x, y, z)
    }

    /// Maps `p` through this transform and divides by the resulting `w`.
    pub fn project_point(&self, p: Point) -> Point {
        let [x, y, z, w] = self.apply(p);
        if w == 0. {
            Point::new(x, y, z)
        } else {
            Point::new(x / w, y / w, z / w)
        }
    }

    fn apply(&self, p: Point) -> [Scalar; 4] {
        let mut out = [0.; 4];
        for (r, element) in out.iter_mut().enumerate() {
            *element = (self.get(r, 0) * p.x)
                + (self.get(r, 1) * p.y)
                + (self.get(r, 2) * p.z)
                + self.get(r, 3);
        }

        out
    }

    /// The bounding rectangle of the four transformed corners of `rect`, in the `z = 0` plane.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let corners = [
            Point::new(rect.left, rect.top, 0.),
            Point::new(rect.left, rect.bottom(), 0.),
            Point::new(rect.right(), rect.top, 0.),
            Point::new(rect.right(), rect.bottom(), 0.),
        ];

        Self::rect_enclosing(corners.map(|p| self.transform_point(p)))
    }

    /// The axis-aligned box enclosing all eight transformed corners of `aabb`.
    pub fn transform_box(&self, aabb: BoundingBox) -> BoundingBox {
        BoundingBox::enclosing(aabb.corners().map(|p| self.transform_point(p)))
    }

    /// The X/Y extents of the eight transformed corners of `aabb`.
    pub fn transform_box_to_rect(&self, aabb: BoundingBox) -> Rect {
        Self::rect_enclosing(aabb.corners().map(|p| self.transform_point(p)))
    }

    fn rect_enclosing(points: impl IntoIterator<Item = Point>) -> Rect {
        let bounds = BoundingBox::enclosing(points);
        let size = bounds.size();

        Rect::new(bounds.min.x, bounds.min.y, size.x, size.y)
    }
}

impl Transform {
    /// An orthographic projection mapping the given volume onto OpenGL-style clip space.
    pub fn ortho(
        left: Scalar,
        right: Scalar,
        bottom: Scalar,
        top: Scalar,
        near: Scalar,
        far: Scalar,
    ) -> Self {
        let (w, h, d) = (right - left, top - bottom, far - near);

        Self::new(
            2. / w, 0.,     0.,      -(right + left) / w,
            0.,     2. / h, 0.,      -(top + bottom) / h,
            0.,     0.,     -2. / d, -(far + near) / d,
            0.,     0.,     0.,      1.,
        )
    }

    /// A perspective projection with a vertical field of view of `fov` radians.
    pub fn perspective(fov: Scalar, aspect: Scalar, near: Scalar, far: Scalar) -> Self {
        let f = 1. / (fov / 2.).tan();
        let d = far - near;

        Self::new(
            f / aspect, 0., 0.,                 0.,
            0.,         f,  0.,                 0.,
            0.,         0., -(far + near) / d, -(2. * far * near) / d,
            0.,         0., -1.,                0.,
        )
    }

    /// A view transform placing the eye at `eye`, looking at `target`.
    pub fn look_at(eye: Point, target: Point, up: Point) -> Self {
        let f = (target - eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);

        Self::new(
             s.x,  s.y,  s.z, -s.dot(eye),
             u.x,  u.y,  u.z, -u.dot(eye),
            -f.x, -f.y, -f.z,  f.dot(eye),
             0.,   0.,   0.,   1.,
        )
    }
}

impl Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::product(&self, &rhs)
    }
}

impl MulAssign for Transform {
    fn mul_assign(&mut self, rhs: Self) {
        self.combine(&rhs);
    }
}

impl Mul<Point> for Transform {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        self.transform_point(rhs)
    }
}

impl Vector {
    pub const fn new(r0: Scalar, r1: Scalar, r2: Scalar, r3: Scalar) -> Self {
        Self([r0, r1, r2, r3])
    }
}

/// A 4x1 column matrix of `Scalar`s.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(transparent)]
pub struct Vector([Scalar; 4]);

unsafe impl bytemuck::Pod for Vector {}
unsafe impl bytemuck::Zeroable for Vector {}

impl Vector {
    pub const ZERO: Self = Self::new(0., 0., 0., 0.);

    pub const fn to_array(&self) -> [Scalar; 4] {
        self.0
    }
}

impl From<Point> for Vector {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y, p.z, 1.)
    }
}

impl From<Vector> for Point {
    fn from(v: Vector) -> Self {
        let [x, y, z, _] = v.to_array();

        Self { x, y, z }
    }
}

// SPDX-License-Identifier: MPL-2.0

use std::ops::{Index, IndexMut};

use crate::{Color, Point};

/// A colored point as consumed by the vertex shader.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: Point,
    pub color: Color,
}

unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

impl Vertex {
    pub const fn new(position: Point, color: Color) -> Self {
        Self { position, color }
    }
}

/// How consecutive vertices are assembled into primitives.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrimitiveType {
    Points,
    /// Each pair of vertices is an independent segment.
    Lines,
    /// Each vertex is joined to its predecessor.
    LineStrip,
    /// Each triad of vertices is an independent triangle.
    Triangles,
}

impl PrimitiveType {
    pub const ALL: [Self; 4] = [Self::Points, Self::Lines, Self::LineStrip, Self::Triangles];
}

/// A vertex buffer tagged with its primitive type.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexArray {
    primitive: PrimitiveType,
    vertices: Vec<Vertex>,
}

impl VertexArray {
    pub fn new(primitive: PrimitiveType) -> Self {
        Self {
            primitive,
            vertices: Vec::new(),
        }
    }

    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    /// Replaces the contents with `len` vertices produced by `vertex_at`.
    pub fn rebuild(&mut self, len: usize, vertex_at: impl FnMut(usize) -> Vertex) {
        self.vertices.clear();
        self.vertices.extend((0..len).map(vertex_at));
    }

    /// Appends a segment from `a` to `b`.
    pub fn push_line(&mut self, a: Point, b: Point, color: Color) {
        self.vertices.push(Vertex::new(a, color));
        self.vertices.push(Vertex::new(b, color));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vertex> {
        self.vertices.iter()
    }
}

impl Index<usize> for VertexArray {
    type Output = Vertex;

    fn index(&self, index: usize) -> &Self::Output {
        &self.vertices[index]
    }
}

impl IndexMut<usize> for VertexArray {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

impl<'a> IntoIterator for &'a VertexArray {
    type Item = &'a Vertex;
    type IntoIter = std::slice::Iter<'a, Vertex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

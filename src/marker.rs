// SPDX-License-Identifier: MPL-2.0

//! Crosshair markers pinned to data points in 3D mode.

use crate::{
    Color,
    OrbitCamera,
    Point,
    PrimitiveType,
    RenderStates,
    RenderTarget,
    Rotation,
    Transform,
    Transformable,
    Vertex,
    VertexArray,
    View,
};

/// Marker dimensions at a 1024×768 target.
const INITIAL_SIZE: Point = Point::new(0.03, 0.06, 0.03);
/// Marker dimensions are kept constant on screen relative to this target size.
const REFERENCE_WIDTH: f32 = 1024.;
const REFERENCE_HEIGHT: f32 = 768.;
const MARKER_TILT: Rotation = Rotation::new(-30., Point::UNIT_Y);

/// A solid octahedron with a wire border, standing on its bottom tip.
#[derive(Clone, Debug)]
pub struct Octahedron {
    /// Half-extents; the octahedron is twice as tall as `size.y`.
    size: Point,
    color: Color,
    border_color: Color,
    transformable: Transformable,
    faces: VertexArray,
    border: VertexArray,
    dirty: bool,
}

impl Octahedron {
    pub fn new(size: Point) -> Self {
        Self {
            size,
            color: Color::GRAY,
            border_color: Color::WHITE,
            transformable: Transformable::default(),
            faces: VertexArray::new(PrimitiveType::Triangles),
            border: VertexArray::new(PrimitiveType::Lines),
            dirty: true,
        }
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn set_size(&mut self, size: Point) {
        if size != self.size {
            self.size = size;
            self.dirty = true;
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        if color != self.color {
            self.color = color;
            self.dirty = true;
        }
    }

    pub fn border_color(&self) -> Color {
        self.border_color
    }

    pub fn set_border_color(&mut self, color: Color) {
        if color != self.border_color {
            self.border_color = color;
            self.dirty = true;
        }
    }

    pub fn transformable(&self) -> &Transformable {
        &self.transformable
    }

    pub fn transformable_mut(&mut self) -> &mut Transformable {
        &mut self.transformable
    }

    /// The eight triangular faces, regenerated if stale.
    pub fn faces(&mut self) -> &VertexArray {
        self.update();
        &self.faces
    }

    /// The twelve edges, regenerated if stale.
    pub fn border(&mut self) -> &VertexArray {
        self.update();
        &self.border
    }

    fn update(&mut self) {
        if !self.dirty {
            return;
        }

        let Point { x: sx, y: sy, z: sz } = self.size;
        // The bottom tip sits on the local origin.
        let right = Point::new(sx, sy, 0.);
        let left = Point::new(-sx, sy, 0.);
        let top = Point::new(0., 2. * sy, 0.);
        let bottom = Point::ORIGIN;
        let front = Point::new(0., sy, sz);
        let back = Point::new(0., sy, -sz);

        self.faces.clear();
        for tip in [top, bottom] {
            for depth in [front, back] {
                for side in [right, left] {
                    for corner in [tip, depth, side] {
                        self.faces.push(Vertex::new(corner, self.color));
                    }
                }
            }
        }

        self.border.clear();
        let edges = [
            (top, right), (top, left), (top, front), (top, back),
            (bottom, right), (bottom, left), (bottom, front), (bottom, back),
            (front, right), (right, back), (back, left), (left, front),
        ];
        for (a, b) in edges {
            self.border.push_line(a, b, self.border_color);
        }

        self.dirty = false;
    }

    pub fn draw(&mut self, target: &mut dyn RenderTarget, states: &RenderStates) {
        self.update();

        let states = RenderStates::new(states.transform * self.transformable.transform());
        target.draw(&self.faces, &states);
        target.draw(&self.border, &states);
    }
}

/// A single marker.
#[derive(Clone, Debug)]
pub struct Marker {
    visible: bool,
    active: bool,
    position: Point,
    active_color: Color,
    inactive_color: Color,
    shape: Octahedron,
}

impl Default for Marker {
    fn default() -> Self {
        let mut shape = Octahedron::new(INITIAL_SIZE);
        shape.transformable_mut().set_rotation(MARKER_TILT);

        Self {
            visible: false,
            active: false,
            position: Point::ORIGIN,
            active_color: Color::LIME,
            inactive_color: Color::GRAY,
            shape,
        }
    }
}

impl Marker {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The marked point in data space.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn set_active_color(&mut self, color: Color) {
        self.active_color = color;
    }

    pub fn inactive_color(&self) -> Color {
        self.inactive_color
    }

    pub fn set_inactive_color(&mut self, color: Color) {
        self.inactive_color = color;
    }

    pub fn set_border_color(&mut self, color: Color) {
        self.shape.set_border_color(color);
    }

    pub fn shape(&self) -> &Octahedron {
        &self.shape
    }

    /// Resizes the marker to its initial size times the given factors.
    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) {
        self.shape.set_size(Point::new(INITIAL_SIZE.x * sx, INITIAL_SIZE.y * sy, INITIAL_SIZE.z * sz));
    }

    /// Draws the marker at its position mapped through `transform`.
    pub fn draw(&mut self, target: &mut dyn RenderTarget, transform: &Transform) {
        let color = if self.active { self.active_color } else { self.inactive_color };
        self.shape.set_color(color);
        self.shape.transformable_mut().set_position(transform.transform_point(self.position));
        self.shape.draw(target, &RenderStates::default());
    }
}

/// A fixed set of markers, at most one of which is selected.
#[derive(Clone, Debug)]
pub struct Markers {
    markers: Vec<Marker>,
    selected_index: Option<usize>,
    /// Projects the markers, independently of the chart camera's zoom and projection.
    camera: OrbitCamera,
}

impl Default for Markers {
    fn default() -> Self {
        Self::new(12)
    }
}

impl Markers {
    pub fn new(count: usize) -> Self {
        Self {
            markers: vec![Marker::default(); count],
            selected_index: None,
            camera: OrbitCamera::new(45., 0.1, 100.),
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Grows or shrinks the set, keeping existing markers.
    ///
    /// The selection is dropped if the selected marker is removed.
    pub fn set_count(&mut self, count: usize) {
        self.markers.resize_with(count, Marker::default);
        if self.selected_index.map_or(false, |index| index >= count) {
            self.selected_index = None;
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Selects the marker at `index`, clamped into range, and deactivates all others.
    pub fn set_selected_index(&mut self, index: usize) {
        let Some(last) = self.markers.len().checked_sub(1) else {
            return;
        };
        let index = index.min(last);

        for (i, marker) in self.markers.iter_mut().enumerate() {
            marker.set_active(i == index);
        }
        self.selected_index = Some(index);
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Marker> {
        self.markers.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    /// Draws every visible marker.
    ///
    /// `transform` must take data space to camera space; markers are projected orthographically
    /// from there and sized to stay constant on screen.
    pub fn draw(&mut self, target: &mut dyn RenderTarget, transform: &Transform) {
        let (width, height) = target.size();
        if width == 0 || height == 0 {
            return;
        }
        let (sx, sy) = (REFERENCE_WIDTH / width as f32, REFERENCE_HEIGHT / height as f32);

        let previous_view = *target.view();
        target.set_view(View {
            projection: self.camera.transform(),
            view: Transform::IDENTITY,
            check_boundary: false,
        });
        for marker in self.markers.iter_mut().filter(|marker| marker.is_visible()) {
            marker.scale(sx, sy, 1.);
            marker.draw(target, transform);
        }
        target.set_view(previous_view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frame;

    fn active(markers: &Markers) -> Vec<usize> {
        markers
            .iter()
            .enumerate()
            .filter(|(_, marker)| marker.is_active())
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn nothing_is_selected_initially() {
        let markers = Markers::default();

        assert_eq!(markers.len(), 12);
        assert_eq!(markers.selected_index(), None);
        assert!(active(&markers).is_empty());
    }

    #[test]
    fn selection_activates_exactly_one_marker() {
        let mut markers = Markers::new(5);
        for k in [3, 0, 4, 4, 1] {
            markers.set_selected_index(k);
            assert_eq!(active(&markers), [k]);
            assert_eq!(markers.selected_index(), Some(k));
        }

        markers.set_selected_index(99);
        assert_eq!(active(&markers), [4]);
    }

    #[test]
    fn shrinking_drops_removed_selection() {
        let mut markers = Markers::new(5);
        markers.set_selected_index(4);
        markers.set_count(3);

        assert_eq!(markers.len(), 3);
        assert_eq!(markers.selected_index(), None);

        markers.set_selected_index(1);
        markers.set_count(8);
        assert_eq!(markers.selected_index(), Some(1));
        assert_eq!(active(&markers), [1]);

        let mut empty = Markers::new(0);
        empty.set_selected_index(0);
        assert_eq!(empty.selected_index(), None);
    }

    #[test]
    fn octahedron_stands_on_its_tip() {
        let mut shape = Octahedron::new(Point::new(1., 2., 1.));

        assert_eq!(shape.faces().len(), 24);
        assert_eq!(shape.border().len(), 24);
        let lowest = shape.faces().iter().map(|v| v.position.y).fold(f32::MAX, f32::min);
        let highest = shape.faces().iter().map(|v| v.position.y).fold(f32::MIN, f32::max);
        assert_eq!((lowest, highest), (0., 4.));
    }

    #[test]
    fn only_visible_markers_are_drawn_in_their_state_color() {
        let mut markers = Markers::new(3);
        markers.set_selected_index(2);
        for i in [0, 2] {
            if let Some(marker) = markers.get_mut(i) {
                marker.set_visible(true);
                marker.set_position(Point::new(i as f32, 0., 0.));
            }
        }

        let mut frame = Frame::new(512, 384);
        let before = *frame.view();
        markers.draw(&mut frame, &Transform::IDENTITY);

        let commands = frame.commands();
        assert_eq!(commands.len(), 4);
        assert!(commands[0].vertices.iter().all(|v| v.color == Color::GRAY));
        assert!(commands[2].vertices.iter().all(|v| v.color == Color::LIME));
        assert_eq!(commands[2].model.transform_point(Point::ORIGIN), Point::new(2., 0., 0.));
        assert_eq!(markers.get(0).map(|m| m.shape().size()), Some(Point::new(0.06, 0.12, 0.03)));
        assert_eq!(*frame.view(), before);
    }
}

// SPDX-License-Identifier: MPL-2.0

//! Render targets and the state attached to each draw.

use crate::{Color, OrbitCamera, PrimitiveType, Transform, Vertex, VertexArray};

/// The depth range covered by the 2D pixel view.
const PIXEL_VIEW_DEPTH: f32 = 10.;

/// Something vertex arrays can be drawn onto.
///
/// Draws are issued in painter's order; with depth testing enabled, nearer fragments win
/// regardless of order.
pub trait RenderTarget {
    /// The size of the target in pixels.
    fn size(&self) -> (u32, u32);

    /// Wipes the target with `color`, discarding everything drawn since the last clear.
    fn clear(&mut self, color: Color);

    fn view(&self) -> &View;

    fn set_view(&mut self, view: View);

    fn depth_test(&self) -> bool;

    fn set_depth_test(&mut self, enabled: bool);

    /// Draws `vertices` through the current view and `states.transform`.
    fn draw(&mut self, vertices: &VertexArray, states: &RenderStates);
}

/// The camera half of the transform pipeline: projection and view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub projection: Transform,
    pub view: Transform,
    /// Whether vertices whose model-space position lies outside the plot box are hidden.
    pub check_boundary: bool,
}

impl View {
    /// The 2D view for a `width`×`height` target.
    ///
    /// One unit is one pixel and the origin is the bottom-left corner.
    pub fn pixels(width: f32, height: f32) -> Self {
        Self {
            projection: Transform::ortho(
                0.,
                width,
                0.,
                height,
                -PIXEL_VIEW_DEPTH,
                PIXEL_VIEW_DEPTH,
            ),
            view: Transform::IDENTITY,
            check_boundary: false,
        }
    }

    pub fn from_camera(camera: &OrbitCamera) -> Self {
        Self {
            projection: camera.transform(),
            view: camera.view_transform(),
            check_boundary: camera.check_boundary(),
        }
    }

    pub fn view_projection(&self) -> Transform {
        self.projection * self.view
    }
}

/// Per-draw state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStates {
    /// The model transform applied before the view.
    pub transform: Transform,
}

impl RenderStates {
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }
}

/// A single recorded draw.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub primitive: PrimitiveType,
    pub vertices: Vec<Vertex>,
    pub model: Transform,
    pub view: View,
    pub depth_test: bool,
}

/// A render target that records draws in memory.
///
/// A frame is replayed onto the GPU by [`Renderer::render`](crate::Renderer::render).
#[derive(Clone, Debug)]
pub struct Frame {
    width: u32,
    height: u32,
    clear_color: Option<Color>,
    view: View,
    depth_test: bool,
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear_color: None,
            view: View::pixels(width as f32, height as f32),
            depth_test: false,
            commands: Vec::new(),
        }
    }

    /// The color of the most recent clear, if any.
    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

impl RenderTarget for Frame {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = Some(color);
        self.commands.clear();
    }

    fn view(&self) -> &View {
        &self.view
    }

    fn set_view(&mut self, view: View) {
        self.view = view;
    }

    fn depth_test(&self) -> bool {
        self.depth_test
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn draw(&mut self, vertices: &VertexArray, states: &RenderStates) {
        if vertices.is_empty() {
            return;
        }

        self.commands.push(DrawCommand {
            primitive: vertices.primitive(),
            vertices: vertices.vertices().to_vec(),
            model: states.transform,
            view: self.view,
            depth_test: self.depth_test,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn pixel_view_puts_origin_bottom_left() {
        let view = View::pixels(200., 100.);
        let clip = view.view_projection().transform_point(Point::new(0., 0., 0.));
        assert_eq!((clip.x, clip.y), (-1., -1.));

        let clip = view.view_projection().transform_point(Point::new(200., 100., 0.));
        assert_eq!((clip.x, clip.y), (1., 1.));
    }

    #[test]
    fn frame_records_non_empty_draws_until_cleared() {
        let mut frame = Frame::new(10, 10);
        let mut vertices = VertexArray::new(PrimitiveType::Points);

        frame.draw(&vertices, &RenderStates::default());
        assert!(frame.commands().is_empty());

        vertices.push(Vertex::new(Point::ORIGIN, Color::RED));
        frame.set_depth_test(true);
        frame.draw(&vertices, &RenderStates::default());
        assert_eq!(frame.commands().len(), 1);
        assert!(frame.commands()[0].depth_test);

        frame.clear(Color::BLACK);
        assert!(frame.commands().is_empty());
        assert_eq!(frame.clear_color(), Some(Color::BLACK));
    }
}

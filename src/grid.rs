// SPDX-License-Identifier: MPL-2.0

//! Axis-division geometry.
//!
//! In 2D mode the grid spans the grid rectangle in pixel space. In 3D mode it is drawn on three
//! faces of the plot box, one per pair of axes; which of the two opposite faces is used is chosen
//! from the camera orientation so the grid always sits behind the data.

use crate::{BoundingBox, Color, Point, Rect, RenderStates, RenderTarget, VertexArray};
use crate::vertex::PrimitiveType;

/// The inset between the window rectangle and the grid rectangle, in pixels.
pub const BORDER_PIXEL_OFFSET: f32 = 1.;

/// The depth at which the 2D grid is drawn, behind any data at `z = 0`.
pub const MIN_Z_VALUE: f32 = -1.;
pub const MAX_Z_VALUE: f32 = 1.;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        self as usize
    }
}

/// A pair of opposite faces of the plot box.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Plane {
    /// The front and back faces, perpendicular to Z.
    Xy,
    /// The top and bottom faces, perpendicular to Y.
    Xz,
    /// The right and left faces, perpendicular to X.
    Yz,
}

impl Plane {
    pub const ALL: [Self; 3] = [Self::Xy, Self::Xz, Self::Yz];

    fn index(self) -> usize {
        self as usize
    }

    fn depends_on(self, axis: Axis) -> bool {
        !matches!(
            (self, axis),
            (Self::Xy, Axis::Z) | (Self::Xz, Axis::Y) | (Self::Yz, Axis::X)
        )
    }
}

/// Full-grid and border-only buffers for one 2D axis or one 3D plane.
#[derive(Clone, Debug)]
struct GridLines {
    grid: VertexArray,
    border: VertexArray,
    /// Set whenever an input changes; cleared only by regeneration.
    dirty: bool,
}

impl Default for GridLines {
    fn default() -> Self {
        Self {
            grid: VertexArray::new(PrimitiveType::Lines),
            border: VertexArray::new(PrimitiveType::Lines),
            dirty: true,
        }
    }
}

impl GridLines {
    fn reset(&mut self) {
        self.grid.clear();
        self.border.clear();
        self.dirty = false;
    }

    /// Appends `divisions + 1` evenly spaced lines between `start` and `stop`, plus the two
    /// outermost ones to the border.
    ///
    /// No interior lines are produced for zero divisions, but the border is still complete.
    fn append(
        &mut self,
        divisions: u32,
        start: f32,
        stop: f32,
        color: Color,
        endpoints: impl Fn(f32) -> (Point, Point),
    ) {
        if divisions > 0 {
            let tick = (stop - start) / divisions as f32;
            for i in 0..=divisions {
                let at = if i == divisions { stop } else { start + (i as f32 * tick) };
                let (a, b) = endpoints(at);
                self.grid.push_line(a, b, color);
            }
        }

        for at in [start, stop] {
            let (a, b) = endpoints(at);
            self.border.push_line(a, b, color);
        }
    }

    fn visible(&self, full: bool) -> &VertexArray {
        if full {
            &self.grid
        } else {
            &self.border
        }
    }
}

/// The chart grid.
#[derive(Clone, Debug)]
pub struct GridShape {
    /// Whether the full grid is drawn; otherwise only the border is.
    visible: bool,
    color: Color,
    three_d: bool,
    window_rectangle: Rect,
    grid_rectangle: Rect,
    divisions: [u32; 3],
    show_top_plane: bool,
    show_front_plane: bool,
    show_right_plane: bool,
    /// Vertical lines at the X ticks of the 2D grid.
    x_lines: GridLines,
    /// Horizontal lines at the Y ticks of the 2D grid.
    y_lines: GridLines,
    planes: [GridLines; 3],
}

impl Default for GridShape {
    fn default() -> Self {
        Self {
            visible: true,
            color: Color::GRAY,
            three_d: false,
            window_rectangle: Rect::default(),
            grid_rectangle: Rect::default(),
            divisions: [10, 10, 0],
            show_top_plane: true,
            show_front_plane: true,
            show_right_plane: true,
            x_lines: GridLines::default(),
            y_lines: GridLines::default(),
            planes: Default::default(),
        }
    }
}

impl GridShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Chooses between the full grid (`true`) and the border only (`false`).
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        if color == self.color {
            return;
        }
        self.color = color;
        self.x_lines.dirty = true;
        self.y_lines.dirty = true;
        for plane in &mut self.planes {
            plane.dirty = true;
        }
    }

    pub fn is_three_d(&self) -> bool {
        self.three_d
    }

    pub fn set_three_d(&mut self, three_d: bool) {
        self.three_d = three_d;
    }

    pub fn window_rectangle(&self) -> Rect {
        self.window_rectangle
    }

    /// Resets the window rectangle and rederives the grid rectangle from it.
    ///
    /// Empty or unchanged rectangles are ignored. Returns whether anything changed.
    pub fn set_window_rectangle(&mut self, rect: Rect) -> bool {
        if rect.is_empty() || rect == self.window_rectangle {
            return false;
        }

        self.window_rectangle = rect;
        self.grid_rectangle = Rect::new(
            rect.left + BORDER_PIXEL_OFFSET,
            rect.top + BORDER_PIXEL_OFFSET,
            (rect.width - (2. * BORDER_PIXEL_OFFSET)).max(0.),
            (rect.height - (2. * BORDER_PIXEL_OFFSET)).max(0.),
        );
        self.x_lines.dirty = true;
        self.y_lines.dirty = true;

        true
    }

    /// The window rectangle inset by the border.
    pub fn grid_rectangle(&self) -> Rect {
        self.grid_rectangle
    }

    /// The area data is plotted into; the same as [the grid rectangle](Self::grid_rectangle).
    pub fn client_rectangle(&self) -> Rect {
        self.grid_rectangle
    }

    pub fn number_of_divisions(&self, axis: Axis) -> u32 {
        self.divisions[axis.index()]
    }

    pub fn set_number_of_divisions(&mut self, axis: Axis, divisions: u32) {
        if divisions == self.divisions[axis.index()] {
            return;
        }
        self.divisions[axis.index()] = divisions;

        match axis {
            Axis::X => self.x_lines.dirty = true,
            Axis::Y => self.y_lines.dirty = true,
            Axis::Z => {}
        }
        for plane in Plane::ALL.into_iter().filter(|plane| plane.depends_on(axis)) {
            self.planes[plane.index()].dirty = true;
        }
    }

    pub fn is_top_plane_shown(&self) -> bool {
        self.show_top_plane
    }

    /// Chooses the top (`true`) or bottom face for the XZ grid.
    pub fn show_top_plane(&mut self, show: bool) {
        Self::set_plane_flag(&mut self.show_top_plane, show, &mut self.planes[Plane::Xz.index()]);
    }

    pub fn is_front_plane_shown(&self) -> bool {
        self.show_front_plane
    }

    /// Chooses the front (`true`, `z = 1`) or back face for the XY grid.
    pub fn show_front_plane(&mut self, show: bool) {
        Self::set_plane_flag(&mut self.show_front_plane, show, &mut self.planes[Plane::Xy.index()]);
    }

    pub fn is_right_plane_shown(&self) -> bool {
        self.show_right_plane
    }

    /// Chooses the right (`true`, `x = 1`) or left face for the YZ grid.
    pub fn show_right_plane(&mut self, show: bool) {
        Self::set_plane_flag(&mut self.show_right_plane, show, &mut self.planes[Plane::Yz.index()]);
    }

    fn set_plane_flag(flag: &mut bool, show: bool, lines: &mut GridLines) {
        if *flag != show {
            *flag = show;
            lines.dirty = true;
        }
    }

    /// Whether any geometry of the current mode is stale.
    pub fn needs_update(&self) -> bool {
        if self.three_d {
            self.planes.iter().any(|plane| plane.dirty)
        } else {
            self.x_lines.dirty || self.y_lines.dirty
        }
    }

    pub fn is_plane_dirty(&self, plane: Plane) -> bool {
        self.planes[plane.index()].dirty
    }
}

impl GridShape {
    /// Regenerates the stale geometry of the current mode.
    pub fn update(&mut self) {
        if self.three_d {
            for plane in Plane::ALL {
                if self.planes[plane.index()].dirty {
                    self.build_plane(plane);
                }
            }
        } else {
            if self.x_lines.dirty {
                self.build_x_axis();
            }
            if self.y_lines.dirty {
                self.build_y_axis();
            }
        }
    }

    fn build_x_axis(&mut self) {
        tracing::trace!("Rebuilding {} X divisions...", self.divisions[Axis::X.index()]);

        let rect = self.grid_rectangle;
        let lines = &mut self.x_lines;
        lines.reset();
        lines.append(
            self.divisions[Axis::X.index()],
            rect.left,
            rect.right(),
            self.color,
            |x| (Point::new(x, rect.top, MIN_Z_VALUE), Point::new(x, rect.bottom(), MIN_Z_VALUE)),
        );
    }

    fn build_y_axis(&mut self) {
        tracing::trace!("Rebuilding {} Y divisions...", self.divisions[Axis::Y.index()]);

        let rect = self.grid_rectangle;
        let lines = &mut self.y_lines;
        lines.reset();
        lines.append(
            self.divisions[Axis::Y.index()],
            rect.top,
            rect.bottom(),
            self.color,
            |y| (Point::new(rect.left, y, MIN_Z_VALUE), Point::new(rect.right(), y, MIN_Z_VALUE)),
        );
    }

    fn build_plane(&mut self, plane: Plane) {
        tracing::trace!("Rebuilding {:?} plane...", plane);

        let BoundingBox { min, max } = BoundingBox::PLOT;
        let [nx, ny, nz] = self.divisions;
        let color = self.color;
        let pick = |show: bool, low: f32, high: f32| if show { high } else { low };
        let lines = &mut self.planes[plane.index()];
        lines.reset();

        match plane {
            Plane::Xy => {
                let z = pick(self.show_front_plane, MIN_Z_VALUE, MAX_Z_VALUE);
                lines.append(nx, min.x, max.x, color, |x| {
                    (Point::new(x, min.y, z), Point::new(x, max.y, z))
                });
                lines.append(ny, min.y, max.y, color, |y| {
                    (Point::new(min.x, y, z), Point::new(max.x, y, z))
                });
            }
            Plane::Xz => {
                let y = pick(self.show_top_plane, min.y, max.y);
                lines.append(nx, min.x, max.x, color, |x| {
                    (Point::new(x, y, MIN_Z_VALUE), Point::new(x, y, MAX_Z_VALUE))
                });
                lines.append(nz, MIN_Z_VALUE, MAX_Z_VALUE, color, |z| {
                    (Point::new(min.x, y, z), Point::new(max.x, y, z))
                });
            }
            Plane::Yz => {
                let x = pick(self.show_right_plane, min.x, max.x);
                lines.append(ny, min.y, max.y, color, |y| {
                    (Point::new(x, y, MIN_Z_VALUE), Point::new(x, y, MAX_Z_VALUE))
                });
                lines.append(nz, MIN_Z_VALUE, MAX_Z_VALUE, color, |z| {
                    (Point::new(x, min.y, z), Point::new(x, max.y, z))
                });
            }
        }
    }

    /// The buffers the next draw will submit.
    ///
    /// Call [`update`](Self::update) first; stale buffers are returned as they are.
    pub fn lines(&self) -> Vec<&VertexArray> {
        if self.three_d {
            self.planes.iter().map(|plane| plane.visible(self.visible)).collect()
        } else {
            vec![self.x_lines.visible(self.visible), self.y_lines.visible(self.visible)]
        }
    }

    /// Regenerates stale geometry, then draws either the full grid or its border.
    pub fn draw(&mut self, target: &mut dyn RenderTarget, states: &RenderStates) {
        self.update();
        for lines in self.lines() {
            target.draw(lines, states);
        }
    }
}

// SPDX-License-Identifier: MPL-2.0

//! The chart: axis ranges, the data transform, and per-frame draw orchestration.

use serde::{Deserialize, Serialize};

use crate::{
    annotation::ApproximateMetrics,
    grid::Axis,
    is_in_range,
    Annotation,
    BoundingBox,
    ChartConfig,
    Color,
    GridShape,
    Markers,
    OrbitCamera,
    Point,
    PointsShape,
    Rect,
    RenderStates,
    RenderTarget,
    ShapeKind,
    TextMetrics,
    Transform,
    Transformable,
    View,
};

/// The smallest width and height the chart renders at, in pixels.
pub const MIN_SIZE: u32 = 10;

/// The fraction of its own magnitude by which a bound is pushed past a crossing opposite bound.
const CLIP_RATIO: f64 = 0.1;

/// The visible data range of each axis; `min < max` always holds on a chart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Default for AxisRanges {
    fn default() -> Self {
        Self {
            x_min: 0.,
            x_max: 1.,
            y_min: 0.,
            y_max: 1.,
            z_min: 0.,
            z_max: 1.,
        }
    }
}

/// Returns `max`, or a value above `min` if `max` does not exceed it.
fn clip_max(min: f64, max: f64) -> f64 {
    if max > min {
        return max;
    }

    let clipped = min + (min.abs() * CLIP_RATIO);
    if clipped > min {
        clipped
    } else {
        min + 1.
    }
}

/// Returns `min`, or a value below `max` if `min` does not undercut it.
fn clip_min(min: f64, max: f64) -> f64 {
    if min < max {
        return min;
    }

    let clipped = max - (max.abs() * CLIP_RATIO);
    if clipped < max {
        clipped
    } else {
        max - 1.
    }
}

/// A 2D/3D scatter chart.
///
/// Every trace is a [`PointsShape`] of the chart's [`ShapeKind`]. Data pushed into the traces is
/// mapped through a single transform that is re-derived whenever the axis ranges, the chart size,
/// or the mode change.
#[derive(Clone, Debug)]
pub struct ScatterChart {
    kind: ShapeKind,
    grid: GridShape,
    camera: OrbitCamera,
    annotation: Annotation,
    markers: Markers,
    shapes: Vec<PointsShape>,
    ranges: AxisRanges,
    polar_coordinate: bool,
    three_d: bool,
    /// Data space to pixel space in 2D, data space to the plot box in 3D.
    transform: Transformable,
    background_color: Color,
    trace_colors: Vec<Color>,
    seg_colors: Vec<Color>,
    symbol_colors: Vec<Color>,
    width: u32,
    height: u32,
}

impl ScatterChart {
    pub fn new(kind: ShapeKind) -> Self {
        Self::with_config(kind, &ChartConfig::default())
    }

    pub fn with_config(kind: ShapeKind, config: &ChartConfig) -> Self {
        let mut grid = GridShape::new();
        grid.set_color(config.grid.color);
        grid.set_visible(config.grid.show_grid_lines);
        grid.set_number_of_divisions(Axis::X, config.grid.x_divisions);
        grid.set_number_of_divisions(Axis::Y, config.grid.y_divisions);
        grid.set_number_of_divisions(Axis::Z, config.grid.z_divisions);

        let cc = &config.camera;
        let mut camera = OrbitCamera::new(cc.field_of_view, cc.near, cc.far);
        if cc.orthographic {
            camera.use_orthographic_projection();
        } else {
            camera.use_perspective_projection();
        }
        camera.set_azimuth(cc.azimuth);
        camera.set_elevation(cc.elevation);
        camera.set_distance(cc.distance);
        camera.set_check_boundary(cc.check_boundary);

        let ac = &config.annotation;
        let mut annotation = Annotation::new();
        annotation.set_font_size(ac.font_size);
        annotation.set_color(ac.color);
        annotation.set_unit(Axis::X, ac.x_unit.clone());
        annotation.set_unit(Axis::Y, ac.y_unit.clone());
        annotation.set_unit(Axis::Z, ac.z_unit.clone());

        let mut chart = Self {
            kind,
            grid,
            camera,
            annotation,
            markers: Markers::new(config.marker_count),
            shapes: Vec::new(),
            ranges: AxisRanges::default(),
            polar_coordinate: config.polar_coordinate,
            three_d: config.three_d,
            transform: Transformable::default(),
            background_color: config.background_color,
            trace_colors: config.trace_colors.clone(),
            seg_colors: Vec::new(),
            symbol_colors: Vec::new(),
            width: 0,
            height: 0,
        };
        chart.grid.set_three_d(chart.three_d);
        chart.set_number_of_traces(1);
        chart.resize(MIN_SIZE, MIN_SIZE);

        chart
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn grid(&self) -> &GridShape {
        &self.grid
    }

    /// The grid, for styling.
    ///
    /// The window rectangle is owned by the chart; use [`resize`](Self::resize) to change it.
    pub fn grid_mut(&mut self) -> &mut GridShape {
        &mut self.grid
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn annotation_mut(&mut self) -> &mut Annotation {
        &mut self.annotation
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut Markers {
        &mut self.markers
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resizes the chart, never below [`MIN_SIZE`] in either dimension.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(MIN_SIZE), height.max(MIN_SIZE));
        if (width, height) == (self.width, self.height) {
            return;
        }
        tracing::debug!("Resizing chart to {}x{}...", width, height);

        self.width = width;
        self.height = height;
        self.grid.set_window_rectangle(Rect::new(0., 0., width as f32, height as f32));
        self.update_transform();
    }
}

impl ScatterChart {
    pub fn ranges(&self) -> &AxisRanges {
        &self.ranges
    }

    pub fn x_axis_min(&self) -> f64 {
        self.ranges.x_min
    }

    /// Sets the lower X bound, pushing the upper bound out if the two would cross.
    ///
    /// Ignored in polar mode, where the X range is derived.
    pub fn set_x_axis_min(&mut self, value: f64) {
        if self.polar_coordinate {
            return;
        }
        self.ranges.x_min = value;
        self.ranges.x_max = clip_max(value, self.ranges.x_max);
        self.update_transform();
    }

    pub fn x_axis_max(&self) -> f64 {
        self.ranges.x_max
    }

    /// Sets the upper X bound, pushing the lower bound out if the two would cross.
    ///
    /// Ignored in polar mode, where the X range is derived.
    pub fn set_x_axis_max(&mut self, value: f64) {
        if self.polar_coordinate {
            return;
        }
        self.ranges.x_max = value;
        self.ranges.x_min = clip_min(self.ranges.x_min, value);
        self.update_transform();
    }

    pub fn y_axis_min(&self) -> f64 {
        self.ranges.y_min
    }

    pub fn set_y_axis_min(&mut self, value: f64) {
        self.ranges.y_min = value;
        self.ranges.y_max = clip_max(value, self.ranges.y_max);
        self.update_transform();
    }

    pub fn y_axis_max(&self) -> f64 {
        self.ranges.y_max
    }

    pub fn set_y_axis_max(&mut self, value: f64) {
        self.ranges.y_max = value;
        self.ranges.y_min = clip_min(self.ranges.y_min, value);
        self.update_transform();
    }

    pub fn z_axis_min(&self) -> f64 {
        self.ranges.z_min
    }

    pub fn set_z_axis_min(&mut self, value: f64) {
        self.ranges.z_min = value;
        self.ranges.z_max = clip_max(value, self.ranges.z_max);
        self.update_transform();
    }

    pub fn z_axis_max(&self) -> f64 {
        self.ranges.z_max
    }

    pub fn set_z_axis_max(&mut self, value: f64) {
        self.ranges.z_max = value;
        self.ranges.z_min = clip_min(self.ranges.z_min, value);
        self.update_transform();
    }

    pub fn is_polar_coordinate(&self) -> bool {
        self.polar_coordinate
    }

    pub fn set_polar_coordinate(&mut self, polar: bool) {
        self.polar_coordinate = polar;
        self.update_transform();
    }

    pub fn is_three_d(&self) -> bool {
        self.three_d
    }

    /// Switches between 2D and 3D mode; annotation labels are hidden when leaving 3D.
    pub fn set_three_d(&mut self, three_d: bool) {
        if three_d == self.three_d {
            return;
        }
        tracing::debug!("Switching chart to {}...", if three_d { "3D" } else { "2D" });

        self.three_d = three_d;
        self.grid.set_three_d(three_d);
        if !three_d {
            self.annotation.hide();
        }
        self.update_transform();
    }

    /// The data transform.
    pub fn transform(&self) -> Transform {
        self.transform.transform()
    }

    /// Re-derives the data transform from the axis ranges, the grid rectangle, and the mode.
    ///
    /// In polar mode this first re-derives the X range, centered on zero, from the Y range and
    /// the grid's aspect ratio.
    pub fn update_transform(&mut self) {
        let grid = self.grid.grid_rectangle();
        if self.polar_coordinate && !grid.is_empty() {
            let aspect_ratio = f64::from(grid.width) / f64::from(grid.height);
            let half = (self.ranges.y_max - self.ranges.y_min) * aspect_ratio / 2.;
            self.ranges.x_min = -half;
            self.ranges.x_max = half;
        }

        let r = self.ranges;
        let spans = [r.x_max - r.x_min, r.y_max - r.y_min, r.z_max - r.z_min];
        if self.three_d {
            let size = BoundingBox::PLOT.size();
            self.transform.set_scale(Point::new(
                (f64::from(size.x) / spans[0]) as f32,
                (f64::from(size.y) / spans[1]) as f32,
                (f64::from(size.z) / spans[2]) as f32,
            ));
            self.transform.set_origin(Point::new(
                ((r.x_min + r.x_max) / 2.) as f32,
                ((r.y_min + r.y_max) / 2.) as f32,
                ((r.z_min + r.z_max) / 2.) as f32,
            ));
            self.transform.set_position(Point::ORIGIN);
        } else {
            let sx = f64::from(grid.width) / spans[0];
            let sy = f64::from(grid.height) / spans[1];
            self.transform.set_scale(Point::new(sx as f32, sy as f32, 1.));
            self.transform.set_origin(Point::ORIGIN);
            self.transform.set_position(Point::new(
                (f64::from(grid.left) - (r.x_min * sx)) as f32,
                (f64::from(grid.top) - (r.y_min * sy)) as f32,
                0.,
            ));
        }

        tracing::trace!("Rebuilt data transform for {:?}", r);
    }
}

impl ScatterChart {
    /// The pixel column of the X value `value`, optionally clamped into the grid.
    pub fn pixel_at_x(&self, value: f64, grid_limit: bool) -> i32 {
        let mut x = self.transform().transform_point(Point::new(value as f32, 0., 0.)).x;
        if grid_limit {
            let rect = self.grid.client_rectangle();
            x = x.max(rect.left).min(rect.right());
        }

        x.round() as i32
    }

    /// The pixel row, counted from the top, of the Y value `value`, optionally clamped into the
    /// grid.
    pub fn pixel_at_y(&self, value: f64, grid_limit: bool) -> i32 {
        let mut y = self.transform().transform_point(Point::new(0., value as f32, 0.)).y;
        if grid_limit {
            // The grid is inset equally on all sides, so its extent is the same bottom-up.
            let rect = self.grid.client_rectangle();
            y = y.max(rect.top).min(rect.bottom());
        }

        (self.height as f32 - y).round() as i32
    }

    /// The X value at pixel column `pixel`, always clamped into the X range.
    pub fn x_at_pixel(&self, pixel: i32) -> f64 {
        let point = self.transform.inverse_transform().transform_point(Point::new(pixel as f32, 0., 0.));

        f64::from(point.x).max(self.ranges.x_min).min(self.ranges.x_max)
    }

    /// The Y value at pixel row `pixel`, counted from the top, always clamped into the Y range.
    pub fn y_at_pixel(&self, pixel: i32) -> f64 {
        let from_bottom = self.height as f32 - pixel as f32;
        let point = self.transform.inverse_transform().transform_point(Point::new(0., from_bottom, 0.));

        f64::from(point.y).max(self.ranges.y_min).min(self.ranges.y_max)
    }
}

impl ScatterChart {
    pub fn number_of_traces(&self) -> usize {
        self.shapes.len()
    }

    /// Replaces all traces with `count` empty ones.
    pub fn set_number_of_traces(&mut self, count: usize) {
        tracing::debug!("Creating {} {:?} traces...", count, self.kind);

        self.shapes = (0..count).map(|i| self.create_shape(i)).collect();
    }

    fn create_shape(&self, index: usize) -> PointsShape {
        let mut shape = PointsShape::new(self.kind);
        if let Some(color) = self.trace_color_for(index) {
            shape.set_trace_color(color);
        }
        shape.seg_colors_mut().set_colors(self.seg_colors.clone());
        shape.colors_mut().set_colors(self.symbol_colors.clone());

        shape
    }

    fn trace_color_for(&self, index: usize) -> Option<Color> {
        self.trace_colors.get(index).or_else(|| self.trace_colors.first()).copied()
    }

    pub fn shapes(&self) -> &[PointsShape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [PointsShape] {
        &mut self.shapes
    }

    pub fn shape_mut(&mut self, index: usize) -> Option<&mut PointsShape> {
        self.shapes.get_mut(index)
    }

    pub fn trace_colors(&self) -> &[Color] {
        &self.trace_colors
    }

    /// Recolors every trace; trace `i` takes color `i`, or the first color if there are not
    /// enough.
    pub fn set_trace_colors(&mut self, colors: Vec<Color>) {
        self.trace_colors = colors;
        for i in 0..self.shapes.len() {
            if let Some(color) = self.trace_color_for(i) {
                self.shapes[i].set_trace_color(color);
            }
        }
    }

    pub fn seg_colors(&self) -> &[Color] {
        &self.seg_colors
    }

    /// Sets the palette addressed by segment indices on every trace.
    pub fn set_seg_colors(&mut self, colors: Vec<Color>) {
        for shape in &mut self.shapes {
            shape.seg_colors_mut().set_colors(colors.clone());
        }
        self.seg_colors = colors;
    }

    pub fn symbol_colors(&self) -> &[Color] {
        &self.symbol_colors
    }

    /// Sets the palette addressed by per-sample color indices on every trace.
    pub fn set_symbol_colors(&mut self, colors: Vec<Color>) {
        for shape in &mut self.shapes {
            shape.colors_mut().set_colors(colors.clone());
        }
        self.symbol_colors = colors;
    }
}

impl ScatterChart {
    /// Draws a frame, measuring annotation text with [`ApproximateMetrics`].
    pub fn draw(&mut self, target: &mut dyn RenderTarget) {
        self.draw_with_metrics(target, &ApproximateMetrics);
    }

    /// Draws a frame.
    ///
    /// In 3D mode the camera is first rescaled to fit the plot box (orthographic projection only)
    /// and the grid planes behind the data are selected. Then the target is cleared and the grid,
    /// the traces, and in 3D mode the markers are drawn in that order. Annotation labels are laid
    /// out last, for the host to draw on top.
    ///
    /// The target must be as large as the chart; see [`Self::resize`].
    pub fn draw_with_metrics(&mut self, target: &mut dyn RenderTarget, metrics: &dyn TextMetrics) {
        let (width, height) = self.size();
        debug_assert_eq!(target.size(), (width, height), "target and chart sizes differ");

        if self.three_d {
            if self.camera.is_orthographic() {
                self.scale_to_fit(width, height);
            }
            target.set_depth_test(true);
            target.set_view(View::from_camera(&self.camera));

            let (azimuth, elevation) = (self.camera.azimuth(), self.camera.elevation());
            self.grid.show_top_plane(!(elevation > 0.));
            self.grid.show_front_plane(!is_in_range(azimuth, -90., 90.));
            self.grid.show_right_plane(!is_in_range(azimuth, -180., 0.));
        } else {
            target.set_depth_test(false);
            target.set_view(View::pixels(width as f32, height as f32));
        }

        target.clear(self.background_color);
        self.grid.draw(target, &RenderStates::default());

        let model = self.transform();
        let states = RenderStates::new(model);
        for shape in &self.shapes {
            shape.draw(target, &states);
        }

        if self.three_d {
            self.markers.draw(target, &(self.camera.view_transform() * model));
            self.annotation.layout(
                &self.camera,
                width as f32,
                height as f32,
                &self.ranges,
                metrics,
            );
        }
    }

    /// Multiplies the camera scale so the projected plot box fills the target, leaving a margin
    /// for annotation text.
    fn scale_to_fit(&mut self, width: u32, height: u32) {
        let min_side = width.min(height) as f32;
        if min_side <= 0. {
            return;
        }

        let bounds = self.camera.view_projection().transform_box_to_rect(BoundingBox::PLOT);
        let extent = bounds.width.max(bounds.height);
        if !(extent > 0.) || !extent.is_finite() {
            return;
        }

        let ratio = (min_side - (5. * self.annotation.font_size())) / min_side * 2.;
        let factor = ratio / extent;
        self.camera.scale(factor, factor, 1.);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Frame, PrimitiveType};

    fn chart_2d(width: u32, height: u32) -> ScatterChart {
        let mut chart = ScatterChart::new(ShapeKind::Plain);
        chart.resize(width, height);

        chart
    }

    #[test]
    fn crossing_min_pushes_max_out_by_a_tenth() {
        let mut chart = chart_2d(100, 100);
        chart.set_x_axis_min(0.);
        chart.set_x_axis_max(10.);

        chart.set_x_axis_min(20.);
        assert_eq!(chart.x_axis_min(), 20.);
        assert_eq!(chart.x_axis_max(), 22.);
    }

    #[test]
    fn crossing_max_pushes_min_out_by_a_tenth() {
        let mut chart = chart_2d(100, 100);
        chart.set_y_axis_min(5.);
        chart.set_y_axis_max(-10.);

        assert_eq!(chart.y_axis_max(), -10.);
        assert_eq!(chart.y_axis_min(), -11.);
    }

    #[test]
    fn bounds_at_zero_still_separate() {
        assert_eq!(clip_max(0., -3.), 1.);
        assert_eq!(clip_min(7., 0.), -1.);
        assert_eq!(clip_max(2., 2.), 2.2);
        assert_eq!(clip_min(1., 5.), 1.);

        let mut chart = chart_2d(100, 100);
        chart.set_z_axis_max(0.);
        chart.set_z_axis_min(0.);
        assert!(chart.z_axis_min() < chart.z_axis_max());
    }

    #[test]
    fn polar_mode_derives_x_from_y_and_aspect_ratio() {
        let mut chart = chart_2d(202, 102);
        chart.set_y_axis_min(-5.);
        chart.set_y_axis_max(5.);
        chart.set_polar_coordinate(true);

        // The 200x100 grid doubles the Y span of 10.
        assert_eq!((chart.x_axis_min(), chart.x_axis_max()), (-10., 10.));

        chart.set_x_axis_min(-100.);
        chart.set_x_axis_max(100.);
        assert_eq!((chart.x_axis_min(), chart.x_axis_max()), (-10., 10.));
    }

    #[test]
    fn resize_clamps_to_minimum() {
        let mut chart = chart_2d(3, 500);
        assert_eq!(chart.size(), (MIN_SIZE, 500));
        assert_eq!(chart.grid().window_rectangle(), Rect::new(0., 0., 10., 500.));
    }

    #[test]
    fn pixel_mapping_in_2d() {
        let mut chart = chart_2d(102, 102);
        chart.set_x_axis_min(0.);
        chart.set_x_axis_max(10.);
        chart.set_y_axis_min(-50.);
        chart.set_y_axis_max(50.);

        assert_eq!(chart.pixel_at_x(0., false), 1);
        assert_eq!(chart.pixel_at_x(5., false), 51);
        assert_eq!(chart.pixel_at_x(10., false), 101);
        assert_eq!(chart.pixel_at_x(20., false), 201);
        assert_eq!(chart.pixel_at_x(20., true), 101);

        // Rows count from the top.
        assert_eq!(chart.pixel_at_y(50., false), 1);
        assert_eq!(chart.pixel_at_y(-50., false), 101);
        assert_eq!(chart.pixel_at_y(0., false), 51);
        assert_eq!(chart.pixel_at_y(500., true), 1);
    }

    #[test]
    fn value_at_pixel_inverts_and_clamps() {
        let mut chart = chart_2d(102, 102);
        chart.set_x_axis_min(0.);
        chart.set_x_axis_max(10.);
        chart.set_y_axis_min(-50.);
        chart.set_y_axis_max(50.);

        assert!((chart.x_at_pixel(51) - 5.).abs() < 1e-4);
        assert_eq!(chart.x_at_pixel(-40), 0.);
        assert_eq!(chart.x_at_pixel(400), 10.);

        assert!((chart.y_at_pixel(51) - 0.).abs() < 1e-4);
        assert!((chart.y_at_pixel(1) - 50.).abs() < 1e-4);
        assert_eq!(chart.y_at_pixel(-20), 50.);
        assert_eq!(chart.y_at_pixel(1000), -50.);
    }

    #[test]
    fn three_d_transform_maps_ranges_onto_plot_box() {
        let mut chart = chart_2d(300, 300);
        chart.set_three_d(true);
        chart.set_x_axis_max(10.);
        chart.set_x_axis_min(0.);
        chart.set_y_axis_min(-100.);
        chart.set_y_axis_max(-50.);
        chart.set_z_axis_max(4.);
        chart.set_z_axis_min(2.);

        let transform = chart.transform();
        let low = transform.transform_point(Point::new(0., -100., 2.));
        let high = transform.transform_point(Point::new(10., -50., 4.));
        let mid = transform.transform_point(Point::new(5., -75., 3.));
        for (actual, expected) in [(low, -1.), (high, 1.), (mid, 0.)] {
            for c in [actual.x, actual.y, actual.z] {
                assert!((c - expected).abs() < 1e-5, "{actual:?}");
            }
        }
    }

    #[test]
    fn new_traces_take_colors_in_order() {
        let mut chart = ScatterChart::new(ShapeKind::Colorful);
        chart.set_trace_colors(vec![Color::RED, Color::BLUE]);
        chart.set_symbol_colors(vec![Color::BLACK, Color::GREEN]);
        chart.set_number_of_traces(3);

        let colors: Vec<_> = chart.shapes().iter().map(PointsShape::trace_color).collect();
        assert_eq!(colors, [Color::RED, Color::BLUE, Color::RED]);
        assert!(chart.shapes().iter().all(|shape| shape.kind() == ShapeKind::Colorful));
        assert_eq!(chart.shapes()[2].colors().colors(), [Color::BLACK, Color::GREEN]);

        chart.set_trace_colors(vec![Color::YELLOW]);
        assert!(chart.shapes().iter().all(|shape| shape.trace_color() == Color::YELLOW));
    }

    #[test]
    fn two_d_frame_clears_then_draws_grid_then_traces() {
        let mut chart = chart_2d(50, 50);
        chart.set_background_color(Color::BLACK);
        chart.shapes_mut()[0].set_xy_data(&[0.2, 0.2, 0.8, 0.8]).unwrap();

        let mut frame = Frame::new(50, 50);
        chart.draw(&mut frame);

        assert_eq!(frame.clear_color(), Some(Color::BLACK));
        let primitives: Vec<_> = frame.commands().iter().map(|c| c.primitive).collect();
        assert_eq!(
            primitives,
            [PrimitiveType::Lines, PrimitiveType::Lines, PrimitiveType::Points],
        );
        assert!(frame.commands().iter().all(|c| !c.depth_test));
        assert_eq!(frame.commands()[2].model, chart.transform());
    }

    #[test]
    fn three_d_frame_selects_planes_and_draws_markers() {
        let mut chart = chart_2d(400, 400);
        chart.set_three_d(true);
        chart.camera_mut().set_azimuth(-37.5);
        chart.camera_mut().set_elevation(30.);
        if let Some(marker) = chart.markers_mut().get_mut(0) {
            marker.set_visible(true);
        }

        let mut frame = Frame::new(400, 400);
        chart.draw(&mut frame);

        assert!(!chart.grid().is_top_plane_shown());
        assert!(!chart.grid().is_front_plane_shown());
        assert!(!chart.grid().is_right_plane_shown());
        assert!(frame.commands().iter().all(|c| c.depth_test));
        // Three planes, no data, then one marker's faces and border.
        assert_eq!(frame.commands().len(), 5);
        assert_eq!(frame.commands()[3].primitive, PrimitiveType::Triangles);
        assert!(chart.annotation().labels().any(|(_, _, label)| label.visible));
    }

    #[test]
    fn orthographic_three_d_fits_plot_box_to_target() {
        let mut chart = chart_2d(400, 400);
        chart.set_three_d(true);
        chart.camera_mut().set_azimuth(0.);
        chart.camera_mut().set_elevation(0.);
        let mut frame = Frame::new(400, 400);
        chart.draw(&mut frame);

        let bounds = chart
            .camera()
            .view_projection()
            .transform_box_to_rect(BoundingBox::PLOT);
        let expected = (400. - (5. * 13.)) / 400. * 2.;
        assert!((bounds.width.max(bounds.height) - expected).abs() < 1e-4);
    }

    #[test]
    fn frame_views_follow_the_chart_size() {
        let mut chart = chart_2d(120, 80);
        chart.shapes_mut()[0].set_xy_data(&[0., 0.]).unwrap();
        let mut frame = Frame::new(120, 80);
        chart.draw(&mut frame);

        assert_eq!(*frame.view(), View::pixels(120., 80.));
        let command = frame.commands().last().unwrap();
        let corner = command.model.transform_point(command.vertices[0].position);
        assert_eq!(chart.pixel_at_y(0., false), 80 - corner.y as i32);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "target and chart sizes differ")]
    fn drawing_into_a_mismatched_target_panics_in_debug_builds() {
        let mut chart = chart_2d(120, 80);
        chart.draw(&mut Frame::new(80, 120));
    }

    #[test]
    fn leaving_three_d_hides_labels() {
        let mut chart = chart_2d(400, 400);
        chart.set_three_d(true);
        chart.draw(&mut Frame::new(400, 400));
        chart.set_three_d(false);

        assert!(chart.annotation().labels().all(|(_, _, label)| !label.visible));
        assert!(!chart.grid().is_three_d());
    }
}

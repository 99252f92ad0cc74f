// SPDX-License-Identifier: MPL-2.0

//! Axis labels for 3D mode.
//!
//! Text is not rasterized here. Each frame, the three visible axis edges of the plot box are
//! projected to pixel space and nine [`Label`]s (min, max, and unit per axis) are placed around
//! them; the host draws the text. Label offsets depend on the on-screen angle of the edge and
//! follow a fixed table of angle buckets.

use crate::{grid::Axis, is_in_range, AxisRanges, Color, OrbitCamera, Point, Transform};

/// Edges shorter than this on screen get no labels.
pub const MIN_AXIS_LENGTH_TO_DISPLAY: f32 = 50.;

/// Measures rendered text.
pub trait TextMetrics {
    /// The width of `text` in pixels at a font size of `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Assumes every character is 0.6 em wide.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproximateMetrics;

impl TextMetrics for ApproximateMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 0.6
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LabelKind {
    Min,
    Max,
    Unit,
}

/// A placed piece of text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Label {
    pub text: String,
    /// Pixel offset of the text's left edge.
    pub left: f32,
    /// Pixel offset of the text's top edge.
    pub top: f32,
    /// Clockwise rotation in degrees about the text's center.
    pub rotation: f32,
    pub visible: bool,
}

impl Label {
    fn place(&mut self, left: f32, top: f32, rotation: f32) {
        self.left = left;
        self.top = top;
        self.rotation = rotation;
    }
}

/// Axis labels.
#[derive(Clone, Debug)]
pub struct Annotation {
    font_size: f32,
    color: Color,
    units: [String; 3],
    /// Indexed by axis, then by [`LabelKind`].
    labels: [[Label; 3]; 3],
}

impl Default for Annotation {
    fn default() -> Self {
        Self {
            font_size: 13.,
            color: Color::RED,
            units: ["sym".into(), "dBm".into(), "carr".into()],
            labels: Default::default(),
        }
    }
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.font_size = font_size;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn unit(&self, axis: Axis) -> &str {
        &self.units[axis as usize]
    }

    pub fn set_unit(&mut self, axis: Axis, unit: impl Into<String>) {
        self.units[axis as usize] = unit.into();
    }

    pub fn label(&self, axis: Axis, kind: LabelKind) -> &Label {
        &self.labels[axis as usize][kind as usize]
    }

    /// All nine labels with their axis and kind.
    pub fn labels(&self) -> impl Iterator<Item = (Axis, LabelKind, &Label)> {
        [Axis::X, Axis::Y, Axis::Z].into_iter().flat_map(move |axis| {
            [LabelKind::Min, LabelKind::Max, LabelKind::Unit]
                .into_iter()
                .map(move |kind| (axis, kind, self.label(axis, kind)))
        })
    }

    /// Hides every label, as when leaving 3D mode.
    pub fn hide(&mut self) {
        for label in self.labels.iter_mut().flatten() {
            label.visible = false;
        }
    }

    /// Places all labels for a `width`×`height` target observed through `camera`.
    pub fn layout(
        &mut self,
        camera: &OrbitCamera,
        width: f32,
        height: f32,
        ranges: &AxisRanges,
        metrics: &dyn TextMetrics,
    ) {
        let mut screen = Transform::ortho(0., width, height, 0., -1., 1.).inverse();
        screen.combine(&camera.view_projection());
        let project = |[a, b]: [Point; 2]| [screen.project_point(a), screen.project_point(b)];

        for label in self.labels.iter_mut().flatten() {
            label.visible = true;
        }

        let (azimuth, elevation) = (camera.azimuth(), camera.elevation());
        self.place_x(project(x_edge(azimuth, elevation)), ranges, metrics);
        self.place_y(project(y_edge(azimuth)), ranges, metrics);
        self.place_z(project(z_edge(azimuth, elevation)), ranges, metrics);
    }

    fn place_x(&mut self, edge: [Point; 2], ranges: &AxisRanges, metrics: &dyn TextMetrics) {
        self.place_along(Axis::X, edge, ranges.x_min, ranges.x_max, metrics);
    }

    fn place_z(&mut self, edge: [Point; 2], ranges: &AxisRanges, metrics: &dyn TextMetrics) {
        self.place_along(Axis::Z, edge, ranges.z_min, ranges.z_max, metrics);
    }

    /// Y labels always stand to the left of the vertical edge.
    fn place_y(&mut self, edge: [Point; 2], ranges: &AxisRanges, metrics: &dyn TextMetrics) {
        if !self.check_length(Axis::Y, edge) {
            return;
        }
        let fs = self.font_size;

        self.place_unit(Axis::Y, middle(edge), -90., metrics);

        let [start, end] = edge;
        let min = &mut self.labels[Axis::Y as usize][LabelKind::Min as usize];
        min.text = ranges.y_min.to_string();
        min.place(start.x - (2. * fs), start.y - fs, 0.);

        let max = &mut self.labels[Axis::Y as usize][LabelKind::Max as usize];
        max.text = ranges.y_max.to_string();
        max.place(end.x - (2. * fs), end.y, 0.);
    }

    fn place_along(
        &mut self,
        axis: Axis,
        edge: [Point; 2],
        min: f64,
        max: f64,
        metrics: &dyn TextMetrics,
    ) {
        if !self.check_length(axis, edge) {
            return;
        }
        let angle = angle(edge);
        let fs = self.font_size;

        self.place_unit(axis, middle(edge), angle, metrics);

        let [start, end] = edge;
        let bucket = BUCKETS
            .iter()
            .find(|bucket| is_in_range(angle, bucket.low, bucket.high))
            .unwrap_or(&BUCKETS[BUCKETS.len() - 1]);
        let labels = &mut self.labels[axis as usize];

        for (kind, value, at, offset) in [
            (LabelKind::Min, min, start, bucket.min),
            (LabelKind::Max, max, end, bucket.max),
        ] {
            let label = &mut labels[kind as usize];
            label.text = value.to_string();
            let w = metrics.text_width(&label.text, fs);
            label.place(
                at.x + (offset.width * w) + (offset.height * fs),
                at.y + (offset.top * fs),
                0.,
            );
        }
    }

    fn place_unit(&mut self, axis: Axis, at: Point, angle: f32, metrics: &dyn TextMetrics) {
        let fs = self.font_size;
        let label = &mut self.labels[axis as usize][LabelKind::Unit as usize];
        label.text = self.units[axis as usize].clone();
        let w = metrics.text_width(&label.text, fs);

        if is_in_range(angle, -90., -70.) || is_in_range(angle, 90., 110.) {
            label.place(at.x - (2. * fs), at.y, -90.);
        } else if is_in_range(angle, -110., -90.) || is_in_range(angle, 70., 90.) {
            label.place(at.x + (2. * fs), at.y, -90.);
        } else if is_in_range(angle, 0., 70.) || is_in_range(angle, -180., -110.) {
            label.place(at.x + (w / 2.), at.y + fs, 0.);
        } else {
            label.place(at.x - (w / 2.), at.y + fs, 0.);
        }
    }

    /// Hides the labels of `axis` if its edge is too short on screen.
    fn check_length(&mut self, axis: Axis, edge: [Point; 2]) -> bool {
        let [a, b] = edge;
        let long_enough = (a.x - b.x).hypot(a.y - b.y) >= MIN_AXIS_LENGTH_TO_DISPLAY;
        if !long_enough {
            for label in &mut self.labels[axis as usize] {
                label.visible = false;
            }
        }

        long_enough
    }
}

/// The bottom edge along X nearest the viewer.
fn x_edge(azimuth: f32, elevation: f32) -> [Point; 2] {
    let mut z = if is_in_range(azimuth, -90., 90.) { 1. } else { -1. };
    if elevation < 0. {
        z = -z;
    }

    [Point::new(-1., -1., z), Point::new(1., -1., z)]
}

/// The vertical edge at the left of the plot box as seen by the viewer.
fn y_edge(azimuth: f32) -> [Point; 2] {
    let (x, z) = if is_in_range(azimuth, -90., 0.) {
        (-1., 1.)
    } else if is_in_range(azimuth, -180., -90.) {
        (1., 1.)
    } else if is_in_range(azimuth, 0., 90.) {
        (-1., -1.)
    } else {
        (1., -1.)
    };

    [Point::new(x, -1., z), Point::new(x, 1., z)]
}

/// The bottom edge along Z nearest the viewer.
fn z_edge(azimuth: f32, elevation: f32) -> [Point; 2] {
    let mut x = if is_in_range(azimuth, -180., 0.) { 1. } else { -1. };
    if elevation < 0. {
        x = -x;
    }

    [Point::new(x, -1., -1.), Point::new(x, -1., 1.)]
}

fn middle([a, b]: [Point; 2]) -> Point {
    Point::new((a.x + b.x) / 2., (a.y + b.y) / 2., 0.)
}

/// The counter-clockwise screen angle of an edge in degrees, in `[-180, 180]`.
fn angle([a, b]: [Point; 2]) -> f32 {
    (a.y - b.y).atan2(b.x - a.x).to_degrees()
}

/// A label offset in multiples of the text width and the font size.
#[derive(Clone, Copy, Debug)]
struct Offset {
    width: f32,
    height: f32,
    top: f32,
}

const fn offset(width: f32, height: f32, top: f32) -> Offset {
    Offset { width, height, top }
}

#[derive(Clone, Copy, Debug)]
struct Bucket {
    low: f32,
    high: f32,
    min: Offset,
    max: Offset,
}

const fn bucket(low: f32, high: f32, min: Offset, max: Offset) -> Bucket {
    Bucket { low, high, min, max }
}

/// Min/max label offsets by edge angle.
const BUCKETS: [Bucket; 8] = [
    bucket(-45., 0., offset(0., -1., 1.), offset(-1., 0., 1.)),
    bucket(-90., -45., offset(-1., -1., 1.), offset(-1., -1., 0.)),
    bucket(90., 135., offset(-1., -1., 0.), offset(-1., -1., 1.)),
    bucket(135., 180., offset(-1., 0., 1.), offset(0., -1., 1.)),
    bucket(0., 45., offset(1., 0., 1.), offset(0., 0., 1.)),
    bucket(45., 90., offset(1., 1., 0.), offset(1., 1., 0.)),
    bucket(-135., -90., offset(1., 1., 0.), offset(1., 1., 0.)),
    bucket(-180., -135., offset(0., 0., 1.), offset(1., 0., 1.)),
];

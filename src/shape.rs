// SPDX-License-Identifier: MPL-2.0

//! Data traces.
//!
//! Every trace is a [`PointsShape`]. Its [`ShapeKind`] decides how pushed arrays turn into vertex
//! buffers:
//!
//! - [`Plain`](ShapeKind::Plain) points colored with the trace color or a segment palette;
//! - [`Colorful`](ShapeKind::Colorful) points colored per sample from a palette;
//! - [`Segment`](ShapeKind::Segment) samples whose X is synthesized and wraps every
//!   `segment_count` samples, overlaying repeated sweeps;
//! - [`SegmentMinMax`](ShapeKind::SegmentMinMax), which additionally draws one vertical min/max
//!   envelope line per segment bucket;
//! - [`Symbol`](ShapeKind::Symbol), a dense trajectory line strip with a sparse symbol every
//!   `points_per_symbol` samples.
//!
//! Every data push fully replaces the previous buffers. Empty input is ignored and leaves them
//! intact; malformed input is rejected, also leaving them intact.

use serde::{Deserialize, Serialize};

use crate::{
    Color,
    Error,
    Point,
    PrimitiveType,
    RenderStates,
    RenderTarget,
    Result,
    Vertex,
    VertexArray,
};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Plain,
    Colorful,
    Segment,
    SegmentMinMax,
    Symbol,
}

/// A palette addressed by per-sample color indices.
///
/// One index may be reserved as *invalid*: samples carrying it are rendered fully transparent,
/// whatever color sits at that position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorPalette {
    colors: Vec<Color>,
    invalid_index: Option<usize>,
}

impl ColorPalette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self {
            colors,
            invalid_index: None,
        }
    }

    pub fn with_invalid_index(colors: Vec<Color>, invalid_index: usize) -> Self {
        Self {
            colors,
            invalid_index: Some(invalid_index),
        }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn set_colors(&mut self, colors: Vec<Color>) {
        self.colors = colors;
    }

    pub fn invalid_index(&self) -> Option<usize> {
        self.invalid_index
    }

    pub fn set_invalid_index(&mut self, invalid_index: Option<usize>) {
        self.invalid_index = invalid_index;
    }

    pub fn is_invalid(&self, index: i16) -> bool {
        usize::try_from(index).map_or(false, |i| Some(i) == self.invalid_index)
    }

    /// The color for `index`, or `None` if it addresses nothing.
    pub fn lookup(&self, index: i16) -> Option<Color> {
        if self.is_invalid(index) {
            return Some(Color::TRANSPARENT);
        }

        usize::try_from(index).ok().and_then(|i| self.colors.get(i).copied())
    }

    fn validate(&self, indexes: &[i16]) -> Result<()> {
        match indexes.iter().find(|&&index| self.lookup(index).is_none()) {
            Some(&index) => Err(Error::ColorIndexOutOfRange {
                index: index.into(),
                len: self.colors.len(),
            }),
            None => Ok(()),
        }
    }

    fn color_at(&self, indexes: &[i16], i: usize) -> Color {
        self.lookup(indexes[i]).unwrap_or(Color::TRANSPARENT)
    }
}

/// How X is synthesized for Y-only data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentLayout {
    pub x_start: f32,
    pub x_delta: f32,
    /// The number of samples per sweep; zero disables wrapping.
    pub segment_count: usize,
}

impl Default for SegmentLayout {
    fn default() -> Self {
        Self {
            x_start: 0.,
            x_delta: 1.,
            segment_count: 0,
        }
    }
}

impl SegmentLayout {
    /// The bucket sample `i` falls into.
    pub fn bucket(&self, i: usize) -> usize {
        if self.segment_count == 0 {
            i
        } else {
            i % self.segment_count
        }
    }

    pub fn x(&self, bucket: usize) -> f32 {
        self.x_start + (bucket as f32 * self.x_delta)
    }
}

/// Symbol sampling of a [`Symbol`](ShapeKind::Symbol) trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SymbolStyle {
    /// One symbol is drawn per this many samples.
    pub points_per_symbol: usize,
    /// Whether the trajectory is hidden.
    pub only_symbols: bool,
    pub color: Color,
}

impl Default for SymbolStyle {
    fn default() -> Self {
        Self {
            points_per_symbol: 1,
            only_symbols: false,
            color: Color::YELLOW,
        }
    }
}

/// The buffers of a trace.
#[derive(Clone, Debug)]
struct Buffers {
    points: VertexArray,
    /// The envelope of a min/max trace or the trajectory of a symbol trace.
    lines: Option<VertexArray>,
}

impl Buffers {
    fn new(kind: ShapeKind) -> Self {
        Self {
            points: VertexArray::new(PrimitiveType::Points),
            lines: match kind {
                ShapeKind::SegmentMinMax => Some(VertexArray::new(PrimitiveType::Lines)),
                ShapeKind::Symbol => Some(VertexArray::new(PrimitiveType::LineStrip)),
                _ => None,
            },
        }
    }

    fn store(
        &mut self,
        kind: ShapeKind,
        symbol: &SymbolStyle,
        count: usize,
        position: impl Fn(usize) -> Point,
        color: impl Fn(usize) -> Color,
    ) {
        match (kind, self.lines.as_mut()) {
            (ShapeKind::Symbol, Some(trajectory)) => {
                let step = symbol.points_per_symbol.max(1);
                let symbols = (count + step - 1) / step;
                self.points.rebuild(symbols, |i| Vertex::new(position(i * step), symbol.color));
                trajectory.rebuild(count, |i| Vertex::new(position(i), color(i)));
            }
            (ShapeKind::SegmentMinMax, Some(envelope)) => {
                // Only synthetic-X pushes have buckets; they rebuild the envelope afterwards.
                envelope.clear();
                self.points.rebuild(count, |i| Vertex::new(position(i), color(i)));
            }
            _ => self.points.rebuild(count, |i| Vertex::new(position(i), color(i))),
        }
    }
}

/// A single data trace.
#[derive(Clone, Debug)]
pub struct PointsShape {
    kind: ShapeKind,
    visible: bool,
    trace_color: Color,
    /// Addressed by segment indices.
    seg_colors: ColorPalette,
    /// Addressed by per-sample color indices; index 0 is reserved as invalid by default.
    colors: ColorPalette,
    layout: SegmentLayout,
    symbol: SymbolStyle,
    buffers: Buffers,
}

impl PointsShape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            visible: true,
            trace_color: Color::WHITE,
            seg_colors: ColorPalette::default(),
            colors: ColorPalette::with_invalid_index(Vec::new(), 0),
            layout: SegmentLayout::default(),
            symbol: SymbolStyle::default(),
            buffers: Buffers::new(kind),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn trace_color(&self) -> Color {
        self.trace_color
    }

    /// Sets the color of subsequently pushed uncolored samples.
    pub fn set_trace_color(&mut self, color: Color) {
        self.trace_color = color;
    }

    pub fn seg_colors(&self) -> &ColorPalette {
        &self.seg_colors
    }

    pub fn seg_colors_mut(&mut self) -> &mut ColorPalette {
        &mut self.seg_colors
    }

    pub fn colors(&self) -> &ColorPalette {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorPalette {
        &mut self.colors
    }

    pub fn layout(&self) -> SegmentLayout {
        self.layout
    }

    pub fn set_x_start(&mut self, x_start: f32) {
        self.layout.x_start = x_start;
    }

    pub fn set_x_delta(&mut self, x_delta: f32) {
        self.layout.x_delta = x_delta;
    }

    pub fn set_segment_count(&mut self, segment_count: usize) {
        self.layout.segment_count = segment_count;
    }

    pub fn symbol_style(&self) -> SymbolStyle {
        self.symbol
    }

    pub fn set_points_per_symbol(&mut self, points_per_symbol: usize) {
        self.symbol.points_per_symbol = points_per_symbol;
    }

    pub fn set_only_symbols(&mut self, only_symbols: bool) {
        self.symbol.only_symbols = only_symbols;
    }

    pub fn set_symbol_color(&mut self, color: Color) {
        self.symbol.color = color;
    }

    /// The point buffer; for symbol traces, the sparse symbols.
    pub fn vertices(&self) -> &VertexArray {
        &self.buffers.points
    }

    /// The min/max envelope lines of a [`SegmentMinMax`](ShapeKind::SegmentMinMax) trace.
    pub fn envelope(&self) -> Option<&VertexArray> {
        self.lines_of(ShapeKind::SegmentMinMax)
    }

    /// The trajectory of a [`Symbol`](ShapeKind::Symbol) trace.
    pub fn trajectory(&self) -> Option<&VertexArray> {
        self.lines_of(ShapeKind::Symbol)
    }

    fn lines_of(&self, kind: ShapeKind) -> Option<&VertexArray> {
        if self.kind == kind {
            self.buffers.lines.as_ref()
        } else {
            None
        }
    }
}

impl PointsShape {
    /// Pushes interleaved `[x0, y0, x1, y1, ...]` samples in the trace color.
    pub fn set_xy_data(&mut self, data: &[f32]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let count = interleaved_count(data, 2)?;
        let trace_color = self.trace_color;

        self.buffers.store(
            self.kind,
            &self.symbol,
            count,
            |i| Point::new(data[2 * i], data[(2 * i) + 1], 0.),
            |_| trace_color,
        );

        Ok(())
    }

    /// Pushes samples from separate X and Y arrays in the trace color.
    pub fn set_xy_arrays(&mut self, x: &[f32], y: &[f32]) -> Result<()> {
        if x.is_empty() || y.is_empty() {
            return Ok(());
        }
        check_lengths(x.len(), y.len())?;
        let trace_color = self.trace_color;

        self.buffers.store(
            self.kind,
            &self.symbol,
            x.len(),
            |i| Point::new(x[i], y[i], 0.),
            |_| trace_color,
        );

        Ok(())
    }

    /// Pushes interleaved `[x0, y0, z0, ...]` samples in the trace color.
    pub fn set_xyz_data(&mut self, data: &[f32]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let count = interleaved_count(data, 3)?;
        let trace_color = self.trace_color;

        self.buffers.store(
            self.kind,
            &self.symbol,
            count,
            |i| Point::new(data[3 * i], data[(3 * i) + 1], data[(3 * i) + 2]),
            |_| trace_color,
        );

        Ok(())
    }

    /// Pushes interleaved XY samples colored by segment index.
    pub fn set_xy_data_indexed(&mut self, data: &[f32], seg_indexes: &[i16]) -> Result<()> {
        if data.is_empty() || seg_indexes.is_empty() {
            return Ok(());
        }
        let count = interleaved_count(data, 2)?;
        check_lengths(count, seg_indexes.len())?;
        self.seg_colors.validate(seg_indexes)?;
        let palette = &self.seg_colors;

        self.buffers.store(
            self.kind,
            &self.symbol,
            count,
            |i| Point::new(data[2 * i], data[(2 * i) + 1], 0.),
            |i| palette.color_at(seg_indexes, i),
        );

        Ok(())
    }

    /// Pushes Y samples colored by segment index, synthesizing X from the segment layout.
    ///
    /// For min/max traces this also rebuilds the envelope.
    pub fn set_data(&mut self, y: &[f32], seg_indexes: &[i16]) -> Result<()> {
        if y.is_empty() || seg_indexes.is_empty() {
            return Ok(());
        }
        check_lengths(y.len(), seg_indexes.len())?;
        self.seg_colors.validate(seg_indexes)?;

        self.store_synthetic(y, seg_indexes, false);

        Ok(())
    }

    /// Pushes interleaved XY samples colored per sample from the color palette.
    pub fn set_xy_data_colored(&mut self, data: &[f32], color_indexes: &[i16]) -> Result<()> {
        if data.is_empty() || color_indexes.is_empty() {
            return Ok(());
        }
        let count = interleaved_count(data, 2)?;
        check_lengths(count, color_indexes.len())?;
        self.colors.validate(color_indexes)?;
        let palette = &self.colors;

        self.buffers.store(
            self.kind,
            &self.symbol,
            count,
            |i| Point::new(data[2 * i], data[(2 * i) + 1], 0.),
            |i| palette.color_at(color_indexes, i),
        );

        Ok(())
    }

    /// Pushes samples from separate X and Y arrays colored per sample from the color palette.
    pub fn set_xy_arrays_colored(
        &mut self,
        x: &[f32],
        y: &[f32],
        color_indexes: &[i16],
    ) -> Result<()> {
        if x.is_empty() || y.is_empty() || color_indexes.is_empty() {
            return Ok(());
        }
        check_lengths(x.len(), y.len())?;
        check_lengths(x.len(), color_indexes.len())?;
        self.colors.validate(color_indexes)?;
        let palette = &self.colors;

        self.buffers.store(
            self.kind,
            &self.symbol,
            x.len(),
            |i| Point::new(x[i], y[i], 0.),
            |i| palette.color_at(color_indexes, i),
        );

        Ok(())
    }

    /// Pushes interleaved XYZ samples colored per sample from the color palette.
    pub fn set_xyz_data_colored(&mut self, data: &[f32], color_indexes: &[i16]) -> Result<()> {
        if data.is_empty() || color_indexes.is_empty() {
            return Ok(());
        }
        let count = interleaved_count(data, 3)?;
        check_lengths(count, color_indexes.len())?;
        self.colors.validate(color_indexes)?;
        let palette = &self.colors;

        self.buffers.store(
            self.kind,
            &self.symbol,
            count,
            |i| Point::new(data[3 * i], data[(3 * i) + 1], data[(3 * i) + 2]),
            |i| palette.color_at(color_indexes, i),
        );

        Ok(())
    }

    /// Pushes Y samples colored per sample from the color palette, synthesizing X from the
    /// segment layout.
    ///
    /// For min/max traces this also rebuilds the envelope.
    pub fn set_y_data(&mut self, y: &[f32], color_indexes: &[i16]) -> Result<()> {
        if y.is_empty() || color_indexes.is_empty() {
            return Ok(());
        }
        check_lengths(y.len(), color_indexes.len())?;
        self.colors.validate(color_indexes)?;

        self.store_synthetic(y, color_indexes, true);

        Ok(())
    }

    fn store_synthetic(&mut self, y: &[f32], indexes: &[i16], use_colors: bool) {
        let palette = if use_colors { &self.colors } else { &self.seg_colors };
        let layout = self.layout;

        self.buffers.store(
            self.kind,
            &self.symbol,
            y.len(),
            |i| Point::new(layout.x(layout.bucket(i)), y[i], 0.),
            |i| palette.color_at(indexes, i),
        );

        if self.kind == ShapeKind::SegmentMinMax {
            if let Some(envelope) = self.buffers.lines.as_mut() {
                build_envelope(envelope, &layout, self.trace_color, palette, y, indexes);
            }
        }
    }
}

/// Rebuilds one vertical line per segment bucket spanning the bucket's Y extent.
///
/// Samples carrying the palette's invalid index are skipped; buckets no sample reached are
/// transparent.
fn build_envelope(
    envelope: &mut VertexArray,
    layout: &SegmentLayout,
    color: Color,
    palette: &ColorPalette,
    y: &[f32],
    indexes: &[i16],
) {
    let mut bounds = vec![(f32::MAX, f32::MIN); layout.segment_count];
    if !bounds.is_empty() {
        for (i, (&value, &index)) in y.iter().zip(indexes).enumerate() {
            if palette.is_invalid(index) {
                continue;
            }
            let (min, max) = &mut bounds[layout.bucket(i)];
            *min = min.min(value);
            *max = max.max(value);
        }
    }

    envelope.rebuild(2 * bounds.len(), |v| {
        let bucket = v / 2;
        let x = layout.x(bucket);
        let (min, max) = bounds[bucket];
        if min > max {
            Vertex::new(Point::new(x, 0., 0.), Color::TRANSPARENT)
        } else {
            let y = if v % 2 == 0 { min } else { max };
            Vertex::new(Point::new(x, y, 0.), color)
        }
    });
}

fn interleaved_count(data: &[f32], stride: usize) -> Result<usize> {
    if data.len() % stride == 0 {
        Ok(data.len() / stride)
    } else {
        Err(Error::InvalidDataLength {
            len: data.len(),
            stride,
        })
    }
}

fn check_lengths(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::LengthMismatch { expected, actual })
    }
}

impl PointsShape {
    /// Draws the trace; hidden traces and empty buffers are skipped.
    pub fn draw(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        if !self.visible {
            return;
        }

        match (self.kind, self.buffers.lines.as_ref()) {
            (ShapeKind::Symbol, Some(trajectory)) => {
                if !self.symbol.only_symbols {
                    draw_non_empty(target, trajectory, states);
                }
                draw_non_empty(target, &self.buffers.points, states);
            }
            (ShapeKind::SegmentMinMax, Some(envelope)) => {
                draw_non_empty(target, &self.buffers.points, states);
                draw_non_empty(target, envelope, states);
            }
            _ => draw_non_empty(target, &self.buffers.points, states),
        }
    }
}

fn draw_non_empty(target: &mut dyn RenderTarget, vertices: &VertexArray, states: &RenderStates) {
    if !vertices.is_empty() {
        target.draw(vertices, states);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frame;

    fn positions(vertices: &VertexArray) -> Vec<(f32, f32)> {
        vertices.iter().map(|v| (v.position.x, v.position.y)).collect()
    }

    #[test]
    fn xy_data_becomes_trace_colored_points() {
        let mut shape = PointsShape::new(ShapeKind::Plain);
        shape.set_trace_color(Color::GREEN);
        shape.set_xy_data(&[1., 2., 3., 4.]).unwrap();

        assert_eq!(positions(shape.vertices()), [(1., 2.), (3., 4.)]);
        assert!(shape.vertices().iter().all(|v| v.color == Color::GREEN));
    }

    #[test]
    fn odd_xy_data_is_rejected_without_touching_the_buffer() {
        let mut shape = PointsShape::new(ShapeKind::Plain);
        shape.set_xy_data(&[1., 2.]).unwrap();

        let err = shape.set_xy_data(&[1., 2., 3.]).unwrap_err();
        assert!(matches!(err, Error::InvalidDataLength { len: 3, stride: 2 }));
        assert_eq!(positions(shape.vertices()), [(1., 2.)]);

        assert!(shape.set_xyz_data(&[1., 2., 3., 4.]).is_err());
    }

    #[test]
    fn empty_input_is_ignored() {
        let mut shape = PointsShape::new(ShapeKind::Plain);
        shape.set_xy_data(&[1., 2., 3., 4.]).unwrap();

        shape.set_xy_data(&[]).unwrap();
        shape.set_data(&[], &[]).unwrap();
        shape.set_xy_arrays(&[1.], &[]).unwrap();
        assert_eq!(shape.vertices().len(), 2);
    }

    #[test]
    fn each_push_replaces_the_buffer() {
        let mut shape = PointsShape::new(ShapeKind::Plain);
        shape.set_xy_data(&[0.; 10]).unwrap();
        shape.set_xyz_data(&[1., 2., 3.]).unwrap();

        assert_eq!(shape.vertices().len(), 1);
        assert_eq!(shape.vertices()[0].position, Point::new(1., 2., 3.));
    }

    #[test]
    fn separate_arrays_must_match() {
        let mut shape = PointsShape::new(ShapeKind::Plain);

        assert!(matches!(
            shape.set_xy_arrays(&[1., 2.], &[1.]),
            Err(Error::LengthMismatch { expected: 2, actual: 1 }),
        ));
        shape.set_xy_arrays(&[1., 2.], &[3., 4.]).unwrap();
        assert_eq!(positions(shape.vertices()), [(1., 3.), (2., 4.)]);
    }

    #[test]
    fn set_data_synthesizes_x_and_uses_segment_colors() {
        let mut shape = PointsShape::new(ShapeKind::Plain);
        shape.seg_colors_mut().set_colors(vec![Color::RED, Color::BLUE]);
        shape.set_data(&[7., 8., 9.], &[0, 1, 0]).unwrap();

        assert_eq!(positions(shape.vertices()), [(0., 7.), (1., 8.), (2., 9.)]);
        assert_eq!(shape.vertices()[0].color, Color::RED);
        assert_eq!(shape.vertices()[1].color, Color::BLUE);

        assert!(matches!(
            shape.set_data(&[1., 2.], &[0]),
            Err(Error::LengthMismatch { .. }),
        ));
        assert!(matches!(
            shape.set_data(&[1.], &[5]),
            Err(Error::ColorIndexOutOfRange { index: 5, len: 2 }),
        ));
        assert_eq!(shape.vertices().len(), 3);
    }

    #[test]
    fn invalid_color_index_is_transparent() {
        let mut shape = PointsShape::new(ShapeKind::Colorful);
        shape.colors_mut().set_colors(vec![Color::RED, Color::LIME, Color::BLUE]);
        shape.set_xy_data_colored(&[0., 0., 1., 1., 2., 2.], &[0, 1, 2]).unwrap();

        let colors: Vec<Color> = shape.vertices().iter().map(|v| v.color).collect();
        assert_eq!(colors, [Color::TRANSPARENT, Color::LIME, Color::BLUE]);
    }

    #[test]
    fn colorful_overloads_agree() {
        let mut interleaved = PointsShape::new(ShapeKind::Colorful);
        let mut separate = PointsShape::new(ShapeKind::Colorful);
        for shape in [&mut interleaved, &mut separate] {
            shape.colors_mut().set_colors(vec![Color::BLACK, Color::RED]);
        }

        interleaved.set_xy_data_colored(&[1., 2., 3., 4.], &[1, 1]).unwrap();
        separate.set_xy_arrays_colored(&[1., 3.], &[2., 4.], &[1, 1]).unwrap();
        assert_eq!(interleaved.vertices(), separate.vertices());

        assert!(separate.set_xy_arrays_colored(&[1.], &[2.], &[1, 1]).is_err());
        interleaved.set_xyz_data_colored(&[1., 2., 3.], &[1]).unwrap();
        assert_eq!(interleaved.vertices()[0].position, Point::new(1., 2., 3.));
    }

    #[test]
    fn segment_x_wraps_every_segment_count() {
        let mut shape = PointsShape::new(ShapeKind::Segment);
        shape.colors_mut().set_colors(vec![Color::BLACK, Color::RED]);
        shape.set_x_start(10.);
        shape.set_x_delta(0.5);
        shape.set_segment_count(3);
        shape.set_y_data(&[1., 2., 3., 4., 5.], &[1; 5]).unwrap();

        let xs: Vec<f32> = shape.vertices().iter().map(|v| v.position.x).collect();
        assert_eq!(xs, [10., 10.5, 11., 10., 10.5]);
        assert!(shape.vertices().iter().all(|v| v.color == Color::RED));
    }

    #[test]
    fn min_max_envelope_per_bucket() {
        let mut shape = PointsShape::new(ShapeKind::SegmentMinMax);
        shape.set_trace_color(Color::YELLOW);
        shape.seg_colors_mut().set_colors(vec![Color::RED]);
        shape.set_segment_count(2);
        shape.set_data(&[5., 1., 9., 3.], &[0; 4]).unwrap();

        let envelope = shape.envelope().unwrap();
        assert_eq!(positions(envelope), [(0., 5.), (0., 9.), (1., 1.), (1., 3.)]);
        assert!(envelope.iter().all(|v| v.color == Color::YELLOW));
        assert_eq!(shape.vertices().len(), 4);
    }

    #[test]
    fn empty_buckets_are_transparent() {
        let mut shape = PointsShape::new(ShapeKind::SegmentMinMax);
        shape.seg_colors_mut().set_colors(vec![Color::RED, Color::BLUE]);
        shape.seg_colors_mut().set_invalid_index(Some(0));
        shape.set_segment_count(3);
        shape.set_data(&[5., 1., 9., 3.], &[1, 0, 1, 1]).unwrap();

        let envelope = shape.envelope().unwrap();
        assert_eq!(envelope.len(), 6);
        assert_eq!(positions(envelope)[..2], [(0., 3.), (0., 5.)]);
        // Bucket 1 only saw the invalid sample.
        assert!(envelope[2].color.is_transparent());
        assert!(envelope[3].color.is_transparent());
        assert_eq!(positions(envelope)[4..], [(2., 9.), (2., 9.)]);
        assert!(!envelope[4].color.is_transparent());
    }

    #[test]
    fn xy_push_drops_the_previous_envelope() {
        let mut shape = PointsShape::new(ShapeKind::SegmentMinMax);
        shape.seg_colors_mut().set_colors(vec![Color::RED]);
        shape.set_segment_count(2);
        shape.set_data(&[5., 1., 9., 3.], &[0; 4]).unwrap();
        assert_eq!(shape.envelope().map(VertexArray::len), Some(4));

        shape.set_xy_arrays(&[100.], &[100.]).unwrap();
        assert!(shape.envelope().unwrap().is_empty());

        let mut frame = Frame::new(10, 10);
        shape.draw(&mut frame, &RenderStates::default());
        let primitives: Vec<_> = frame.commands().iter().map(|c| c.primitive).collect();
        assert_eq!(primitives, [PrimitiveType::Points]);
        assert_eq!(positions(shape.vertices()), [(100., 100.)]);
    }

    #[test]
    fn rejected_xy_push_keeps_the_envelope() {
        let mut shape = PointsShape::new(ShapeKind::SegmentMinMax);
        shape.seg_colors_mut().set_colors(vec![Color::RED]);
        shape.set_segment_count(1);
        shape.set_data(&[2., 4.], &[0, 0]).unwrap();

        assert!(shape.set_xy_data(&[1.]).is_err());
        assert_eq!(positions(shape.envelope().unwrap()), [(0., 2.), (0., 4.)]);
    }

    #[test]
    fn indexed_xy_data_uses_segment_colors() {
        let mut shape = PointsShape::new(ShapeKind::Segment);
        shape.seg_colors_mut().set_colors(vec![Color::RED, Color::LIME, Color::BLUE]);
        shape.colors_mut().set_colors(vec![Color::BLACK; 3]);
        shape.set_xy_data_indexed(&[0., 1., 2., 3., 4., 5.], &[2, 0, 1]).unwrap();

        assert_eq!(positions(shape.vertices()), [(0., 1.), (2., 3.), (4., 5.)]);
        let colors: Vec<Color> = shape.vertices().iter().map(|v| v.color).collect();
        assert_eq!(colors, [Color::BLUE, Color::RED, Color::LIME]);
    }

    #[test]
    fn indexed_xy_data_checks_lengths() {
        let mut shape = PointsShape::new(ShapeKind::Segment);
        shape.seg_colors_mut().set_colors(vec![Color::RED]);
        shape.set_xy_data_indexed(&[1., 1.], &[0]).unwrap();

        assert!(matches!(
            shape.set_xy_data_indexed(&[0., 0., 1., 1.], &[0]),
            Err(Error::LengthMismatch { expected: 2, actual: 1 }),
        ));
        assert!(matches!(
            shape.set_xy_data_indexed(&[0., 0., 1.], &[0, 0]),
            Err(Error::InvalidDataLength { len: 3, stride: 2 }),
        ));
        assert_eq!(positions(shape.vertices()), [(1., 1.)]);
    }

    #[test]
    fn indexed_xy_data_rejects_unknown_indexes_and_hides_invalid_ones() {
        let mut shape = PointsShape::new(ShapeKind::Segment);
        shape.seg_colors_mut().set_colors(vec![Color::RED, Color::BLUE]);
        shape.set_xy_data_indexed(&[1., 1.], &[1]).unwrap();

        for index in [2, -1] {
            assert!(matches!(
                shape.set_xy_data_indexed(&[0., 0.], &[index]),
                Err(Error::ColorIndexOutOfRange { len: 2, .. }),
            ));
        }
        assert_eq!(shape.vertices()[0].color, Color::BLUE);

        shape.seg_colors_mut().set_invalid_index(Some(0));
        shape.set_xy_data_indexed(&[0., 0., 1., 1.], &[0, 1]).unwrap();
        assert_eq!(shape.vertices()[0].color, Color::TRANSPARENT);
        assert_eq!(shape.vertices()[1].color, Color::BLUE);
    }

    #[test]
    fn symbols_sample_every_nth_point() {
        let mut shape = PointsShape::new(ShapeKind::Symbol);
        shape.set_points_per_symbol(2);
        shape.set_symbol_color(Color::RED);
        shape.set_trace_color(Color::BLUE);
        shape.set_xy_data(&[0., 0., 1., 1., 2., 2., 3., 3., 4., 4.]).unwrap();

        assert_eq!(positions(shape.vertices()), [(0., 0.), (2., 2.), (4., 4.)]);
        assert!(shape.vertices().iter().all(|v| v.color == Color::RED));

        let trajectory = shape.trajectory().unwrap();
        assert_eq!(trajectory.primitive(), PrimitiveType::LineStrip);
        assert_eq!(trajectory.len(), 5);
        assert!(trajectory.iter().all(|v| v.color == Color::BLUE));
        assert!(shape.envelope().is_none());
    }

    #[test]
    fn draw_order_per_kind() {
        let mut frame = Frame::new(10, 10);

        let mut symbol = PointsShape::new(ShapeKind::Symbol);
        symbol.set_xy_data(&[0., 0., 1., 1.]).unwrap();
        symbol.draw(&mut frame, &RenderStates::default());
        let primitives: Vec<_> = frame.commands().iter().map(|c| c.primitive).collect();
        assert_eq!(primitives, [PrimitiveType::LineStrip, PrimitiveType::Points]);

        frame.clear(Color::BLACK);
        symbol.set_only_symbols(true);
        symbol.draw(&mut frame, &RenderStates::default());
        assert_eq!(frame.commands().len(), 1);

        frame.clear(Color::BLACK);
        let mut min_max = PointsShape::new(ShapeKind::SegmentMinMax);
        min_max.seg_colors_mut().set_colors(vec![Color::RED]);
        min_max.set_segment_count(1);
        min_max.set_data(&[1., 2.], &[0, 0]).unwrap();
        min_max.draw(&mut frame, &RenderStates::default());
        let primitives: Vec<_> = frame.commands().iter().map(|c| c.primitive).collect();
        assert_eq!(primitives, [PrimitiveType::Points, PrimitiveType::Lines]);
    }

    #[test]
    fn hidden_or_empty_traces_are_not_drawn() {
        let mut frame = Frame::new(10, 10);
        let mut shape = PointsShape::new(ShapeKind::Plain);

        shape.draw(&mut frame, &RenderStates::default());
        assert!(frame.commands().is_empty());

        shape.set_xy_data(&[1., 1.]).unwrap();
        shape.set_visible(false);
        shape.draw(&mut frame, &RenderStates::default());
        assert!(frame.commands().is_empty());
    }
}

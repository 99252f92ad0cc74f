// SPDX-License-Identifier: MPL-2.0

use scatter_chart::{
    Axis,
    ChartConfig,
    Color,
    Frame,
    LabelKind,
    Point,
    PrimitiveType,
    RenderTarget,
    ScatterChart,
    ShapeKind,
};

fn frame_for(chart: &ScatterChart) -> Frame {
    let (width, height) = chart.size();
    Frame::new(width, height)
}

#[test]
fn segment_min_max_chart_draws_points_then_envelope() {
    let mut chart = ScatterChart::new(ShapeKind::SegmentMinMax);
    chart.resize(302, 202);
    chart.set_x_axis_min(0.);
    chart.set_x_axis_max(2.);
    chart.set_y_axis_min(0.);
    chart.set_y_axis_max(10.);
    chart.set_seg_colors(vec![Color::RED, Color::BLUE]);

    let shape = &mut chart.shapes_mut()[0];
    shape.set_segment_count(2);
    shape.set_data(&[5., 1., 9., 3.], &[1, 1, 1, 1]).unwrap();

    let mut frame = frame_for(&chart);
    chart.draw(&mut frame);

    let commands = frame.commands();
    let primitives: Vec<_> = commands.iter().map(|c| c.primitive).collect();
    assert_eq!(
        primitives,
        [
            PrimitiveType::Lines,
            PrimitiveType::Lines,
            PrimitiveType::Points,
            PrimitiveType::Lines,
        ],
    );

    let envelope = &commands[3];
    let ys: Vec<f32> = envelope.vertices.iter().map(|v| v.position.y).collect();
    assert_eq!(ys, [5., 9., 1., 3.]);

    // The envelope of bucket 0 lands on the grid's left edge, spanning half its height upwards.
    let bottom = envelope.model.transform_point(envelope.vertices[0].position);
    assert!((bottom.x - 1.).abs() < 1e-4);
    assert!((bottom.y - 101.).abs() < 1e-4);
    assert_eq!(chart.pixel_at_y(5., true), 101);
}

#[test]
fn rejected_data_leaves_previous_points_in_place() {
    let mut chart = ScatterChart::new(ShapeKind::Plain);
    let shape = &mut chart.shapes_mut()[0];
    shape.set_xy_data(&[1., 2., 3., 4.]).unwrap();

    assert!(shape.set_xy_data(&[1., 2., 3.]).is_err());
    shape.set_xy_data(&[]).unwrap();
    assert_eq!(shape.vertices().len(), 2);
    assert_eq!(shape.vertices()[1].position, Point::new(3., 4., 0.));
}

#[test]
fn three_d_chart_from_config_lays_out_labels() {
    let config: ChartConfig = serde_json::from_str(
        r#"{
            "three_d": true,
            "trace_colors": [{ "r": 0, "g": 255, "b": 255, "a": 255 }],
            "camera": { "azimuth": 30.0, "elevation": 20.0 },
            "annotation": { "x_unit": "Hz" }
        }"#,
    )
    .unwrap();
    let mut chart = ScatterChart::with_config(ShapeKind::Symbol, &config);
    chart.resize(640, 480);
    chart.set_z_axis_min(-1.);
    chart.set_z_axis_max(1.);

    let shape = &mut chart.shapes_mut()[0];
    assert_eq!(shape.trace_color(), Color::rgb(0, 255, 255));
    shape.set_points_per_symbol(2);
    shape.set_xyz_data(&[0.1, 0.1, 0., 0.5, 0.5, 0., 0.9, 0.9, 0.]).unwrap();

    let mut frame = frame_for(&chart);
    chart.draw(&mut frame);

    assert!(frame.depth_test());
    let strip = frame
        .commands()
        .iter()
        .find(|c| c.primitive == PrimitiveType::LineStrip)
        .map(|c| c.vertices.len());
    assert_eq!(strip, Some(3));

    let unit = chart.annotation().label(Axis::X, LabelKind::Unit);
    assert_eq!(unit.text, "Hz");
    assert!(unit.visible);
    assert_eq!(chart.annotation().label(Axis::Z, LabelKind::Max).text, "1");
}

// SPDX-License-Identifier: MPL-2.0

//! Renders a 3D scatter chart offscreen and logs what ended up on screen.

use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use scatter_chart::{
    ChartConfig,
    Color,
    Frame,
    Point,
    Renderer,
    ScatterChart,
    ShapeKind,
};
use tracing::Level;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const SAMPLE_COUNT: usize = 2_000;

fn main() {
    init_tracing();
    let mut chart = create_chart();

    let mut renderer = match pollster::block_on(Renderer::new(WIDTH, HEIGHT, wgpu::Backends::all())) {
        Ok(renderer) => renderer,
        Err(e) => {
            tracing::error!("Failed to create renderer: {}", e);
            return;
        }
    };

    let mut frame = Frame::new(WIDTH, HEIGHT);
    for step in 0..4 {
        chart.camera_mut().change_azimuth(15.);
        chart.draw(&mut frame);

        let pixels = match renderer.render(&frame) {
            Ok(pixels) => pixels,
            Err(e) => {
                tracing::error!("Failed to render: {}", e);
                return;
            }
        };
        let lit = pixels.chunks_exact(4).filter(|bgra| bgra[3] > 0).count();
        tracing::info!(
            "Frame {} at azimuth {}: {} of {} pixels lit",
            step,
            chart.camera().azimuth(),
            lit,
            WIDTH * HEIGHT,
        );
    }

    for (axis, kind, label) in chart.annotation().labels().filter(|(_, _, label)| label.visible) {
        tracing::info!(
            "{:?} {:?} label {:?} at ({:.0}, {:.0})",
            axis,
            kind,
            label.text,
            label.left,
            label.top,
        );
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();
}

fn create_chart() -> ScatterChart {
    let config = ChartConfig {
        three_d: true,
        background_color: Color::BLACK,
        trace_colors: vec![Color::YELLOW, Color::rgb(0, 200, 255)],
        ..Default::default()
    };
    let mut chart = ScatterChart::with_config(ShapeKind::Colorful, &config);
    chart.resize(WIDTH, HEIGHT);
    chart.set_x_axis_min(-1.);
    chart.set_x_axis_max(1.);
    chart.set_y_axis_min(-1.);
    chart.set_y_axis_max(1.);
    chart.set_z_axis_min(0.);
    chart.set_z_axis_max(10.);
    chart.set_symbol_colors(vec![Color::TRANSPARENT, Color::RED, Color::LIME, Color::BLUE]);
    chart.set_number_of_traces(2);

    let mut rng = StdRng::seed_from_u64(7);
    for shape in chart.shapes_mut() {
        let mut data = Vec::with_capacity(3 * SAMPLE_COUNT);
        let mut colors = Vec::with_capacity(SAMPLE_COUNT);
        for _ in 0..SAMPLE_COUNT {
            let z: f32 = rng.gen_range(0.0..10.0);
            let (x, y): (f32, f32) = (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            data.extend([x * (1. - z / 20.), y * (1. - z / 20.), z]);
            colors.push(rng.gen_range(0..4_i16));
        }
        if let Err(e) = shape.set_xyz_data_colored(&data, &colors) {
            tracing::error!("Rejected samples: {}", e);
        }
    }

    let markers = chart.markers_mut();
    for i in 0..3 {
        if let Some(marker) = markers.get_mut(i) {
            marker.set_visible(true);
            marker.set_position(Point::new(0., 0., (3 * i) as f32));
        }
    }
    markers.set_selected_index(1);

    chart
}

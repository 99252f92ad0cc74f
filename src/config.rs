// SPDX-License-Identifier: MPL-2.0

//! Chart configuration.
//!
//! Every field has a default, so partial documents deserialize.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Initial settings for a [`ScatterChart`](crate::ScatterChart).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Whether the chart starts in 3D mode.
    pub three_d: bool,
    /// Whether the X range is derived from the Y range and the grid's aspect ratio.
    pub polar_coordinate: bool,
    pub background_color: Color,
    /// Trace `i` takes color `i`, or the first color if there are not enough.
    pub trace_colors: Vec<Color>,
    pub marker_count: usize,
    pub grid: GridStyle,
    pub camera: CameraConfig,
    pub annotation: AnnotationConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            three_d: false,
            polar_coordinate: false,
            background_color: Color::TRANSPARENT,
            trace_colors: vec![Color::WHITE],
            marker_count: 12,
            grid: GridStyle::default(),
            camera: CameraConfig::default(),
            annotation: AnnotationConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub color: Color,
    pub x_divisions: u32,
    pub y_divisions: u32,
    pub z_divisions: u32,
    /// Draws every division if set, otherwise only the outline.
    pub show_grid_lines: bool,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            color: Color::GRAY,
            x_divisions: 10,
            y_divisions: 10,
            z_divisions: 10,
            show_grid_lines: true,
        }
    }
}

/// Orbit camera settings. Angles are in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub field_of_view: f32,
    pub near: f32,
    pub far: f32,
    pub orthographic: bool,
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    /// Hides geometry outside the plot box.
    pub check_boundary: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            field_of_view: 45.,
            near: 0.1,
            far: 100.,
            orthographic: true,
            azimuth: -37.5,
            elevation: 30.,
            distance: 5.,
            check_boundary: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// In pixels.
    pub font_size: f32,
    pub color: Color,
    pub x_unit: String,
    pub y_unit: String,
    pub z_unit: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            font_size: 13.,
            color: Color::RED,
            x_unit: "sym".into(),
            y_unit: "dBm".into(),
            z_unit: "carr".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: ChartConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn partial_documents_keep_remaining_defaults() {
        let config: ChartConfig = serde_json::from_str(
            r#"{
                "three_d": true,
                "camera": { "azimuth": 45.0, "orthographic": false },
                "grid": { "color": { "r": 10, "g": 20, "b": 30, "a": 255 } }
            }"#,
        )
        .unwrap();

        assert!(config.three_d);
        assert_eq!(config.camera.azimuth, 45.);
        assert!(!config.camera.orthographic);
        assert_eq!(config.camera.elevation, 30.);
        assert_eq!(config.grid.color, Color::rgb(10, 20, 30));
        assert_eq!(config.grid.x_divisions, 10);
        assert_eq!(config.annotation.y_unit, "dBm");
        assert_eq!(config.marker_count, 12);
    }

    #[test]
    fn survives_a_json_round_trip() {
        let mut config = ChartConfig::default();
        config.trace_colors = vec![Color::RED, Color::BLUE];
        config.annotation.z_unit = "frames".into();

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<ChartConfig>(&json).unwrap(), config);
    }
}

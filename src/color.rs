// SPDX-License-Identifier: MPL-2.0

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color, laid out as it is uploaded to the GPU.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

unsafe impl bytemuck::Pod for Color {}
unsafe impl bytemuck::Zeroable for Color {}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const LIME: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether this color contributes nothing when alpha-blended.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// The channels normalized to `[0, 1]`.
    pub fn to_f64_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a].map(|c| f64::from(c) / 255.)
    }
}

/// A color as host UI frameworks commonly hand it over: alpha first, packed into a `u32` as
/// `0xAARRGGBB`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Argb(pub u32);

impl Argb {
    pub const fn from_channels(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(u32::from_be_bytes([a, r, g, b]))
    }

    pub const fn channels(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<Argb> for Color {
    fn from(argb: Argb) -> Self {
        let [a, r, g, b] = argb.channels();

        Self::rgba(r, g, b, a)
    }
}

impl From<Color> for Argb {
    fn from(color: Color) -> Self {
        Self::from_channels(color.a, color.r, color.g, color.b)
    }
}

// SPDX-License-Identifier: MPL-2.0

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Interleaved coordinates whose count is not a multiple of the number of axes.
    #[error("interleaved data of length {len} is not a multiple of {stride}")]
    InvalidDataLength { len: usize, stride: usize },
    #[error("expected {expected} elements but got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("color index {index} does not address a palette of {len} colors")]
    ColorIndexOutOfRange { index: i32, len: usize },
    #[error("no compatible graphics adapter was found")]
    NoCompatibleAdapterFound,
    #[error("no compatible graphics device was found")]
    NoCompatibleDeviceFound,
    #[error("reading the rendered frame back from the GPU failed")]
    Readback,
}

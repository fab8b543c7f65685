//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG) |
//! | **Orient** | `kamadak-exif` orientation tag + `image` rotate/flip |
//! | **Resize** | contain-fit, Lanczos3, never enlarged |
//! | **Encode** | `jpeg-encoder` (JPEG), `image` WebP encoder (lossless) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Derivative planning and rendering on top of a backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::contain_fit;
pub use operations::{
    Derivative, DerivativeError, DerivativeSet, OutputTrees, Presets, RenderedDerivative, Role,
    create_derivatives, plan_derivatives,
};
pub use params::{JpegSettings, OutputFormat, Quality, QuantTables, RenderParams, ResizeBound};
pub use rust_backend::RustBackend;

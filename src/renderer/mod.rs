//! WebGPU rendering module
//!
//! `scene` turns the simulation state into a triangle list in playfield
//! pixels; `pipeline` uploads it and maps it to clip space on the GPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;

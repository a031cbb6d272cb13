//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scale a color's alpha
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.53, 0.81, 0.92, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.69, 0.88, 0.90, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.85];
    pub const GROUND_TOP: [f32; 4] = [0.87, 0.72, 0.53, 1.0];
    pub const GROUND_BOTTOM: [f32; 4] = [0.82, 0.71, 0.55, 1.0];

    pub const BASKET: [f32; 4] = [0.63, 0.42, 0.20, 1.0];
    pub const BASKET_RIM: [f32; 4] = [0.45, 0.28, 0.12, 1.0];
    pub const ORANGE: [f32; 4] = [1.0, 0.55, 0.0, 1.0];
    pub const LEAF: [f32; 4] = [0.2, 0.6, 0.2, 1.0];
    pub const BOMB: [f32; 4] = [0.12, 0.12, 0.14, 1.0];
    pub const BOMB_FLASH: [f32; 4] = [0.35, 0.12, 0.12, 1.0];
    pub const FUSE: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const BONE: [f32; 4] = [0.96, 0.94, 0.88, 1.0];
    pub const HEART: [f32; 4] = [0.93, 0.25, 0.40, 1.0];

    pub const EXPLOSION_CORE: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const EXPLOSION_MID: [f32; 4] = [1.0, 0.27, 0.0, 1.0];
    pub const EXPLOSION_EDGE: [f32; 4] = [1.0, 0.0, 0.0, 0.0];
    pub const SPARK: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const GAME_OVER_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.7];

    pub const ROOM: [f32; 4] = [0.96, 0.96, 0.86, 1.0];
    pub const TABLE_TOP: [f32; 4] = [0.55, 0.27, 0.07, 1.0];
    pub const TABLE_LEG: [f32; 4] = [0.40, 0.26, 0.13, 1.0];
    pub const CAPYBARA: [f32; 4] = [0.66, 0.47, 0.31, 1.0];
    pub const CAPYBARA_DARK: [f32; 4] = [0.42, 0.29, 0.18, 1.0];
    pub const HIGHLIGHT: [f32; 4] = [1.0, 0.84, 0.0, 0.8];
    pub const MOUTH_HINT: [f32; 4] = [1.0, 0.0, 0.0, 0.3];
}

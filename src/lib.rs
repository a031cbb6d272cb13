//! Capy Catch - catch falling oranges, then feed them to a capybara
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, screens, feeding)
//! - `tuning`: Data-driven game balance
//! - `hud`: Display values derived from the simulation state
//! - `renderer`: WebGPU rendering pipeline

pub mod hud;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use hud::Hud;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate; every timer counts ticks at this rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}

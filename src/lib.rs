//! Voxelstorm Engine - voxel dismantle/rebuild simulation in WASM
//!
//! The JS app owns rendering, webcam capture and AI calls; this crate
//! owns the particles. Every animation frame the app calls `tick` with
//! the elapsed time and reads the particle buffers back as typed
//! arrays.
//!
//! Architecture:
//! - core/       - RNG + color utilities
//! - domain/     - voxel records, JSON boundary, tuning config
//! - store/      - the particle store
//! - systems/    - physics, dismantle, rebuild, gestures
//! - simulation/ - orchestration + wasm facade

pub mod core;
pub mod domain;
pub mod simulation;
pub mod store;
pub mod systems;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"voxelstorm engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::color::Rgb;
pub use domain::config::SimConfig;
pub use domain::voxel::VoxelRecord;
pub use simulation::{Engine, EngineCore, PerfStats, PhaseObserver, ScenePhase};
pub use store::{ParticleStore, SimulationParticle};
pub use systems::dismantle::BreakStyle;
pub use systems::gesture::{GestureIntent, GestureInterpreter, HandSample};

//! Engine orchestration: the scene state machine and the tick loop.
//!
//! `EngineCore` owns every piece of simulation state and only
//! orchestrates; the actual work lives in the `systems` modules.
//! The `Engine` facade in `facade.rs` is the wasm-bindgen boundary the
//! web app talks to; everything else here is plain Rust and unit-tested
//! natively.

use glam::Vec3;

use crate::core::random::Rng;
use crate::domain::config::SimConfig;
use crate::domain::voxel::VoxelRecord;
use crate::store::ParticleStore;
use crate::systems::dismantle::BreakStyle;
use crate::systems::gesture::{GestureInterpreter, GestureIntent, HandSample};
use crate::systems::rebuild::RebuildTarget;

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "commands/commands.rs"]
mod commands;
#[path = "step/step.rs"]
mod step;
#[path = "render/render_extract.rs"]
mod render_extract;
mod facade;

pub use facade::Engine;
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

/// Scene lifecycle phase. The machine cycles indefinitely:
/// `Stable → Dismantling → Rebuilding → Stable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenePhase {
    Stable,
    Dismantling,
    Rebuilding,
}

impl ScenePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenePhase::Stable => "stable",
            ScenePhase::Dismantling => "dismantling",
            ScenePhase::Rebuilding => "rebuilding",
        }
    }
}

/// Injected notification hook: called with the new phase and the
/// particle count on load and on every transition.
pub type PhaseObserver = Box<dyn FnMut(ScenePhase, usize)>;

/// Tracked-hand state fed by the gesture boundary.
pub(crate) struct HandState {
    /// Attractor point in scene units.
    pub(crate) position: Vec3,
    /// Engine-clock time of the last hand sample.
    pub(crate) last_seen_ms: f64,
    /// Velocity-hand mode toggle (UI controlled).
    pub(crate) attraction_enabled: bool,
}

/// In-flight rebuild: per-particle targets plus the start time the
/// flight delays are measured from.
pub(crate) struct RebuildFlight {
    pub(crate) targets: Vec<RebuildTarget>,
    pub(crate) started_ms: f64,
}

/// Flat buffers the JS renderer views as typed arrays.
pub(crate) struct RenderBuffers {
    pub(crate) positions: Vec<f32>,
    pub(crate) rotations: Vec<f32>,
    pub(crate) colors: Vec<u32>,
}

/// The simulation engine
pub struct EngineCore {
    pub(crate) config: SimConfig,
    pub(crate) store: ParticleStore,
    /// Targets a gesture-triggered rebuild flies back to.
    pub(crate) base_model: Vec<VoxelRecord>,

    // State machine
    pub(crate) phase: ScenePhase,
    pub(crate) clock_ms: f64,
    pub(crate) dismantle_started_ms: f64,
    pub(crate) rebuild: Option<RebuildFlight>,

    // Gesture boundary
    pub(crate) gestures: GestureInterpreter,
    pub(crate) pending_intents: Vec<GestureIntent>,
    pub(crate) hand: HandState,

    // Presentation signals
    pub(crate) camera_target: Vec3,
    pub(crate) shake: f32,

    pub(crate) rng: Rng,
    pub(crate) observer: Option<PhaseObserver>,
    pub(crate) render: RenderBuffers,

    // Perf metrics
    pub(crate) perf_enabled: bool,
    pub(crate) perf_stats: PerfStats,
}

impl EngineCore {
    /// Create an empty engine; phase starts `Stable` with no particles.
    pub fn new(seed: u32) -> Self {
        init::create_engine_core(seed)
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Install the UI notification hook.
    pub fn set_observer(&mut self, observer: PhaseObserver) {
        settings::set_observer(self, observer);
    }

    /// Replace the tuning config from JSON (missing fields keep defaults).
    pub fn set_config_json(&mut self, json: &str) -> Result<(), String> {
        settings::set_config_json(self, json)
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        settings::set_gravity(self, gravity);
    }

    pub fn set_floor(&mut self, floor_y: f32) {
        settings::set_floor(self, floor_y);
    }

    /// Toggle velocity-hand mode (particles chase the tracked hand).
    pub fn set_hand_attraction(&mut self, enabled: bool) {
        settings::set_hand_attraction(self, enabled);
    }

    /// Forget the tracked hand immediately (tracking lost).
    pub fn clear_hand(&mut self) {
        settings::clear_hand(self);
    }

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Get last tick perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    /// Atomically replace the particle store with a new model.
    /// Returns the new particle count.
    pub fn load_model(&mut self, records: &[VoxelRecord]) -> usize {
        commands::load_model(self, records)
    }

    /// Load a model from a JSON voxel array (untrusted input).
    pub fn load_model_json(&mut self, json: &str) -> Result<usize, String> {
        commands::load_model_json(self, json)
    }

    /// Remove every particle (load of the empty model).
    pub fn clear(&mut self) {
        commands::clear(self);
    }

    /// Break the model apart. No-op unless currently `Stable`;
    /// returns whether the request was accepted.
    pub fn dismantle(&mut self, style: BreakStyle) -> bool {
        commands::dismantle(self, style)
    }

    /// Start flying particles into `targets`. Rejected while a rebuild
    /// is already in flight; from `Stable` it acts as the
    /// dismantle+rebuild shortcut.
    pub fn rebuild(&mut self, targets: &[VoxelRecord]) -> bool {
        commands::rebuild(self, targets)
    }

    pub fn rebuild_json(&mut self, json: &str) -> Result<bool, String> {
        commands::rebuild_json(self, json)
    }

    /// Rebuild toward the currently loaded model (gesture path).
    pub fn rebuild_current_model(&mut self) -> bool {
        commands::rebuild_current_model(self)
    }

    /// Shove every particle. Only has an effect while `Dismantling`;
    /// ignored otherwise so an in-flight rebuild cannot be corrupted.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        commands::apply_impulse(self, impulse);
    }

    /// Feed one camera frame of tracked hands. Updates the attractor
    /// and queues recognized intents for the next tick.
    pub fn hand_frame(&mut self, hands: &[HandSample]) {
        commands::hand_frame(self, hands);
    }

    /// Advance the simulation by `dt_ms` of wall-clock time.
    pub fn tick(&mut self, dt_ms: f64) {
        step::tick(self, dt_ms);
    }

    /// Ordered `(id, x, y, z, color)` snapshot, positions rounded to
    /// 2 decimals (share/export feature).
    pub fn export_snapshot_json(&self) -> String {
        crate::domain::voxel::snapshot_to_json(
            self.store
                .iter()
                .map(|p| (p.id, p.position.x, p.position.y, p.position.z, p.color)),
        )
    }

    /// Distinct particle colors in first-appearance order (AI palette bias).
    pub fn distinct_colors_json(&self) -> String {
        crate::domain::voxel::palette_to_json(&self.store.distinct_colors())
    }

    /// Smoothed view target for the render layer.
    pub fn camera_target(&self) -> Vec3 {
        self.camera_target
    }

    /// Screen-shake intensity, set by an explosion and decayed every
    /// tick; the render layer polls it per frame.
    pub fn shake(&self) -> f32 {
        self.shake
    }

    // === RENDER ABI (JS views these as typed arrays) ===

    pub fn positions_ptr(&self) -> *const f32 {
        self.render.positions.as_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.render.positions.len()
    }

    pub fn rotations_ptr(&self) -> *const f32 {
        self.render.rotations.as_ptr()
    }

    pub fn rotations_len(&self) -> usize {
        self.render.rotations.len()
    }

    pub fn colors_ptr(&self) -> *const u32 {
        self.render.colors.as_ptr()
    }

    pub fn colors_len(&self) -> usize {
        self.render.colors.len()
    }
}

// Private transition helpers shared by commands and the tick loop.
impl EngineCore {
    /// Switch phase and notify the observer (at-least-once, synchronous).
    pub(crate) fn set_phase(&mut self, phase: ScenePhase) {
        self.phase = phase;
        self.notify();
    }

    pub(crate) fn notify(&mut self) {
        let count = self.store.len();
        if let Some(observer) = self.observer.as_mut() {
            observer(self.phase, count);
        }
    }

    /// The attractor point, if velocity-hand mode is on and the hand
    /// was seen recently enough.
    pub(crate) fn attractor_point(&self) -> Option<Vec3> {
        let hand = &self.hand;
        let fresh = self.clock_ms - hand.last_seen_ms <= self.config.attractor_timeout_ms;
        (hand.attraction_enabled && fresh).then_some(hand.position)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;

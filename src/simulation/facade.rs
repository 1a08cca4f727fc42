use glam::{Vec2, Vec3};
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::systems::dismantle::BreakStyle;
use crate::systems::gesture::{self, HandSample};

use super::perf_stats::PerfStats;
use super::EngineCore;

/// The wasm boundary the web app drives: commands in, typed-array
/// views of the particle buffers out.
#[wasm_bindgen]
pub struct Engine {
    core: EngineCore,
}

#[wasm_bindgen]
impl Engine {
    /// Create an empty engine. `seed` makes a session reproducible.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Self {
        Self {
            core: EngineCore::new(seed),
        }
    }

    /// Install the UI callback, invoked as `(state, particleCount)` on
    /// load and on every phase transition.
    pub fn set_observer(&mut self, callback: Function) {
        self.core.set_observer(Box::new(move |phase, count| {
            let _ = callback.call2(
                &JsValue::NULL,
                &JsValue::from_str(phase.as_str()),
                &JsValue::from_f64(count as f64),
            );
        }));
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.core.phase().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> u32 {
        self.core.particle_count() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn clock_ms(&self) -> f64 {
        self.core.clock_ms()
    }

    /// Load a model from a JSON voxel array. Returns the new particle
    /// count; individual malformed records degrade to defaults.
    pub fn load_model(&mut self, json: String) -> Result<u32, JsValue> {
        self.core
            .load_model_json(&json)
            .map(|n| n as u32)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.core.clear();
    }

    /// Radial explosion break. Returns false if not currently stable.
    pub fn dismantle_explode(&mut self) -> bool {
        self.core.dismantle(BreakStyle::Explode)
    }

    /// Directional swipe break along (dx, dz) in scene space.
    pub fn dismantle_swipe(&mut self, dx: f32, dz: f32) -> bool {
        self.core
            .dismantle(BreakStyle::Swipe(Vec3::new(dx, 0.0, dz)))
    }

    /// Fly the scattered particles into a new target model.
    pub fn rebuild(&mut self, json: String) -> Result<bool, JsValue> {
        self.core
            .rebuild_json(&json)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Fly the scattered particles back into the current model.
    pub fn rebuild_current_model(&mut self) -> bool {
        self.core.rebuild_current_model()
    }

    /// Shove all debris (only effective while dismantling).
    pub fn apply_impulse(&mut self, x: f32, y: f32, z: f32) {
        self.core.apply_impulse(Vec3::new(x, y, z));
    }

    /// Advance the simulation by the elapsed frame time.
    pub fn tick(&mut self, dt_ms: f64) {
        self.core.tick(dt_ms);
    }

    /// Feed one camera frame of hand tracking. `count` is 0, 1 or 2;
    /// palm coordinates are normalized device coordinates (-1..1).
    #[allow(clippy::too_many_arguments)]
    pub fn hand_frame(
        &mut self,
        count: u32,
        x1: f32,
        y1: f32,
        fist1: bool,
        x2: f32,
        y2: f32,
        fist2: bool,
    ) {
        let hands = [
            HandSample {
                palm: Vec2::new(x1, y1),
                fist: fist1,
            },
            HandSample {
                palm: Vec2::new(x2, y2),
                fist: fist2,
            },
        ];
        let count = (count as usize).min(2);
        self.core.hand_frame(&hands[..count]);
    }

    /// Toggle velocity-hand mode (debris chases the tracked hand).
    pub fn set_hand_attraction(&mut self, enabled: bool) {
        self.core.set_hand_attraction(enabled);
    }

    /// Forget the tracked hand (tracking lost).
    pub fn clear_hand(&mut self) {
        self.core.clear_hand();
    }

    /// Fist classification shared with the JS tracking layer.
    ///
    /// `landmarks` is 26 floats: wrist x,y then for each non-thumb
    /// finger its tip, middle joint and base knuckle as x,y pairs.
    /// Anything else classifies as "not a fist".
    pub fn classify_fist(landmarks: &[f32]) -> bool {
        if landmarks.len() != 26 {
            return false;
        }
        let at = |i: usize| Vec2::new(landmarks[i], landmarks[i + 1]);
        let wrist = at(0);
        let fingers: [[Vec2; 3]; 4] = std::array::from_fn(|f| {
            let base = 2 + f * 6;
            [at(base), at(base + 2), at(base + 4)]
        });
        gesture::is_fist(wrist, &fingers)
    }

    /// Snapshot export for the share feature (JSON, 2-decimal positions).
    pub fn export_snapshot(&self) -> String {
        self.core.export_snapshot_json()
    }

    /// Distinct colors currently present, as a JSON array of hex strings.
    pub fn distinct_colors(&self) -> String {
        self.core.distinct_colors_json()
    }

    /// Replace the tuning config from JSON.
    pub fn set_config(&mut self, json: String) -> Result<(), JsValue> {
        self.core
            .set_config_json(&json)
            .map_err(|e| JsValue::from_str(&e))
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.core.set_gravity(gravity);
    }

    pub fn set_floor(&mut self, floor_y: f32) {
        self.core.set_floor(floor_y);
    }

    // === VIEW SIGNALS ===

    pub fn camera_target_x(&self) -> f32 {
        self.core.camera_target().x
    }

    pub fn camera_target_y(&self) -> f32 {
        self.core.camera_target().y
    }

    pub fn camera_target_z(&self) -> f32 {
        self.core.camera_target().z
    }

    /// Current screen-shake intensity (decays on its own).
    pub fn shake(&self) -> f32 {
        self.core.shake()
    }

    // === RENDER ABI (for JS typed-array views) ===

    /// Pointer to the x,y,z position triplets.
    pub fn positions_ptr(&self) -> *const f32 {
        self.core.positions_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.core.positions_len()
    }

    /// Pointer to the x,y,z rotation triplets.
    pub fn rotations_ptr(&self) -> *const f32 {
        self.core.rotations_ptr()
    }

    pub fn rotations_len(&self) -> usize {
        self.core.rotations_len()
    }

    /// Pointer to the packed 0xRRGGBB colors.
    pub fn colors_ptr(&self) -> *const u32 {
        self.core.colors_ptr()
    }

    pub fn colors_len(&self) -> usize {
        self.core.colors_len()
    }

    // === PERF ===

    /// Enable or disable per-tick perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last tick perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }
}

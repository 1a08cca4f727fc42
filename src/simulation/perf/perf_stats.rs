use wasm_bindgen::prelude::*;

/// Per-tick perf snapshot (zeros while metrics are disabled).
#[wasm_bindgen]
#[derive(Clone, Default)]
pub struct PerfStats {
    step_ms: f64,
    particle_count: u32,
    /// Particles integrated by the last dismantling tick.
    integrated: u32,
    /// Matched/rubble split of the most recent rebuild assignment.
    matched: u32,
    rubble: u32,
}

#[wasm_bindgen]
impl PerfStats {
    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    pub fn integrated(&self) -> u32 {
        self.integrated
    }

    pub fn matched(&self) -> u32 {
        self.matched
    }

    pub fn rubble(&self) -> u32 {
        self.rubble
    }
}

impl PerfStats {
    pub(super) fn begin_tick(&mut self, particle_count: u32) {
        self.step_ms = 0.0;
        self.integrated = 0;
        self.particle_count = particle_count;
    }

    pub(super) fn set_integrated(&mut self, integrated: u32) {
        self.integrated = integrated;
    }

    pub(super) fn set_match_counts(&mut self, matched: u32, rubble: u32) {
        self.matched = matched;
        self.rubble = rubble;
    }

    pub(super) fn set_step_ms(&mut self, step_ms: f64) {
        self.step_ms = step_ms;
    }
}

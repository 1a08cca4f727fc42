use glam::Vec3;

use crate::core::random::Rng;
use crate::domain::config::SimConfig;
use crate::store::ParticleStore;
use crate::systems::gesture::GestureInterpreter;

use super::perf_stats::PerfStats;
use super::{EngineCore, HandState, RenderBuffers, ScenePhase};

pub(super) fn create_engine_core(seed: u32) -> EngineCore {
    EngineCore {
        config: SimConfig::default(),
        store: ParticleStore::new(),
        base_model: Vec::new(),

        phase: ScenePhase::Stable,
        clock_ms: 0.0,
        dismantle_started_ms: 0.0,
        rebuild: None,

        gestures: GestureInterpreter::new(),
        pending_intents: Vec::new(),
        hand: HandState {
            position: Vec3::ZERO,
            // Never seen; the attractor stays off until a sample arrives.
            last_seen_ms: f64::MIN,
            attraction_enabled: false,
        },

        camera_target: Vec3::ZERO,
        shake: 0.0,

        rng: Rng::new(seed),
        observer: None,
        render: RenderBuffers {
            positions: Vec::new(),
            rotations: Vec::new(),
            colors: Vec::new(),
        },

        perf_enabled: false,
        perf_stats: PerfStats::default(),
    }
}

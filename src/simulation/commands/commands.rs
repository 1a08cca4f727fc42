use glam::{Vec2, Vec3};

use crate::core::color::PaletteScorer;
use crate::domain::voxel::{parse_model_json, VoxelRecord};
use crate::store::ParticleStore;
use crate::systems::dismantle::{self, BreakStyle};
use crate::systems::gesture::HandSample;
use crate::systems::rebuild;

use super::{render_extract, EngineCore, RebuildFlight, ScenePhase};

/// Atomic model swap: any in-flight dismantle/rebuild state is
/// discarded with the old store, nothing leaks across loads.
pub(super) fn load_model(core: &mut EngineCore, records: &[VoxelRecord]) -> usize {
    core.store = ParticleStore::load(records, core.config.color_jitter, &mut core.rng);
    core.base_model = records.to_vec();
    core.rebuild = None;
    core.pending_intents.clear();
    core.shake = 0.0;
    core.camera_target = core.store.centroid();

    core.phase = ScenePhase::Stable;
    core.notify();
    render_extract::refresh(core);
    core.store.len()
}

pub(super) fn load_model_json(core: &mut EngineCore, json: &str) -> Result<usize, String> {
    let records = parse_model_json(json)?;
    Ok(load_model(core, &records))
}

pub(super) fn clear(core: &mut EngineCore) {
    load_model(core, &[]);
}

pub(super) fn dismantle(core: &mut EngineCore, style: BreakStyle) -> bool {
    if core.phase != ScenePhase::Stable {
        return false;
    }

    dismantle::plan(&mut core.store, style, &core.config, &mut core.rng);
    core.dismantle_started_ms = core.clock_ms;
    if style == BreakStyle::Explode {
        core.shake = core.config.shake_intensity;
    }
    core.set_phase(ScenePhase::Dismantling);
    true
}

pub(super) fn rebuild(core: &mut EngineCore, targets: &[VoxelRecord]) -> bool {
    // An in-flight rebuild cannot be re-triggered. From `Stable` this
    // doubles as the dismantle+rebuild shortcut.
    if core.phase == ScenePhase::Rebuilding {
        return false;
    }

    let plan = rebuild::assign(&mut core.store, targets, &PaletteScorer, &core.config);
    let (matched, rubble) = rebuild::counts(&plan);
    core.perf_stats.set_match_counts(matched, rubble);

    core.rebuild = Some(RebuildFlight {
        targets: plan,
        started_ms: core.clock_ms,
    });
    core.set_phase(ScenePhase::Rebuilding);
    true
}

pub(super) fn rebuild_json(core: &mut EngineCore, json: &str) -> Result<bool, String> {
    let targets = parse_model_json(json)?;
    Ok(rebuild(core, &targets))
}

pub(super) fn rebuild_current_model(core: &mut EngineCore) -> bool {
    let targets = core.base_model.clone();
    rebuild(core, &targets)
}

pub(super) fn apply_impulse(core: &mut EngineCore, impulse: Vec3) {
    if core.phase != ScenePhase::Dismantling {
        return;
    }
    for p in core.store.iter_mut() {
        p.velocity += impulse;
    }
}

/// Gesture boundary: refresh the attractor from the primary hand and
/// queue recognized intents. Intents are consumed by the next tick so
/// frame callbacks never mutate mid-phase state directly.
pub(super) fn hand_frame(core: &mut EngineCore, hands: &[HandSample]) {
    if let Some(hand) = hands.first() {
        core.hand.position = scene_point(hand.palm, core);
        core.hand.last_seen_ms = core.clock_ms;
    }

    let intents = core.gestures.frame(hands, core.clock_ms, &core.config);
    core.pending_intents.extend(intents);
}

/// Map a normalized (-1..1) palm position into scene units on the
/// camera-facing plane through the model.
fn scene_point(palm: Vec2, core: &EngineCore) -> Vec3 {
    let cfg = &core.config;
    Vec3::new(
        palm.x * cfg.hand_scale_x,
        cfg.hand_base_height + palm.y * cfg.hand_scale_y,
        0.0,
    )
}

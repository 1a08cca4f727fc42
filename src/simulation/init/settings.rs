use crate::domain::config::SimConfig;

use super::perf_stats::PerfStats;
use super::{EngineCore, PhaseObserver};

pub(super) fn set_observer(core: &mut EngineCore, observer: PhaseObserver) {
    core.observer = Some(observer);
}

pub(super) fn set_config_json(core: &mut EngineCore, json: &str) -> Result<(), String> {
    core.config = SimConfig::from_json(json)?;
    Ok(())
}

pub(super) fn set_gravity(core: &mut EngineCore, gravity: f32) {
    core.config.gravity = gravity;
}

pub(super) fn set_floor(core: &mut EngineCore, floor_y: f32) {
    core.config.floor_y = floor_y;
}

pub(super) fn set_hand_attraction(core: &mut EngineCore, enabled: bool) {
    core.hand.attraction_enabled = enabled;
}

pub(super) fn clear_hand(core: &mut EngineCore) {
    core.hand.last_seen_ms = f64::MIN;
}

pub(super) fn enable_perf_metrics(core: &mut EngineCore, enabled: bool) {
    core.perf_enabled = enabled;
    if !enabled {
        core.perf_stats = PerfStats::default();
    }
}

pub(super) fn get_perf_stats(core: &EngineCore) -> PerfStats {
    core.perf_stats.clone()
}

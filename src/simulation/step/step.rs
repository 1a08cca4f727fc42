use crate::domain::config::TICK_MS;
use crate::systems::dismantle::BreakStyle;
use crate::systems::gesture::GestureIntent;
use crate::systems::{physics, rebuild};

use super::{commands, render_extract, EngineCore, PerfTimer, ScenePhase};

/// Largest frame gap integrated in one call; a backgrounded tab
/// resuming after seconds would otherwise catapult every particle.
const MAX_FRAME_MS: f64 = 100.0;

pub(super) fn tick(core: &mut EngineCore, dt_ms: f64) {
    if !(dt_ms > 0.0) {
        return;
    }

    let perf_on = core.perf_enabled;
    let tick_start = perf_on.then(PerfTimer::start);
    if perf_on {
        core.perf_stats.begin_tick(core.store.len() as u32);
    }

    let dt_ms = dt_ms.min(MAX_FRAME_MS);
    core.clock_ms += dt_ms;
    // All physics constants are tuned for the 60 Hz reference tick.
    let scale = ((dt_ms / TICK_MS) as f32).clamp(0.25, 4.0);

    for intent in std::mem::take(&mut core.pending_intents) {
        apply_intent(core, intent);
    }

    match core.phase {
        ScenePhase::Stable => {}
        ScenePhase::Dismantling => {
            let elapsed_ms = (core.clock_ms - core.dismantle_started_ms) as f32;
            let attractor = core.attractor_point();
            let integrated = physics::integrate(
                &mut core.store,
                &core.config,
                elapsed_ms,
                core.clock_ms,
                attractor,
                scale,
            );
            if perf_on {
                core.perf_stats.set_integrated(integrated);
            }
        }
        ScenePhase::Rebuilding => {
            let mut finished = false;
            if let Some(flight) = core.rebuild.as_mut() {
                let elapsed_ms = (core.clock_ms - flight.started_ms) as f32;
                finished = rebuild::step(
                    &mut core.store,
                    &mut flight.targets,
                    elapsed_ms,
                    &core.config,
                    scale,
                );
            }
            if finished {
                core.rebuild = None;
                core.set_phase(ScenePhase::Stable);
            }
        }
    }

    ease_camera(core, scale);
    core.shake *= core.config.shake_decay.powf(scale);

    render_extract::refresh(core);

    if let Some(start) = tick_start {
        core.perf_stats.set_step_ms(start.elapsed_ms());
    }
}

fn apply_intent(core: &mut EngineCore, intent: GestureIntent) {
    match intent {
        GestureIntent::Smash => {
            commands::dismantle(core, BreakStyle::Explode);
        }
        // A swipe never breaks a stable model; it only shoves debris
        // that is already flying (apply_impulse gates on the phase).
        GestureIntent::Swipe(dir) => {
            commands::apply_impulse(core, dir * core.config.swipe_impulse);
        }
        GestureIntent::Rebuild => {
            commands::rebuild_current_model(core);
        }
    }
}

/// The view target trails the attractor while a hand is steering the
/// swarm and drifts back to the model centroid otherwise.
fn ease_camera(core: &mut EngineCore, scale: f32) {
    let goal = match core.phase {
        ScenePhase::Dismantling => core
            .attractor_point()
            .unwrap_or_else(|| core.store.centroid()),
        _ => core.store.centroid(),
    };
    let factor = (core.config.camera_follow * scale).min(1.0);
    core.camera_target += (goal - core.camera_target) * factor;
}

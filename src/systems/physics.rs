//! Physics integrator for the dismantling phase.
//!
//! Explicit Euler over position and rotation, tuned for a 60 Hz tick
//! and scaled by the caller's real frame time. There is no
//! particle-particle collision; the only contact is the floor plane.

use glam::Vec3;

use crate::core::random::hash_u32;
use crate::domain::config::SimConfig;
use crate::store::ParticleStore;

use std::f32::consts::TAU;

/// Advance every released particle by one tick.
///
/// `elapsed_ms` is time since the dismantle started (gates the stagger
/// delays), `clock_ms` the engine clock (drives the swarm noise),
/// `attractor` the hand point when velocity-hand mode is live, and
/// `scale` the frame-time multiple of the reference tick.
///
/// Returns how many particles were integrated (perf stat).
pub fn integrate(
    store: &mut ParticleStore,
    cfg: &SimConfig,
    elapsed_ms: f32,
    clock_ms: f64,
    attractor: Option<Vec3>,
    scale: f32,
) -> u32 {
    let rest = cfg.rest_height();
    let mut integrated = 0u32;

    for p in store.iter_mut() {
        if elapsed_ms < p.dismantle_delay_ms {
            continue;
        }
        integrated += 1;

        if let Some(hand) = attractor {
            let slot =
                hand + swarm_slot(p.id, cfg.attractor_radius) + swarm_noise(p.id, clock_ms, cfg);
            p.velocity += (slot - p.position) * cfg.attractor_spring * scale;
            p.velocity *= cfg.attractor_damping.powf(scale);
            // Keeps a held swarm from sinking under the gravity below.
            p.velocity.y += cfg.attractor_lift * scale;
        }

        p.velocity.y -= cfg.gravity * scale;

        p.position += p.velocity * scale;
        p.rotation += p.angular_velocity * scale;

        if p.position.y < rest {
            p.position.y = rest;
            p.velocity.y = -p.velocity.y * cfg.bounce;
            let friction = cfg.ground_friction.powf(scale);
            p.velocity.x *= friction;
            p.velocity.z *= friction;
            p.angular_velocity *= friction;
        }
    }
    integrated
}

/// Stable per-particle offset on a rough sphere around the attractor.
///
/// Hash-derived so neighbours in the store don't line up into a visible
/// ring; radius varies between 50% and 100% to fill the volume.
fn swarm_slot(id: u32, radius: f32) -> Vec3 {
    let h = hash_u32(id);
    let theta = (h & 0x3ff) as f32 / 1024.0 * TAU;
    let cos_phi = ((h >> 10) & 0x3ff) as f32 / 1024.0 * 2.0 - 1.0;
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    let r = radius * (0.5 + 0.5 * ((h >> 20) & 0x3ff) as f32 / 1024.0);
    Vec3::new(
        r * sin_phi * theta.cos(),
        r * cos_phi,
        r * sin_phi * theta.sin(),
    )
}

/// Slow sinusoidal drift of each swarm slot (≈1 s period) so a held
/// swarm breathes instead of freezing into a rigid shell.
fn swarm_noise(id: u32, clock_ms: f64, cfg: &SimConfig) -> Vec3 {
    let t = (clock_ms as f32 / cfg.attractor_noise_period_ms) * TAU;
    let phase = (hash_u32(id ^ 0x5f5f) & 0xff) as f32 / 255.0 * TAU;
    cfg.attractor_noise_amp
        * Vec3::new(
            (t + phase).sin(),
            (t * 0.7 + phase * 1.3).sin() * 0.5,
            (t + phase).cos(),
        )
}

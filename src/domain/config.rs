//! Simulation tuning constants.
//!
//! Everything time-dependent is expressed for a 60 Hz reference tick;
//! the tick loop scales by the real elapsed time. The whole struct can
//! be replaced from JSON so the web app can ship tuning presets without
//! an engine rebuild.

use serde::{Deserialize, Serialize};

/// Reference tick length all per-tick constants are tuned for.
pub const TICK_MS: f64 = 1000.0 / 60.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // --- world ---
    /// Floor plane height.
    pub floor_y: f32,
    /// Half extent of one cube; particles rest at `floor_y + half_voxel`.
    pub half_voxel: f32,

    // --- integrator ---
    /// Gravity per tick² (units/tick²).
    pub gravity: f32,
    /// Vertical velocity kept (and inverted) on floor contact.
    pub bounce: f32,
    /// Horizontal/angular velocity kept per tick while touching the floor.
    pub ground_friction: f32,

    // --- hand attractor ---
    /// Spring constant pulling particles toward their swarm slot.
    pub attractor_spring: f32,
    /// Velocity damping per tick while attracted.
    pub attractor_damping: f32,
    /// Upward bias so a held swarm does not sink under gravity.
    pub attractor_lift: f32,
    /// Radius of the per-particle swarm slot sphere.
    pub attractor_radius: f32,
    /// Amplitude of the slow per-particle positional noise.
    pub attractor_noise_amp: f32,
    /// Period of that noise, in milliseconds.
    pub attractor_noise_period_ms: f32,
    /// Hand samples older than this no longer attract.
    pub attractor_timeout_ms: f64,
    /// Normalized hand x/y are scaled by these into scene units.
    pub hand_scale_x: f32,
    pub hand_scale_y: f32,
    /// Scene height the hand y=0 line maps to.
    pub hand_base_height: f32,

    // --- dismantle ---
    /// Total stagger window for the cascading collapse.
    pub dismantle_duration_ms: f32,
    /// Exponent of the rank→delay curve (1.0 would be linear).
    pub stagger_exponent: f32,
    /// Height jitter added before ranking, in scene units.
    pub stagger_jitter: f32,
    /// Outward speed range for the radial explosion.
    pub explode_speed_min: f32,
    pub explode_speed_max: f32,
    /// Uniform XZ jitter added on top of the outward velocity.
    pub explode_jitter: f32,
    /// Upward pop range for the explosion.
    pub explode_lift_min: f32,
    pub explode_lift_max: f32,
    /// Speed range along the swipe direction.
    pub swipe_speed_min: f32,
    pub swipe_speed_max: f32,
    pub swipe_jitter: f32,
    /// Upward lift range for a swipe break.
    pub swipe_lift_min: f32,
    pub swipe_lift_max: f32,
    /// Angular velocity range per axis, ±.
    pub spin_max: f32,
    /// Velocity added per axis unit by a swipe-while-dismantling impulse.
    pub swipe_impulse: f32,

    // --- rebuild ---
    /// Fraction of the remaining distance covered per tick.
    pub rebuild_rate: f32,
    /// Squared distance below which a particle snaps to its target.
    pub snap_epsilon_sq: f32,
    /// Flight delay = (target height above floor) / divisor * step.
    pub flight_height_divisor: f32,
    pub flight_delay_step_ms: f32,

    // --- presentation signals ---
    /// Camera target lerp factor per tick.
    pub camera_follow: f32,
    /// Shake level set by an explosion.
    pub shake_intensity: f32,
    /// Shake kept per tick.
    pub shake_decay: f32,
    /// Lightness jitter applied once at particle creation (±fraction).
    pub color_jitter: f32,

    // --- gestures ---
    /// Two hands must be continuously visible this long to fire a rebuild.
    pub hold_window_ms: f64,
    /// Per-frame palm displacement (normalized units) that reads as a smash.
    pub smash_speed: f32,
    pub smash_cooldown_ms: f64,
    /// Dominant-axis displacement that reads as a swipe (open hand only).
    pub swipe_threshold: f32,
    pub swipe_cooldown_ms: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            floor_y: 0.0,
            half_voxel: 0.5,

            gravity: 0.04,
            bounce: 0.4,
            ground_friction: 0.8,

            attractor_spring: 0.012,
            attractor_damping: 0.88,
            attractor_lift: 0.05,
            attractor_radius: 3.0,
            attractor_noise_amp: 2.0,
            attractor_noise_period_ms: 1000.0,
            attractor_timeout_ms: 300.0,
            hand_scale_x: 12.0,
            hand_scale_y: 8.0,
            hand_base_height: 8.0,

            dismantle_duration_ms: 1200.0,
            stagger_exponent: 1.2,
            stagger_jitter: 5.0,
            explode_speed_min: 0.8,
            explode_speed_max: 1.6,
            explode_jitter: 0.25,
            explode_lift_min: 0.4,
            explode_lift_max: 1.2,
            swipe_speed_min: 0.5,
            swipe_speed_max: 1.0,
            swipe_jitter: 0.1,
            swipe_lift_min: 0.1,
            swipe_lift_max: 0.4,
            spin_max: 0.2,
            swipe_impulse: 0.8,

            rebuild_rate: 0.25,
            snap_epsilon_sq: 0.01,
            flight_height_divisor: 15.0,
            flight_delay_step_ms: 300.0,

            camera_follow: 0.05,
            shake_intensity: 1.0,
            shake_decay: 0.88,
            color_jitter: 0.03,

            hold_window_ms: 600.0,
            smash_speed: 0.12,
            smash_cooldown_ms: 1200.0,
            swipe_threshold: 0.22,
            swipe_cooldown_ms: 900.0,
        }
    }
}

impl SimConfig {
    /// Replace the whole config from JSON; unknown fields are ignored,
    /// missing ones fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    /// Height particles rest at on the floor.
    #[inline]
    pub fn rest_height(&self) -> f32 {
        self.floor_y + self.half_voxel
    }
}

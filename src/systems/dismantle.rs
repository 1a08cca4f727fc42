//! Dismantle planner: one-shot setup when a model breaks apart.
//!
//! Writes initial velocities, spins and a staggered start delay into
//! every particle. Nothing moves here; the integrator starts acting on
//! a particle only once the dismantle clock passes its delay.

use glam::{Vec2, Vec3};

use crate::core::random::Rng;
use crate::domain::config::SimConfig;
use crate::store::ParticleStore;

/// How a model comes apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BreakStyle {
    /// Radial explosion away from the model's XZ centroid.
    Explode,
    /// Directional shove along the given vector (XZ component used).
    Swipe(Vec3),
}

/// Populate velocity, angular velocity and stagger delay for a break.
pub fn plan(store: &mut ParticleStore, style: BreakStyle, cfg: &SimConfig, rng: &mut Rng) {
    let centroid = store.centroid_xz();

    for p in store.iter_mut() {
        let (vx, vz) = match style {
            BreakStyle::Explode => {
                let outward =
                    (Vec2::new(p.position.x, p.position.z) - centroid).normalize_or_zero();
                let speed = rng.range(cfg.explode_speed_min, cfg.explode_speed_max);
                (
                    outward.x * speed + rng.range(-cfg.explode_jitter, cfg.explode_jitter),
                    outward.y * speed + rng.range(-cfg.explode_jitter, cfg.explode_jitter),
                )
            }
            BreakStyle::Swipe(dir) => {
                let along = Vec2::new(dir.x, dir.z).normalize_or_zero();
                let speed = rng.range(cfg.swipe_speed_min, cfg.swipe_speed_max);
                (
                    along.x * speed + rng.range(-cfg.swipe_jitter, cfg.swipe_jitter),
                    along.y * speed + rng.range(-cfg.swipe_jitter, cfg.swipe_jitter),
                )
            }
        };
        let vy = match style {
            BreakStyle::Explode => rng.range(cfg.explode_lift_min, cfg.explode_lift_max),
            BreakStyle::Swipe(_) => rng.range(cfg.swipe_lift_min, cfg.swipe_lift_max),
        };
        p.velocity = Vec3::new(vx, vy, vz);
        p.angular_velocity = Vec3::new(
            rng.range(-cfg.spin_max, cfg.spin_max),
            rng.range(-cfg.spin_max, cfg.spin_max),
            rng.range(-cfg.spin_max, cfg.spin_max),
        );
    }

    stagger(store, cfg, rng);
}

/// Assign cascading start delays: rank particles by jittered height,
/// highest first, then map rank fraction through a power curve so the
/// top of the model lets go almost immediately and the base follows in
/// a wave over `dismantle_duration_ms`.
fn stagger(store: &mut ParticleStore, cfg: &SimConfig, rng: &mut Rng) {
    let n = store.len();
    if n == 0 {
        return;
    }

    let mut order: Vec<(usize, f32)> = store
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.position.y + rng.range(0.0, cfg.stagger_jitter)))
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));

    let slice = store.as_mut_slice();
    for (rank, (idx, _)) in order.into_iter().enumerate() {
        let fraction = rank as f32 / n as f32;
        slice[idx].dismantle_delay_ms =
            fraction.powf(cfg.stagger_exponent) * cfg.dismantle_duration_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Rgb;
    use crate::domain::voxel::VoxelRecord;

    fn column(heights: &[f32]) -> ParticleStore {
        let mut rng = Rng::new(3);
        let recs: Vec<VoxelRecord> = heights
            .iter()
            .map(|&y| VoxelRecord::new(0.0, y, 0.0, Rgb::new(128, 128, 128)))
            .collect();
        ParticleStore::load(&recs, 0.0, &mut rng)
    }

    #[test]
    fn explode_scatters_outward_from_centroid() {
        let mut rng = Rng::new(11);
        let recs = vec![
            VoxelRecord::new(-5.0, 0.0, 0.0, Rgb::new(0, 0, 0)),
            VoxelRecord::new(5.0, 0.0, 0.0, Rgb::new(0, 0, 0)),
        ];
        let mut store = ParticleStore::load(&recs, 0.0, &mut rng);
        plan(&mut store, BreakStyle::Explode, &SimConfig::default(), &mut rng);

        let left = store.get(0).unwrap();
        let right = store.get(1).unwrap();
        assert!(left.velocity.x < 0.0);
        assert!(right.velocity.x > 0.0);
        // Upward pop for both.
        assert!(left.velocity.y >= 0.4 && left.velocity.y <= 1.2);
        assert!(right.velocity.y >= 0.4 && right.velocity.y <= 1.2);
    }

    #[test]
    fn swipe_pushes_along_direction_with_small_lift() {
        let mut store = column(&[0.0, 1.0, 2.0]);
        let mut rng = Rng::new(5);
        let cfg = SimConfig::default();
        plan(&mut store, BreakStyle::Swipe(Vec3::new(1.0, 0.0, 0.0)), &cfg, &mut rng);
        for p in store.iter() {
            assert!(p.velocity.x >= cfg.swipe_speed_min - cfg.swipe_jitter);
            assert!(p.velocity.y >= cfg.swipe_lift_min && p.velocity.y <= cfg.swipe_lift_max);
            assert!(p.velocity.z.abs() <= cfg.swipe_jitter);
        }
    }

    #[test]
    fn delays_are_bounded_by_the_stagger_window() {
        let mut store = column(&[0.0, 3.0, 6.0, 9.0, 12.0]);
        let mut rng = Rng::new(21);
        let cfg = SimConfig::default();
        plan(&mut store, BreakStyle::Explode, &cfg, &mut rng);
        for p in store.iter() {
            assert!(p.dismantle_delay_ms >= 0.0);
            assert!(p.dismantle_delay_ms < cfg.dismantle_duration_ms);
        }
    }

    #[test]
    fn higher_particles_collapse_earlier_on_average() {
        // Statistical check: jitter can flip close pairs, so compare the
        // mean delay of the top half against the bottom half of a tall
        // column over several seeds.
        let heights: Vec<f32> = (0..40).map(|i| i as f32).collect();
        for seed in [2, 7, 13, 29] {
            let mut store = column(&heights);
            let mut rng = Rng::new(seed);
            plan(&mut store, BreakStyle::Explode, &SimConfig::default(), &mut rng);

            let delays: Vec<f32> = store.iter().map(|p| p.dismantle_delay_ms).collect();
            let low: f32 = delays[..20].iter().sum::<f32>() / 20.0;
            let high: f32 = delays[20..].iter().sum::<f32>() / 20.0;
            assert!(
                high < low,
                "seed {seed}: top half should start sooner ({high} vs {low})"
            );
        }
    }

    #[test]
    fn spin_is_within_configured_range() {
        let mut store = column(&[0.0; 30]);
        let mut rng = Rng::new(17);
        let cfg = SimConfig::default();
        plan(&mut store, BreakStyle::Explode, &cfg, &mut rng);
        for p in store.iter() {
            for axis in p.angular_velocity.to_array() {
                assert!(axis.abs() <= cfg.spin_max);
            }
        }
    }

    #[test]
    fn planning_an_empty_store_is_a_no_op() {
        let mut store = ParticleStore::new();
        let mut rng = Rng::new(1);
        plan(&mut store, BreakStyle::Explode, &SimConfig::default(), &mut rng);
        assert_eq!(store.len(), 0);
    }
}

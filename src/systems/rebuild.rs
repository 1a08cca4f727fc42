//! Rebuild matcher: greedy color assignment and target-flight stepping.
//!
//! One-shot `assign` pairs scattered particles with target voxels by
//! color; the per-tick `step` then flies matched particles home with an
//! exponential ease and reports when the build has settled. Particles
//! without a target become rubble and keep their resting spot.

use glam::Vec3;

use crate::core::color::{MatchScorer, NEAR_PERFECT};
use crate::domain::config::SimConfig;
use crate::domain::voxel::VoxelRecord;
use crate::store::ParticleStore;

/// Per-particle rebuild assignment, indexed like the store.
#[derive(Clone, Debug, PartialEq)]
pub enum RebuildTarget {
    /// Fly to `destination` once the clock passes `delay_ms`.
    Fly {
        destination: Vec3,
        delay_ms: f32,
        settled: bool,
    },
    /// No target; stays wherever it came to rest until the next break.
    Rubble,
}

impl RebuildTarget {
    fn is_done(&self) -> bool {
        match self {
            RebuildTarget::Fly { settled, .. } => *settled,
            RebuildTarget::Rubble => true,
        }
    }
}

/// Greedily assign particles to targets in target input order.
///
/// For each target the best-scoring untaken particle wins (ties keep
/// the lowest index, so the result is deterministic for a given input
/// order); a near-perfect score short-circuits the scan. Flight delays
/// grow with target height for a bottom-up assembly. Leftover particles
/// are marked rubble; excess targets are dropped.
///
/// Matched particles also have their free-flight motion cleared: from
/// this point the flight interpolation owns them.
pub fn assign(
    store: &mut ParticleStore,
    targets: &[VoxelRecord],
    scorer: &dyn MatchScorer,
    cfg: &SimConfig,
) -> Vec<RebuildTarget> {
    let n = store.len();
    let mut plan: Vec<RebuildTarget> = vec![RebuildTarget::Rubble; n];
    let mut taken = vec![false; n];

    for target in targets {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in store.iter().enumerate() {
            if taken[i] {
                continue;
            }
            let score = scorer.score(p.color, target.color);
            if best.map_or(true, |(_, s)| score < s) {
                best = Some((i, score));
                if score < NEAR_PERFECT {
                    break;
                }
            }
        }
        let Some((idx, _)) = best else {
            // Every particle is taken; remaining targets go unrealized.
            break;
        };
        taken[idx] = true;
        let delay_ms = ((target.y - cfg.floor_y).max(0.0) / cfg.flight_height_divisor)
            * cfg.flight_delay_step_ms;
        plan[idx] = RebuildTarget::Fly {
            destination: Vec3::new(target.x, target.y, target.z),
            delay_ms,
            settled: false,
        };
    }

    for (p, assigned) in store.iter_mut().zip(&taken) {
        if *assigned {
            p.velocity = Vec3::ZERO;
            p.angular_velocity = Vec3::ZERO;
        }
    }

    plan
}

/// Advance matched particles toward their destinations.
///
/// Covers `rebuild_rate` of the remaining distance per reference tick
/// (exponential decay, so convergence is monotonic), snapping exactly
/// onto the target once within the epsilon. Returns `true` when every
/// non-rubble particle has snapped.
pub fn step(
    store: &mut ParticleStore,
    plan: &mut [RebuildTarget],
    elapsed_ms: f32,
    cfg: &SimConfig,
    scale: f32,
) -> bool {
    let rate = 1.0 - (1.0 - cfg.rebuild_rate).powf(scale);

    for (i, target) in plan.iter_mut().enumerate() {
        let RebuildTarget::Fly {
            destination,
            delay_ms,
            settled,
        } = target
        else {
            continue;
        };
        if *settled || elapsed_ms < *delay_ms {
            continue;
        }
        let Some(p) = store.get_mut(i) else { continue };

        p.position += (*destination - p.position) * rate;
        p.rotation *= 1.0 - rate;

        if p.position.distance_squared(*destination) < cfg.snap_epsilon_sq {
            p.position = *destination;
            p.rotation = Vec3::ZERO;
            *settled = true;
        }
    }

    plan.iter().all(RebuildTarget::is_done)
}

/// Matched/rubble breakdown of a plan (UI + perf reporting).
pub fn counts(plan: &[RebuildTarget]) -> (u32, u32) {
    let rubble = plan
        .iter()
        .filter(|t| matches!(t, RebuildTarget::Rubble))
        .count() as u32;
    (plan.len() as u32 - rubble, rubble)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::{PaletteScorer, Rgb};
    use crate::core::random::Rng;

    fn store_of(colors: &[Rgb]) -> ParticleStore {
        let mut rng = Rng::new(6);
        let recs: Vec<VoxelRecord> = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| VoxelRecord::new(i as f32 * 2.0, 5.0, 0.0, c))
            .collect();
        ParticleStore::load(&recs, 0.0, &mut rng)
    }

    fn targets_of(colors: &[Rgb]) -> Vec<VoxelRecord> {
        colors
            .iter()
            .enumerate()
            .map(|(i, &c)| VoxelRecord::new(0.0, i as f32, 0.0, c))
            .collect()
    }

    #[test]
    fn matched_count_is_min_of_both_sides() {
        let cfg = SimConfig::default();
        let gray = Rgb::new(128, 128, 128);

        // More particles than targets.
        let mut store = store_of(&[gray; 5]);
        let plan = assign(&mut store, &targets_of(&[gray; 3]), &PaletteScorer, &cfg);
        assert_eq!(counts(&plan), (3, 2));

        // More targets than particles: extras silently dropped.
        let mut store = store_of(&[gray; 2]);
        let plan = assign(&mut store, &targets_of(&[gray; 6]), &PaletteScorer, &cfg);
        assert_eq!(counts(&plan), (2, 0));
    }

    #[test]
    fn no_particle_serves_two_targets() {
        let cfg = SimConfig::default();
        let colors = [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 0, 255),
            Rgb::new(255, 255, 255),
        ];
        let mut store = store_of(&colors);
        let plan = assign(&mut store, &targets_of(&colors), &PaletteScorer, &cfg);
        let fly_count = plan
            .iter()
            .filter(|t| matches!(t, RebuildTarget::Fly { .. }))
            .count();
        assert_eq!(fly_count, 3);
    }

    #[test]
    fn closest_color_wins() {
        let cfg = SimConfig::default();
        let mut store = store_of(&[Rgb::new(250, 10, 10), Rgb::new(10, 10, 250)]);
        let plan = assign(
            &mut store,
            &targets_of(&[Rgb::new(0, 0, 255)]),
            &PaletteScorer,
            &cfg,
        );
        assert!(matches!(plan[1], RebuildTarget::Fly { .. }));
        assert!(matches!(plan[0], RebuildTarget::Rubble));
    }

    #[test]
    fn higher_targets_get_longer_flight_delays() {
        let cfg = SimConfig::default();
        let gray = Rgb::new(100, 100, 100);
        let mut store = store_of(&[gray; 2]);
        let targets = vec![
            VoxelRecord::new(0.0, 0.0, 0.0, gray),
            VoxelRecord::new(1.0, 15.0, 0.0, gray),
        ];
        let plan = assign(&mut store, &targets, &PaletteScorer, &cfg);
        let delays: Vec<f32> = plan
            .iter()
            .filter_map(|t| match t {
                RebuildTarget::Fly { delay_ms, .. } => Some(*delay_ms),
                RebuildTarget::Rubble => None,
            })
            .collect();
        assert_eq!(delays.len(), 2);
        let (lo, hi) = (delays[0].min(delays[1]), delays[0].max(delays[1]));
        assert_eq!(lo, 0.0);
        assert_eq!(hi, cfg.flight_delay_step_ms);
    }

    #[test]
    fn assignment_clears_free_flight_motion() {
        let cfg = SimConfig::default();
        let gray = Rgb::new(100, 100, 100);
        let mut store = store_of(&[gray]);
        store.get_mut(0).unwrap().velocity = Vec3::new(1.0, 2.0, 3.0);
        store.get_mut(0).unwrap().angular_velocity = Vec3::splat(0.1);
        assign(&mut store, &targets_of(&[gray]), &PaletteScorer, &cfg);
        assert_eq!(store.get(0).unwrap().velocity, Vec3::ZERO);
        assert_eq!(store.get(0).unwrap().angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn step_converges_and_snaps_exactly() {
        let cfg = SimConfig::default();
        let gray = Rgb::new(100, 100, 100);
        let mut store = store_of(&[gray]);
        store.get_mut(0).unwrap().rotation = Vec3::new(1.0, -0.5, 0.25);
        let mut plan = assign(&mut store, &targets_of(&[gray]), &PaletteScorer, &cfg);

        let mut done = false;
        for tick in 0..400 {
            done = step(&mut store, &mut plan, tick as f32 * 16.7, &cfg, 1.0);
            if done {
                break;
            }
        }
        assert!(done, "flight should settle in finite ticks");
        let p = store.get(0).unwrap();
        assert_eq!(p.position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(p.rotation, Vec3::ZERO);
    }

    #[test]
    fn rubble_is_ignored_by_the_completion_check() {
        let cfg = SimConfig::default();
        let gray = Rgb::new(100, 100, 100);
        let mut store = store_of(&[gray; 4]);
        let mut plan = assign(&mut store, &targets_of(&[gray]), &PaletteScorer, &cfg);
        assert_eq!(counts(&plan), (1, 3));

        let rubble_pos = store.get(3).unwrap().position;
        let mut done = false;
        for tick in 0..400 {
            done = step(&mut store, &mut plan, tick as f32 * 16.7, &cfg, 1.0);
            if done {
                break;
            }
        }
        assert!(done);
        // Rubble never moved.
        assert_eq!(store.get(3).unwrap().position, rubble_pos);
    }

    #[test]
    fn empty_target_list_settles_immediately() {
        let cfg = SimConfig::default();
        let mut store = store_of(&[Rgb::new(1, 2, 3)]);
        let mut plan = assign(&mut store, &[], &PaletteScorer, &cfg);
        assert!(step(&mut store, &mut plan, 0.0, &cfg, 1.0));
    }

    #[test]
    fn flight_waits_for_its_delay() {
        let cfg = SimConfig::default();
        let gray = Rgb::new(100, 100, 100);
        let mut store = store_of(&[gray]);
        let targets = vec![VoxelRecord::new(0.0, 15.0, 0.0, gray)];
        let mut plan = assign(&mut store, &targets, &PaletteScorer, &cfg);

        let before = store.get(0).unwrap().position;
        step(&mut store, &mut plan, 100.0, &cfg, 1.0);
        assert_eq!(store.get(0).unwrap().position, before);
        step(&mut store, &mut plan, 300.0, &cfg, 1.0);
        assert_ne!(store.get(0).unwrap().position, before);
    }
}

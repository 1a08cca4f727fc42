//! Particle store: the authoritative per-voxel simulation state.
//!
//! Created 1:1 from a voxel model at load time and replaced wholesale
//! on the next load; its length never changes in between. Systems
//! mutate particles in place each tick; nothing outside the engine
//! holds references into it.

use glam::{Vec2, Vec3};

use crate::core::color::Rgb;
use crate::core::random::Rng;
use crate::domain::voxel::VoxelRecord;

/// One simulated cube.
#[derive(Clone, Debug)]
pub struct SimulationParticle {
    /// Stable index, assigned at load, never reused within a session.
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler-ish rotation; purely visual, zero at rest.
    pub rotation: Vec3,
    pub angular_velocity: Vec3,
    /// Creation-time jittered color; not re-randomized on rebuild.
    pub color: Rgb,
    /// Wait after a dismantle starts before physics touches this particle.
    pub dismantle_delay_ms: f32,
}

#[derive(Default)]
pub struct ParticleStore {
    particles: Vec<SimulationParticle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan a voxel model out into particles, one per record in order.
    ///
    /// Each particle gets a one-off lightness jitter of ±`color_jitter`
    /// so flat-colored surfaces read as individual cubes.
    pub fn load(records: &[VoxelRecord], color_jitter: f32, rng: &mut Rng) -> Self {
        let particles = records
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let jitter = 1.0 + rng.range(-color_jitter, color_jitter);
                SimulationParticle {
                    id: i as u32,
                    position: Vec3::new(v.x, v.y, v.z),
                    velocity: Vec3::ZERO,
                    rotation: Vec3::ZERO,
                    angular_velocity: Vec3::ZERO,
                    color: v.color.scaled(jitter),
                    dismantle_delay_ms: 0.0,
                }
            })
            .collect();
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulationParticle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SimulationParticle> {
        self.particles.iter_mut()
    }

    pub fn get(&self, idx: usize) -> Option<&SimulationParticle> {
        self.particles.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut SimulationParticle> {
        self.particles.get_mut(idx)
    }

    pub fn as_slice(&self) -> &[SimulationParticle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [SimulationParticle] {
        &mut self.particles
    }

    /// Mean (x, z) of all particles; the radial break scatters away
    /// from this axis. Zero for an empty store.
    pub fn centroid_xz(&self) -> Vec2 {
        if self.particles.is_empty() {
            return Vec2::ZERO;
        }
        let sum = self
            .particles
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + Vec2::new(p.position.x, p.position.z));
        sum / self.particles.len() as f32
    }

    /// Mean position of all particles (camera idle target).
    pub fn centroid(&self) -> Vec3 {
        if self.particles.is_empty() {
            return Vec3::ZERO;
        }
        let sum = self
            .particles
            .iter()
            .fold(Vec3::ZERO, |acc, p| acc + p.position);
        sum / self.particles.len() as f32
    }

    /// Distinct colors in order of first appearance (palette export).
    pub fn distinct_colors(&self) -> Vec<Rgb> {
        let mut seen: Vec<Rgb> = Vec::new();
        for p in &self.particles {
            if !seen.contains(&p.color) {
                seen.push(p.color);
            }
        }
        seen
    }
}

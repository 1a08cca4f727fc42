//! Per-tick simulation systems.
//!
//! Each system is a set of free functions over the particle store so it
//! can be unit-tested without an engine instance; the orchestration in
//! `simulation/` decides which system runs in which scene phase.

pub mod dismantle;
pub mod gesture;
pub mod physics;
pub mod rebuild;

//! Domain data: voxel model records, JSON import/export, tuning config.

pub mod config;
pub mod voxel;

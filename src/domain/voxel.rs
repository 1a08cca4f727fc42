//! Voxel model records and the JSON import/export boundary.
//!
//! Model data arrives from generators, the share/import feature and AI
//! responses, so every record is treated as untrusted: unusable fields
//! are coerced to safe defaults (coordinate zero, neutral color)
//! instead of failing the whole load. Only an input that is not a JSON
//! array at all is an error.

use serde::Serialize;
use serde_json::Value;

use crate::core::color::{Rgb, NEUTRAL};

/// One voxel of a model: grid coordinates plus a 24-bit color.
///
/// Coordinates are kept as floats so a re-imported snapshot (which
/// carries 2-decimal positions, including rubble resting spots) loads
/// without further loss; generator output is integral anyway.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub color: Rgb,
}

impl VoxelRecord {
    pub fn new(x: f32, y: f32, z: f32, color: Rgb) -> Self {
        Self { x, y, z, color }
    }
}

fn coerce_coord(v: &Value) -> f32 {
    match v.as_f64() {
        Some(f) if f.is_finite() => f as f32,
        _ => 0.0,
    }
}

fn coerce_color(v: &Value) -> Rgb {
    match v {
        Value::String(s) => Rgb::parse_hex(s).unwrap_or(NEUTRAL),
        Value::Number(n) => match n.as_u64() {
            Some(packed) => Rgb::from_u32((packed & 0xff_ffff) as u32),
            None => NEUTRAL,
        },
        _ => NEUTRAL,
    }
}

fn coerce_record(v: &Value) -> VoxelRecord {
    let field = |key: &str| v.get(key).cloned().unwrap_or(Value::Null);
    VoxelRecord {
        x: coerce_coord(&field("x")),
        y: coerce_coord(&field("y")),
        z: coerce_coord(&field("z")),
        color: coerce_color(&field("color")),
    }
}

/// Parse a model from a JSON array of `{x, y, z, color}` objects.
///
/// `color` may be a "#rrggbb" string or a packed integer. Records keep
/// their input order; duplicates are legal and become separate voxels.
pub fn parse_model_json(json: &str) -> Result<Vec<VoxelRecord>, String> {
    let root: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let items = root
        .as_array()
        .ok_or_else(|| "model JSON must be an array of voxels".to_string())?;
    Ok(items.iter().map(coerce_record).collect())
}

/// Wire format for the snapshot/share export.
#[derive(Serialize)]
struct SnapshotVoxel {
    id: u32,
    x: f32,
    y: f32,
    z: f32,
    color: String,
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Serialize an ordered particle snapshot as
/// `[{id, x, y, z, color}, ...]` with positions rounded to 2 decimals.
/// The output re-parses with [`parse_model_json`] (round-trip share).
pub fn snapshot_to_json(snapshot: impl Iterator<Item = (u32, f32, f32, f32, Rgb)>) -> String {
    let records: Vec<SnapshotVoxel> = snapshot
        .map(|(id, x, y, z, color)| SnapshotVoxel {
            id,
            x: round2(x),
            y: round2(y),
            z: round2(z),
            color: color.to_hex(),
        })
        .collect();
    // Serialization of plain structs cannot fail.
    serde_json::to_string(&records).unwrap_or_else(|_| "[]".to_string())
}

/// Serialize a distinct-color palette as `["#rrggbb", ...]`.
pub fn palette_to_json(colors: &[Rgb]) -> String {
    let hex: Vec<String> = colors.iter().map(|c| c.to_hex()).collect();
    serde_json::to_string(&hex).unwrap_or_else(|_| "[]".to_string())
}

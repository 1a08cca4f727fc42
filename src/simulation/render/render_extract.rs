use super::EngineCore;

/// Refill the flat render buffers from the store.
///
/// JS wraps the returned pointers in Float32Array/Uint32Array views
/// over wasm memory and feeds them straight into the instanced mesh,
/// so layout is plain x,y,z triplets and packed 0xRRGGBB colors.
pub(super) fn refresh(core: &mut EngineCore) {
    let n = core.store.len();
    core.render.positions.resize(n * 3, 0.0);
    core.render.rotations.resize(n * 3, 0.0);
    core.render.colors.resize(n, 0);

    for (i, p) in core.store.iter().enumerate() {
        core.render.positions[i * 3] = p.position.x;
        core.render.positions[i * 3 + 1] = p.position.y;
        core.render.positions[i * 3 + 2] = p.position.z;
        core.render.rotations[i * 3] = p.rotation.x;
        core.render.rotations[i * 3 + 1] = p.rotation.y;
        core.render.rotations[i * 3 + 2] = p.rotation.z;
        core.render.colors[i] = p.color.to_u32();
    }
}

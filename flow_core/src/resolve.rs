// Layout resolver: scene snapshot -> one descriptor for every object.
// Pure function of (registry, step). Safe to call every frame.

use crate::error::FlowResult;
use crate::scene::SceneRegistry;
use crate::types::{LayoutDescriptor, ResolvedLayouts, SceneObjectId};

/// Resolve every object's layout at `step`. Objects the scene omits get
/// [`LayoutDescriptor::hidden`].
pub fn resolve(registry: &SceneRegistry, step: usize) -> FlowResult<ResolvedLayouts> {
    let scene = registry.scene(step)?;

    Ok(SceneObjectId::ALL
        .iter()
        .map(|&id| (id, scene.layout(id).copied().unwrap_or_else(LayoutDescriptor::hidden)))
        .collect())
}

/// Visible objects in paint order: ascending `z_index`, ties in declaration order.
pub fn paint_order(layouts: &ResolvedLayouts) -> Vec<SceneObjectId> {
    let mut visible: Vec<(SceneObjectId, i32)> = layouts
        .iter()
        .filter(|(_, layout)| layout.visible)
        .map(|(id, layout)| (*id, layout.z_index))
        .collect();
    visible.sort_by_key(|(_, z)| *z);
    visible.into_iter().map(|(id, _)| id).collect()
}

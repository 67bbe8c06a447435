// Scene registry: ordered, immutable snapshots of every object's layout.
// Scenes are absolute. An object a scene omits is hidden, never carried over.
// See DESIGN.md: Scene Registry

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{FlowError, FlowResult};
use crate::types::{LayoutDescriptor, SceneObjectId};

/// One presentation step: the layouts it authors, keyed by object.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scene {
    pub label: Option<String>,
    objects: BTreeMap<SceneObjectId, LayoutDescriptor>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        Scene {
            label: Some(label.into()),
            objects: BTreeMap::new(),
        }
    }

    /// Builder-style insert. A later entry for the same object replaces the earlier one.
    pub fn with(mut self, id: SceneObjectId, layout: LayoutDescriptor) -> Self {
        self.objects.insert(id, layout);
        self
    }

    pub fn insert(&mut self, id: SceneObjectId, layout: LayoutDescriptor) {
        self.objects.insert(id, layout);
    }

    /// Authored layout for `id`, if this scene mentions it.
    pub fn layout(&self, id: SceneObjectId) -> Option<&LayoutDescriptor> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (SceneObjectId, &LayoutDescriptor)> {
        self.objects.iter().map(|(id, layout)| (*id, layout))
    }
}

/// Ordered scenes of a presentation. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneRegistry {
    scenes: Vec<Scene>,
}

impl SceneRegistry {
    /// Build a registry, rejecting an empty list and malformed layouts.
    pub fn new(scenes: Vec<Scene>) -> FlowResult<Self> {
        if scenes.is_empty() {
            return Err(FlowError::EmptyTimeline);
        }

        for (index, scene) in scenes.iter().enumerate() {
            for (id, layout) in scene.objects() {
                validate_layout(index, id, layout)?;
            }
        }

        Ok(SceneRegistry { scenes })
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<&Scene> {
        self.scenes.get(step)
    }

    /// Scene at `step`, or `OutOfRangeStep`.
    pub fn scene(&self, step: usize) -> FlowResult<&Scene> {
        self.scenes.get(step).ok_or(FlowError::OutOfRangeStep {
            step,
            total: self.scenes.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }
}

fn validate_layout(scene: usize, object: SceneObjectId, layout: &LayoutDescriptor) -> FlowResult<()> {
    let invalid = |message: &str| FlowError::InvalidLayout {
        scene,
        object,
        message: message.to_string(),
    };

    if !layout.offset_x.is_finite() || !layout.offset_y.is_finite() {
        return Err(invalid("offsets must be finite"));
    }
    if !(layout.scale.is_finite() && layout.scale > 0.0) {
        return Err(invalid("scale must be a positive number"));
    }
    if !(0.0..=1.0).contains(&layout.opacity) {
        return Err(invalid("opacity must be within [0, 1]"));
    }
    Ok(())
}

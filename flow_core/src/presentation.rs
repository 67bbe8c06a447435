// Presentation: timeline + registry + geometry + edge plan behind one value.
// Navigation is the only mutation. Frames are rebuilt from scratch on demand.
// See DESIGN.md: Presentation

use serde::Serialize;

use crate::config::{PresentationConfig, PresentationParts};
use crate::edges::{Edge, EdgePlan};
use crate::error::{FlowError, FlowResult};
use crate::geometry::AnchorEngine;
use crate::presets::{self, Flavor};
use crate::resolve::{paint_order, resolve};
use crate::scene::SceneRegistry;
use crate::timeline::{NavigationEvent, Timeline};
use crate::types::{Point, ResolvedLayouts, SceneObjectId, Viewport};

/// Everything the surface needs to draw one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub step: usize,
    pub total_steps: usize,
    pub label: Option<String>,
    pub origin: Point,
    pub layouts: ResolvedLayouts,
    paint_order: Vec<SceneObjectId>,
    pub edges: Vec<Edge>,
}

impl Frame {
    /// Visible objects, back to front.
    pub fn visible_objects(&self) -> &[SceneObjectId] {
        &self.paint_order
    }
}

/// One navigation dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavDot {
    pub step: usize,
    pub label: Option<String>,
    pub active: bool,
}

/// A running presentation.
#[derive(Debug, Clone)]
pub struct Presentation {
    registry: SceneRegistry,
    engine: AnchorEngine,
    plan: EdgePlan,
    timeline: Timeline,
    viewport: Viewport,
}

impl Presentation {
    pub fn new(parts: PresentationParts) -> FlowResult<Self> {
        let timeline = Timeline::new(parts.registry.len())?;
        if parts.plan.total() != timeline.total() {
            return Err(FlowError::InvalidConfig(format!(
                "edge plan covers {} steps, but the timeline has {} scenes",
                parts.plan.total(),
                timeline.total()
            )));
        }
        tracing::info!(
            scenes = parts.registry.len(),
            width = parts.viewport.width,
            height = parts.viewport.height,
            "presentation ready"
        );

        Ok(Presentation {
            registry: parts.registry,
            engine: parts.engine,
            plan: parts.plan,
            timeline,
            viewport: parts.viewport,
        })
    }

    pub fn from_config(config: PresentationConfig) -> FlowResult<Self> {
        Self::new(config.into_parts()?)
    }

    pub fn from_json(json: &str) -> FlowResult<Self> {
        Self::from_config(PresentationConfig::from_json(json)?)
    }

    /// Built-in data-flow presentation sized for the given content lists.
    pub fn preset(flavor: Flavor, tasks: usize, skills: usize) -> FlowResult<Self> {
        Self::new(presets::data_flow(flavor, tasks, skills)?)
    }

    pub fn step(&self) -> usize {
        self.timeline.current()
    }

    pub fn total_steps(&self) -> usize {
        self.timeline.total()
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &AnchorEngine {
        &self.engine
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Centre of the current viewport.
    pub fn origin(&self) -> Point {
        self.viewport.origin()
    }

    /// Replace the viewport. The current step is kept.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn advance(&mut self) -> bool {
        let changed = self.timeline.advance();
        self.log_step(changed);
        changed
    }

    pub fn retreat(&mut self) -> bool {
        let changed = self.timeline.retreat();
        self.log_step(changed);
        changed
    }

    pub fn jump_to(&mut self, step: usize) -> FlowResult<bool> {
        let changed = self.timeline.jump_to(step)?;
        self.log_step(changed);
        Ok(changed)
    }

    pub fn navigate(&mut self, event: NavigationEvent) -> FlowResult<bool> {
        let changed = self.timeline.apply(event)?;
        self.log_step(changed);
        Ok(changed)
    }

    /// Navigate on a raw key name. Returns whether the step changed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match NavigationEvent::from_key(key) {
            Some(NavigationEvent::Next) => self.advance(),
            Some(NavigationEvent::Previous) => self.retreat(),
            _ => false,
        }
    }

    /// Resolved layouts at the current step.
    pub fn layouts(&self) -> FlowResult<ResolvedLayouts> {
        resolve(&self.registry, self.step())
    }

    /// Edges for the current step.
    pub fn edges(&self) -> FlowResult<Vec<Edge>> {
        let layouts = self.layouts()?;
        Ok(self.edges_for(&layouts))
    }

    fn edges_for(&self, layouts: &ResolvedLayouts) -> Vec<Edge> {
        self.plan
            .build(self.step(), layouts, &self.engine, self.origin())
    }

    /// Render-ready snapshot of the current step.
    pub fn frame(&self) -> FlowResult<Frame> {
        let step = self.step();
        let layouts = self.layouts()?;
        let edges = self.edges_for(&layouts);

        Ok(Frame {
            step,
            total_steps: self.total_steps(),
            label: self.registry.scene(step)?.label.clone(),
            origin: self.origin(),
            paint_order: paint_order(&layouts),
            layouts,
            edges,
        })
    }

    /// One dot per step, the current one active.
    pub fn dots(&self) -> Vec<NavDot> {
        self.registry
            .iter()
            .enumerate()
            .map(|(step, scene)| NavDot {
                step,
                label: scene.label.clone(),
                active: step == self.step(),
            })
            .collect()
    }

    fn log_step(&self, changed: bool) {
        if !changed {
            return;
        }
        let scene = self.registry.get(self.step());
        tracing::debug!(
            step = self.step(),
            label = scene.and_then(|s| s.label.as_deref()).unwrap_or(""),
            authored = scene.map(|s| s.objects().count()).unwrap_or(0),
            "entered scene"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn decomposition_edges_appear_after_advance() {
        let mut presentation = Presentation::preset(Flavor::Showcase, 4, 4).unwrap();
        presentation.jump_to(2).unwrap();
        assert!(presentation.edges().unwrap().is_empty());

        assert!(presentation.advance());
        assert_eq!(presentation.step(), 3);
        let layouts = presentation.layouts().unwrap();
        let input_right = presentation
            .engine()
            .anchor_of(SceneObjectId::InputForm, Side::Right, &layouts, presentation.origin())
            .unwrap();

        let edges = presentation.edges().unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|edge| edge.start == input_right));
    }

    #[test]
    fn resize_moves_anchors_not_step() {
        let mut presentation = Presentation::preset(Flavor::Showcase, 4, 4).unwrap();
        presentation.jump_to(3).unwrap();
        let before = presentation.edges().unwrap();

        presentation.resize(Viewport::new(1000.0, 800.0));
        assert_eq!(presentation.step(), 3);
        let after = presentation.edges().unwrap();
        assert_eq!(before.len(), after.len());
        let dx = before[0].start.x - after[0].start.x;
        assert!((dx - (960.0 - 500.0)).abs() < 1e-9);
    }

    #[test]
    fn frame_reports_label_and_paint_order() {
        let mut presentation = Presentation::preset(Flavor::Showcase, 4, 4).unwrap();
        presentation.jump_to(4).unwrap();
        let frame = presentation.frame().unwrap();
        assert_eq!(frame.label.as_deref(), Some("agents"));
        assert_eq!(frame.total_steps, 8);
        assert_eq!(frame.edges.len(), 8);
        // Faded decomposition nodes (z 5) paint below the agent grids (z 10).
        assert_eq!(
            frame.visible_objects(),
            &[
                SceneObjectId::DecompTasks,
                SceneObjectId::DecompSkills,
                SceneObjectId::AgentsTasks,
                SceneObjectId::AgentsSkills,
            ]
        );
    }

    #[test]
    fn keys_drive_navigation() {
        let mut presentation = Presentation::preset(Flavor::Standard, 4, 4).unwrap();
        assert!(!presentation.handle_key("ArrowLeft"));
        assert!(presentation.handle_key("ArrowRight"));
        assert!(!presentation.handle_key("Space"));
        assert_eq!(presentation.step(), 1);
    }

    #[test]
    fn dots_mark_current_step() {
        let mut presentation = Presentation::preset(Flavor::Showcase, 4, 4).unwrap();
        presentation.navigate(NavigationEvent::GoTo(5)).unwrap();
        let dots = presentation.dots();
        assert_eq!(dots.len(), 8);
        assert_eq!(dots.iter().filter(|dot| dot.active).count(), 1);
        assert!(dots[5].active);
        assert_eq!(dots[5].label.as_deref(), Some("scoring"));
    }

    #[test]
    fn navigate_matches_direct_calls() {
        let mut presentation = Presentation::preset(Flavor::Showcase, 4, 4).unwrap();
        assert!(!presentation.navigate(NavigationEvent::Previous).unwrap());
        assert!(presentation.navigate(NavigationEvent::Next).unwrap());
        assert!(presentation.navigate(NavigationEvent::GoTo(7)).unwrap());
        assert!(!presentation.navigate(NavigationEvent::Next).unwrap());
        assert!(presentation.navigate(NavigationEvent::GoTo(8)).is_err());
        assert_eq!(presentation.step(), 7);
    }

    #[test]
    fn plan_must_cover_every_scene() {
        let mut parts = presets::data_flow(Flavor::Showcase, 4, 4).unwrap();
        parts.plan = EdgePlan::new(3);
        let err = Presentation::new(parts).unwrap_err();
        assert!(matches!(err, FlowError::InvalidConfig(ref msg) if msg.contains("3 steps")));
    }

    #[test]
    fn bad_jump_is_rejected() {
        let mut presentation = Presentation::preset(Flavor::Showcase, 4, 4).unwrap();
        presentation.jump_to(6).unwrap();
        assert!(matches!(
            presentation.jump_to(42),
            Err(FlowError::OutOfRangeStep { step: 42, total: 8 })
        ));
        assert_eq!(presentation.step(), 6);
    }
}

// Built-in data-flow presentation: profile -> decomposition -> agents -> score -> scenarios.
// Task and skill counts come from the content lists; everything else is authored here.
// See DESIGN.md: Presets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PresentationParts;
use crate::edges::{EdgePlan, EdgeRule, MemberSelection, ObjectAnchor};
use crate::error::FlowResult;
use crate::geometry::{AnchorEngine, AnchorSpec, GridSpec};
use crate::scene::{Scene, SceneRegistry};
use crate::types::{LayoutDescriptor, SceneObjectId, Side, Viewport};

use SceneObjectId::*;

/// Which cut of the presentation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// Eight scenes, with a competition-info slide after the intro.
    #[default]
    Showcase,
    /// Seven scenes, straight from the intro to the profile form.
    Standard,
}

impl Flavor {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "showcase" => Some(Flavor::Showcase),
            "standard" => Some(Flavor::Standard),
            _ => None,
        }
    }

    fn has_competition_info(&self) -> bool {
        matches!(self, Flavor::Showcase)
    }
}

/// Nominal card widths of the data-flow nodes.
pub fn anchor_spec() -> AnchorSpec {
    AnchorSpec::default()
        .with_width(CompetitionInfo, 800.0)
        .with_width(InputForm, 700.0)
        .with_width(DecompTasks, 500.0)
        .with_width(DecompSkills, 500.0)
        // two 280px cards plus gap
        .with_width(AgentsTasks, 580.0)
        .with_width(AgentsSkills, 580.0)
        .with_width(Scoring, 450.0)
        .with_width(Scenario1, 500.0)
        .with_width(Scenario2, 500.0)
}

/// Build the presentation for `flavor` with `tasks` task agents and `skills` skill agents.
pub fn data_flow(flavor: Flavor, tasks: usize, skills: usize) -> FlowResult<PresentationParts> {
    let mut scenes = vec![intro_scene(flavor)];
    if flavor.has_competition_info() {
        scenes.push(competition_scene());
    }
    scenes.extend([
        form_scene(flavor),
        decomposition_scene(),
        agents_scene(),
        scoring_scene(),
        scenarios_scene(),
        outro_scene(),
    ]);

    // Steps of the shared tail, counted from the decomposition scene.
    let decomposition = if flavor.has_competition_info() { 3 } else { 2 };
    let agents = decomposition + 1;
    let scoring = decomposition + 2;
    let scenarios = decomposition + 3;

    let registry = SceneRegistry::new(scenes)?;
    let groups = BTreeMap::from([(AgentsTasks, tasks), (AgentsSkills, skills)]);
    let engine = AnchorEngine::new(anchor_spec(), GridSpec::default(), groups)?;

    let anchor = ObjectAnchor::new;
    let plan = EdgePlan::new(registry.len())
        .with(
            decomposition,
            EdgeRule::link(anchor(InputForm, Side::Right), anchor(DecompTasks, Side::Left)),
        )?
        .with(
            decomposition,
            EdgeRule::link(anchor(InputForm, Side::Right), anchor(DecompSkills, Side::Left)),
        )?
        .with(agents, EdgeRule::fan_out(anchor(DecompTasks, Side::Right), AgentsTasks))?
        .with(agents, EdgeRule::fan_out(anchor(DecompSkills, Side::Right), AgentsSkills))?
        .with(
            scoring,
            EdgeRule::fan_in(AgentsTasks, MemberSelection::RightColumn, anchor(Scoring, Side::Left)),
        )?
        .with(
            scoring,
            EdgeRule::fan_in(AgentsSkills, MemberSelection::RightColumn, anchor(Scoring, Side::Left)),
        )?
        .with(
            scenarios,
            EdgeRule::link(anchor(Scoring, Side::Right), anchor(Scenario1, Side::Left)),
        )?
        .with(
            scenarios,
            EdgeRule::link(anchor(Scoring, Side::Right), anchor(Scenario2, Side::Left)),
        )?;

    Ok(PresentationParts {
        registry,
        engine,
        plan,
        viewport: Viewport::default(),
    })
}

fn intro_scene(flavor: Flavor) -> Scene {
    let next = if flavor.has_competition_info() {
        CompetitionInfo
    } else {
        InputForm
    };
    Scene::labeled("intro")
        .with(Intro, LayoutDescriptor::shown(0.0, 0.0, 1.2, 10))
        .with(next, LayoutDescriptor::parked(500.0, 0.0, 0.8))
}

fn competition_scene() -> Scene {
    Scene::labeled("competition")
        .with(Intro, LayoutDescriptor::parked(-500.0, 0.0, 0.8))
        .with(CompetitionInfo, LayoutDescriptor::shown(0.0, 0.0, 1.2, 10))
        .with(InputForm, LayoutDescriptor::parked(500.0, 0.0, 0.8))
}

fn form_scene(flavor: Flavor) -> Scene {
    let previous = if flavor.has_competition_info() {
        CompetitionInfo
    } else {
        Intro
    };
    Scene::labeled("profile")
        .with(previous, LayoutDescriptor::parked(-500.0, 0.0, 0.8))
        .with(InputForm, LayoutDescriptor::shown(0.0, 0.0, 1.1, 10))
        .with(DecompTasks, LayoutDescriptor::parked(500.0, -200.0, 0.5))
        .with(DecompSkills, LayoutDescriptor::parked(500.0, 200.0, 0.5))
}

fn decomposition_scene() -> Scene {
    Scene::labeled("decomposition")
        .with(InputForm, LayoutDescriptor::shown(-600.0, 0.0, 0.8, 5))
        .with(DecompTasks, LayoutDescriptor::shown(100.0, -250.0, 1.1, 10))
        .with(DecompSkills, LayoutDescriptor::shown(100.0, 250.0, 1.1, 10))
        .with(AgentsTasks, LayoutDescriptor::parked(500.0, -250.0, 0.5))
        .with(AgentsSkills, LayoutDescriptor::parked(500.0, 250.0, 0.5))
}

fn agents_scene() -> Scene {
    Scene::labeled("agents")
        .with(InputForm, LayoutDescriptor::parked(-1000.0, 0.0, 0.5))
        .with(
            DecompTasks,
            LayoutDescriptor::shown(-600.0, -300.0, 0.9, 5).with_opacity(0.5),
        )
        .with(
            DecompSkills,
            LayoutDescriptor::shown(-600.0, 300.0, 0.9, 5).with_opacity(0.5),
        )
        .with(AgentsTasks, LayoutDescriptor::shown(400.0, -300.0, 1.5, 10))
        .with(AgentsSkills, LayoutDescriptor::shown(400.0, 300.0, 1.5, 10))
        .with(Scoring, LayoutDescriptor::parked(600.0, 0.0, 0.5))
}

fn scoring_scene() -> Scene {
    Scene::labeled("scoring")
        .with(DecompTasks, LayoutDescriptor::parked(-1000.0, -250.0, 0.5))
        .with(DecompSkills, LayoutDescriptor::parked(-1000.0, 250.0, 0.5))
        .with(
            AgentsTasks,
            LayoutDescriptor::shown(-500.0, -250.0, 0.8, 5).with_opacity(0.5),
        )
        .with(
            AgentsSkills,
            LayoutDescriptor::shown(-500.0, 250.0, 0.8, 5).with_opacity(0.5),
        )
        .with(Scoring, LayoutDescriptor::shown(300.0, 0.0, 1.3, 10))
        .with(Scenario1, LayoutDescriptor::parked(800.0, -150.0, 0.5))
        .with(Scenario2, LayoutDescriptor::parked(800.0, 150.0, 0.5))
}

fn scenarios_scene() -> Scene {
    Scene::labeled("scenarios")
        .with(AgentsTasks, LayoutDescriptor::parked(-1000.0, -250.0, 0.5))
        .with(AgentsSkills, LayoutDescriptor::parked(-1000.0, 250.0, 0.5))
        .with(
            Scoring,
            LayoutDescriptor::shown(-500.0, 0.0, 0.8, 5).with_opacity(0.5),
        )
        .with(Scenario1, LayoutDescriptor::shown(0.0, -180.0, 1.1, 10))
        .with(Scenario2, LayoutDescriptor::shown(0.0, 180.0, 1.1, 10))
        .with(Outro, LayoutDescriptor::parked(500.0, 0.0, 0.5))
}

fn outro_scene() -> Scene {
    Scene::labeled("outro")
        .with(Scoring, LayoutDescriptor::parked(-1000.0, 0.0, 0.5))
        .with(Scenario1, LayoutDescriptor::parked(-500.0, -180.0, 0.5))
        .with(Scenario2, LayoutDescriptor::parked(-500.0, 180.0, 0.5))
        .with(Outro, LayoutDescriptor::shown(0.0, 0.0, 1.2, 10))
}

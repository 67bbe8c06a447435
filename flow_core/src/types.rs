// Strong typing over authored maps. Object ids, layout descriptors, anchor points.
// See DESIGN.md: Data model

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Identifier of one object in the presentation cast. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneObjectId {
    Intro,
    CompetitionInfo,
    InputForm,
    DecompTasks,
    DecompSkills,
    /// Grid group: one agent card per task.
    AgentsTasks,
    /// Grid group: one agent card per skill.
    AgentsSkills,
    Scoring,
    #[serde(rename = "scenario_1")]
    Scenario1,
    #[serde(rename = "scenario_2")]
    Scenario2,
    Outro,
}

impl SceneObjectId {
    /// Every id, in paint-independent declaration order.
    pub const ALL: [SceneObjectId; 11] = [
        SceneObjectId::Intro,
        SceneObjectId::CompetitionInfo,
        SceneObjectId::InputForm,
        SceneObjectId::DecompTasks,
        SceneObjectId::DecompSkills,
        SceneObjectId::AgentsTasks,
        SceneObjectId::AgentsSkills,
        SceneObjectId::Scoring,
        SceneObjectId::Scenario1,
        SceneObjectId::Scenario2,
        SceneObjectId::Outro,
    ];

    /// Canonical name used in JSON configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneObjectId::Intro => "intro",
            SceneObjectId::CompetitionInfo => "competition_info",
            SceneObjectId::InputForm => "input_form",
            SceneObjectId::DecompTasks => "decomp_tasks",
            SceneObjectId::DecompSkills => "decomp_skills",
            SceneObjectId::AgentsTasks => "agents_tasks",
            SceneObjectId::AgentsSkills => "agents_skills",
            SceneObjectId::Scoring => "scoring",
            SceneObjectId::Scenario1 => "scenario_1",
            SceneObjectId::Scenario2 => "scenario_2",
            SceneObjectId::Outro => "outro",
        }
    }

    /// Whether this object renders as a grid of member cards.
    pub fn is_group(&self) -> bool {
        matches!(self, SceneObjectId::AgentsTasks | SceneObjectId::AgentsSkills)
    }
}

impl fmt::Display for SceneObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneObjectId {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneObjectId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| FlowError::UnknownObjectId(s.to_string()))
    }
}

/// Layout of one object in one scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    /// Pixels from the shared origin.
    #[serde(default, alias = "x")]
    pub offset_x: f64,
    #[serde(default, alias = "y")]
    pub offset_y: f64,
    #[serde(default)]
    pub opacity: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub z_index: i32,
    /// Invisible objects are neither rendered nor used as edge endpoints.
    #[serde(default)]
    pub visible: bool,
}

fn default_scale() -> f64 {
    1.0
}

impl LayoutDescriptor {
    /// Scale given to objects a scene does not mention.
    pub const HIDDEN_SCALE: f64 = 0.8;

    /// Descriptor for an object the current scene does not mention.
    pub fn hidden() -> Self {
        LayoutDescriptor {
            offset_x: 0.0,
            offset_y: 0.0,
            opacity: 0.0,
            scale: Self::HIDDEN_SCALE,
            z_index: 0,
            visible: false,
        }
    }

    /// Visible, fully opaque descriptor at the given offset.
    pub fn shown(offset_x: f64, offset_y: f64, scale: f64, z_index: i32) -> Self {
        LayoutDescriptor {
            offset_x,
            offset_y,
            opacity: 1.0,
            scale,
            z_index,
            visible: true,
        }
    }

    /// Invisible descriptor parked at an offset, ready to fade in.
    pub fn parked(offset_x: f64, offset_y: f64, scale: f64) -> Self {
        LayoutDescriptor {
            offset_x,
            offset_y,
            opacity: 0.0,
            scale,
            z_index: 0,
            visible: false,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for LayoutDescriptor {
    fn default() -> Self {
        LayoutDescriptor::hidden()
    }
}

/// Resolved layout of every object for one step.
pub type ResolvedLayouts = BTreeMap<SceneObjectId, LayoutDescriptor>;

/// Absolute point in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Which side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
    #[default]
    Center,
}

/// Rendering surface size. Its centre is the origin of every layout offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

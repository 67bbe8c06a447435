// Presentation content configuration, as authored JSON.
// Object names stay strings until validation so an unknown name surfaces as
// UnknownObjectId before the first frame, not as a render-time failure.
// See DESIGN.md: Configuration

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::edges::{EdgePlan, EdgeRule, MemberSelection, ObjectAnchor};
use crate::error::{FlowError, FlowResult};
use crate::geometry::{AnchorEngine, AnchorSpec, GridSpec};
use crate::scene::{Scene, SceneRegistry};
use crate::types::{LayoutDescriptor, SceneObjectId, Side, Viewport};

/// Top-level presentation config passed from JS.
///
/// # Example JSON Config
/// ```json
/// {
///   "scenes": [
///     { "label": "form", "objects": { "input_form": { "x": 0, "y": 0, "opacity": 1, "visible": true } } },
///     { "label": "decomposition", "objects": {
///         "input_form": { "x": -600, "opacity": 1, "scale": 0.8, "visible": true },
///         "decomp_tasks": { "x": 100, "y": -250, "opacity": 1, "scale": 1.1, "visible": true } } }
///   ],
///   "anchors": { "widths": { "input_form": 700, "decomp_tasks": 500 } },
///   "edges": [
///     { "step": 1, "kind": "link",
///       "from": { "object": "input_form", "side": "right" },
///       "to": { "object": "decomp_tasks", "side": "left" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub scenes: Vec<SceneConfig>,
    #[serde(default)]
    pub anchors: AnchorConfig,
    #[serde(default)]
    pub grid: GridSpec,
    /// Member count per group object name.
    #[serde(default)]
    pub groups: BTreeMap<String, usize>,
    #[serde(default)]
    pub edges: Vec<EdgeRuleConfig>,
    /// Initial surface size. Defaults to 1920x1080.
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub objects: BTreeMap<String, LayoutDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    #[serde(default = "default_width")]
    pub default_width: f64,
    #[serde(default)]
    pub widths: BTreeMap<String, f64>,
}

fn default_width() -> f64 {
    AnchorSpec::DEFAULT_WIDTH
}

impl Default for AnchorConfig {
    fn default() -> Self {
        AnchorConfig {
            default_width: default_width(),
            widths: BTreeMap::new(),
        }
    }
}

/// JSON-friendly object anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfigRef {
    pub object: String,
    #[serde(default)]
    pub side: Side,
}

fn default_member_left() -> Side {
    Side::Left
}

fn default_member_right() -> Side {
    Side::Right
}

/// JSON-friendly edge rule, bound to the step it is drawn on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRuleConfig {
    pub step: usize,
    #[serde(flatten)]
    pub rule: RuleKindConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKindConfig {
    Link {
        from: AnchorConfigRef,
        to: AnchorConfigRef,
    },
    FanOut {
        from: AnchorConfigRef,
        group: String,
        #[serde(default = "default_member_left")]
        member_side: Side,
        #[serde(default)]
        select: MemberSelection,
    },
    FanIn {
        group: String,
        #[serde(default = "default_member_right")]
        member_side: Side,
        #[serde(default)]
        select: MemberSelection,
        to: AnchorConfigRef,
    },
}

/// Validated building blocks of a presentation.
#[derive(Debug, Clone)]
pub struct PresentationParts {
    pub registry: SceneRegistry,
    pub engine: AnchorEngine,
    pub plan: EdgePlan,
    pub viewport: Viewport,
}

impl PresentationConfig {
    pub fn from_json(json: &str) -> FlowResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check every name against the object enumeration and build typed parts.
    pub fn into_parts(self) -> FlowResult<PresentationParts> {
        let scenes = self
            .scenes
            .into_iter()
            .map(|scene| -> FlowResult<Scene> {
                let mut built = Scene::new();
                built.label = scene.label;
                for (name, layout) in scene.objects {
                    built.insert(name.parse()?, layout);
                }
                Ok(built)
            })
            .collect::<FlowResult<Vec<_>>>()?;
        let registry = SceneRegistry::new(scenes)?;

        let mut anchors = AnchorSpec::new(self.anchors.default_width);
        for (name, width) in self.anchors.widths {
            anchors = anchors.with_width(name.parse()?, width);
        }

        let groups = self
            .groups
            .into_iter()
            .map(|(name, count)| -> FlowResult<(SceneObjectId, usize)> {
                Ok((name.parse()?, count))
            })
            .collect::<FlowResult<BTreeMap<_, _>>>()?;
        let engine = AnchorEngine::new(anchors, self.grid, groups)?;

        let total = registry.len();
        let mut plan = EdgePlan::new(total);
        for (index, config) in self.edges.into_iter().enumerate() {
            if config.step >= total {
                return Err(FlowError::RuleStepOutOfRange {
                    rule: index,
                    step: config.step,
                    total,
                });
            }
            let rule = config.rule.into_rule()?;
            let group = rule.group();
            plan.add(config.step, rule)?;
            if let Some(group) = group.filter(|group| !engine.has_group(*group)) {
                return Err(FlowError::MissingGroupCount(group));
            }
        }

        Ok(PresentationParts {
            registry,
            engine,
            plan,
            viewport: self.viewport.unwrap_or_default(),
        })
    }
}

impl AnchorConfigRef {
    fn into_anchor(self) -> FlowResult<ObjectAnchor> {
        Ok(ObjectAnchor::new(self.object.parse()?, self.side))
    }
}

impl RuleKindConfig {
    fn into_rule(self) -> FlowResult<EdgeRule> {
        let rule = match self {
            RuleKindConfig::Link { from, to } => EdgeRule::Link {
                from: from.into_anchor()?,
                to: to.into_anchor()?,
            },
            RuleKindConfig::FanOut {
                from,
                group,
                member_side,
                select,
            } => EdgeRule::FanOut {
                from: from.into_anchor()?,
                group: group.parse()?,
                member_side,
                select,
            },
            RuleKindConfig::FanIn {
                group,
                member_side,
                select,
                to,
            } => EdgeRule::FanIn {
                group: group.parse()?,
                member_side,
                select,
                to: to.into_anchor()?,
            },
        };
        Ok(rule)
    }
}

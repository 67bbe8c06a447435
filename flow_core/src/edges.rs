// Edge plan: per-step connection rules, expanded into drawable point pairs.
// An edge is emitted only when both endpoints are visible. Anything else is a
// mid-transition state and the pair is dropped, never an error.
// See DESIGN.md: Edge Plan Builder

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};
use crate::geometry::AnchorEngine;
use crate::types::{Point, ResolvedLayouts, SceneObjectId, Side};

/// Anchor on a single object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectAnchor {
    pub object: SceneObjectId,
    pub side: Side,
}

impl ObjectAnchor {
    pub fn new(object: SceneObjectId, side: Side) -> Self {
        ObjectAnchor { object, side }
    }
}

/// One edge endpoint: a plain object anchor or a member of a grid group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnchorSelector {
    Object {
        object: SceneObjectId,
        side: Side,
    },
    Member {
        group: SceneObjectId,
        index: usize,
        side: Side,
    },
}

impl AnchorSelector {
    pub fn object(object: SceneObjectId, side: Side) -> Self {
        AnchorSelector::Object { object, side }
    }

    pub fn member(group: SceneObjectId, index: usize, side: Side) -> Self {
        AnchorSelector::Member { group, index, side }
    }

    /// Resolve to an absolute point, `None` if the owning object is hidden.
    pub fn locate(&self, engine: &AnchorEngine, layouts: &ResolvedLayouts, origin: Point) -> Option<Point> {
        match *self {
            AnchorSelector::Object { object, side } => engine.anchor_of(object, side, layouts, origin),
            AnchorSelector::Member { group, index, side } => {
                engine.grid_anchor_of(group, index, side, layouts, origin)
            }
        }
    }
}

impl From<ObjectAnchor> for AnchorSelector {
    fn from(anchor: ObjectAnchor) -> Self {
        AnchorSelector::object(anchor.object, anchor.side)
    }
}

impl fmt::Display for AnchorSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |side: &Side| match side {
            Side::Left => "left",
            Side::Right => "right",
            Side::Center => "center",
        };
        match self {
            AnchorSelector::Object { object, side: s } => write!(f, "{}:{}", object, side(s)),
            AnchorSelector::Member { group, index, side: s } => {
                write!(f, "{}[{}]:{}", group, index, side(s))
            }
        }
    }
}

/// Which members of a group take part in a fan-out or fan-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberSelection {
    #[default]
    All,
    /// Only members in the last grid column. Keeps fan-in lines from
    /// crossing the cards to their left.
    RightColumn,
}

/// One authored connection rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeRule {
    /// One source to one target.
    Link { from: ObjectAnchor, to: ObjectAnchor },
    /// One source to each selected member of a group.
    FanOut {
        from: ObjectAnchor,
        group: SceneObjectId,
        member_side: Side,
        select: MemberSelection,
    },
    /// Each selected member of a group to one target.
    FanIn {
        group: SceneObjectId,
        member_side: Side,
        select: MemberSelection,
        to: ObjectAnchor,
    },
}

impl EdgeRule {
    pub fn link(from: ObjectAnchor, to: ObjectAnchor) -> Self {
        EdgeRule::Link { from, to }
    }

    pub fn fan_out(from: ObjectAnchor, group: SceneObjectId) -> Self {
        EdgeRule::FanOut {
            from,
            group,
            member_side: Side::Left,
            select: MemberSelection::All,
        }
    }

    pub fn fan_in(group: SceneObjectId, select: MemberSelection, to: ObjectAnchor) -> Self {
        EdgeRule::FanIn {
            group,
            member_side: Side::Right,
            select,
            to,
        }
    }

    pub(crate) fn group(&self) -> Option<SceneObjectId> {
        match self {
            EdgeRule::Link { .. } => None,
            EdgeRule::FanOut { group, .. } | EdgeRule::FanIn { group, .. } => Some(*group),
        }
    }

    /// Expand into endpoint pairs. Fan arity follows the group's member count.
    pub fn pairs(&self, engine: &AnchorEngine) -> Vec<(AnchorSelector, AnchorSelector)> {
        let members = move |group: SceneObjectId, select: MemberSelection| {
            (0..engine.group_size(group)).filter(move |&i| match select {
                MemberSelection::All => true,
                MemberSelection::RightColumn => engine.grid().is_right_column(i),
            })
        };

        match *self {
            EdgeRule::Link { from, to } => vec![(from.into(), to.into())],
            EdgeRule::FanOut {
                from,
                group,
                member_side,
                select,
            } => members(group, select)
                .map(|i| (from.into(), AnchorSelector::member(group, i, member_side)))
                .collect(),
            EdgeRule::FanIn {
                group,
                member_side,
                select,
                to,
            } => members(group, select)
                .map(|i| (AnchorSelector::member(group, i, member_side), to.into()))
                .collect(),
        }
    }
}

/// A drawable connection for the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: AnchorSelector,
    pub to: AnchorSelector,
    pub start: Point,
    pub end: Point,
    pub active: bool,
}

impl Edge {
    /// Stable identity for the surface to key DOM nodes on.
    pub fn key(&self) -> String {
        format!("{}->{}", self.from, self.to)
    }
}

/// Connection rules for every step of a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgePlan {
    steps: Vec<Vec<EdgeRule>>,
}

impl EdgePlan {
    /// Empty plan for a timeline of `total` scenes.
    pub fn new(total: usize) -> Self {
        EdgePlan {
            steps: vec![Vec::new(); total],
        }
    }

    /// Register a rule on `step`. Group rules must name a group object.
    pub fn add(&mut self, step: usize, rule: EdgeRule) -> FlowResult<()> {
        let total = self.steps.len();
        let rule_index = self.steps.iter().map(Vec::len).sum();
        let rules = self.steps.get_mut(step).ok_or(FlowError::RuleStepOutOfRange {
            rule: rule_index,
            step,
            total,
        })?;
        if let Some(group) = rule.group().filter(|group| !group.is_group()) {
            return Err(FlowError::NotAGroup(group));
        }
        rules.push(rule);
        Ok(())
    }

    pub fn with(mut self, step: usize, rule: EdgeRule) -> FlowResult<Self> {
        self.add(step, rule)?;
        Ok(self)
    }

    pub fn rules_at(&self, step: usize) -> &[EdgeRule] {
        self.steps.get(step).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.steps.len()
    }

    /// Build the edges for `step`, in rule order. Pairs with a hidden endpoint
    /// are dropped.
    pub fn build(
        &self,
        step: usize,
        layouts: &ResolvedLayouts,
        engine: &AnchorEngine,
        origin: Point,
    ) -> Vec<Edge> {
        let mut edges = Vec::new();

        for rule in self.rules_at(step) {
            for (from, to) in rule.pairs(engine) {
                let start = from.locate(engine, layouts, origin);
                let end = to.locate(engine, layouts, origin);
                match (start, end) {
                    (Some(start), Some(end)) => edges.push(Edge {
                        from,
                        to,
                        start,
                        end,
                        active: true,
                    }),
                    _ => tracing::trace!(step, %from, %to, "edge endpoint hidden, skipped"),
                }
            }
        }

        edges
    }
}

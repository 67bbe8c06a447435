// Anchor geometry: where edges attach to nodes that move, scale and fade per scene.
// Nominal widths are for anchor arithmetic only; real sizes belong to the surface.
// Grid members have no layout of their own. Their position is derived from the
// group's single descriptor plus the member index.
// See DESIGN.md: Anchor Geometry Engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};
use crate::types::{Point, ResolvedLayouts, SceneObjectId, Side};

/// Nominal unscaled widths per object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorSpec {
    /// Width used for objects missing from `widths`.
    pub default_width: f64,
    pub widths: BTreeMap<SceneObjectId, f64>,
}

impl AnchorSpec {
    pub const DEFAULT_WIDTH: f64 = 200.0;

    pub fn new(default_width: f64) -> Self {
        AnchorSpec {
            default_width,
            widths: BTreeMap::new(),
        }
    }

    pub fn with_width(mut self, id: SceneObjectId, width: f64) -> Self {
        self.widths.insert(id, width);
        self
    }

    pub fn width_of(&self, id: SceneObjectId) -> f64 {
        self.widths.get(&id).copied().unwrap_or(self.default_width)
    }

    fn validate(&self) -> FlowResult<()> {
        let positive = |w: f64| w.is_finite() && w > 0.0;
        if !positive(self.default_width) {
            return Err(FlowError::InvalidConfig(format!(
                "default anchor width must be positive, got {}",
                self.default_width
            )));
        }
        if let Some((id, width)) = self.widths.iter().find(|(_, w)| !positive(**w)) {
            return Err(FlowError::InvalidConfig(format!(
                "anchor width for {} must be positive, got {}",
                id, width
            )));
        }
        Ok(())
    }
}

impl Default for AnchorSpec {
    fn default() -> Self {
        AnchorSpec::new(Self::DEFAULT_WIDTH)
    }
}

/// Fixed-column grid arrangement shared by every group object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// Width of one member card.
    #[serde(default = "default_member_width")]
    pub member_width: f64,
    /// Height of one member card, padding included.
    #[serde(default = "default_member_height")]
    pub member_height: f64,
    /// Spacing between adjacent cards, both axes.
    #[serde(default = "default_gap")]
    pub gap: f64,
}

fn default_columns() -> usize {
    2
}

fn default_member_width() -> f64 {
    280.0
}

fn default_member_height() -> f64 {
    120.0
}

fn default_gap() -> f64 {
    16.0
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec {
            columns: default_columns(),
            member_width: default_member_width(),
            member_height: default_member_height(),
            gap: default_gap(),
        }
    }
}

/// Position of one member inside its group's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMember {
    pub index: usize,
    pub column: usize,
    pub row: usize,
}

impl GridSpec {
    pub fn member(&self, index: usize) -> GridMember {
        GridMember {
            index,
            column: index % self.columns,
            row: index / self.columns,
        }
    }

    pub fn rows(&self, count: usize) -> usize {
        count.div_ceil(self.columns)
    }

    /// Whether the member sits in the last column of the grid.
    pub fn is_right_column(&self, index: usize) -> bool {
        self.member(index).column + 1 == self.columns
    }

    /// Unscaled offset of a member's anchor from the group centre.
    /// `None` when `index` is not a member of a `count`-sized grid.
    ///
    /// Rows are laid out as if there were at least two, so a one-row grid
    /// keeps its members on the upper row (`y = -(h + gap) / 2`), the same
    /// place members 0 and 1 take in a 2x2 grid. Taller grids are centred
    /// on the group origin.
    pub fn member_offset(&self, index: usize, count: usize, side: Side) -> Option<(f64, f64)> {
        if index >= count {
            return None;
        }

        let member = self.member(index);
        let pitch_x = self.member_width + self.gap;
        let pitch_y = self.member_height + self.gap;

        let mid_column = (self.columns - 1) as f64 / 2.0;
        let mid_row = (self.rows(count).max(2) - 1) as f64 / 2.0;
        let x = (member.column as f64 - mid_column) * pitch_x;
        let y = (member.row as f64 - mid_row) * pitch_y;

        let half = self.member_width / 2.0;
        let x = match side {
            Side::Left => x - half,
            Side::Right => x + half,
            Side::Center => x,
        };

        Some((x, y))
    }

    fn validate(&self) -> FlowResult<()> {
        if self.columns == 0 {
            return Err(FlowError::InvalidConfig(
                "grid needs at least one column".to_string(),
            ));
        }
        let sizes = [self.member_width, self.member_height];
        if sizes.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(FlowError::InvalidConfig(
                "grid member size must be positive".to_string(),
            ));
        }
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(FlowError::InvalidConfig(
                "grid gap must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Computes absolute anchor points from resolved layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorEngine {
    anchors: AnchorSpec,
    grid: GridSpec,
    /// Member count per group object, from the content lists.
    groups: BTreeMap<SceneObjectId, usize>,
}

impl AnchorEngine {
    pub fn new(
        anchors: AnchorSpec,
        grid: GridSpec,
        groups: BTreeMap<SceneObjectId, usize>,
    ) -> FlowResult<Self> {
        anchors.validate()?;
        grid.validate()?;
        if let Some(id) = groups.keys().find(|id| !id.is_group()) {
            return Err(FlowError::NotAGroup(*id));
        }

        Ok(AnchorEngine {
            anchors,
            grid,
            groups,
        })
    }

    pub fn anchors(&self) -> &AnchorSpec {
        &self.anchors
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Number of members rendered in `group`. Zero for unknown groups.
    pub fn group_size(&self, group: SceneObjectId) -> usize {
        self.groups.get(&group).copied().unwrap_or(0)
    }

    /// Whether a member count was supplied for `group`, even an empty one.
    pub fn has_group(&self, group: SceneObjectId) -> bool {
        self.groups.contains_key(&group)
    }

    /// Anchor on a single object's boundary. `None` when the object is hidden.
    pub fn anchor_of(
        &self,
        id: SceneObjectId,
        side: Side,
        layouts: &ResolvedLayouts,
        origin: Point,
    ) -> Option<Point> {
        let layout = layouts.get(&id).filter(|layout| layout.visible)?;

        let center = Point::new(origin.x + layout.offset_x, origin.y + layout.offset_y);
        let half_width = self.anchors.width_of(id) / 2.0 * layout.scale;

        let x = match side {
            Side::Left => center.x - half_width,
            Side::Right => center.x + half_width,
            Side::Center => center.x,
        };
        Some(Point::new(x, center.y))
    }

    /// Anchor on one member of a grid group. `None` when the group is hidden,
    /// `group` is not a group, or `index` is past the member count.
    pub fn grid_anchor_of(
        &self,
        group: SceneObjectId,
        index: usize,
        side: Side,
        layouts: &ResolvedLayouts,
        origin: Point,
    ) -> Option<Point> {
        if !group.is_group() {
            return None;
        }
        let layout = layouts.get(&group).filter(|layout| layout.visible)?;
        let (dx, dy) = self
            .grid
            .member_offset(index, self.group_size(group), side)?;

        Some(Point::new(
            origin.x + layout.offset_x + dx * layout.scale,
            origin.y + layout.offset_y + dy * layout.scale,
        ))
    }
}

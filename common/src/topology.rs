//! Fixed wiring topology of the overview page.
//!
//! ```text
//!                       house
//!                         |
//!  PV--BAT--INV--+        |
//!                |        |
//!  PV--BAT--INV--+--------+------meter------grid   <- Y_BUS
//!                |
//!  PV--BAT--INV--+
//!                ^ X_INV_CONN (scrolls vertically)
//! ```
//!
//! Inverter groups hang off the vertical inverter bus, centered around the
//! main bus. Anchors left of (and on) `X_INV_CONN` are content coordinates
//! that scroll with `y_offset`; everything else is fixed.

use crate::config::{GROUP_HEIGHT, X_BAT, X_GRID, X_HOUSE_CONN, X_INV, X_INV_CONN, X_METER, X_PV, Y_BUS, Y_HOUSE};
use crate::device::{DeviceId, GroupMember, InverterGroup};
use crate::geometry::{Segment, Vec2};

/// House anchor at the top of the house connector.
pub const HOUSE_ANCHOR: Vec2 = Vec2::new(X_HOUSE_CONN, Y_HOUSE);

/// Smart meter anchor on the main bus.
pub const METER_ANCHOR: Vec2 = Vec2::new(X_METER, Y_BUS);

/// Grid anchor at the right end of the main bus.
pub const GRID_ANCHOR: Vec2 = Vec2::new(X_GRID, Y_BUS);

/// Main bus from the inverter bus to the grid.
pub const MAIN_BUS: Segment = Segment::new(Vec2::new(X_INV_CONN, Y_BUS), GRID_ANCHOR);

/// Connector from the main bus up to the house.
pub const HOUSE_CONNECTOR: Segment = Segment::new(Vec2::new(X_HOUSE_CONN, Y_BUS), HOUSE_ANCHOR);

/// Whether `x` lies in the vertically scrolling inverter region.
#[inline]
pub fn is_scrolled(x: f32) -> bool { x <= X_INV_CONN }

/// Convert a stored position to screen space.
#[inline]
pub fn to_screen(
    pos: Vec2,
    y_offset: f32,
) -> Vec2 {
    if is_scrolled(pos.x) {
        Vec2::new(pos.x, pos.y + y_offset)
    } else {
        pos
    }
}

/// Content y of the branch of group `index` out of `count`.
pub fn group_y(
    index: usize,
    count: usize,
) -> f32 {
    let center = (count.max(1) as f32 - 1.0) / 2.0;
    Y_BUS + (index as f32 - center) * GROUP_HEIGHT
}

/// Where a group's branch meets the inverter bus.
#[inline]
pub fn bus_point(
    index: usize,
    count: usize,
) -> Vec2 {
    Vec2::new(X_INV_CONN, group_y(index, count))
}

/// Anchor of a member on the branch of group `index`.
pub fn member_anchor(
    member: GroupMember,
    index: usize,
    count: usize,
) -> Vec2 {
    let x = match member {
        GroupMember::Inverter => X_INV,
        GroupMember::Pv => X_PV,
        GroupMember::Battery => X_BAT,
    };
    Vec2::new(x, group_y(index, count))
}

/// Branch wire of group `index`, from the PV string to the inverter bus.
pub fn branch(
    index: usize,
    count: usize,
) -> Segment {
    let y = group_y(index, count);
    Segment::new(Vec2::new(X_PV, y), Vec2::new(X_INV_CONN, y))
}

/// Vertical inverter bus spanning every branch and the main bus.
pub fn inverter_bus(count: usize) -> Segment {
    let top = group_y(0, count).min(Y_BUS);
    let bottom = group_y(count.saturating_sub(1), count).max(Y_BUS);
    Segment::new(Vec2::new(X_INV_CONN, top), Vec2::new(X_INV_CONN, bottom))
}

/// Scrollable height of the inverter region: half the span between the
/// outermost branches plus one group height.
pub fn view_height(count: usize) -> f32 {
    let span = group_y(count.saturating_sub(1), count) - group_y(0, count);
    span / 2.0 + GROUP_HEIGHT
}

/// Anchor of any device the blobs can travel to.
pub fn device_anchor(
    id: DeviceId,
    groups: &[InverterGroup],
) -> Option<Vec2> {
    match id {
        DeviceId::ABSENT => None,
        DeviceId::HOUSE => Some(HOUSE_ANCHOR),
        DeviceId::METER => Some(METER_ANCHOR),
        DeviceId::GRID => Some(GRID_ANCHOR),
        _ => groups
            .iter()
            .enumerate()
            .find_map(|(i, g)| g.member(id).map(|m| member_anchor(m, i, groups.len()))),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Blob path following.
//!
//! Blobs move along axis-aligned wires. Each frame a blob travels
//! `speed * delta_ms` pixels in its current direction; when that step passes
//! a junction the blob snaps onto the junction, turns toward its next
//! sub-goal and spends the overshoot on the new axis, so a corner never
//! changes the distance covered in a frame.
//!
//! Junctions:
//!
//! - the inverter bus column `X_INV_CONN` (entered from a branch or from the main bus)
//! - the main bus row `Y_BUS` (left through the inverter bus or the house connector)
//! - the house connector column `X_HOUSE_CONN` (for blobs heading to the house)
//!
//! Routing runs in screen space. Stored positions in the inverter region are
//! content coordinates and get `y_offset` added on the way in and removed on
//! the way out.

use crate::blob::{BlobPool, Direction, EnergyBlob};
use crate::config::{X_HOUSE_CONN, X_INV_CONN, Y_BUS};
use crate::device::InverterGroup;
use crate::geometry::Vec2;
use crate::log_buffer::LogBuffer;
use crate::thresholds::{ARRIVAL_DISTANCE, BLOB_SPEED_PX_PER_MS, STRAY_MAX, STRAY_MIN};
use crate::topology::{device_anchor, is_scrolled, to_screen};

/// Upper bound on direction changes within one frame.
const MAX_LEGS: usize = 4;

/// Tolerance for "on this line" tests after offset round trips.
const LINE_EPSILON: f32 = 0.01;

/// Result of advancing one blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Moving,
    Arrived,
    /// Left the sane coordinate region.
    Stray,
}

enum Leg {
    Straight,
    Turn { at: Vec2, dir: Direction },
    Arrive,
}

/// Threshold crossing between two samples of one coordinate.
#[inline]
pub fn crossed(
    prev: f32,
    cur: f32,
    v: f32,
) -> bool {
    (cur < v && prev >= v) || (cur >= v && prev < v)
}

/// Crossing, or landing exactly on `v` from above.
#[inline]
fn reached(
    prev: f32,
    cur: f32,
    v: f32,
) -> bool {
    crossed(prev, cur, v) || (cur == v && prev != v)
}

#[inline]
fn on_line(
    a: f32,
    b: f32,
) -> bool {
    (a - b).abs() < LINE_EPSILON
}

#[inline]
fn is_house(goal: Vec2) -> bool { goal.x == X_HOUSE_CONN }

fn from_screen(
    pos: Vec2,
    y_offset: f32,
) -> Vec2 {
    if is_scrolled(pos.x) {
        Vec2::new(pos.x, pos.y - y_offset)
    } else {
        pos
    }
}

#[inline]
fn is_stray(pos: Vec2) -> bool { !(STRAY_MIN..=STRAY_MAX).contains(&pos.x) || !(STRAY_MIN..=STRAY_MAX).contains(&pos.y) }

/// Direction a freshly spawned blob starts moving in.
pub fn initial_direction(
    from: Vec2,
    goal: Vec2,
    y_offset: f32,
) -> Direction {
    let from = to_screen(from, y_offset);
    let goal = to_screen(goal, y_offset);

    // House stub only leads down to the bus
    if from.x == X_HOUSE_CONN && from.y < Y_BUS {
        return Direction::Down;
    }
    if on_line(from.y, goal.y) {
        return Direction::horizontal_toward(from.x, goal.x);
    }
    if from.x < X_INV_CONN {
        return Direction::Right;
    }
    if from.x == X_INV_CONN {
        if goal.x <= X_INV_CONN {
            return Direction::vertical_toward(from.y, goal.y);
        }
        return if on_line(from.y, Y_BUS) { Direction::Right } else { Direction::vertical_toward(from.y, Y_BUS) };
    }
    if is_house(goal) {
        return if from.x == X_HOUSE_CONN { Direction::Up } else { Direction::horizontal_toward(from.x, X_HOUSE_CONN) };
    }
    Direction::horizontal_toward(from.x, goal.x)
}

/// Junction handling for one straight leg from `prev` to `cur` (screen space).
fn junction(
    prev: Vec2,
    cur: Vec2,
    dir: Direction,
    goal: Vec2,
) -> Leg {
    let goal_right = goal.x > X_INV_CONN;

    if dir.is_vertical() {
        if on_line(cur.x, goal.x) && reached(prev.y, cur.y, goal.y) {
            return Leg::Arrive;
        }
        if cur.x == X_INV_CONN {
            if goal_right {
                if reached(prev.y, cur.y, Y_BUS) {
                    return Leg::Turn {
                        at: Vec2::new(X_INV_CONN, Y_BUS),
                        dir: Direction::Right,
                    };
                }
            } else if reached(prev.y, cur.y, goal.y) {
                return Leg::Turn {
                    at: Vec2::new(X_INV_CONN, goal.y),
                    dir: Direction::horizontal_toward(X_INV_CONN, goal.x),
                };
            }
        } else if cur.x == X_HOUSE_CONN && !is_house(goal) && reached(prev.y, cur.y, Y_BUS) {
            return Leg::Turn {
                at: Vec2::new(X_HOUSE_CONN, Y_BUS),
                dir: Direction::horizontal_toward(X_HOUSE_CONN, goal.x),
            };
        }
        return Leg::Straight;
    }

    if on_line(cur.y, goal.y) && reached(prev.x, cur.x, goal.x) {
        return Leg::Arrive;
    }
    match dir {
        Direction::Right if prev.x < X_INV_CONN && reached(prev.x, cur.x, X_INV_CONN) => {
            // Leaving a branch onto the inverter bus
            if goal_right {
                if on_line(cur.y, Y_BUS) {
                    Leg::Turn {
                        at: Vec2::new(X_INV_CONN, Y_BUS),
                        dir: Direction::Right,
                    }
                } else {
                    Leg::Turn {
                        at: Vec2::new(X_INV_CONN, cur.y),
                        dir: Direction::vertical_toward(cur.y, Y_BUS),
                    }
                }
            } else {
                let dir = if on_line(cur.y, goal.y) { Direction::Left } else { Direction::vertical_toward(cur.y, goal.y) };
                Leg::Turn {
                    at: Vec2::new(X_INV_CONN, cur.y),
                    dir,
                }
            }
        }
        Direction::Left if !goal_right && prev.x > X_INV_CONN && reached(prev.x, cur.x, X_INV_CONN) => {
            // Entering the inverter bus from the main bus
            let dir = if on_line(cur.y, goal.y) { Direction::Left } else { Direction::vertical_toward(cur.y, goal.y) };
            Leg::Turn {
                at: Vec2::new(X_INV_CONN, cur.y),
                dir,
            }
        }
        _ if is_house(goal) && on_line(cur.y, Y_BUS) && reached(prev.x, cur.x, X_HOUSE_CONN) => Leg::Turn {
            at: Vec2::new(X_HOUSE_CONN, Y_BUS),
            dir: Direction::Up,
        },
        _ => Leg::Straight,
    }
}

/// Direction for a blob on the inverter bus, from where it is now.
///
/// The bus scrolls and its branches move when groups come and go, so the side
/// of the main bus or of the target branch can change while a blob is on it.
fn resolve_on_inverter_bus(
    pos: Vec2,
    dir: Direction,
    goal: Vec2,
) -> Direction {
    if pos.x != X_INV_CONN {
        return dir;
    }
    let goal_right = goal.x > X_INV_CONN;
    let target_y = if goal_right { Y_BUS } else { goal.y };
    if !on_line(pos.y, target_y) {
        Direction::vertical_toward(pos.y, target_y)
    } else if goal_right {
        Direction::Right
    } else {
        Direction::horizontal_toward(X_INV_CONN, goal.x)
    }
}

/// Move one blob `dist` pixels toward `goal` (a stored anchor position).
///
/// Updates position and direction. The caller removes the blob unless the
/// result is [`Step::Moving`].
pub fn advance_blob(
    blob: &mut EnergyBlob,
    goal: Vec2,
    dist: f32,
    y_offset: f32,
) -> Step {
    let goal = to_screen(goal, y_offset);
    let mut pos = to_screen(blob.position, y_offset);
    let mut dir = blob.direction;
    let mut remaining = dist;
    let mut arrived = false;

    for _ in 0..MAX_LEGS {
        if remaining <= 0.0 {
            break;
        }
        dir = resolve_on_inverter_bus(pos, dir, goal);
        let prev = pos;
        pos = pos + dir.step(remaining);
        remaining = 0.0;
        match junction(prev, pos, dir, goal) {
            Leg::Straight => {}
            Leg::Turn { at, dir: next } => {
                remaining = pos.manhattan(at);
                pos = at;
                dir = next;
            }
            Leg::Arrive => {
                pos = goal;
                arrived = true;
                break;
            }
        }
    }

    blob.position = from_screen(pos, y_offset);
    blob.direction = dir;

    if arrived || pos.manhattan(goal) < ARRIVAL_DISTANCE {
        Step::Arrived
    } else if is_stray(blob.position) {
        Step::Stray
    } else {
        Step::Moving
    }
}

/// Advance every live blob by one frame and drop the finished ones.
///
/// Blobs whose target no longer exists or that strayed are logged and
/// removed. Returns the number of blobs removed.
pub fn advance_all(
    blobs: &mut BlobPool,
    groups: &[InverterGroup],
    delta_ms: u32,
    y_offset: f32,
    log: &mut LogBuffer,
) -> usize {
    let dist = BLOB_SPEED_PX_PER_MS * delta_ms as f32;

    for blob in blobs.iter_mut() {
        if blob.is_removed() {
            continue;
        }
        let Some(goal) = device_anchor(blob.end_device_id, groups) else {
            log_error!(log, "No target {} for blob", blob.end_device_id);
            blob.mark_removed();
            continue;
        };
        match advance_blob(blob, goal, dist, y_offset) {
            Step::Moving => {}
            Step::Arrived => blob.mark_removed(),
            Step::Stray => {
                log_error!(log, "Stray dot at {:.0},{:.0}", blob.position.x, blob.position.y);
                blob.mark_removed();
            }
        }
    }

    blobs.compact()
}

// =============================================================================
// Unit Tests
// =============================================================================

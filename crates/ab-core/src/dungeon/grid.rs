//! Grid stamping primitives shared by the builders.
//!
//! All rectangle boundaries are inclusive.

use super::cell::{CellFlags, Feature};
use super::Cave;
use ab_rng::GameRng;

/// Fill a rectangle with a feature.
pub(crate) fn fill_rectangle(c: &mut Cave, y1: i32, x1: i32, y2: i32, x2: i32, feat: Feature) {
    for y in y1..=y2 {
        for x in x1..=x2 {
            c.set_feat(y, x, feat);
        }
    }
}

/// Fill the edges of a rectangle with a feature.
pub(crate) fn draw_rectangle(c: &mut Cave, y1: i32, x1: i32, y2: i32, x2: i32, feat: Feature) {
    for y in y1..=y2 {
        c.set_feat(y, x1, feat);
        c.set_feat(y, x2, feat);
    }
    for x in x1..=x2 {
        c.set_feat(y1, x, feat);
        c.set_feat(y2, x, feat);
    }
}

/// Fill a horizontal range with the given feature and flags.
pub(crate) fn fill_xrange(c: &mut Cave, y: i32, x1: i32, x2: i32, feat: Feature, info: CellFlags) {
    for x in x1..=x2 {
        c.set_feat(y, x, feat);
        c.add_flags(y, x, info);
    }
}

/// Fill a vertical range with the given feature and flags.
pub(crate) fn fill_yrange(c: &mut Cave, x: i32, y1: i32, y2: i32, feat: Feature, info: CellFlags) {
    for y in y1..=y2 {
        c.set_feat(y, x, feat);
        c.add_flags(y, x, info);
    }
}

/// Round-to-nearest integer square root.
fn isqrt_round(v: i32) -> i32 {
    let mut s = 0;
    while (s + 1) * (s + 1) <= v {
        s += 1;
    }
    if v - s * s > s {
        s + 1
    } else {
        s
    }
}

/// Fill a circle with the given feature and flags.
///
/// `border` widens rows where the radius steps inward, which keeps the
/// outline of a wall ring closed.
pub(crate) fn fill_circle(
    c: &mut Cave,
    y0: i32,
    x0: i32,
    radius: i32,
    border: i32,
    feat: Feature,
    info: CellFlags,
) {
    let r2 = radius * radius;
    let mut last = 0;
    for i in 0..=radius {
        let k = isqrt_round(r2 - i * i);
        let b = if border != 0 && last > k {
            border + 1
        } else {
            border
        };
        fill_xrange(c, y0 - i, x0 - k - b, x0 + k + b, feat, info);
        fill_xrange(c, y0 + i, x0 - k - b, x0 + k + b, feat, info);
        fill_yrange(c, x0 - i, y0 - k - b, y0 + k + b, feat, info);
        fill_yrange(c, x0 + i, y0 - k - b, y0 + k + b, feat, info);
        last = k;
    }
}

/// Mark a rectangle as being in a room, and optionally light it.
pub(crate) fn generate_room(c: &mut Cave, y1: i32, x1: i32, y2: i32, x2: i32, light: bool) {
    let mut add = CellFlags::ROOM;
    if light {
        add |= CellFlags::GLOW;
    }
    for y in y1..=y2 {
        for x in x1..=x2 {
            c.add_flags(y, x, add);
        }
    }
}

/// Fill the center lines of a rectangle with a feature, splitting it into
/// four compartments.
pub(crate) fn generate_plus(c: &mut Cave, y1: i32, x1: i32, y2: i32, x2: i32, feat: Feature) {
    let y0 = (y1 + y2) / 2;
    let x0 = (x1 + x2) / 2;
    for y in y1..=y2 {
        c.set_feat(y, x0, feat);
    }
    for x in x1..=x2 {
        c.set_feat(y0, x, feat);
    }
}

/// Open the middle of all four sides of a rectangle with a feature.
pub(crate) fn generate_open(c: &mut Cave, y1: i32, x1: i32, y2: i32, x2: i32, feat: Feature) {
    let y0 = (y1 + y2) / 2;
    let x0 = (x1 + x2) / 2;
    c.set_feat(y1, x0, feat);
    c.set_feat(y0, x1, feat);
    c.set_feat(y2, x0, feat);
    c.set_feat(y0, x2, feat);
}

/// Open the middle of one random side of a rectangle with a feature.
pub(crate) fn generate_hole(
    c: &mut Cave,
    y1: i32,
    x1: i32,
    y2: i32,
    x2: i32,
    feat: Feature,
    rng: &mut GameRng,
) {
    let y0 = (y1 + y2) / 2;
    let x0 = (x1 + x2) / 2;
    match rng.randint0(4) {
        0 => c.set_feat(y1, x0, feat),
        1 => c.set_feat(y0, x1, feat),
        2 => c.set_feat(y2, x0, feat),
        _ => c.set_feat(y0, x2, feat),
    }
}

/// Divide `amount` into `n` intervals in a mostly symmetric way.
///
/// Every interval gets `amount / n`; an odd remainder adds one to the middle
/// interval, and what is left is handed out in symmetric outer pairs. Used
/// to space features evenly along walls of variable length.
pub fn fit_intervals(n: usize, amount: i32) -> Vec<i32> {
    if n == 0 {
        return Vec::new();
    }
    let quot = amount / n as i32;
    let mut rem = amount % n as i32;
    let middle = n / 2;

    let mut intervals = vec![quot; n];

    if rem % 2 == 1 {
        intervals[middle] += 1;
        rem -= 1;
    }

    let mut i = 0;
    while rem > 0 && i < middle {
        intervals[i] += 1;
        intervals[n - i - 1] += 1;
        rem -= 2;
        i += 1;
    }

    intervals
}

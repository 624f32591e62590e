//! Monster pit selection.

use crate::data::pits::{PitKind, PitProfile, PITS};
use ab_rng::GameRng;

/// Pick a pit profile of the requested kind for the given depth.
///
/// Each candidate draws a depth offset from a normal distribution centered
/// on its preferred depth; the profile landing closest to the actual depth
/// wins, provided it also passes a 1-in-rarity roll. When every roll fails,
/// the first profile of the kind is the fallback. Returns `None` only when
/// no profile of the kind is configured at all.
pub fn choose_pit_type(
    depth: i32,
    kind: PitKind,
    rng: &mut GameRng,
) -> Option<&'static PitProfile> {
    let mut chosen = PITS.iter().find(|p| p.kind == kind)?;
    let mut best_dist = 999;

    for pit in PITS.iter().filter(|p| p.kind == kind) {
        let offset = rng.rand_normal(pit.ave, 10);
        let dist = (offset - depth).abs();
        if dist < best_dist && rng.one_in(pit.rarity) {
            chosen = pit;
            best_dist = dist;
        }
    }

    Some(chosen)
}

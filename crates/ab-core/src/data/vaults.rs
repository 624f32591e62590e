//! Static vault templates.
//!
//! Stamp alphabet: `%` outer-wall doorstep (pierceable), `#` inner wall,
//! `X` permanent inner wall, `+` secret door, `^` trap, `*` treasure or
//! trap, `&`/`@`/`8`/`9`/`,` monster spawns of varying difficulty, space =
//! not part of the vault; anything else lays plain floor.

use serde::{Deserialize, Serialize};
use strum::Display;

use ab_rng::GameRng;

/// Which room profile a vault belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum VaultKind {
    Lesser,
    Medium,
    Greater,
}

/// A hand-designed chamber stamped from a character grid.
#[derive(Debug, Clone, Copy)]
pub struct Vault {
    pub name: &'static str,
    pub kind: VaultKind,
    /// Added to the level's monster rating when built.
    pub rating: u32,
    pub height: i32,
    pub width: i32,
    pub text: &'static [&'static str],
}

/// Choose a vault of the given kind, each with equal probability.
pub fn random_vault(kind: VaultKind, rng: &mut GameRng) -> Option<&'static Vault> {
    let mut chosen = None;
    let mut n = 1;
    for vault in VAULTS.iter().filter(|v| v.kind == kind) {
        if rng.one_in(n) {
            chosen = Some(vault);
        }
        n += 1;
    }
    chosen
}

pub static VAULTS: &[Vault] = &[
    Vault {
        name: "the split cell",
        kind: VaultKind::Lesser,
        rating: 5,
        height: 9,
        width: 17,
        text: &[
            "%%%%%%%%%%%%%%%%%",
            "%,,,,,,,,,,,,,,,%",
            "%,#############,%",
            "%,#...&...#...#,%",
            "%,+....*..+.9.#,%",
            "%,#...&...#...#,%",
            "%,#############,%",
            "%,,,,,,,,,,,,,,,%",
            "%%%%%%%%%%%%%%%%%",
        ],
    },
    Vault {
        name: "the guarded crossing",
        kind: VaultKind::Lesser,
        rating: 5,
        height: 9,
        width: 13,
        text: &[
            "%%%%%%%%%%%%%",
            "%...........%",
            "%.#########.%",
            "%.#&.....&#.%",
            "%.+...8...+.%",
            "%.#&.....&#.%",
            "%.#########.%",
            "%...^...^...%",
            "%%%%%%%%%%%%%",
        ],
    },
    Vault {
        name: "the twin cells",
        kind: VaultKind::Medium,
        rating: 10,
        height: 9,
        width: 25,
        text: &[
            "%%%%%%%%%%%%%%%%%%%%%%%%%",
            "%,,,,,,,,,,,,,,,,,,,,,,,%",
            "%,#####################,%",
            "%,#.........#.........#,%",
            "%,#.&..*..^.+.^..9...&#,%",
            "%,#.........#.........#,%",
            "%,####+###########+####,%",
            "%,,,,,,,,,,,,,,,,,,,,,,,%",
            "%%%%%%%%%%%%%%%%%%%%%%%%%",
        ],
    },
    Vault {
        name: "the inner sanctum",
        kind: VaultKind::Medium,
        rating: 12,
        height: 13,
        width: 21,
        text: &[
            "%%%%%%%%%%%%%%%%%%%%%",
            "%...................%",
            "%.########+########.%",
            "%.#,,,,,,,,,,,,,,,#.%",
            "%.#,######+######,#.%",
            "%.#,#.&.......&.#,#.%",
            "%.#,#..9.*8*.9..#,#.%",
            "%.#,#.^.......^.#,#.%",
            "%.#,#############,#.%",
            "%.#,,,,,,,,,,,,,,,#.%",
            "%.#################.%",
            "%...................%",
            "%%%%%%%%%%%%%%%%%%%%%",
        ],
    },
    Vault {
        name: "the grand vault",
        kind: VaultKind::Greater,
        rating: 25,
        height: 19,
        width: 37,
        text: &[
            "%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%",
            "%,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,%",
            "%,################+################,%",
            "%,#...............................#,%",
            "%,#.#############...#############.#,%",
            "%,#.#&.........,#.^.#,.........&#.#,%",
            "%,#.+....9......#.8.#......9....+.#,%",
            "%,#.#&.........,#.^.#,.........&#.#,%",
            "%,#.#############...#############.#,%",
            "%,#...............*...............#,%",
            "%,#.........XXXXXX+XXXXXX.........#,%",
            "%,#.........X8*9*,*,*9*8X.........#,%",
            "%,#.........XXXXXXXXXXXXX.........#,%",
            "%,#...^.......................^...#,%",
            "%,#...............................#,%",
            "%,#...............................#,%",
            "%,################+################,%",
            "%,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,%",
            "%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%",
        ],
    },
    Vault {
        name: "the hall of pillars",
        kind: VaultKind::Greater,
        rating: 20,
        height: 14,
        width: 33,
        text: &[
            "%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%",
            "%,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,%",
            "%,##############+##############,%",
            "%,#...........................#,%",
            "%,#.#.#.#.#.#.#.#.#.#.#.#.#.#.#,%",
            "%,#.,...&...9...*...9...&...,.#,%",
            "%,#.#.#.#.#.#.#.#.#.#.#.#.#.#.#,%",
            "%,#.,...&...9...8...9...&...,.#,%",
            "%,#.#.#.#.#.#.#.#.#.#.#.#.#.#.#,%",
            "%,#.,.....^.........^.....,...#,%",
            "%,#...........................#,%",
            "%,#############################,%",
            "%,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,%",
            "%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_are_rectangular() {
        for vault in VAULTS {
            assert_eq!(vault.text.len(), vault.height as usize, "{} height", vault.name);
            for (i, row) in vault.text.iter().enumerate() {
                assert_eq!(
                    row.chars().count(),
                    vault.width as usize,
                    "{} row {i} width",
                    vault.name
                );
            }
        }
    }

    #[test]
    fn test_maps_use_closed_alphabet() {
        let alphabet = " %#X+^*&@89,.";
        for vault in VAULTS {
            for row in vault.text {
                for ch in row.chars() {
                    assert!(alphabet.contains(ch), "{} uses '{ch}'", vault.name);
                }
            }
        }
    }

    #[test]
    fn test_doorstep_ring() {
        // Every template is enclosed by pierceable doorstep walls.
        for vault in VAULTS {
            let first = vault.text[0];
            let last = vault.text[vault.text.len() - 1];
            assert!(first.chars().all(|c| c == '%'), "{} top ring", vault.name);
            assert!(last.chars().all(|c| c == '%'), "{} bottom ring", vault.name);
            for row in vault.text {
                assert!(row.starts_with('%') && row.ends_with('%'), "{} side ring", vault.name);
            }
        }
    }

    #[test]
    fn test_every_kind_available() {
        let mut rng = GameRng::new(42);
        for kind in [VaultKind::Lesser, VaultKind::Medium, VaultKind::Greater] {
            assert!(random_vault(kind, &mut rng).is_some(), "no {kind} vaults");
        }
    }

    #[test]
    fn test_random_vault_reaches_all() {
        let mut rng = GameRng::new(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            if let Some(v) = random_vault(VaultKind::Lesser, &mut rng) {
                seen.insert(v.name);
            }
        }
        assert_eq!(seen.len(), VAULTS.iter().filter(|v| v.kind == VaultKind::Lesser).count());
    }
}

//! Static data tables loaded into the binary: object kinds, monster races,
//! pit profiles, and vault templates.

pub mod kinds;
pub mod pits;
pub mod races;
pub mod vaults;

//! Editor-number (doomednum) classification.
//!
//! The automap only needs to know what *kind* of thing it is looking at and
//! roughly how big it is; states, sounds and AI data stay out of this crate.

use crate::fixed::{FRACUNIT, Fixed};

/// Broad display class of a map thing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThingCategory {
    Player,
    Monster,
    Pickup,
    Hazard,
    Decoration,
}

/// Category + collision radius for one editor number.
#[derive(Clone, Copy, Debug)]
pub struct ThingInfo {
    pub category: ThingCategory,
    pub radius: Fixed,
}

const fn info(category: ThingCategory, radius_units: i32) -> ThingInfo {
    ThingInfo {
        category,
        radius: radius_units * FRACUNIT,
    }
}

/// Classify a THINGS-lump editor number.
///
/// Covers the Doom / Doom II bestiary and the pickups a map viewer cares
/// about; anything unrecognised is a 16-unit decoration.
pub fn by_doomednum(num: u16) -> ThingInfo {
    use ThingCategory::*;
    match num {
        // player / deathmatch starts
        1..=4 | 11 => info(Player, 16),

        // monsters
        3004 | 9 | 84 => info(Monster, 20),   // former humans
        3001 | 65 => info(Monster, 20),       // imp, chaingunner
        3002 | 58 => info(Monster, 30),       // demon, spectre
        3005 | 71 => info(Monster, 31),       // cacodemon, pain elemental
        3003 | 69 => info(Monster, 24),       // baron, hell knight
        3006 => info(Monster, 16),            // lost soul
        66 => info(Monster, 20),              // revenant
        67 => info(Monster, 48),              // mancubus
        68 => info(Monster, 64),              // arachnotron
        64 => info(Monster, 20),              // arch-vile
        16 => info(Monster, 40),              // cyberdemon
        7 => info(Monster, 128),              // spider mastermind
        72 | 88 | 89 => info(Monster, 16),    // keen / boss brain fixtures

        // pickups: weapons, ammo, health, armor, powerups, keys
        2001..=2008 | 82 => info(Pickup, 20),
        2010..=2015 | 2018 | 2019 | 2022..=2026 | 2045..=2049 => info(Pickup, 20),
        8 | 17 | 83 => info(Pickup, 20),
        5 | 6 | 13 | 38 | 39 | 40 => info(Pickup, 20),

        // exploding barrel
        2035 => info(Hazard, 10),

        _ => info(Decoration, 16),
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_starts() {
        assert_eq!(by_doomednum(1).category, ThingCategory::Player);
        assert_eq!(by_doomednum(4).category, ThingCategory::Player);
        assert_eq!(by_doomednum(11).category, ThingCategory::Player);
    }

    #[test]
    fn bestiary_radii() {
        assert_eq!(by_doomednum(3002).radius, 30 * FRACUNIT);
        assert_eq!(by_doomednum(7).radius, 128 * FRACUNIT);
    }

    #[test]
    fn unknown_is_decoration() {
        assert_eq!(by_doomednum(9999).category, ThingCategory::Decoration);
    }

    #[test]
    fn barrel_is_hazard() {
        assert_eq!(by_doomednum(2035).category, ThingCategory::Hazard);
    }
}

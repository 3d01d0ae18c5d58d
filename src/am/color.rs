//! Wall and glyph coloring.
//!
//! [`classify_line`] is the priority chain that turns linedef flags,
//! specials and reveal state into a palette index (or "don't draw").
//! The chain is identical for every [`ColorScheme`]; only the literal
//! indices change, so each scheme is one const table consumed through a
//! `match` instead of per-frame function pointers.

use crate::am::raster::NUM_SHADES;
use crate::world::{Level, Linedef, LinedefFlags, Palette};

/// Line specials that read as teleporters on the map.
const TELEPORT_SPECIALS: [u16; 4] = [39, 97, 125, 126];
/// Keyed-door specials, grouped by key color.
const BLUE_DOOR_SPECIALS: [u16; 4] = [26, 32, 99, 133];
const YELLOW_DOOR_SPECIALS: [u16; 4] = [27, 34, 136, 137];
const RED_DOOR_SPECIALS: [u16; 4] = [28, 33, 134, 135];
/// Level-exit specials (normal and secret).
const EXIT_SPECIALS: [u16; 4] = [11, 51, 52, 124];

/*───────────────────────── reveal state ──────────────────────────────*/

/// The reveal cheat is one modulo-3 counter, not two booleans: the same
/// counter is shared by the alternate cheat code in the original game,
/// and keeping the cycle preserves its exact off → walls → walls+things
/// sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheatCycle(u8);

impl CheatCycle {
    pub fn advance(&mut self) {
        self.0 = (self.0 + 1) % 3;
    }

    #[inline]
    pub fn reveals_walls(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub fn reveals_things(self) -> bool {
        self.0 == 2
    }
}

/// Per-frame reveal inputs, owned by the host (powerups, cheats).
#[derive(Clone, Copy, Debug, Default)]
pub struct RevealState {
    pub cheat: CheatCycle,
    /// Computer-area-map powerup: unseen walls get a dim tint.
    pub computer_map: bool,
}

/*───────────────────────── color schemes ─────────────────────────────*/

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Doom,
    Boom,
    Jaguar,
    Raven,
    Strife,
    Unity,
}

/// One scheme's palette indices. Field names follow the wall taxonomy of
/// the classifier chain.
pub struct AmColors {
    pub background: u8,
    pub grid: u8,
    /// One-sided wall.
    pub wall: u8,
    /// Two-sided, floor height changes across the line.
    pub fd_wall: u8,
    /// Two-sided, ceiling height changes across the line.
    pub cd_wall: u8,
    /// Any remaining two-sided line, shown only while cheating.
    pub ts_wall: u8,
    /// Secret line under cheat reveal.
    pub secret_wall: u8,
    pub teleport: u8,
    pub exit: u8,
    /// Computer-map tint for not-yet-seen lines.
    pub unseen: u8,
    pub door_blue: u8,
    pub door_yellow: u8,
    pub door_red: u8,
    pub player: u8,
    /// Arrow colors for the four multiplayer slots.
    pub players: [u8; 4],
    pub thing_monster: u8,
    pub thing_corpse: u8,
    pub thing_pickup: u8,
    pub thing_hazard: u8,
    pub thing_misc: u8,
    pub mark: u8,
    pub crosshair: u8,
    /// Wall colors that qualify for the antialiased drawer.
    pub aa_eligible: &'static [u8],
}

const DOOM_COLORS: AmColors = AmColors {
    background: 0,
    grid: 104,
    wall: 176,
    fd_wall: 64,
    cd_wall: 231,
    ts_wall: 96,
    secret_wall: 176,
    teleport: 184,
    exit: 112,
    unseen: 99,
    door_blue: 204,
    door_yellow: 231,
    door_red: 175,
    player: 209,
    players: [112, 96, 64, 176],
    thing_monster: 176,
    thing_corpse: 96,
    thing_pickup: 112,
    thing_hazard: 231,
    thing_misc: 96,
    mark: 209,
    crosshair: 96,
    aa_eligible: &[176, 64, 231],
};

const BOOM_COLORS: AmColors = AmColors {
    background: 247,
    grid: 104,
    wall: 23,
    fd_wall: 55,
    cd_wall: 215,
    ts_wall: 88,
    secret_wall: 252,
    teleport: 119,
    exit: 112,
    unseen: 104,
    door_blue: 204,
    door_yellow: 231,
    door_red: 175,
    player: 208,
    players: [112, 88, 64, 176],
    thing_monster: 177,
    thing_corpse: 104,
    thing_pickup: 231,
    thing_hazard: 231,
    thing_misc: 112,
    mark: 231,
    crosshair: 208,
    aa_eligible: &[23, 55, 215],
};

const JAGUAR_COLORS: AmColors = AmColors {
    background: 0,
    grid: 102,
    wall: 32,
    fd_wall: 64,
    cd_wall: 163,
    ts_wall: 98,
    secret_wall: 32,
    teleport: 120,
    exit: 112,
    unseen: 98,
    door_blue: 204,
    door_yellow: 231,
    door_red: 175,
    player: 209,
    players: [112, 96, 64, 32],
    thing_monster: 32,
    thing_corpse: 98,
    thing_pickup: 112,
    thing_hazard: 231,
    thing_misc: 98,
    mark: 209,
    crosshair: 98,
    aa_eligible: &[32, 64, 163],
};

const RAVEN_COLORS: AmColors = AmColors {
    background: 103,
    grid: 40,
    wall: 96,
    fd_wall: 112,
    cd_wall: 80,
    ts_wall: 40,
    secret_wall: 96,
    teleport: 116,
    exit: 220,
    unseen: 43,
    door_blue: 197,
    door_yellow: 144,
    door_red: 150,
    player: 32,
    players: [220, 144, 150, 197],
    thing_monster: 150,
    thing_corpse: 40,
    thing_pickup: 220,
    thing_hazard: 144,
    thing_misc: 40,
    mark: 32,
    crosshair: 40,
    aa_eligible: &[96, 112, 80],
};

const STRIFE_COLORS: AmColors = AmColors {
    background: 0,
    grid: 104,
    wall: 119,
    fd_wall: 55,
    cd_wall: 215,
    ts_wall: 96,
    secret_wall: 119,
    teleport: 135,
    exit: 112,
    unseen: 104,
    door_blue: 204,
    door_yellow: 231,
    door_red: 175,
    player: 209,
    players: [112, 96, 64, 119],
    thing_monster: 175,
    thing_corpse: 96,
    thing_pickup: 112,
    thing_hazard: 231,
    thing_misc: 96,
    mark: 209,
    crosshair: 96,
    aa_eligible: &[119, 55, 215],
};

const UNITY_COLORS: AmColors = AmColors {
    background: 0,
    grid: 104,
    wall: 176,
    fd_wall: 72,
    cd_wall: 231,
    ts_wall: 96,
    secret_wall: 252,
    teleport: 121,
    exit: 112,
    unseen: 99,
    door_blue: 204,
    door_yellow: 231,
    door_red: 175,
    player: 209,
    players: [112, 96, 64, 176],
    thing_monster: 176,
    thing_corpse: 96,
    thing_pickup: 112,
    thing_hazard: 231,
    thing_misc: 96,
    mark: 209,
    crosshair: 96,
    aa_eligible: &[176, 72, 231],
};

impl ColorScheme {
    pub fn colors(self) -> &'static AmColors {
        match self {
            ColorScheme::Doom => &DOOM_COLORS,
            ColorScheme::Boom => &BOOM_COLORS,
            ColorScheme::Jaguar => &JAGUAR_COLORS,
            ColorScheme::Raven => &RAVEN_COLORS,
            ColorScheme::Strife => &STRIFE_COLORS,
            ColorScheme::Unity => &UNITY_COLORS,
        }
    }
}

/*────────────────────────── line classifier ──────────────────────────*/

/// Palette index for one linedef, or `None` to skip it.
///
/// The arms form a priority chain; each assumes everything above it has
/// already failed (a ceiling-height check on a teleporter would be
/// wrong, not just redundant).
pub fn classify_line(
    level: &Level,
    ld: &Linedef,
    colors: &AmColors,
    reveal: RevealState,
) -> Option<u8> {
    let cheating = reveal.cheat.reveals_walls();

    if cheating || ld.flags.contains(LinedefFlags::MAPPED) {
        if ld.flags.contains(LinedefFlags::DONT_DRAW) && !cheating {
            return None;
        }
        let Some(back) = level.back_sector(ld) else {
            return Some(colors.wall);
        };
        let front = level.front_sector(ld)?;

        if TELEPORT_SPECIALS.contains(&ld.special) {
            Some(colors.teleport)
        } else if ld.flags.contains(LinedefFlags::SECRET) {
            // shown as an ordinary wall unless cheating
            if cheating {
                Some(colors.secret_wall)
            } else {
                Some(colors.wall)
            }
        } else if BLUE_DOOR_SPECIALS.contains(&ld.special) {
            Some(colors.door_blue)
        } else if YELLOW_DOOR_SPECIALS.contains(&ld.special) {
            Some(colors.door_yellow)
        } else if RED_DOOR_SPECIALS.contains(&ld.special) {
            Some(colors.door_red)
        } else if EXIT_SPECIALS.contains(&ld.special) {
            Some(colors.exit)
        } else if back.floor_h != front.floor_h {
            Some(colors.fd_wall)
        } else if back.ceil_h != front.ceil_h {
            Some(colors.cd_wall)
        } else if cheating {
            Some(colors.ts_wall)
        } else {
            None
        }
    } else if reveal.computer_map {
        if !ld.flags.contains(LinedefFlags::DONT_DRAW) {
            Some(colors.unseen)
        } else {
            None
        }
    } else {
        None
    }
}

/*────────────────────────── shade table ──────────────────────────────*/

/// Per-color fade ramps for the antialiased drawer: level 0 is the base
/// color itself, levels 1..8 step toward black through the nearest
/// palette match. Built once per palette/scheme pair.
pub struct ShadeTable {
    rows: Vec<(u8, [u8; NUM_SHADES])>,
}

impl ShadeTable {
    pub fn build(pal: &Palette, colors: &AmColors) -> Self {
        let rows = colors
            .aa_eligible
            .iter()
            .map(|&base| {
                let (r, g, b) = pal.rgb(base as usize);
                let mut row = [0u8; NUM_SHADES];
                row[0] = base;
                for (lvl, slot) in row.iter_mut().enumerate().skip(1) {
                    let keep = (NUM_SHADES - lvl) as u32;
                    *slot = pal.nearest(
                        (r as u32 * keep / NUM_SHADES as u32) as u8,
                        (g as u32 * keep / NUM_SHADES as u32) as u8,
                        (b as u32 * keep / NUM_SHADES as u32) as u8,
                    );
                }
                (base, row)
            })
            .collect();
        Self { rows }
    }

    /// Fade ramp for `color`, if it antialiases under the active scheme.
    pub fn row(&self, color: u8) -> Option<&[u8; NUM_SHADES]> {
        self.rows
            .iter()
            .find(|(base, _)| *base == color)
            .map(|(_, row)| row)
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FRACUNIT;
    use crate::world::{Sector, Sidedef, Vertex};

    fn level_with_line(flags: LinedefFlags, special: u16, two_sided: bool) -> Level {
        let back_floor = 24 * FRACUNIT;
        Level {
            name: "T".into(),
            things: Vec::new(),
            linedefs: vec![Linedef {
                v1: 0,
                v2: 1,
                flags,
                special,
                tag: 0,
                right_sidedef: Some(0),
                left_sidedef: two_sided.then_some(1),
            }],
            sidedefs: vec![Sidedef { sector: 0 }, Sidedef { sector: 1 }],
            vertices: vec![Vertex { x: 0, y: 0 }, Vertex { x: FRACUNIT, y: 0 }],
            sectors: vec![
                Sector {
                    floor_h: 0,
                    ceil_h: 128 * FRACUNIT,
                    special: 0,
                    tag: 0,
                },
                Sector {
                    floor_h: back_floor,
                    ceil_h: 128 * FRACUNIT,
                    special: 0,
                    tag: 0,
                },
            ],
        }
    }

    fn classify(lvl: &Level, reveal: RevealState) -> Option<u8> {
        classify_line(lvl, &lvl.linedefs[0], ColorScheme::Doom.colors(), reveal)
    }

    fn mapped() -> LinedefFlags {
        LinedefFlags::MAPPED
    }

    fn cheat_walls() -> RevealState {
        let mut c = CheatCycle::default();
        c.advance();
        RevealState {
            cheat: c,
            computer_map: false,
        }
    }

    #[test]
    fn unmapped_line_is_invisible() {
        let lvl = level_with_line(LinedefFlags::empty(), 0, false);
        assert_eq!(classify(&lvl, RevealState::default()), None);
    }

    #[test]
    fn one_sided_wall_color() {
        let lvl = level_with_line(mapped(), 0, false);
        assert_eq!(classify(&lvl, RevealState::default()), Some(176));
    }

    #[test]
    fn teleporter_beats_secret_and_heights() {
        let lvl = level_with_line(mapped() | LinedefFlags::SECRET, 39, true);
        assert_eq!(classify(&lvl, RevealState::default()), Some(184));
    }

    #[test]
    fn secret_masquerades_as_wall_until_cheat() {
        let lvl = level_with_line(mapped() | LinedefFlags::SECRET, 0, true);
        assert_eq!(classify(&lvl, RevealState::default()), Some(176));
        // the Doom scheme reuses the wall color for revealed secrets;
        // Boom gives them their own
        let boom = classify_line(
            &lvl,
            &lvl.linedefs[0],
            ColorScheme::Boom.colors(),
            cheat_walls(),
        );
        assert_eq!(boom, Some(252));
    }

    #[test]
    fn locked_door_colors_by_key() {
        for (special, expect) in [(26, 204), (27, 231), (28, 175)] {
            let lvl = level_with_line(mapped(), special, true);
            assert_eq!(classify(&lvl, RevealState::default()), Some(expect));
        }
    }

    #[test]
    fn door_beats_floor_height_change() {
        // the test level always has a floor-height difference; the door
        // special must still win
        let lvl = level_with_line(mapped(), 26, true);
        assert_ne!(classify(&lvl, RevealState::default()), Some(64));
    }

    #[test]
    fn floor_change_beats_ceiling_change() {
        let mut lvl = level_with_line(mapped(), 0, true);
        lvl.sectors[1].ceil_h = 64 * FRACUNIT; // both differ now
        assert_eq!(classify(&lvl, RevealState::default()), Some(64));
        // equal floors leave the ceiling difference visible
        lvl.sectors[1].floor_h = 0;
        assert_eq!(classify(&lvl, RevealState::default()), Some(231));
    }

    #[test]
    fn plain_two_sided_needs_cheat() {
        let mut lvl = level_with_line(mapped(), 0, true);
        lvl.sectors[1].floor_h = 0; // no height changes at all
        assert_eq!(classify(&lvl, RevealState::default()), None);
        assert_eq!(classify(&lvl, cheat_walls()), Some(96));
    }

    #[test]
    fn hidden_flag_respected_until_cheat() {
        let lvl = level_with_line(mapped() | LinedefFlags::DONT_DRAW, 0, false);
        assert_eq!(classify(&lvl, RevealState::default()), None);
        assert_eq!(classify(&lvl, cheat_walls()), Some(176));
    }

    #[test]
    fn computer_map_tints_unseen_lines_only() {
        let reveal = RevealState {
            cheat: CheatCycle::default(),
            computer_map: true,
        };
        let lvl = level_with_line(LinedefFlags::empty(), 0, false);
        assert_eq!(classify(&lvl, reveal), Some(99));
        // already-seen lines keep their normal color
        let lvl = level_with_line(mapped(), 0, false);
        assert_eq!(classify(&lvl, reveal), Some(176));
        // hidden lines stay hidden even with the powerup
        let lvl = level_with_line(LinedefFlags::DONT_DRAW, 0, false);
        assert_eq!(classify(&lvl, reveal), None);
    }

    #[test]
    fn cheat_cycle_is_modulo_three() {
        let mut c = CheatCycle::default();
        assert!(!c.reveals_walls());
        c.advance();
        assert!(c.reveals_walls() && !c.reveals_things());
        c.advance();
        assert!(c.reveals_walls() && c.reveals_things());
        c.advance();
        assert!(!c.reveals_walls());
    }

    #[test]
    fn shade_rows_start_at_base_and_darken() {
        // gray-ramp palette: entry i = (i, i, i)
        let mut bytes = vec![0u8; 768];
        for i in 0..256 {
            bytes[i * 3] = i as u8;
            bytes[i * 3 + 1] = i as u8;
            bytes[i * 3 + 2] = i as u8;
        }
        let pal = Palette::from_playpal(&bytes).unwrap();
        let table = ShadeTable::build(&pal, ColorScheme::Doom.colors());

        let row = table.row(176).expect("wall color is aa-eligible");
        assert_eq!(row[0], 176);
        for lvl in 1..NUM_SHADES {
            assert!(
                row[lvl] <= row[lvl - 1],
                "ramp must darken monotonically: {row:?}"
            );
        }
        assert!(table.row(5).is_none(), "non-eligible color has no ramp");
    }
}

use bitflags::bitflags;

use crate::fixed::Fixed;

pub type LinedefId = u16;
pub type VertexId = u16;
pub type SidedefId = u16;
pub type SectorId = u16;

/// Runtime snapshot of one map. Geometry is immutable after load; only the
/// per-line "seen" bit ([`LinedefFlags::MAPPED`]) changes during play.
#[derive(Debug)]
pub struct Level {
    pub name: String,
    pub things: Vec<Thing>,
    pub linedefs: Vec<Linedef>,
    pub sidedefs: Vec<Sidedef>,
    pub vertices: Vec<Vertex>,
    pub sectors: Vec<Sector>,
}

/*------------------------- game objects -----------------------------*/

#[derive(Clone, Debug)]
pub struct Thing {
    pub x: Fixed,
    pub y: Fixed,
    pub angle: f32, // radians
    pub type_id: u16,
    pub multiplayer: bool, // NOTSINGLE option flag
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE      = 0x0001;
        const BLOCK_MONSTERS  = 0x0002;
        const TWO_SIDED       = 0x0004;
        const UPPER_UNPEGGED  = 0x0008;
        const LOWER_UNPEGGED  = 0x0010;
        /// Shown as an ordinary one-sided wall on the map.
        const SECRET          = 0x0020;
        const BLOCK_SOUND     = 0x0040;
        /// Never appears on the map, even when in view (cheats override).
        const DONT_DRAW       = 0x0080;
        /// Already seen by the player.
        const MAPPED          = 0x0100;
    }
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LinedefFlags,
    pub special: u16,
    pub tag: u16,
    pub right_sidedef: Option<SidedefId>,
    pub left_sidedef: Option<SidedefId>,
}

/*--------------------------- sidedefs -------------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Sidedef {
    pub sector: SectorId,
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub x: Fixed,
    pub y: Fixed,
}

#[derive(Clone, Copy, Debug)]
pub struct Sector {
    pub floor_h: Fixed,
    pub ceil_h: Fixed,
    pub special: i16,
    pub tag: i16,
}

/*--------------------- automap-facing helpers -----------------------*/

impl Level {
    /// Endpoints of linedef `ld`, engine precision.
    #[inline]
    pub fn line_verts(&self, ld: &Linedef) -> (Vertex, Vertex) {
        (self.vertices[ld.v1 as usize], self.vertices[ld.v2 as usize])
    }

    /// Sector on the right (front) side of `ld`, if any.
    #[inline]
    pub fn front_sector(&self, ld: &Linedef) -> Option<&Sector> {
        ld.right_sidedef
            .and_then(|s| self.sidedefs.get(s as usize))
            .map(|sd| &self.sectors[sd.sector as usize])
    }

    /// Sector on the left (back) side of `ld`, if any. `None` for
    /// one-sided walls.
    #[inline]
    pub fn back_sector(&self, ld: &Linedef) -> Option<&Sector> {
        ld.left_sidedef
            .and_then(|s| self.sidedefs.get(s as usize))
            .map(|sd| &self.sectors[sd.sector as usize])
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::FRACUNIT;

    fn two_room_level() -> Level {
        Level {
            name: "TEST".into(),
            things: Vec::new(),
            linedefs: vec![Linedef {
                v1: 0,
                v2: 1,
                flags: LinedefFlags::TWO_SIDED,
                special: 0,
                tag: 0,
                right_sidedef: Some(0),
                left_sidedef: Some(1),
            }],
            sidedefs: vec![Sidedef { sector: 0 }, Sidedef { sector: 1 }],
            vertices: vec![
                Vertex { x: 0, y: 0 },
                Vertex {
                    x: 64 * FRACUNIT,
                    y: 0,
                },
            ],
            sectors: vec![
                Sector {
                    floor_h: 0,
                    ceil_h: 128 * FRACUNIT,
                    special: 0,
                    tag: 0,
                },
                Sector {
                    floor_h: 24 * FRACUNIT,
                    ceil_h: 128 * FRACUNIT,
                    special: 0,
                    tag: 0,
                },
            ],
        }
    }

    #[test]
    fn side_lookup() {
        let lvl = two_room_level();
        let ld = &lvl.linedefs[0];
        assert_eq!(lvl.front_sector(ld).unwrap().floor_h, 0);
        assert_eq!(lvl.back_sector(ld).unwrap().floor_h, 24 * FRACUNIT);
    }

    #[test]
    fn one_sided_has_no_back() {
        let mut lvl = two_room_level();
        lvl.linedefs[0].left_sidedef = None;
        let ld = lvl.linedefs[0].clone();
        assert!(lvl.back_sector(&ld).is_none());
    }
}

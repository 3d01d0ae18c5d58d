// ──────────────────────────────────────────────────────────────────────────
// wad/loader.rs
//
//  *   RawLevel  (wad::level)   --->  world::geometry::Level
//  *   PLAYPAL lump             --->  world::Palette
//
// Raw i16 map units become engine fixed-point (<< FRACBITS) here, so the
// rest of the crate never sees WAD-native integers.
// ──────────────────────────────────────────────────────────────────────────

use crate::{
    fixed::FRACBITS,
    wad::level as raw_level,
    wad::raw::{Wad, WadError},
    world::{self, Palette},
};
use thiserror::Error;

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Wad(#[from] WadError),

    #[error(transparent)]
    Level(#[from] raw_level::LevelError),

    #[error("PLAYPAL lump missing or truncated - cannot build palette")]
    NoPalette,
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Load the map at `marker` into a `world::Level`.
pub fn load_level(wad: &Wad, marker: usize) -> Result<world::Level, LoadError> {
    let raw = wad.parse_level(marker)?;

    let things = raw.things.into_iter().map(raw_to_geo::thing_from).collect();
    let linedefs = raw
        .linedefs
        .into_iter()
        .map(raw_to_geo::linedef_from)
        .collect();
    let sidedefs = raw
        .sidedefs
        .into_iter()
        .map(|s| world::Sidedef {
            sector: s.sector as u16,
        })
        .collect();
    let vertices = raw
        .vertices
        .into_iter()
        .map(raw_to_geo::vertex_from)
        .collect();
    let sectors = raw
        .sectors
        .into_iter()
        .map(raw_to_geo::sector_from)
        .collect();

    Ok(world::Level {
        name: raw.name,
        things,
        linedefs,
        sidedefs,
        vertices,
        sectors,
    })
}

/// Decode the first PLAYPAL palette (13 follow for pain/pickup flashes;
/// the automap only ever uses palette zero).
pub fn load_palette(wad: &Wad) -> Result<Palette, LoadError> {
    let idx = wad.find_lump("PLAYPAL").ok_or(LoadError::NoPalette)?;
    let bytes = wad.lump_bytes(idx)?;
    Palette::from_playpal(bytes).ok_or(LoadError::NoPalette)
}

/*====================================================================*/
/*                  Raw → Geo helpers (local)                         */
/*====================================================================*/
mod raw_to_geo {
    use super::*;

    pub fn thing_from(r: raw_level::RawThing) -> world::Thing {
        world::Thing {
            x: (r.x as i32) << FRACBITS,
            y: (r.y as i32) << FRACBITS,
            angle: (r.angle as f32).to_radians(),
            type_id: r.type_ as u16,
            multiplayer: r.options & 0x0010 != 0,
        }
    }

    pub fn linedef_from(r: raw_level::RawLinedef) -> world::Linedef {
        world::Linedef {
            v1: r.v1 as u16,
            v2: r.v2 as u16,
            flags: world::LinedefFlags::from_bits_truncate(r.flags as u16),
            special: r.special as u16,
            tag: r.tag as u16,
            right_sidedef: (r.sidenum[0] >= 0).then_some(r.sidenum[0] as u16),
            left_sidedef: (r.sidenum[1] >= 0).then_some(r.sidenum[1] as u16),
        }
    }

    pub fn vertex_from(r: raw_level::RawVertex) -> world::Vertex {
        world::Vertex {
            x: (r.x as i32) << FRACBITS,
            y: (r.y as i32) << FRACBITS,
        }
    }

    pub fn sector_from(r: raw_level::RawSector) -> world::Sector {
        world::Sector {
            floor_h: (r.floor_h as i32) << FRACBITS,
            ceil_h: (r.ceil_h as i32) << FRACBITS,
            special: r.special,
            tag: r.tag,
        }
    }
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/

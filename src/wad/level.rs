use crate::wad::raw::{Wad, WadError};
use bincode::Decode;
use once_cell::sync::Lazy;
use regex::Regex;

/*=======================================================================*/
/*                         Raw binary structs                            */
/*=======================================================================*/

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawThing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    pub type_: i16,
    pub options: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawLinedef {
    pub v1: i16,
    pub v2: i16,
    pub flags: i16,
    pub special: i16,
    pub tag: i16,
    pub sidenum: [i16; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSidedef {
    pub x_off: i16,
    pub y_off: i16,
    pub top_tex: [u8; 8],
    pub bottom_tex: [u8; 8],
    pub mid_tex: [u8; 8],
    pub sector: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawVertex {
    pub x: i16,
    pub y: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSector {
    pub floor_h: i16,
    pub ceil_h: i16,
    pub floor_tex: [u8; 8],
    pub ceil_tex: [u8; 8],
    pub light: i16,
    pub special: i16,
    pub tag: i16,
}

/*=======================================================================*/
/*                     Aggregate returned by `parse_level`               */
/*=======================================================================*/

/// The lump subset a top-down map needs. SEGS / SSECTORS / NODES stay
/// undecoded; the automap never walks the BSP.
#[derive(Debug)]
pub struct RawLevel {
    pub name: String,
    pub things: Vec<RawThing>,
    pub linedefs: Vec<RawLinedef>,
    pub sidedefs: Vec<RawSidedef>,
    pub vertices: Vec<RawVertex>,
    pub sectors: Vec<RawSector>,
}

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("marker index {0} out of bounds")]
    MarkerOob(usize),

    #[error("expected lump `{0}` not found after level marker")]
    Missing(&'static str),

    #[error(transparent)]
    Wad(#[from] WadError),
}

/*=======================================================================*/
/*                     Convenience helpers on `Wad`                      */
/*=======================================================================*/
impl Wad {
    /// Return directory indices of every map marker (`E#M#`, `MAP##`).
    pub fn level_indices(&self) -> Vec<usize> {
        static RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(E[1-4]M[1-9]|MAP[0-3][0-9])$").unwrap());

        self.lumps()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.size == 0 && RE.is_match(Self::lump_name_str(&l.name)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Return the index of the lump `name` expected at exactly `at`.
    fn idx_of(&self, at: usize, name: &'static str) -> Result<usize, LevelError> {
        let l = self.lumps().get(at).ok_or(LevelError::Missing(name))?;
        match Self::lump_name_str(&l.name) == name {
            true => Ok(at),
            false => Err(LevelError::Missing(name)),
        }
    }

    /// Decode the lumps of a classic Doom map that the automap consumes.
    pub fn parse_level(&self, marker_idx: usize) -> Result<RawLevel, LevelError> {
        // --- bounds check on marker index --------------------------------
        if marker_idx >= self.lumps().len() {
            return Err(LevelError::MarkerOob(marker_idx));
        }

        // --- fixed lump order after marker -------------------------------
        let things_idx = self.idx_of(marker_idx + 1, "THINGS")?;
        let linedefs_idx = self.idx_of(marker_idx + 2, "LINEDEFS")?;
        let sidedefs_idx = self.idx_of(marker_idx + 3, "SIDEDEFS")?;
        let vertices_idx = self.idx_of(marker_idx + 4, "VERTEXES")?;
        // SEGS / SSECTORS / NODES occupy +5..+7
        let sectors_idx = self.idx_of(marker_idx + 8, "SECTORS")?;

        // --- decode each lump -------------------------------------------
        let things = self.lump_to_vec::<RawThing>(things_idx)?;
        let linedefs = self.lump_to_vec::<RawLinedef>(linedefs_idx)?;
        let sidedefs = self.lump_to_vec::<RawSidedef>(sidedefs_idx)?;
        let vertices = self.lump_to_vec::<RawVertex>(vertices_idx)?;
        let sectors = self.lump_to_vec::<RawSector>(sectors_idx)?;

        Ok(RawLevel {
            name: Self::lump_name_str(&self.lumps()[marker_idx].name).into(),
            things,
            linedefs,
            sidedefs,
            vertices,
            sectors,
        })
    }
}

/*=======================================================================*/
/*                                Tests                                  */
/*=======================================================================*/
#[cfg(test)]
pub(crate) mod testmap {
    fn le16(vals: &[i16]) -> Vec<u8> {
        vals.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn pad8(name: &str) -> [u8; 8] {
        let mut n = [0u8; 8];
        n[..name.len()].copy_from_slice(name.as_bytes());
        n
    }

    /// One sector, four vertices, one thing, one line.
    pub(crate) fn tiny_map_lumps() -> Vec<(&'static str, Vec<u8>)> {
        let things = le16(&[32, 32, 90, 1, 7]);
        let linedefs = le16(&[0, 1, 1, 0, 0, 0, -1]);
        let mut sidedef = le16(&[0, 0]);
        sidedef.extend_from_slice(&pad8("-"));
        sidedef.extend_from_slice(&pad8("-"));
        sidedef.extend_from_slice(&pad8("STARTAN3"));
        sidedef.extend_from_slice(&le16(&[0]));
        let vertices = le16(&[0, 0, 128, 0, 128, 128, 0, 128]);
        let mut sector = le16(&[0, 128]);
        sector.extend_from_slice(&pad8("FLOOR4_8"));
        sector.extend_from_slice(&pad8("CEIL3_5"));
        sector.extend_from_slice(&le16(&[160, 0, 0]));
        vec![
            ("E1M1", Vec::new()),
            ("THINGS", things),
            ("LINEDEFS", linedefs),
            ("SIDEDEFS", sidedef),
            ("VERTEXES", vertices),
            ("SEGS", Vec::new()),
            ("SSECTORS", Vec::new()),
            ("NODES", Vec::new()),
            ("SECTORS", sector),
        ]
    }
}

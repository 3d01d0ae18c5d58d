//! # Doom WAD loader
//!
//! * Reads the whole file into RAM; lump reads are slice operations.
//! * Decodes binary lumps into typed vectors with **bincode 2**.
//!
//! Both IWADs and PWADs are accepted: a single-map PWAD is a perfectly
//! good input for a map viewer.

use bincode::{Decode, config, decode_from_slice};
use byteorder::{LittleEndian as LE, ReadBytesExt};
use std::{collections::HashMap, fs, io, mem, path::Path};
use thiserror::Error;

/// Which header magic the file carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WadKind {
    Iwad,
    Pwad,
}

/// One entry in the lump directory (16 bytes on disk).
#[derive(Clone, Debug)]
pub struct LumpInfo {
    pub name: [u8; 8],
    pub offset: u32,
    pub size: u32,
}

/// Entire WAD in memory (raw bytes + parsed directory).
#[derive(Debug)]
pub struct Wad {
    kind: WadKind,
    lumps: Vec<LumpInfo>,
    bytes: Vec<u8>,
    by_name: HashMap<String, usize>,
}

/// Loader / decoding errors.
#[derive(Error, Debug)]
pub enum WadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file is neither an IWAD nor a PWAD")]
    BadMagic,

    #[error("file too short for a WAD header")]
    Truncated,

    #[error("directory extends beyond end of file")]
    DirectoryOutOfBounds,

    #[error("lump index {0} out of range")]
    BadIndex(usize),

    #[error("lump {name} (# {index}) slice {offset}+{size} past EOF ({file_size})")]
    BadOffset {
        index: usize,
        name: String,
        offset: u32,
        size: u32,
        file_size: usize,
    },

    #[error("lump {name} (# {index}) size {size} not multiple of element {elem_size}")]
    BadLumpSize {
        index: usize,
        name: String,
        size: usize,
        elem_size: usize,
    },

    #[error("lump {name} (# {index}) element {elem}: {source}")]
    BadElement {
        index: usize,
        name: String,
        elem: usize,
        source: bincode::error::DecodeError,
    },
}

impl Wad {
    // ------------------------------------------------------------------ //
    // Low-level helpers
    // ------------------------------------------------------------------ //

    /// Expose directory as a read-only slice
    pub fn lumps(&self) -> &[LumpInfo] {
        &self.lumps
    }

    /// Return &str view of an 8-byte lump name (trimmed at first NUL).
    pub fn lump_name_str(name: &[u8; 8]) -> &str {
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        std::str::from_utf8(&name[..end]).unwrap_or("?")
    }

    /// Raw bytes of lump `idx` (slice into `self.bytes`).
    pub fn lump_bytes(&self, idx: usize) -> Result<&[u8], WadError> {
        let l = self.lumps.get(idx).ok_or(WadError::BadIndex(idx))?;
        let start = l.offset as usize;
        let end = start + l.size as usize;
        if end > self.bytes.len() {
            return Err(WadError::BadOffset {
                index: idx,
                name: Self::lump_name_str(&l.name).into(),
                offset: l.offset,
                size: l.size,
                file_size: self.bytes.len(),
            });
        }
        Ok(&self.bytes[start..end])
    }

    /// Find the last lump with `name` (case-sensitive like vanilla Doom).
    pub fn find_lump(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    // ------------------------------------------------------------------ //
    // Generic decode helper
    // ------------------------------------------------------------------ //

    pub fn lump_to_vec<T>(&self, idx: usize) -> Result<Vec<T>, WadError>
    where
        T: Decode<()>,
    {
        let bytes = self.lump_bytes(idx)?;
        let elem = mem::size_of::<T>();

        if bytes.is_empty() || bytes.len() % elem != 0 {
            return Err(WadError::BadLumpSize {
                index: idx,
                name: Self::lump_name_str(&self.lumps[idx].name).into(),
                size: bytes.len(),
                elem_size: elem,
            });
        }

        let cfg = config::standard()
            .with_fixed_int_encoding()
            .with_little_endian();
        let mut out = Vec::with_capacity(bytes.len() / elem);
        let mut slice = bytes;

        while !slice.is_empty() {
            let (val, read) =
                decode_from_slice::<T, _>(slice, cfg).map_err(|e| WadError::BadElement {
                    index: idx,
                    name: Self::lump_name_str(&self.lumps[idx].name).into(),
                    elem: out.len(),
                    source: e,
                })?;
            out.push(val);
            slice = &slice[read..];
        }
        Ok(out)
    }

    #[inline]
    pub fn kind(&self) -> WadKind {
        self.kind
    }

    // ------------------------------------------------------------------ //
    // Loading
    // ------------------------------------------------------------------ //

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WadError> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Parse a WAD image already resident in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, WadError> {
        if bytes.len() < 12 {
            return Err(WadError::Truncated);
        }
        let kind = match &bytes[0..4] {
            b"IWAD" => WadKind::Iwad,
            b"PWAD" => WadKind::Pwad,
            _ => return Err(WadError::BadMagic),
        };

        let mut header = &bytes[4..12];
        let num_lumps = header.read_u32::<LE>()? as usize;
        let dir_offset = header.read_u32::<LE>()? as usize;

        // directory bounds check
        let dir_end = dir_offset
            .checked_add(num_lumps * 16)
            .ok_or(WadError::DirectoryOutOfBounds)?;
        if dir_end > bytes.len() {
            return Err(WadError::DirectoryOutOfBounds);
        }

        // parse the directory, validating each lump slice as it appears
        let mut lumps = Vec::with_capacity(num_lumps);
        let mut cur = &bytes[dir_offset..dir_end];
        for i in 0..num_lumps {
            let offset = cur.read_u32::<LE>()?;
            let size = cur.read_u32::<LE>()?;
            let mut name = [0u8; 8];
            io::Read::read_exact(&mut cur, &mut name)?;

            if offset as usize + size as usize > bytes.len() {
                return Err(WadError::BadOffset {
                    index: i,
                    name: Self::lump_name_str(&name).into(),
                    offset,
                    size,
                    file_size: bytes.len(),
                });
            }
            lumps.push(LumpInfo { name, offset, size });
        }

        // build name → idx map (later lumps shadow earlier ones)
        let mut by_name = HashMap::with_capacity(lumps.len());
        for (i, l) in lumps.iter().enumerate().rev() {
            by_name
                .entry(Self::lump_name_str(&l.name).to_owned())
                .or_insert(i);
        }

        Ok(Self {
            kind,
            lumps,
            bytes,
            by_name,
        })
    }
}

// ==========================================================================
// Tests
// ==========================================================================

/// Hand-assemble a minimal IWAD: header + payload + directory.
/// Test-only; shared with the level/loader tests.
#[cfg(test)]
pub(crate) fn build_wad(lumps: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut payload = Vec::new();
    let mut dir = Vec::new();
    for (name, data) in lumps {
        let offset = 12 + payload.len() as u32;
        dir.extend_from_slice(&offset.to_le_bytes());
        dir.extend_from_slice(&(data.len() as u32).to_le_bytes());
        let mut n = [0u8; 8];
        n[..name.len()].copy_from_slice(name.as_bytes());
        dir.extend_from_slice(&n);
        payload.extend_from_slice(data);
    }
    let mut out = Vec::new();
    out.extend_from_slice(b"IWAD");
    out.extend_from_slice(&(lumps.len() as u32).to_le_bytes());
    out.extend_from_slice(&(12 + payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&dir);
    out
}

#[cfg(test)]
pub(crate) fn temp_wad(lumps: &[(&str, Vec<u8>)]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(&build_wad(lumps)).unwrap();
    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn opens_header_and_directory() {
        let f = temp_wad(&[("FOO", vec![1, 2, 3, 4]), ("BAR", vec![5, 6])]);
        let wad = Wad::from_file(f.path()).unwrap();
        assert_eq!(wad.lumps().len(), 2);
        assert_eq!(Wad::lump_name_str(&wad.lumps()[0].name), "FOO");
        assert_eq!(wad.lump_bytes(1).unwrap(), &[5, 6]);
    }

    #[test]
    fn rejects_unknown_magic() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"WAD2\0\0\0\0\0\0\0\0").unwrap();
        assert!(matches!(
            Wad::from_file(f.path()),
            Err(WadError::BadMagic)
        ));
    }

    #[test]
    fn accepts_pwad_magic() {
        let mut img = build_wad(&[("FOO", vec![1])]);
        img[0..4].copy_from_slice(b"PWAD");
        let wad = Wad::from_bytes(img).unwrap();
        assert_eq!(wad.kind(), WadKind::Pwad);
        assert_eq!(wad.lumps().len(), 1);
    }

    #[test]
    fn truncated_header_is_an_error() {
        assert!(matches!(
            Wad::from_bytes(b"IWAD\0\0".to_vec()),
            Err(WadError::Truncated)
        ));
    }

    #[test]
    fn later_lump_shadows_earlier() {
        let f = temp_wad(&[("SAME", vec![1]), ("SAME", vec![2])]);
        let wad = Wad::from_file(f.path()).unwrap();
        assert_eq!(wad.find_lump("SAME"), Some(1));
    }

    #[test]
    fn lump_to_vec_roundtrip() {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, PartialEq, bincode::Decode)]
        struct Foo {
            a: i16,
            b: i16,
        }

        let bytes = [1i16, 2, 3, 4]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect::<Vec<_>>();
        let f = temp_wad(&[("FOO", bytes)]);
        let wad = Wad::from_file(f.path()).unwrap();

        let v: Vec<Foo> = wad.lump_to_vec(0).unwrap();
        assert_eq!(v, vec![Foo { a: 1, b: 2 }, Foo { a: 3, b: 4 }]);
    }

    #[test]
    fn odd_sized_lump_is_an_error() {
        let f = temp_wad(&[("FOO", vec![1, 2, 3])]);
        let wad = Wad::from_file(f.path()).unwrap();
        assert!(matches!(
            wad.lump_to_vec::<i32>(0),
            Err(WadError::BadLumpSize { .. })
        ));
    }
}
